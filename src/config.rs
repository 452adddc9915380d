//! Run configuration.
//!
//! Endpoint URLs, query templates, and the tag-group ↔ vendor binding are an
//! explicit `Config` value threaded into each client at construction, never
//! ambient process state. Tests point clients at fake endpoints by building
//! a `Config` directly.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
const CONFIG_ENV_VAR: &str = "BASKET_CONFIG";

fn default_catalog() -> PathBuf {
    PathBuf::from("required_data.json")
}

fn default_store() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the tag catalog document.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    pub storefront: StorefrontConfig,
    pub feed: FeedConfig,
}

/// GraphQL storefront vendor.
#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontConfig {
    /// Tag group served by this vendor (e.g. "Seoudi_tags").
    pub tag_group: String,
    /// GraphQL endpoint URL.
    pub url: String,
    /// Product query template; the item slug is passed as the `slug` variable.
    pub query: String,
    /// Value of the `store` header.
    #[serde(default = "default_store")]
    pub store: String,
}

/// Recommendation-feed vendor.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Tag group served by this vendor (e.g. "Carrefour_tags").
    pub tag_group: String,
    /// Endpoint URL template; `{id}` is replaced with the item identifier.
    pub url_template: String,
    /// Fixed JSON body sent with each request.
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

impl Config {
    /// Resolve the config path: explicit flag, else `BASKET_CONFIG` from the
    /// environment (a `.env` file is honored), else `./config.toml`.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        dotenvy::dotenv().ok();
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        Self::from_path(&Self::resolve_path(explicit))
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        let config: Config =
            toml::from_str(text).map_err(|e| AppError::Config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if !self.feed.url_template.contains("{id}") {
            return Err(AppError::Config(
                "feed.url_template must contain an '{id}' placeholder.".to_string(),
            ));
        }
        if self.storefront.tag_group == self.feed.tag_group {
            return Err(AppError::Config(
                "storefront and feed must serve distinct tag groups.".to_string(),
            ));
        }
        Ok(())
    }

    /// Tag groups with a configured vendor, in scrape order.
    pub fn tag_groups(&self) -> Vec<&str> {
        vec![&self.storefront.tag_group, &self.feed.tag_group]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        catalog = "required_data.json"

        [storefront]
        tag_group = "Seoudi_tags"
        url = "https://example.test/graphql"
        query = "query Product($slug: String!) { product(slug: $slug) { name } }"

        [feed]
        tag_group = "Carrefour_tags"
        url_template = "https://example.test/products/{id}/recommendations"
    "#;

    #[test]
    fn parses_and_applies_defaults() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.storefront.store, "default");
        assert_eq!(config.catalog, PathBuf::from("required_data.json"));
        assert_eq!(config.tag_groups(), ["Seoudi_tags", "Carrefour_tags"]);
        assert!(config.feed.body.is_none());
    }

    #[test]
    fn feed_template_must_carry_id_placeholder() {
        let bad = SAMPLE.replace("{id}", "fixed");
        let err = Config::from_toml_str(&bad).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn vendors_must_serve_distinct_tag_groups() {
        let bad = SAMPLE.replace("Carrefour_tags", "Seoudi_tags");
        let err = Config::from_toml_str(&bad).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn explicit_path_wins_over_defaults() {
        let path = Config::resolve_path(Some(Path::new("/tmp/alt.toml")));
        assert_eq!(path, PathBuf::from("/tmp/alt.toml"));
    }
}
