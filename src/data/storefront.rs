//! GraphQL storefront client.
//!
//! One POST per item: the product query template from config, with the item
//! slug bound as the `slug` variable. Sends the `store` header the
//! storefront's web app uses.

use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::info;

use crate::config::StorefrontConfig;
use crate::data::{USER_AGENT, VendorClient, build_http_client};
use crate::error::AppError;

pub struct StorefrontClient {
    http: Client,
    config: StorefrontConfig,
}

impl StorefrontClient {
    pub fn new(config: StorefrontConfig) -> Result<Self, AppError> {
        Ok(Self {
            http: build_http_client()?,
            config,
        })
    }
}

impl VendorClient for StorefrontClient {
    fn fetch(&self, item: &str) -> Result<Value, AppError> {
        if item.is_empty() {
            return Err(AppError::fetch(item, "empty identifier"));
        }

        let payload = json!({
            "query": self.config.query,
            "variables": { "slug": item },
        });

        let response = self
            .http
            .post(&self.config.url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header("store", &self.config.store)
            .json(&payload)
            .send()
            .map_err(|e| AppError::fetch(item, format!("request failed: {e}")))?;

        let status = response.status();
        info!(item, status = status.as_u16(), "storefront fetch");

        if !status.is_success() {
            return Err(AppError::fetch(item, format!("HTTP status {status}")));
        }

        response
            .json()
            .map_err(|e| AppError::fetch(item, format!("invalid JSON body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifier_is_rejected_before_any_request() {
        let client = StorefrontClient::new(StorefrontConfig {
            tag_group: "Seoudi_tags".to_string(),
            url: "https://example.invalid/graphql".to_string(),
            query: "query Product($slug: String!) { product(slug: $slug) { name } }".to_string(),
            store: "default".to_string(),
        })
        .unwrap();

        let err = client.fetch("").unwrap_err();
        assert!(matches!(err, AppError::Fetch { .. }));
    }
}
