//! Recommendation-feed client.
//!
//! One POST per item to a URL template with the identifier substituted into
//! the path. The request body is a fixed JSON document from config.

use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::info;

use crate::config::FeedConfig;
use crate::data::{USER_AGENT, VendorClient, build_http_client};
use crate::error::AppError;

pub struct FeedClient {
    http: Client,
    config: FeedConfig,
}

impl FeedClient {
    pub fn new(config: FeedConfig) -> Result<Self, AppError> {
        Ok(Self {
            http: build_http_client()?,
            config,
        })
    }

    fn url_for(&self, item: &str) -> String {
        self.config.url_template.replace("{id}", item)
    }
}

impl VendorClient for FeedClient {
    fn fetch(&self, item: &str) -> Result<Value, AppError> {
        if item.is_empty() {
            return Err(AppError::fetch(item, "empty identifier"));
        }

        let body = self.config.body.clone().unwrap_or_else(|| json!({}));

        let response = self
            .http
            .post(self.url_for(item))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&body)
            .send()
            .map_err(|e| AppError::fetch(item, format!("request failed: {e}")))?;

        let status = response.status();
        info!(item, status = status.as_u16(), "feed fetch");

        if !status.is_success() {
            return Err(AppError::fetch(item, format!("HTTP status {status}")));
        }

        response
            .json()
            .map_err(|e| AppError::fetch(item, format!("invalid JSON body: {e}")))
    }
}
