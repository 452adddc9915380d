//! Vendor API access.
//!
//! One blocking client per vendor, built from an explicit config value. Both
//! clients share the same failure policy: every transport, HTTP-status, or
//! body-decode failure surfaces as `AppError::Fetch` so the pipeline can
//! skip the identifier and continue.

pub mod feed;
pub mod storefront;

pub use feed::FeedClient;
pub use storefront::StorefrontClient;

use serde_json::Value;

use crate::error::AppError;

/// Browser User-Agent sent with every vendor request.
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:142.0) Gecko/20100101 Firefox/142.0";

/// One network round trip per identifier.
///
/// `Sync` because the pipeline fetches identifiers from a worker pool.
pub trait VendorClient: Sync {
    fn fetch(&self, item: &str) -> Result<Value, AppError>;
}

pub(crate) fn build_http_client() -> Result<reqwest::blocking::Client, AppError> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))
}
