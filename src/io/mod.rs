//! Input/output helpers.
//!
//! - dated CSV persistence + freshness check (`store`)
//! - category back-fill over previously written files (`backfill`)

pub mod backfill;
pub mod store;

pub use backfill::*;
pub use store::*;
