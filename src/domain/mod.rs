//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - normalized product records as vendors return them (`ProductRecord`)
//! - fully stamped table rows and tables (`PriceRow`, `PriceTable`)
//! - per-identifier failure records (`SkippedItem`)

pub mod types;

pub use types::*;
