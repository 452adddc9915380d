//! Price-history reporting: the read side of the persisted dataset.
//!
//! We keep loading/reshaping and formatting in one place so:
//! - persistence stays free of presentation concerns
//! - the columns downstream consumers rely on are exercised in one module

pub mod history;

pub use history::*;
