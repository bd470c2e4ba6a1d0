//! Business logic services.
//!
//! # Services
//!
//! - `tagging` - Best-effort Shopify customer tagging after verification

pub mod tagging;

pub use tagging::{CustomerTagger, TagOutcome, tag_best_effort};
