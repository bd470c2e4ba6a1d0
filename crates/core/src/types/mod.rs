//! Core types for the age gate.
//!
//! This module provides type-safe wrappers for the payloads the service
//! handles. None of them are persisted.

pub mod email;
pub mod tags;
pub mod verification;

pub use email::{Email, EmailError};
pub use tags::TagSet;
pub use verification::{VerifyRequest, VerifyResponse, reasons};
