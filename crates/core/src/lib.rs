//! Age Gate Core - Shared types library.
//!
//! This crate provides the types exchanged by the age gate service:
//! - the inbound `/verify-age` request body
//! - the outbound JSON response
//! - the customer tag set rewritten on the commerce platform
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and easy to test exhaustively.
//!
//! # Modules
//!
//! - [`types`] - Email newtype, request/response bodies, and tag handling

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
