//! Admin REST payloads.
//!
//! Only the fields the tagger reads are modelled; Shopify sends many more.

use serde::{Deserialize, Serialize};

use age_gate_core::TagSet;

/// A customer record as returned by the Admin REST API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Customer {
    /// Numeric customer ID.
    pub id: u64,
    /// Email on file (absent for phone-only customers).
    #[serde(default)]
    pub email: Option<String>,
    /// Comma-separated tags.
    #[serde(default)]
    pub tags: String,
}

impl Customer {
    /// Parsed view of the customer's tags.
    #[must_use]
    pub fn tag_set(&self) -> TagSet {
        TagSet::parse(&self.tags)
    }
}

/// `GET customers/search.json` response.
#[derive(Debug, Deserialize)]
pub(crate) struct CustomerSearchResponse {
    #[serde(default)]
    pub customers: Vec<Customer>,
}

/// `PUT customers/{id}.json` response.
#[derive(Debug, Deserialize)]
pub(crate) struct CustomerResponse {
    pub customer: Customer,
}

/// `PUT customers/{id}.json` request body.
#[derive(Debug, Serialize)]
pub(crate) struct CustomerTagsUpdate<'a> {
    pub customer: CustomerTagsUpdateFields<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomerTagsUpdateFields<'a> {
    pub id: u64,
    pub tags: &'a str,
}
