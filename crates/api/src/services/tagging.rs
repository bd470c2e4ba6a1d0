//! Customer tagging after a successful verification.
//!
//! Marks the matching Shopify customer so storefront logic can recognise
//! verified customers later. Tagging is a side effect: the caller's
//! verification answer never depends on it.

use age_gate_core::Email;
use tracing::instrument;

use crate::shopify::{AdminClient, Customer, ShopifyError};

/// What the tagger did for one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// The tag was added.
    Tagged { customer_id: u64 },
    /// The customer already carried the tag; no update was sent.
    AlreadyTagged { customer_id: u64 },
    /// No customer matched the email.
    CustomerNotFound,
}

/// Adds a fixed marker tag to the customer owning an email.
#[derive(Clone)]
pub struct CustomerTagger {
    client: AdminClient,
    tag: String,
}

impl CustomerTagger {
    /// Create a tagger that adds `tag`.
    #[must_use]
    pub fn new(client: AdminClient, tag: impl Into<String>) -> Self {
        Self {
            client,
            tag: tag.into(),
        }
    }

    /// Find the customer for `email` and add the marker tag if absent.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` if the search or update call fails.
    #[instrument(skip(self), fields(email = %email, tag = %self.tag))]
    pub async fn tag_customer(&self, email: &Email) -> Result<TagOutcome, ShopifyError> {
        let customers = self.client.search_customers_by_email(email).await?;

        let Some(customer) = pick_customer(customers, email) else {
            return Ok(TagOutcome::CustomerNotFound);
        };

        let Some(tags) = customer.tag_set().with_tag(&self.tag) else {
            return Ok(TagOutcome::AlreadyTagged {
                customer_id: customer.id,
            });
        };

        self.client.update_customer_tags(customer.id, &tags).await?;

        Ok(TagOutcome::Tagged {
            customer_id: customer.id,
        })
    }
}

/// Tag the customer for `email`, logging and swallowing every failure.
///
/// Does nothing when Shopify is not configured.
pub async fn tag_best_effort(tagger: Option<&CustomerTagger>, email: &Email) {
    let Some(tagger) = tagger else {
        tracing::debug!("Shopify not configured, skipping customer tagging");
        return;
    };

    match tagger.tag_customer(email).await {
        Ok(TagOutcome::Tagged { customer_id }) => {
            tracing::info!(customer_id, "Tagged verified customer");
        }
        Ok(TagOutcome::AlreadyTagged { customer_id }) => {
            tracing::info!(customer_id, "Customer already tagged");
        }
        Ok(TagOutcome::CustomerNotFound) => {
            tracing::info!("No Shopify customer for verified email");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Customer tagging failed; verification result unaffected");
        }
    }
}

/// Prefer an exact (case-insensitive) email match, else the first result.
fn pick_customer(customers: Vec<Customer>, email: &Email) -> Option<Customer> {
    let exact = customers
        .iter()
        .position(|c| c.email.as_deref().is_some_and(|e| email.matches(e)));

    match exact {
        Some(index) => customers.into_iter().nth(index),
        None => customers.into_iter().next(),
    }
}
