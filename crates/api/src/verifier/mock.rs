//! Mock verifier for front-end integration testing.

use async_trait::async_trait;

use age_gate_core::Email;

use super::{AgeVerifier, ProviderError, Verification};

/// Verifier that never contacts a provider.
///
/// Always answers [`Verification::Stubbed`], which the handler renders as
/// `{ "verified": false, "debug": "mock-response", "email": ... }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockVerifier;

#[async_trait]
impl AgeVerifier for MockVerifier {
    async fn verify(&self, email: &Email) -> Result<Verification, ProviderError> {
        tracing::debug!(email = %email, "Mock verifier invoked");
        Ok(Verification::Stubbed)
    }
}
