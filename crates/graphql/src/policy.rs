//! Which calls forward the caller's access token.

use {
    methodgraph_config::{CredentialExemption, EngineConfig},
    methodgraph_service_traits::CallOptions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRequirement {
    /// Pass the caller's token through.
    Forward,
    /// Call without any token, e.g. a login that must work before one exists.
    Suppress,
}

pub trait CredentialPolicy: Send + Sync {
    fn token_requirement(&self, model: &str, method: &str) -> TokenRequirement;
}

/// Suppresses the token for a configured list of model/method pairs.
#[derive(Debug, Clone, Default)]
pub struct ExemptionPolicy {
    exemptions: Vec<CredentialExemption>,
}

impl ExemptionPolicy {
    pub fn new(exemptions: Vec<CredentialExemption>) -> Self {
        Self { exemptions }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.credential_exemptions.clone())
    }
}

impl CredentialPolicy for ExemptionPolicy {
    fn token_requirement(&self, model: &str, method: &str) -> TokenRequirement {
        if self
            .exemptions
            .iter()
            .any(|e| e.model == model && e.method == method)
        {
            TokenRequirement::Suppress
        } else {
            TokenRequirement::Forward
        }
    }
}

/// Trailing options for a call.
///
/// Exempt calls always get the empty marker. Otherwise standard methods get
/// the token and custom methods get nothing.
pub fn call_options(
    requirement: TokenRequirement,
    is_custom: bool,
    access_token: Option<&str>,
) -> Option<CallOptions> {
    match (requirement, is_custom) {
        (TokenRequirement::Suppress, _) => Some(CallOptions::Empty),
        (TokenRequirement::Forward, false) => Some(CallOptions::Token {
            access_token: access_token.map(str::to_owned),
        }),
        (TokenRequirement::Forward, true) => None,
    }
}
