//! Engine config schema (verb categories, name filters, credential exemptions).
use {
    methodgraph_service_traits::HttpVerb,
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Verbs that make a method a query field.
    pub query: CategoryConfig,
    /// Verbs that make a method a mutation field.
    pub mutation: CategoryConfig,
    /// Method names containing any of these substrings are never exposed.
    /// They mark streaming and raw-invocation endpoints.
    pub excluded_name_markers: Vec<String>,
    /// Model/method pairs that are called without the caller's access token.
    pub credential_exemptions: Vec<CredentialExemption>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            query: CategoryConfig {
                verbs: vec![HttpVerb::Get, HttpVerb::Head],
            },
            mutation: CategoryConfig {
                verbs: vec![
                    HttpVerb::Post,
                    HttpVerb::Delete,
                    HttpVerb::Put,
                    HttpVerb::Patch,
                    HttpVerb::All,
                ],
            },
            excluded_name_markers: vec!["Stream".into(), "invoke".into()],
            credential_exemptions: vec![CredentialExemption {
                model: "Account".into(),
                method: "login".into(),
            }],
        }
    }
}

impl EngineConfig {
    /// The first name marker found in `method`, if any.
    pub fn excluded_marker(&self, method: &str) -> Option<&str> {
        self.excluded_name_markers
            .iter()
            .map(String::as_str)
            .find(|marker| !marker.is_empty() && method.contains(marker))
    }
}

/// Allowed verbs for one field category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub verbs: Vec<HttpVerb>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialExemption {
    pub model: String,
    pub method: String,
}
