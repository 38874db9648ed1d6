//! Resolution errors and their mapping onto GraphQL errors.

use {async_graphql::ErrorExtensions, methodgraph_service_traits::ServiceError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The access-control check rejected the call.
    #[error("{0}")]
    AccessDenied(#[source] ServiceError),

    /// The underlying method failed. The message is passed through unchanged.
    #[error(transparent)]
    Call(ServiceError),

    #[error("argument \"{argument}\" must be a non-negative integer")]
    Pagination { argument: &'static str },

    #[error("{method} returned {found} where a list was expected")]
    UnexpectedResult { method: String, found: &'static str },

    #[error("argument \"{name}\" has no JSON representation")]
    Argument { name: String },
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Self::AccessDenied(_) => "ACCESS_DENIED",
            Self::Call(_) => "CALL_FAILED",
            Self::Pagination { .. } => "BAD_PAGINATION",
            Self::UnexpectedResult { .. } => "BAD_RESULT",
            Self::Argument { .. } => "BAD_ARGUMENT",
        }
    }
}

impl ErrorExtensions for Error {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string())
            .extend_with(|_, e| e.set("code", self.code().to_string()))
    }
}

/// Name of a JSON value's kind, for error messages.
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}
