//! Collaborator interfaces consumed by the remote-method translation engine.
//!
//! The engine never executes a method or decides access itself. A model
//! runtime enumerates descriptors and invokes methods, an access-control
//! engine approves or rejects each call. Each trait has a `Noop`
//! implementation so a schema can be assembled before the real runtime is
//! wired in.

use std::{fmt, str::FromStr};

use {
    async_trait::async_trait,
    serde::{Deserialize, Deserializer, Serialize, Serializer},
    serde_json::{Map, Value},
    tracing::warn,
};

/// Error type returned by collaborator methods.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{message}")]
    Message { message: String },
}

impl ServiceError {
    #[must_use]
    pub fn message(message: impl fmt::Display) -> Self {
        Self::Message {
            message: message.to_string(),
        }
    }
}

impl From<String> for ServiceError {
    fn from(value: String) -> Self {
        Self::message(value)
    }
}

impl From<&str> for ServiceError {
    fn from(value: &str) -> Self {
        Self::message(value)
    }
}

pub type ServiceResult<T = Value> = Result<T, ServiceError>;

// ── HTTP verbs ──────────────────────────────────────────────────────────────

/// HTTP verb a remote method is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpVerb {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    /// Mounted on every verb.
    All,
}

impl HttpVerb {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Head => "head",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::All => "all",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown http verb: {0}")]
pub struct UnknownVerb(pub String);

impl FromStr for HttpVerb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "head" => Ok(Self::Head),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "delete" | "del" => Ok(Self::Delete),
            "all" => Ok(Self::All),
            _ => Err(UnknownVerb(s.to_string())),
        }
    }
}

impl Serialize for HttpVerb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HttpVerb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── Request context ─────────────────────────────────────────────────────────

/// Per-request call context.
///
/// Built once by the transport for each request and never mutated
/// afterwards. Derived contexts are produced with [`RequestContext::with_options`],
/// which copies instead of writing in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub access_token: Option<String>,
    values: Map<String, Value>,
}

impl RequestContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Attach a named value that context-sourced parameters can pick up.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Shallow copy of this context with `options` set.
    #[must_use]
    pub fn with_options(&self, options: Value) -> Self {
        let mut local = self.clone();
        local.values.insert("options".to_string(), options);
        local
    }
}

// ── Access control ──────────────────────────────────────────────────────────

/// Everything the access-control engine sees about one call.
#[derive(Debug, Clone)]
pub struct AccessRequest {
    pub access_token: Option<String>,
    pub model: String,
    pub method: String,
    pub id: Option<Value>,
    pub context: RequestContext,
}

#[async_trait]
pub trait AccessControl: Send + Sync {
    /// Resolves to `Ok(())` when the call may proceed, `Err` on denial.
    async fn check_access(&self, request: &AccessRequest) -> ServiceResult<()>;
}

/// Allows every call.
pub struct NoopAccessControl;

#[async_trait]
impl AccessControl for NoopAccessControl {
    async fn check_access(&self, _request: &AccessRequest) -> ServiceResult<()> {
        Ok(())
    }
}

// ── Model runtime ───────────────────────────────────────────────────────────

/// Trailing options object appended to a method call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOptions {
    /// `{ "accessToken": ... }`
    Token { access_token: Option<String> },
    /// The empty marker passed instead of a token.
    Empty,
}

impl CallOptions {
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Token { access_token } => serde_json::json!({ "accessToken": access_token }),
            Self::Empty => Value::String(String::new()),
        }
    }
}

/// One positional call against a model method.
///
/// `args` keeps `None` slots where the method expects an explicit "no
/// value" placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub method: String,
    pub args: Vec<Option<Value>>,
    pub options: Option<CallOptions>,
}

#[async_trait]
pub trait ModelRuntime: Send + Sync {
    fn model_name(&self) -> &str;

    /// Raw remote-method descriptors, as declared by the model.
    fn list_methods(&self) -> Vec<Value>;

    async fn invoke(&self, invocation: Invocation) -> ServiceResult;
}

/// A model with no remote methods.
pub struct NoopModelRuntime {
    name: String,
}

impl NoopModelRuntime {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

fn runtime_not_configured_error(model: &str, method: &str) -> ServiceError {
    warn!(model, method, "model runtime not configured");
    "model runtime not configured".into()
}

#[async_trait]
impl ModelRuntime for NoopModelRuntime {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn list_methods(&self) -> Vec<Value> {
        Vec::new()
    }

    async fn invoke(&self, invocation: Invocation) -> ServiceResult {
        Err(runtime_not_configured_error(&self.name, &invocation.method))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
