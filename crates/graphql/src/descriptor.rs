//! Remote-method descriptors, validated once when a model is enumerated.
//!
//! Models declare methods in a loose JSON shape: `http` may be a single
//! route or a list of routes, a parameter type may be a name, a list or an
//! object literal. [`MethodDescriptor::from_json`] normalizes all of that so
//! nothing downstream has to branch on shape.

use std::collections::BTreeSet;

use {
    methodgraph_service_traits::HttpVerb,
    serde::Deserialize,
    serde_json::Value,
    tracing::warn,
};

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("malformed remote method descriptor: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("remote method descriptor has no name")]
    MissingName,
}

/// Declared type of a parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// A type name such as `string`, `number` or `Widget`.
    Named(String),
    /// An array type. Carries the element name when the first element is a string.
    List(Option<String>),
    /// An object literal used as a type.
    Shape,
}

impl ParamType {
    fn from_json(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Named("any".into()),
            Some(Value::String(name)) => Self::Named(name),
            Some(Value::Array(items)) => {
                Self::List(items.into_iter().next().and_then(|item| match item {
                    Value::String(name) => Some(name),
                    _ => None,
                }))
            },
            Some(_) => Self::Shape,
        }
    }
}

/// Where a parameter comes from when it is not supplied by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSource {
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// `None` means the parameter is not individually addressable.
    pub arg: Option<String>,
    pub ty: ParamType,
    pub http: Option<HttpSource>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub is_static: bool,
    pub http_verbs: BTreeSet<HttpVerb>,
    pub accepts: Vec<ParamSpec>,
    pub returns: Vec<ParamSpec>,
    pub description: Option<String>,
    /// `None` for application-defined methods, a tag such as `READ` or
    /// `WRITE` for the standard data-access methods.
    pub access_type: Option<String>,
}

impl MethodDescriptor {
    pub fn from_json(value: Value) -> Result<Self, DescriptorError> {
        let raw: RawDescriptor = serde_json::from_value(value)?;
        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(DescriptorError::MissingName)?;

        let http_verbs = raw
            .http
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|route| route.verb)
            .filter_map(|verb| match verb.parse::<HttpVerb>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(method = %name, error = %e, "ignoring route with unknown verb");
                    None
                },
            })
            .collect();

        Ok(Self {
            http_verbs,
            is_static: raw.is_static.unwrap_or(true),
            accepts: params(raw.accepts),
            returns: params(raw.returns),
            description: raw.description.and_then(text),
            access_type: raw.access_type,
            name,
        })
    }

    /// Whether any of the method's verbs is in `allowed`.
    pub fn matches_any_verb(&self, allowed: &[HttpVerb]) -> bool {
        allowed.iter().any(|verb| self.http_verbs.contains(verb))
    }

    /// The method-level spec for the parameter named `arg`.
    pub fn accept_spec(&self, arg: &str) -> Option<&ParamSpec> {
        self.accepts.iter().find(|p| p.arg.as_deref() == Some(arg))
    }

    /// Application-defined methods carry no access-type tag.
    pub fn is_custom(&self) -> bool {
        self.access_type.is_none()
    }
}

// ── Raw shape ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    name: Option<String>,
    is_static: Option<bool>,
    http: Option<OneOrMany<RawRoute>>,
    accepts: Option<OneOrMany<RawParam>>,
    returns: Option<OneOrMany<RawParam>>,
    description: Option<Value>,
    access_type: Option<String>,
}

#[derive(Deserialize)]
struct RawRoute {
    verb: Option<String>,
}

#[derive(Deserialize)]
struct RawParam {
    arg: Option<String>,
    #[serde(rename = "type")]
    ty: Option<Value>,
    http: Option<Value>,
    description: Option<Value>,
}

fn params(raw: Option<OneOrMany<RawParam>>) -> Vec<ParamSpec> {
    raw.map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .map(|p| ParamSpec {
            arg: p.arg.filter(|a| !a.is_empty()),
            ty: ParamType::from_json(p.ty),
            http: p.http.and_then(http_source),
            description: p.description.and_then(text),
        })
        .collect()
}

fn http_source(value: Value) -> Option<HttpSource> {
    match value {
        Value::Null => None,
        Value::Object(map) => Some(HttpSource {
            source: map.get("source").and_then(Value::as_str).map(str::to_owned),
        }),
        Value::String(s) => Some(HttpSource { source: Some(s) }),
        _ => Some(HttpSource { source: None }),
    }
}

/// Descriptions are either a string or a list of lines.
fn text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Array(lines) => {
            let lines: Vec<&str> = lines.iter().filter_map(Value::as_str).collect();
            (!lines.is_empty()).then(|| lines.join("\n"))
        },
        _ => None,
    }
}
