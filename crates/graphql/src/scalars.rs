//! The opaque JSON scalar and conversions between graph values and JSON.

use async_graphql::{Value, dynamic::Scalar};

/// Name of the catch-all scalar for untyped values.
pub const JSON_SCALAR: &str = "JSON";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ValueError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("unsupported value type")]
    UnsupportedValueType,
}

/// Passes arbitrary JSON through in both directions.
///
/// Used for untyped parameters and results, and wherever a declared type
/// cannot be resolved.
pub fn json_scalar() -> Scalar {
    Scalar::new(JSON_SCALAR).description("Arbitrary JSON value.")
}

pub(crate) fn gql_value_to_json(v: &Value) -> Result<serde_json::Value, ValueError> {
    match v {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Number(n) => Ok(serde_json::to_value(n)?),
        Value::String(s) => Ok(serde_json::Value::String(s.clone())),
        Value::Boolean(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Enum(name) => Ok(serde_json::Value::String(name.to_string())),
        Value::List(l) => {
            let items: Result<Vec<serde_json::Value>, _> = l.iter().map(gql_value_to_json).collect();
            Ok(serde_json::Value::Array(items?))
        },
        Value::Object(m) => {
            let map: Result<serde_json::Map<String, serde_json::Value>, _> = m
                .iter()
                .map(|(k, v)| gql_value_to_json(v).map(|jv| (k.to_string(), jv)))
                .collect();
            Ok(serde_json::Value::Object(map?))
        },
        Value::Binary(_) => Err(ValueError::UnsupportedValueType),
    }
}

pub(crate) fn json_to_gql_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                async_graphql::Number::from_f64(f).map_or(Value::Null, Value::Number)
            } else {
                Value::Null
            }
        },
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(a) => Value::List(a.iter().map(json_to_gql_value).collect()),
        serde_json::Value::Object(m) => {
            let map: async_graphql::indexmap::IndexMap<async_graphql::Name, Value> = m
                .iter()
                .map(|(k, v)| (async_graphql::Name::new(k), json_to_gql_value(v)))
                .collect();
            Value::Object(map)
        },
    }
}
