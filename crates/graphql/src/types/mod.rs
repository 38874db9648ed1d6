//! Mapping declared remote-method types onto graph types.
//!
//! Primitive names go through a fixed scalar table (case-insensitive).
//! Anything else is looked up in the [`TypeRegistry`]: `TInput` for
//! parameters, `T` for results. A lookup miss is reported as
//! [`Resolution::Unresolved`] and the field builder turns it into the JSON
//! scalar, so an unknown type never aborts schema construction.

use async_graphql::{
    Value,
    dynamic::{FieldValue, TypeRef},
};

use crate::{
    connection::Connection,
    descriptor::{MethodDescriptor, ParamSpec, ParamType},
    registry::TypeRegistry,
    scalars::{JSON_SCALAR, json_to_gql_value},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Boolean,
    Id,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => TypeRef::INT,
            Self::Float => TypeRef::FLOAT,
            Self::String => TypeRef::STRING,
            Self::Boolean => TypeRef::BOOLEAN,
            Self::Id => TypeRef::ID,
        }
    }
}

/// A concrete graph type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphType {
    Scalar(ScalarKind),
    /// The opaque JSON scalar.
    Json,
    /// Output object type.
    Object(String),
    /// Input object type.
    Input(String),
    List(Box<GraphType>),
    /// Paginated page over `item`.
    Connection { name: String, item: Box<GraphType> },
}

impl GraphType {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Scalar(kind) => kind.name(),
            Self::Json => JSON_SCALAR,
            Self::Object(name) | Self::Input(name) | Self::Connection { name, .. } => name,
            Self::List(inner) => inner.type_name(),
        }
    }

    pub fn type_ref(&self) -> TypeRef {
        match self {
            Self::List(inner) => TypeRef::named_list(inner.type_name().to_string()),
            other => TypeRef::named(other.type_name().to_string()),
        }
    }
}

/// Outcome of a type lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(GraphType),
    /// Carries the name that could not be found.
    Unresolved(String),
}

/// Scalar table for primitive type names.
pub fn scalar_for(name: &str) -> Option<GraphType> {
    match name.to_ascii_lowercase().as_str() {
        "any" | "object" | "persistedmodel" | "array" => Some(GraphType::Json),
        "number" => Some(GraphType::Scalar(ScalarKind::Int)),
        "boolean" => Some(GraphType::Scalar(ScalarKind::Boolean)),
        "string" => Some(GraphType::Scalar(ScalarKind::String)),
        _ => None,
    }
}

pub fn map_input_type(param: &ParamSpec, registry: &dyn TypeRegistry) -> Resolution {
    match &param.ty {
        ParamType::Shape | ParamType::List(_) => Resolution::Resolved(GraphType::Json),
        ParamType::Named(name) => {
            if let Some(scalar) = scalar_for(name) {
                return Resolution::Resolved(scalar);
            }
            let input_name = format!("{name}Input");
            match registry.resolve_type(&input_name) {
                Some(ty @ GraphType::Input(_)) => Resolution::Resolved(ty),
                _ => Resolution::Unresolved(input_name),
            }
        },
    }
}

/// Result type of a method. When `is_list` is set, `ty` is the item type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputType {
    pub ty: Resolution,
    pub is_list: bool,
}

pub fn map_output_type(descriptor: &MethodDescriptor, registry: &dyn TypeRegistry) -> OutputType {
    let single = |ty| OutputType { ty, is_list: false };
    let Some(first) = descriptor.returns.first() else {
        return single(Resolution::Resolved(GraphType::Json));
    };
    match &first.ty {
        ParamType::List(Some(item)) => OutputType {
            ty: resolve_output_name(item, registry),
            is_list: true,
        },
        ParamType::List(None) | ParamType::Shape => single(Resolution::Resolved(GraphType::Json)),
        ParamType::Named(name) => single(resolve_output_name(name, registry)),
    }
}

fn resolve_output_name(name: &str, registry: &dyn TypeRegistry) -> Resolution {
    if let Some(scalar) = scalar_for(name) {
        return Resolution::Resolved(scalar);
    }
    match registry.resolve_type(name) {
        Some(ty @ (GraphType::Object(_) | GraphType::Scalar(_) | GraphType::Json)) => {
            Resolution::Resolved(ty)
        },
        _ => Resolution::Unresolved(name.to_string()),
    }
}

// ── Resolved values ─────────────────────────────────────────────────────────

/// A resolved value ready to hand to the execution engine.
///
/// Object-typed values stay JSON so that object fields can read their
/// members from the parent value.
#[derive(Debug, Clone)]
pub enum Output {
    Value(Value),
    Object(serde_json::Value),
    List(Vec<Output>),
    Connection(Connection),
}

impl Output {
    /// Shape a JSON result according to the graph type it is returned as.
    pub fn from_json(ty: &GraphType, value: serde_json::Value) -> Self {
        match (ty, value) {
            (_, serde_json::Value::Null) => Self::Value(Value::Null),
            (GraphType::Object(_), value) => Self::Object(value),
            (GraphType::List(item), serde_json::Value::Array(items)) => {
                Self::List(items.into_iter().map(|v| Self::from_json(item, v)).collect())
            },
            (GraphType::List(_), _) => Self::Value(Value::Null),
            (_, value) => Self::Value(json_to_gql_value(&value)),
        }
    }

    pub fn into_field_value(self) -> Option<FieldValue<'static>> {
        match self {
            Self::Value(Value::Null) => None,
            Self::Value(value) => Some(FieldValue::value(value)),
            Self::Object(json) => Some(FieldValue::owned_any(json)),
            Self::List(items) => Some(FieldValue::list(
                items
                    .into_iter()
                    .map(|item| item.into_field_value().unwrap_or(FieldValue::NULL)),
            )),
            Self::Connection(connection) => Some(FieldValue::owned_any(connection)),
        }
    }
}
