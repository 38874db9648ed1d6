//! Type registry: named object types, their input counterparts, and the
//! connection types generated for list results.

use std::collections::BTreeMap;

use {
    async_graphql::{
        Value,
        dynamic::{Field, FieldFuture, FieldValue, InputObject, InputValue, Object, Type, TypeRef},
    },
    tracing::warn,
};

use crate::{
    connection::{Connection, Edge, PageInfo},
    naming::is_valid_name,
    scalars::JSON_SCALAR,
    schema::{MUTATION_ROOT, QUERY_ROOT},
    types::{GraphType, Output, scalar_for},
};

pub const PAGE_INFO: &str = "PageInfo";

/// Looks up graph types by name while a schema is being built.
pub trait TypeRegistry {
    /// `T` resolves to an output object, `TInput` to its input counterpart.
    fn resolve_type(&self, name: &str) -> Option<GraphType>;

    /// Connection type paging over `item`, created on first use.
    fn resolve_connection_type(&mut self, item: &GraphType) -> GraphType;

    /// Every type this registry defined, for registration with the schema.
    fn into_types(self) -> Vec<Type>
    where
        Self: Sized;
}

#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("invalid type name {0:?}")]
    InvalidName(String),
    #[error("properties of {0} must be an object")]
    NotAnObject(String),
}

/// Declared type of an object property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    Single(String),
    List(String),
}

impl PropertyType {
    fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(name) => Self::Single(name.clone()),
            serde_json::Value::Array(items) => match items.first() {
                Some(serde_json::Value::String(name)) => Self::List(name.clone()),
                _ => Self::Single("any".into()),
            },
            serde_json::Value::Object(spec) => spec
                .get("type")
                .map_or_else(|| Self::Single("any".into()), Self::from_json),
            _ => Self::Single("any".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefinition {
    pub name: String,
    pub ty: PropertyType,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDefinition {
    pub name: String,
    pub properties: Vec<PropertyDefinition>,
}

impl ObjectDefinition {
    /// Build a definition from model properties, e.g.
    /// `{ "name": "string", "tags": ["string"], "owner": { "type": "Account" } }`.
    pub fn from_properties(
        name: impl Into<String>,
        properties: &serde_json::Value,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(DefinitionError::InvalidName(name));
        }
        let Some(map) = properties.as_object() else {
            return Err(DefinitionError::NotAnObject(name));
        };

        let properties = map
            .iter()
            .filter(|(prop, _)| {
                let valid = is_valid_name(prop);
                if !valid {
                    warn!(object = %name, property = %prop, "skipping property with invalid name");
                }
                valid
            })
            .map(|(prop, spec)| PropertyDefinition {
                name: prop.clone(),
                ty: PropertyType::from_json(spec),
                description: spec
                    .get("description")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned),
            })
            .collect();

        Ok(Self {
            name,
            properties,
        })
    }
}

/// In-memory registry of JSON-backed object types.
///
/// Object fields read their value from the JSON object a method returned.
#[derive(Debug, Default)]
pub struct ObjectTypeRegistry {
    objects: BTreeMap<String, ObjectDefinition>,
    /// Item type name to item type.
    connections: BTreeMap<String, GraphType>,
}

impl ObjectTypeRegistry {
    /// Register an object type. Definitions without properties, and names
    /// that collide with generated or built-in types, are ignored, so lookups
    /// for them fall back to the JSON scalar.
    pub fn register(&mut self, definition: ObjectDefinition) -> &mut Self {
        if definition.properties.is_empty() {
            warn!(object = %definition.name, "ignoring object type without properties");
        } else if is_reserved_type_name(&definition.name) {
            warn!(object = %definition.name, "ignoring object type with a reserved name");
        } else {
            self.objects.insert(definition.name.clone(), definition);
        }
        self
    }

    #[must_use]
    pub fn with_object(mut self, definition: ObjectDefinition) -> Self {
        self.register(definition);
        self
    }

    fn output_type(&self, ty: &PropertyType) -> GraphType {
        let single = |name: &str| {
            scalar_for(name).unwrap_or_else(|| {
                if self.objects.contains_key(name) {
                    GraphType::Object(name.to_string())
                } else {
                    GraphType::Json
                }
            })
        };
        match ty {
            PropertyType::Single(name) => single(name),
            PropertyType::List(name) => GraphType::List(Box::new(single(name))),
        }
    }

    fn input_type(&self, ty: &PropertyType) -> GraphType {
        let single = |name: &str| {
            scalar_for(name).unwrap_or_else(|| {
                if self.objects.contains_key(name) {
                    GraphType::Input(format!("{name}Input"))
                } else {
                    GraphType::Json
                }
            })
        };
        match ty {
            PropertyType::Single(name) => single(name),
            PropertyType::List(name) => GraphType::List(Box::new(single(name))),
        }
    }

    fn object_type(&self, definition: &ObjectDefinition) -> Object {
        let mut object = Object::new(definition.name.clone());
        for property in &definition.properties {
            object = object.field(property_field(property, self.output_type(&property.ty)));
        }
        object
    }

    fn input_object_type(&self, definition: &ObjectDefinition) -> InputObject {
        let mut input = InputObject::new(format!("{}Input", definition.name));
        for property in &definition.properties {
            let mut value =
                InputValue::new(property.name.clone(), self.input_type(&property.ty).type_ref());
            if let Some(description) = &property.description {
                value = value.description(description.clone());
            }
            input = input.field(value);
        }
        input
    }
}

impl TypeRegistry for ObjectTypeRegistry {
    fn resolve_type(&self, name: &str) -> Option<GraphType> {
        if self.objects.contains_key(name) {
            return Some(GraphType::Object(name.to_string()));
        }
        name.strip_suffix("Input")
            .filter(|base| self.objects.contains_key(*base))
            .map(|_| GraphType::Input(name.to_string()))
    }

    fn resolve_connection_type(&mut self, item: &GraphType) -> GraphType {
        let item_name = item.type_name().to_string();
        self.connections
            .entry(item_name.clone())
            .or_insert_with(|| item.clone());
        GraphType::Connection {
            name: format!("{item_name}Connection"),
            item: Box::new(item.clone()),
        }
    }

    fn into_types(self) -> Vec<Type> {
        let mut types = Vec::new();
        for definition in self.objects.values() {
            types.push(self.object_type(definition).into());
            types.push(self.input_object_type(definition).into());
        }
        if !self.connections.is_empty() {
            types.push(page_info_type().into());
        }
        for (item_name, item) in &self.connections {
            let [connection, edge] = connection_types(item_name, item);
            types.push(connection.into());
            types.push(edge.into());
        }
        types
    }
}

/// Type names the schema defines itself: built-in scalars, the roots,
/// `PageInfo`, and anything ending in a generated-type suffix.
pub fn is_reserved_type_name(name: &str) -> bool {
    const BUILT_IN: [&str; 9] = [
        TypeRef::INT,
        TypeRef::FLOAT,
        TypeRef::STRING,
        TypeRef::BOOLEAN,
        TypeRef::ID,
        JSON_SCALAR,
        PAGE_INFO,
        QUERY_ROOT,
        MUTATION_ROOT,
    ];
    const GENERATED_SUFFIXES: [&str; 4] = ["Input", "Payload", "Connection", "Edge"];
    BUILT_IN.contains(&name) || GENERATED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

fn property_field(property: &PropertyDefinition, ty: GraphType) -> Field {
    let key = property.name.clone();
    let type_ref = ty.type_ref();
    let field = Field::new(property.name.clone(), type_ref, move |ctx| {
        let key = key.clone();
        let ty = ty.clone();
        FieldFuture::new(async move {
            let parent = ctx.parent_value.try_downcast_ref::<serde_json::Value>()?;
            let value = parent.get(&key).cloned().unwrap_or_default();
            Ok(Output::from_json(&ty, value).into_field_value())
        })
    });
    match &property.description {
        Some(description) => field.description(description.clone()),
        None => field,
    }
}

fn connection_types(item_name: &str, item: &GraphType) -> [Object; 2] {
    let edge_name = format!("{item_name}Edge");

    let connection = Object::new(format!("{item_name}Connection"))
        .field(Field::new(
            "edges",
            TypeRef::named_list(edge_name.clone()),
            |ctx| {
                FieldFuture::new(async move {
                    let connection = ctx.parent_value.try_downcast_ref::<Connection>()?;
                    Ok(Some(FieldValue::list(
                        connection.edges.iter().cloned().map(FieldValue::owned_any),
                    )))
                })
            },
        ))
        .field(Field::new(
            "pageInfo",
            TypeRef::named_nn(PAGE_INFO),
            |ctx| {
                FieldFuture::new(async move {
                    let connection = ctx.parent_value.try_downcast_ref::<Connection>()?;
                    Ok(Some(FieldValue::owned_any(connection.page_info.clone())))
                })
            },
        ));

    let edge = Object::new(edge_name)
        .field(Field::new("node", item.type_ref(), |ctx| {
            FieldFuture::new(async move {
                let edge = ctx.parent_value.try_downcast_ref::<Edge>()?;
                Ok(edge.node.clone().into_field_value())
            })
        }))
        .field(Field::new(
            "cursor",
            TypeRef::named_nn(TypeRef::STRING),
            |ctx| {
                FieldFuture::new(async move {
                    let edge = ctx.parent_value.try_downcast_ref::<Edge>()?;
                    Ok(Some(FieldValue::value(edge.cursor.clone())))
                })
            },
        ));

    [connection, edge]
}

fn page_info_type() -> Object {
    fn field(name: &str, ty: TypeRef, read: fn(&PageInfo) -> Option<Value>) -> Field {
        Field::new(name, ty, move |ctx| {
            FieldFuture::new(async move {
                let info = ctx.parent_value.try_downcast_ref::<PageInfo>()?;
                Ok(read(info).map(FieldValue::value))
            })
        })
    }

    Object::new(PAGE_INFO)
        .field(field(
            "hasNextPage",
            TypeRef::named_nn(TypeRef::BOOLEAN),
            |info| Some(Value::Boolean(info.has_next_page)),
        ))
        .field(field(
            "hasPreviousPage",
            TypeRef::named_nn(TypeRef::BOOLEAN),
            |info| Some(Value::Boolean(info.has_previous_page)),
        ))
        .field(field("startCursor", TypeRef::named(TypeRef::STRING), |info| {
            info.start_cursor.clone().map(Value::String)
        }))
        .field(field("endCursor", TypeRef::named(TypeRef::STRING), |info| {
            info.end_cursor.clone().map(Value::String)
        }))
}
