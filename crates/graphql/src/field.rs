//! Field entries and the resolution pipeline shared by queries and mutations.

use std::sync::Arc;

use {
    async_graphql::dynamic::{InputValue, TypeRef},
    methodgraph_service_traits::{
        AccessControl, AccessRequest, CallOptions, Invocation, ModelRuntime, RequestContext,
    },
    serde_json::{Map, Value},
    tracing::{debug, warn},
};

use crate::{
    connection::{PAGINATION_ARGS, PaginationArgs, connection_from_array},
    descriptor::MethodDescriptor,
    error::{Error, kind_of},
    marshal::marshal,
    naming::{field_name, is_valid_name},
    policy::{CredentialPolicy, TokenRequirement, call_options},
    registry::TypeRegistry,
    types::{GraphType, Output, Resolution, map_input_type, map_output_type},
};

/// One client-addressable argument of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputArgument {
    pub name: String,
    pub ty: GraphType,
}

/// Everything the schema needs to know about one exposed method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: String,
    pub description: Option<String>,
    /// Addressable parameters in declaration order.
    pub input_shape: Vec<InputArgument>,
    /// The field's type; a connection when `is_list` is set.
    pub output_type: GraphType,
    /// Type of each result item. Equal to `output_type` unless `is_list` is set.
    pub item_type: GraphType,
    pub is_list: bool,
}

impl FieldEntry {
    pub fn build<R: TypeRegistry>(model: &str, descriptor: &MethodDescriptor, registry: &mut R) -> Self {
        let name = field_name(model, &descriptor.name);

        let mut input_shape: Vec<InputArgument> = Vec::new();
        for param in &descriptor.accepts {
            let Some(arg) = &param.arg else {
                continue;
            };
            if !is_valid_name(arg) {
                warn!(field = %name, arg = %arg, "skipping parameter with invalid name");
                continue;
            }
            if input_shape.iter().any(|a| &a.name == arg) {
                continue;
            }
            let ty = settle(map_input_type(param, &*registry), &name, arg);
            input_shape.push(InputArgument {
                name: arg.clone(),
                ty,
            });
        }

        let output = map_output_type(descriptor, &*registry);
        let item_type = settle(output.ty, &name, "result");
        let output_type = if output.is_list {
            registry.resolve_connection_type(&item_type)
        } else {
            item_type.clone()
        };

        Self {
            name,
            description: descriptor.description.clone(),
            input_shape,
            output_type,
            item_type,
            is_list: output.is_list,
        }
    }

    /// Graph arguments: the input shape, plus pagination for list fields.
    ///
    /// Parameters named in `reserved` are left out so the caller can define
    /// those arguments itself.
    pub fn input_values(&self, reserved: &[&str]) -> Vec<InputValue> {
        let mut values: Vec<InputValue> = self
            .input_shape
            .iter()
            .filter(|arg| {
                let taken = reserved.contains(&arg.name.as_str());
                if taken {
                    warn!(field = %self.name, arg = %arg.name, "parameter shadows a reserved argument, skipping");
                }
                !taken
            })
            .map(|arg| InputValue::new(arg.name.clone(), arg.ty.type_ref()))
            .collect();
        if self.is_list {
            for (name, ty) in PAGINATION_ARGS {
                if !self.input_shape.iter().any(|arg| arg.name == name) {
                    values.push(InputValue::new(name, TypeRef::named(ty)));
                }
            }
        }
        values
    }
}

/// The one place an unresolved type becomes the JSON scalar.
fn settle(resolution: Resolution, field: &str, position: &str) -> GraphType {
    match resolution {
        Resolution::Resolved(ty) => ty,
        Resolution::Unresolved(type_name) => {
            warn!(field, position, type_name = %type_name, "unresolved type, falling back to JSON");
            GraphType::Json
        },
    }
}

/// A built field bound to its collaborators. Immutable and shared by every
/// request that hits the field.
pub struct FieldPlan {
    pub entry: FieldEntry,
    descriptor: MethodDescriptor,
    model: Arc<dyn ModelRuntime>,
    access: Arc<dyn AccessControl>,
    policy: Arc<dyn CredentialPolicy>,
}

impl FieldPlan {
    pub fn new(
        entry: FieldEntry,
        descriptor: MethodDescriptor,
        model: Arc<dyn ModelRuntime>,
        access: Arc<dyn AccessControl>,
        policy: Arc<dyn CredentialPolicy>,
    ) -> Self {
        Self {
            entry,
            descriptor,
            model,
            access,
            policy,
        }
    }

    /// Run one call: access check, argument marshaling, invocation, and
    /// pagination for list fields. Errors propagate unchanged.
    pub async fn execute(
        &self,
        args: &Map<String, Value>,
        context: &RequestContext,
    ) -> Result<Output, Error> {
        let model = self.model.model_name();
        let method = self.descriptor.name.as_str();

        let request = AccessRequest {
            access_token: context.access_token.clone(),
            model: model.to_string(),
            method: method.to_string(),
            id: args.get("id").filter(|id| !id.is_null()).cloned(),
            context: context.clone(),
        };
        debug!(model, method, field = %self.entry.name, "checking access");
        if let Err(e) = self.access.check_access(&request).await {
            debug!(model, method, error = %e, "access denied");
            return Err(Error::AccessDenied(e));
        }
        debug!(model, method, "access granted");

        let is_custom = self.descriptor.is_custom();
        let requirement = self.policy.token_requirement(model, method);
        let token_options = match requirement {
            TokenRequirement::Forward => CallOptions::Token {
                access_token: context.access_token.clone(),
            },
            TokenRequirement::Suppress => CallOptions::Empty,
        };
        let local = context.with_options(token_options.to_value());
        let positional = marshal(&self.entry.input_shape, &self.descriptor, args, &local, is_custom);
        let options = call_options(requirement, is_custom, context.access_token.as_deref());
        debug!(
            model,
            method,
            args = positional.len(),
            custom = is_custom,
            suppress_token = requirement == TokenRequirement::Suppress,
            "arguments marshaled"
        );

        let pagination = if self.entry.is_list {
            Some(PaginationArgs::from_args(args)?)
        } else {
            None
        };

        debug!(model, method, "invoking remote method");
        let result = self
            .model
            .invoke(Invocation {
                method: method.to_string(),
                args: positional,
                options,
            })
            .await
            .map_err(Error::Call)?;

        let Some(pagination) = pagination else {
            return Ok(Output::from_json(&self.entry.output_type, result));
        };
        let items = match result {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => {
                return Err(Error::UnexpectedResult {
                    method: format!("{model}.{method}"),
                    found: kind_of(&other),
                });
            },
        };
        let nodes = items
            .into_iter()
            .map(|item| Output::from_json(&self.entry.item_type, item))
            .collect();
        let connection = connection_from_array(nodes, &pagination);
        debug!(model, method, edges = connection.edges.len(), "result wrapped in connection");
        Ok(Output::Connection(connection))
    }
}
