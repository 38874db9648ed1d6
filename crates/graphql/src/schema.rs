//! Schema construction from model runtimes and their method descriptors.

use std::{collections::HashSet, sync::Arc};

use {
    async_graphql::dynamic::{Field, FieldFuture, FieldValue, Object, Schema, SchemaError, TypeRef},
    methodgraph_config::EngineConfig,
    methodgraph_service_traits::{AccessControl, ModelRuntime, NoopAccessControl},
    tracing::{debug, info, warn},
};

use crate::{
    descriptor::MethodDescriptor,
    eligibility::{Category, Rejection, rejection},
    field::{FieldEntry, FieldPlan},
    mutations::{input_type_name, mutation_field, payload_type_name},
    naming::is_valid_name,
    policy::{CredentialPolicy, ExemptionPolicy},
    queries::query_field,
    registry::{ObjectTypeRegistry, TypeRegistry},
    scalars::json_scalar,
};

pub const QUERY_ROOT: &str = "Query";
pub const MUTATION_ROOT: &str = "Mutation";
/// Query field that keeps the query root valid when no method is a query.
pub const PLACEHOLDER_FIELD: &str = "_empty";

/// A built schema plus the field entries it was assembled from.
pub struct MethodSchema {
    pub schema: Schema,
    pub queries: Vec<FieldEntry>,
    pub mutations: Vec<FieldEntry>,
}

impl MethodSchema {
    /// All entries, queries first.
    pub fn entries(&self) -> impl Iterator<Item = &FieldEntry> {
        self.queries.iter().chain(self.mutations.iter())
    }
}

pub struct SchemaBuilder<R: TypeRegistry = ObjectTypeRegistry> {
    config: EngineConfig,
    registry: R,
    access: Arc<dyn AccessControl>,
    policy: Arc<dyn CredentialPolicy>,
    models: Vec<Arc<dyn ModelRuntime>>,
}

impl SchemaBuilder {
    pub fn new(config: EngineConfig) -> Self {
        let policy = Arc::new(ExemptionPolicy::from_config(&config));
        Self {
            config,
            registry: ObjectTypeRegistry::default(),
            access: Arc::new(NoopAccessControl),
            policy,
            models: Vec::new(),
        }
    }
}

impl<R: TypeRegistry> SchemaBuilder<R> {
    pub fn with_registry<T: TypeRegistry>(self, registry: T) -> SchemaBuilder<T> {
        SchemaBuilder {
            config: self.config,
            registry,
            access: self.access,
            policy: self.policy,
            models: self.models,
        }
    }

    pub fn access_control(mut self, access: Arc<dyn AccessControl>) -> Self {
        self.access = access;
        self
    }

    pub fn credential_policy(mut self, policy: Arc<dyn CredentialPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn model(mut self, model: Arc<dyn ModelRuntime>) -> Self {
        self.models.push(model);
        self
    }

    pub fn build(mut self) -> Result<MethodSchema, SchemaError> {
        let mut query = Object::new(QUERY_ROOT);
        let mut mutation = Object::new(MUTATION_ROOT);
        let mut queries: Vec<FieldEntry> = Vec::new();
        let mut mutations: Vec<FieldEntry> = Vec::new();
        let mut envelopes = Vec::new();
        let mut seen: [HashSet<String>; 2] = [HashSet::new(), HashSet::new()];

        for model in &self.models {
            let model_name = model.model_name().to_string();
            for raw in model.list_methods() {
                let descriptor = match MethodDescriptor::from_json(raw) {
                    Ok(descriptor) => descriptor,
                    Err(e) => {
                        warn!(model = %model_name, error = %e, "skipping malformed method descriptor");
                        continue;
                    },
                };

                for (slot, category) in Category::ALL.into_iter().enumerate() {
                    if let Some(reason) = rejection(&descriptor, &self.config, category) {
                        match reason {
                            Rejection::InstanceMethod => warn!(
                                model = %model_name,
                                method = %descriptor.name,
                                %category,
                                "instance methods are not exposed"
                            ),
                            _ => debug!(
                                model = %model_name,
                                method = %descriptor.name,
                                %category,
                                %reason,
                                "method not exposed"
                            ),
                        }
                        continue;
                    }

                    let entry = FieldEntry::build(&model_name, &descriptor, &mut self.registry);
                    if !is_valid_name(&entry.name) {
                        warn!(field = %entry.name, "skipping field with invalid name");
                        continue;
                    }
                    if !seen[slot].insert(entry.name.clone()) {
                        warn!(field = %entry.name, %category, "duplicate field name, keeping the first");
                        continue;
                    }

                    if category == Category::Mutation {
                        let taken = [input_type_name(&entry.name), payload_type_name(&entry.name)]
                            .into_iter()
                            .find(|name| self.registry.resolve_type(name).is_some());
                        if let Some(type_name) = taken {
                            warn!(
                                field = %entry.name,
                                type_name = %type_name,
                                "mutation envelope collides with a registered type, skipping"
                            );
                            continue;
                        }
                    }

                    debug!(field = %entry.name, %category, list = entry.is_list, "exposing method");
                    let plan = Arc::new(FieldPlan::new(
                        entry.clone(),
                        descriptor.clone(),
                        Arc::clone(model),
                        Arc::clone(&self.access),
                        Arc::clone(&self.policy),
                    ));
                    match category {
                        Category::Query => {
                            query = query.field(query_field(plan));
                            queries.push(entry);
                        },
                        Category::Mutation => {
                            let built = mutation_field(plan);
                            mutation = mutation.field(built.field);
                            envelopes.push((built.input, built.payload));
                            mutations.push(entry);
                        },
                    }
                }
            }
        }

        if queries.is_empty() {
            warn!("no query methods exposed, adding placeholder query field");
            query = query.field(placeholder_field());
        }

        let has_mutations = !mutations.is_empty();
        let mut builder = Schema::build(
            QUERY_ROOT,
            has_mutations.then_some(MUTATION_ROOT),
            None,
        )
        .register(json_scalar())
        .register(query);
        if has_mutations {
            builder = builder.register(mutation);
        }
        for ty in self.registry.into_types() {
            builder = builder.register(ty);
        }
        for (input, payload) in envelopes {
            builder = builder.register(input).register(payload);
        }
        let schema = builder.finish()?;

        info!(
            queries = queries.len(),
            mutations = mutations.len(),
            "method schema built"
        );
        Ok(MethodSchema {
            schema,
            queries,
            mutations,
        })
    }
}

fn placeholder_field() -> Field {
    Field::new(PLACEHOLDER_FIELD, TypeRef::named(TypeRef::BOOLEAN), |_| {
        FieldFuture::new(async { Ok(None::<FieldValue>) })
    })
    .description("Always null.")
}
