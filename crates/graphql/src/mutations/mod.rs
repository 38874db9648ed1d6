//! Mutation fields: one per remote method mounted on a write verb.
//!
//! Each mutation follows the client-mutation-id convention: it takes a
//! single `input` object and returns a payload that echoes
//! `clientMutationId` next to the result in `obj`.

use std::sync::Arc;

use {
    async_graphql::{
        ErrorExtensions,
        dynamic::{Field, FieldFuture, FieldValue, InputObject, InputValue, Object, TypeRef},
    },
    serde_json::Value,
};

use crate::{
    context::{arguments_to_json, request_context},
    field::FieldPlan,
    types::Output,
};

pub const CLIENT_MUTATION_ID: &str = "clientMutationId";

/// A mutation field plus the envelope types it needs registered.
pub struct MutationField {
    pub field: Field,
    pub input: InputObject,
    pub payload: Object,
}

struct MutationPayload {
    client_mutation_id: Option<String>,
    obj: Output,
}

pub fn input_type_name(field: &str) -> String {
    format!("{field}Input")
}

pub fn payload_type_name(field: &str) -> String {
    format!("{field}Payload")
}

/// `<Field>(input: <Field>Input!): <Field>Payload`
pub fn mutation_field(plan: Arc<FieldPlan>) -> MutationField {
    let name = plan.entry.name.clone();
    let input_name = input_type_name(&name);
    let payload_name = payload_type_name(&name);

    let mut input = InputObject::new(input_name.clone()).field(InputValue::new(
        CLIENT_MUTATION_ID,
        TypeRef::named(TypeRef::STRING),
    ));
    for value in plan.entry.input_values(&[CLIENT_MUTATION_ID]) {
        input = input.field(value);
    }

    let payload = Object::new(payload_name.clone())
        .field(Field::new(
            CLIENT_MUTATION_ID,
            TypeRef::named(TypeRef::STRING),
            |ctx| {
                FieldFuture::new(async move {
                    let payload = ctx.parent_value.try_downcast_ref::<MutationPayload>()?;
                    Ok(payload.client_mutation_id.clone().map(FieldValue::value))
                })
            },
        ))
        .field(Field::new(
            "obj",
            plan.entry.output_type.type_ref(),
            |ctx| {
                FieldFuture::new(async move {
                    let payload = ctx.parent_value.try_downcast_ref::<MutationPayload>()?;
                    Ok(payload.obj.clone().into_field_value())
                })
            },
        ));

    let resolver = Arc::clone(&plan);
    let mut field = Field::new(name, TypeRef::named(payload_name), move |ctx| {
        let plan = Arc::clone(&resolver);
        FieldFuture::new(async move {
            let input = ctx.args.try_get("input")?.object()?;
            let args = arguments_to_json(&input).map_err(|e| e.extend())?;
            let client_mutation_id = args
                .get(CLIENT_MUTATION_ID)
                .and_then(Value::as_str)
                .map(str::to_owned);
            let request = request_context(&ctx);
            let obj = plan.execute(&args, &request).await.map_err(|e| e.extend())?;
            Ok(Some(FieldValue::owned_any(MutationPayload {
                client_mutation_id,
                obj,
            })))
        })
    })
    .argument(InputValue::new("input", TypeRef::named_nn(input_name)));
    if let Some(description) = &plan.entry.description {
        field = field.description(description.clone());
    }

    MutationField {
        field,
        input,
        payload,
    }
}
