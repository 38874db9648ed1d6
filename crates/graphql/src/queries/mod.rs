//! Query fields: one per remote method mounted on a read verb.

use std::sync::Arc;

use async_graphql::{
    ErrorExtensions,
    dynamic::{Field, FieldFuture},
};

use crate::{
    context::{arguments_to_json, request_context},
    field::FieldPlan,
};

/// `<Field>(<inputShape>, first, after, last, before): <outputType>`
pub fn query_field(plan: Arc<FieldPlan>) -> Field {
    let resolver = Arc::clone(&plan);
    let mut field = Field::new(
        plan.entry.name.clone(),
        plan.entry.output_type.type_ref(),
        move |ctx| {
            let plan = Arc::clone(&resolver);
            FieldFuture::new(async move {
                let args = arguments_to_json(&ctx.args).map_err(|e| e.extend())?;
                let request = request_context(&ctx);
                let output = plan.execute(&args, &request).await.map_err(|e| e.extend())?;
                Ok(output.into_field_value())
            })
        },
    );
    if let Some(description) = &plan.entry.description {
        field = field.description(description.clone());
    }
    for value in plan.entry.input_values(&[]) {
        field = field.argument(value);
    }
    field
}
