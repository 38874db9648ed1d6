//! Per-request inputs read out of the resolver context.

use {
    async_graphql::dynamic::{ObjectAccessor, ResolverContext},
    methodgraph_service_traits::RequestContext,
    serde_json::{Map, Value},
};

use crate::{error::Error, scalars::gql_value_to_json};

/// The caller's [`RequestContext`], attached with `Request::data`.
///
/// A request without one resolves as anonymous.
pub fn request_context(ctx: &ResolverContext<'_>) -> RequestContext {
    ctx.ctx
        .data_opt::<RequestContext>()
        .cloned()
        .unwrap_or_default()
}

/// Field arguments as a JSON object.
pub fn arguments_to_json(args: &ObjectAccessor<'_>) -> Result<Map<String, Value>, Error> {
    args.iter()
        .map(|(name, value)| {
            gql_value_to_json(value.as_value())
                .map(|json| (name.to_string(), json))
                .map_err(|_| Error::Argument {
                    name: name.to_string(),
                })
        })
        .collect()
}
