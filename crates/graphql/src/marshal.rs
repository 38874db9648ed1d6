//! Turning graph arguments back into the positional argument list a
//! remote method expects.

use {
    methodgraph_service_traits::RequestContext,
    serde_json::{Map, Value},
};

use crate::{descriptor::MethodDescriptor, field::InputArgument};

/// Build the positional argument list for one call.
///
/// Walks `params` in declaration order. Each slot takes, in priority order:
/// a non-empty client string or structure (structures are deep copies), a
/// client number or boolean (falsy ones included), or a context value when
/// the method sources that parameter from the request. Otherwise custom
/// methods get a `None` placeholder and standard methods drop the slot.
pub fn marshal(
    params: &[InputArgument],
    descriptor: &MethodDescriptor,
    incoming: &Map<String, Value>,
    context: &RequestContext,
    is_custom: bool,
) -> Vec<Option<Value>> {
    params
        .iter()
        .filter_map(|param| {
            let name = param.name.as_str();
            if let Some(value) = client_value(incoming.get(name)) {
                return Some(Some(value));
            }
            let context_sourced = descriptor
                .accept_spec(name)
                .is_some_and(|spec| spec.http.is_some());
            if context_sourced {
                if let Some(value) = context.get(name).filter(|v| !v.is_null()) {
                    return Some(Some(value.clone()));
                }
            }
            is_custom.then_some(None)
        })
        .collect()
}

fn client_value(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(Value::String(s.clone())),
        Value::Object(map) if !map.is_empty() => Some(Value::Object(map.clone())),
        Value::Array(items) if !items.is_empty() => Some(Value::Array(items.clone())),
        scalar @ (Value::Number(_) | Value::Bool(_)) => Some(scalar.clone()),
        _ => None,
    }
}
