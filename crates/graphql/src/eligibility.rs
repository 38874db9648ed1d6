//! Which remote methods become graph fields.

use std::fmt;

use {methodgraph_config::EngineConfig, methodgraph_service_traits::HttpVerb};

use crate::descriptor::MethodDescriptor;

/// Root a field is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Query,
    Mutation,
}

impl Category {
    pub const ALL: [Self; 2] = [Self::Query, Self::Mutation];

    pub fn allowed_verbs(self, config: &EngineConfig) -> &[HttpVerb] {
        match self {
            Self::Query => &config.query.verbs,
            Self::Mutation => &config.mutation.verbs,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a descriptor was not exposed in a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The name carries a streaming or raw-invocation marker.
    ExcludedName { marker: String },
    NoAllowedVerb,
    /// Instance methods have no field form yet.
    InstanceMethod,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExcludedName { marker } => write!(f, "name contains excluded marker {marker:?}"),
            Self::NoAllowedVerb => f.write_str("no allowed http verb"),
            Self::InstanceMethod => f.write_str("instance methods are not supported"),
        }
    }
}

pub fn rejection(
    descriptor: &MethodDescriptor,
    config: &EngineConfig,
    category: Category,
) -> Option<Rejection> {
    if let Some(marker) = config.excluded_marker(&descriptor.name) {
        return Some(Rejection::ExcludedName {
            marker: marker.to_string(),
        });
    }
    if !descriptor.matches_any_verb(category.allowed_verbs(config)) {
        return Some(Rejection::NoAllowedVerb);
    }
    if !descriptor.is_static {
        return Some(Rejection::InstanceMethod);
    }
    None
}

pub fn is_exposable(descriptor: &MethodDescriptor, config: &EngineConfig, category: Category) -> bool {
    rejection(descriptor, config, category).is_none()
}
