//! GraphQL fields for remote methods.
//!
//! Each [`ModelRuntime`](methodgraph_service_traits::ModelRuntime) publishes
//! descriptors for its remote methods. Methods mounted on read verbs become
//! query fields, methods on write verbs become mutation fields, and list
//! results are exposed as relay-style connections. Every resolution runs the
//! access check first, then marshals graph arguments into the positional
//! argument list the remote method declares.

pub mod connection;
pub mod context;
pub mod descriptor;
pub mod eligibility;
pub mod error;
pub mod field;
pub mod marshal;
pub mod mutations;
pub mod naming;
pub mod policy;
pub mod queries;
pub mod registry;
pub mod scalars;
pub mod schema;
pub mod types;

pub use {
    descriptor::MethodDescriptor,
    eligibility::{Category, is_exposable},
    error::Error,
    field::FieldEntry,
    policy::{CredentialPolicy, ExemptionPolicy, TokenRequirement},
    registry::{ObjectDefinition, ObjectTypeRegistry, TypeRegistry},
    schema::{MethodSchema, SchemaBuilder},
};
