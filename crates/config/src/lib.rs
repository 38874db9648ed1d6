//! Configuration for the remote-method translation engine.
//!
//! Config files: `methodgraph.toml`, `methodgraph.yaml`, or `methodgraph.json`
//! Searched in `./` then `~/.config/methodgraph/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-fallback}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{config_dir, discover_and_load, load_config},
    schema::{CategoryConfig, CredentialExemption, EngineConfig},
};
