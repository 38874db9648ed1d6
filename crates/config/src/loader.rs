use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::EngineConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "methodgraph.toml",
    "methodgraph.yaml",
    "methodgraph.yml",
    "methodgraph.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./methodgraph.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/methodgraph/methodgraph.{toml,yaml,yml,json}` (user-global)
///
/// Returns `EngineConfig::default()` if no config file is found or it fails to parse.
pub fn discover_and_load() -> EngineConfig {
    let found = find_config_file(Path::new("."), config_dir().as_deref());
    load_or_default(found.as_deref())
}

fn load_or_default(path: Option<&Path>) -> EngineConfig {
    let Some(path) = path else {
        debug!("no config file found, using defaults");
        return EngineConfig::default();
    };
    debug!(path = %path.display(), "loading config");
    match load_config(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            EngineConfig::default()
        },
    }
}

/// Find the first config file, project-local directory first.
fn find_config_file(local: &Path, global: Option<&Path>) -> Option<PathBuf> {
    std::iter::once(local)
        .chain(global)
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/methodgraph/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "methodgraph").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<EngineConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
