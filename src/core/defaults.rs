use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::paths;

/// Root configuration structure for fieldfix.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FieldfixConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via fieldfix.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Directory walked when no root is passed on the command line.
    #[serde(default = "default_root")]
    pub root: String,

    /// File name suffixes (without the dot) that are rewritten.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names skipped at any depth.
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// Extra field mappings appended to the built-in table.
    #[serde(default)]
    pub mappings: Vec<MappingConfig>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            root: default_root(),
            extensions: default_extensions(),
            skip_dirs: default_skip_dirs(),
            mappings: Vec::new(),
        }
    }
}

/// A configured field mapping. When `to` is omitted it is derived from `from`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MappingConfig {
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

// =============================================================================
// Default value functions (match the original fixed behavior)
// =============================================================================

fn default_root() -> String {
    "src".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["ts".to_string(), "tsx".to_string()]
}

fn default_skip_dirs() -> Vec<String> {
    vec![".git".to_string()]
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If fieldfix.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full fieldfix.json config, falling back to defaults on any error.
pub fn load_config() -> FieldfixConfig {
    load_config_strict().unwrap_or_default()
}

/// Load fieldfix.json, reporting a parse error instead of falling back.
/// A missing file yields the built-in defaults.
pub fn load_config_strict() -> crate::Result<FieldfixConfig> {
    let path = paths::fieldfix_json()?;
    load_config_from(&path)
}

/// Load a config file from an explicit path. A missing file yields the built-in defaults.
pub fn load_config_from(path: &Path) -> crate::Result<FieldfixConfig> {
    if !path.exists() {
        return Ok(FieldfixConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    let config: FieldfixConfig = serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))?;

    Ok(config)
}

/// Check if fieldfix.json file exists
pub fn config_exists() -> bool {
    paths::fieldfix_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Get the path to fieldfix.json (for display purposes)
pub fn config_path() -> crate::Result<String> {
    Ok(paths::fieldfix_json()?.display().to_string())
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}
