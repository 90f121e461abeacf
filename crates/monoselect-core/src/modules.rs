//! Module name normalization and config validation.
//!
//! A module is a directory holding `.circleci/config.yml`. Raw names come
//! from `DEFAULT_MODULES` and from the list written by `set-parameters`;
//! both are folded into one deduplicated set of config paths.

use crate::error::SelectError;
use std::collections::BTreeSet;
use std::path::Path;

pub const CONFIG_SUFFIX: &str = ".circleci/config.yml";
const YAML_EXTENSIONS: [&str; 2] = [".yml", ".yaml"];

/// Split a comma-separated module list, dropping blank entries.
pub fn split_module_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|name| !name.is_empty())
}

/// Module name as a directory path with exactly one trailing `/`.
/// Blank names yield `None`.
pub fn directory_path(module: &str) -> Option<String> {
    let module = module.trim();
    if module.is_empty() {
        return None;
    }
    if module.ends_with('/') {
        Some(module.to_string())
    } else {
        Some(format!("{module}/"))
    }
}

/// Path to the CI config of `module`. Entries that already name a YAML
/// config are returned unchanged, so this is idempotent.
pub fn normalize_module(module: &str) -> Option<String> {
    let module = module.trim();
    if module.is_empty() {
        return None;
    }
    if YAML_EXTENSIONS.iter().any(|ext| module.ends_with(ext)) {
        return Some(module.to_string());
    }
    directory_path(module).map(|dir| format!("{dir}{CONFIG_SUFFIX}"))
}

pub fn collect_modules<'a>(names: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    names.into_iter().filter_map(normalize_module).collect()
}

/// Fail on the first config path that does not exist under `root`.
pub fn check_configs_exist<'a>(
    root: &Path,
    modules: impl IntoIterator<Item = &'a String>,
) -> Result<(), SelectError> {
    for module in modules {
        let path = root.join(module);
        if !path.exists() {
            return Err(SelectError::ConfigNotFound { path });
        }
    }
    Ok(())
}
