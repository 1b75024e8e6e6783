use crate::error::{Result, SlopscanError};
use crate::types::config::SlopscanConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "slopscan.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/slopscan/config.toml";
pub const DEFAULT_CACHE_DIR: &str = ".cache/slopscan";

/// Loads `~/.config/slopscan/config.toml` overlaid with `./slopscan.toml`.
/// Either file may be absent; with neither present there is no config.
pub fn load_config(cwd: &Path) -> Result<Option<SlopscanConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(cwd, global.as_deref())
}

pub(crate) fn load_config_with_global(
    cwd: &Path,
    global_path: Option<&Path>,
) -> Result<Option<SlopscanConfig>> {
    let local_path = cwd.join(DEFAULT_CONFIG_FILE);
    let global_exists = global_path.map(Path::exists).unwrap_or(false);
    if !global_exists && !local_path.exists() {
        return Ok(None);
    }

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &local_path)?;

    let cfg: SlopscanConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| SlopscanError::ConfigParse(e.to_string()))?;
    Ok(Some(cfg))
}

/// Cache directory: configured value, else `~/.cache/slopscan`, else a
/// relative fallback when `$HOME` is unset.
pub fn resolve_cache_dir(config: Option<&SlopscanConfig>) -> PathBuf {
    if let Some(dir) = config.and_then(|cfg| cfg.cache_dir()) {
        return PathBuf::from(dir);
    }
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_CACHE_DIR))
        .unwrap_or_else(|| PathBuf::from(".slopscan-cache"))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| SlopscanError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
