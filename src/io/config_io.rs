use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Error type for config file operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Get the config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/"))
                .join(".config")
        });
    config_dir.join("stacktree").join("config.toml")
}

/// Read the config file. A missing file yields the defaults.
pub fn read_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Read the config file from the default location
pub fn read_config() -> Result<Config, ConfigError> {
    read_config_from(&config_path())
}

fn ensure_table<'a>(
    table: &'a mut dyn toml_edit::TableLike,
    key: &str,
) -> Result<&'a mut dyn toml_edit::TableLike, ConfigError> {
    if !table.get(key).is_some_and(|item| item.is_table_like()) {
        table.insert(key, toml_edit::Item::Table(toml_edit::Table::new()));
    }
    table
        .get_mut(key)
        .and_then(|item| item.as_table_like_mut())
        .ok_or_else(|| invalid(key, "not a table"))
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Set a dotted key in the config document, keeping its existing formatting.
///
/// Supported: `storage.data_dir`, `storage.save_debounce_ms`, `storage.log_limit`,
/// `ui.show_key_hints`, and `ui.colors.<slot>`.
pub fn set_value(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        ["storage", "data_dir"] => {
            ensure_table(doc.as_table_mut(), "storage")?
                .insert("data_dir", toml_edit::value(value));
        }
        ["storage", field @ ("save_debounce_ms" | "log_limit")] => {
            let n: i64 = value
                .parse()
                .ok()
                .filter(|n| *n >= 0)
                .ok_or_else(|| invalid(key, "expected a non-negative integer"))?;
            ensure_table(doc.as_table_mut(), "storage")?.insert(field, toml_edit::value(n));
        }
        ["ui", "show_key_hints"] => {
            let b: bool = value
                .parse()
                .map_err(|_| invalid(key, "expected true or false"))?;
            ensure_table(doc.as_table_mut(), "ui")?.insert("show_key_hints", toml_edit::value(b));
        }
        ["ui", "colors", slot] => {
            if !crate::tui::theme::COLOR_SLOTS.contains(slot) {
                return Err(ConfigError::UnknownKey(key.to_string()));
            }
            if !is_hex_color(value) {
                return Err(invalid(key, "expected #RRGGBB"));
            }
            let ui = ensure_table(doc.as_table_mut(), "ui")?;
            ensure_table(ui, "colors")?.insert(slot, toml_edit::value(value));
        }
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    }
    Ok(())
}

/// Apply `set_value` to the config file at `path`, creating it if needed
pub fn set_value_in(path: &Path, key: &str, value: &str) -> Result<(), ConfigError> {
    let text = if path.exists() {
        fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        String::new()
    };
    let mut doc: toml_edit::DocumentMut = text.parse()?;
    set_value(&mut doc, key, value)?;

    // Refuse to write a document the reader would reject
    toml::from_str::<Config>(&doc.to_string())?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, doc.to_string()).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}
