//! Declared asset directories from `pubspec.yaml`.
//!
//! Flutter projects list bundled assets under `flutter.assets`:
//!
//! ```yaml
//! flutter:
//!   assets:
//!     - assets/
//!     - assets/icons/
//!     - assets/logo.png
//!     - path: assets/dark/
//!       flavors: [premium]
//! ```
//!
//! Only that one key path matters here, so the document is read as a loose
//! [`serde_yaml::Value`] tree instead of a typed pubspec model. A document that
//! is missing or cannot be parsed is an error; a missing `flutter` or `assets`
//! key just means there is nothing to scan.

use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the project manifest, looked up in the project root.
pub const PUBSPEC_FILE_NAME: &str = "pubspec.yaml";

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Project manifest not found: {0}")]
    Missing(PathBuf),
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Load the declared asset entries of the project at `project_root`, in
/// declaration order.
pub fn load_asset_entries(project_root: &Path) -> Result<Vec<String>, ConfigurationError> {
    let path = project_root.join(PUBSPEC_FILE_NAME);
    if !path.is_file() {
        return Err(ConfigurationError::Missing(path));
    }
    let content = fs::read_to_string(&path).map_err(|source| ConfigurationError::Io {
        path: path.clone(),
        source,
    })?;
    parse_asset_entries(&content).map_err(|source| ConfigurationError::Parse { path, source })
}

/// Parse a pubspec document and extract `flutter.assets`.
pub fn parse_asset_entries(content: &str) -> Result<Vec<String>, serde_yaml::Error> {
    let doc: Value = serde_yaml::from_str(content)?;
    Ok(asset_entries(&doc))
}

/// Typed accessor over the value tree. Anything that is not a list of strings
/// or `path:` mappings at `flutter.assets` resolves to nothing.
fn asset_entries(doc: &Value) -> Vec<String> {
    let Some(items) = doc
        .get("flutter")
        .and_then(|flutter| flutter.get("assets"))
        .and_then(Value::as_sequence)
    else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Mapping(_) => item.get("path").and_then(Value::as_str),
            _ => None,
        })
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
