//! Generator options.
//!
//! Handles loading and validating `imgconst.toml`, the optional options file at
//! the project root. It controls where units are written, which extensions
//! count as images, and which of the naming schemes the emitter uses.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! dir = "lib/generated/images"  # Relative to the project root
//! staged_writes = true          # Write to a temp dir first, then rename into place
//!
//! [scan]
//! extensions = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "svg"]
//!
//! [naming]
//! name_constant = "suffixed"    # homeName; "file_name" gives homeFileName
//! name_value = "file_name"      # 'home.png'; "base_name" gives 'home'
//! collisions = "suffix"         # home, home2; "error" aborts the run
//!
//! [emit]
//! lookup = true                 # Emit getPathByName()
//! ```
//!
//! ## Partial Configuration
//!
//! The file is sparse: override just the values you want. User values are
//! merged key by key over the stock defaults before deserializing, so a file
//! containing only `[naming] collisions = "error"` keeps every other default.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name of the options file, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "imgconst.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Generator options loaded from `imgconst.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    /// Where generated units go and how they are written.
    pub output: OutputConfig,
    /// Which files count as images.
    pub scan: ScanConfig,
    /// Naming scheme for the generated constants.
    pub naming: NamingConfig,
    /// Optional members of the generated classes.
    pub emit: EmitConfig,
}

impl GenConfig {
    /// Validate option values and normalize the extension list.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.output.dir.trim().is_empty() {
            return Err(ConfigError::Validation("output.dir must not be empty".into()));
        }
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "scan.extensions must not be empty".into(),
            ));
        }
        let mut normalized = Vec::with_capacity(self.scan.extensions.len());
        for ext in &self.scan.extensions {
            let ext = ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase();
            if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::Validation(format!(
                    "scan.extensions entry {ext:?} must be a non-empty alphanumeric extension"
                )));
            }
            if !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        self.scan.extensions = normalized;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output directory, relative to the project root unless absolute.
    pub dir: String,
    /// Write every unit to a staging directory before renaming into place.
    pub staged_writes: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "lib/generated/images".to_string(),
            staged_writes: true,
        }
    }
}

/// Extension filter for the scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Lowercase extensions without the dot. Matching is case-insensitive.
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: crate::scan::DEFAULT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub name_constant: NameConstant,
    pub name_value: NameValue,
    pub collisions: CollisionPolicy,
}

/// How the display-name constant is named relative to the path constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameConstant {
    /// `home` / `homeName`
    #[default]
    Suffixed,
    /// `home` / `homeFileName`
    FileName,
}

impl NameConstant {
    pub fn name_identifier(self, identifier: &str) -> String {
        match self {
            NameConstant::Suffixed => format!("{identifier}Name"),
            NameConstant::FileName => format!("{identifier}FileName"),
        }
    }
}

/// What the display-name constant holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameValue {
    /// `'home.png'`, listed in `allFileNames`
    #[default]
    FileName,
    /// `'home'`, listed in `allNames`
    BaseName,
}

impl NameValue {
    /// Name of the list constant holding every name value.
    pub fn list_identifier(self) -> &'static str {
        match self {
            NameValue::FileName => "allFileNames",
            NameValue::BaseName => "allNames",
        }
    }
}

/// What to do when two assets in one group sanitize to the same identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Append the smallest free integer, starting at 2.
    #[default]
    Suffix,
    /// Abort the run.
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitConfig {
    /// Emit `getPathByName(String name)` in every group class.
    pub lookup: bool,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self { lookup: true }
    }
}

// =============================================================================
// Config loading and merging
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GenConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so a user
///   `extensions` list replaces the default list rather than extending it.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `imgconst.toml` from the project root as a raw TOML value.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_raw_config(project_root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load options for a project: stock defaults, user overrides, validation.
pub fn load_config(project_root: &Path) -> Result<GenConfig, ConfigError> {
    let merged = match load_raw_config(project_root)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let mut config: GenConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `imgconst.toml`.
///
/// Printed by `imgconst --gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# imgconst configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Directory for generated Dart files, relative to the project root.
# `imgconst --output <dir>` overrides this.
dir = "lib/generated/images"

# Write every file to a temporary directory inside `dir` first, then move
# them into place. A failure while staging leaves the previous output
# untouched; only the final renames touch existing files.
staged_writes = true

# ---------------------------------------------------------------------------
# Scanning
# ---------------------------------------------------------------------------
[scan]
# File extensions treated as images (case-insensitive, no dot).
extensions = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "svg"]

# ---------------------------------------------------------------------------
# Naming
# ---------------------------------------------------------------------------
[naming]
# Name of the display-name constant emitted next to each path constant:
#   "suffixed"  -> homeName
#   "file_name" -> homeFileName
name_constant = "suffixed"

# Value of the display-name constant:
#   "file_name" -> 'home.png' (listed in allFileNames)
#   "base_name" -> 'home'     (listed in allNames)
name_value = "file_name"

# Two files in one folder that map to the same identifier:
#   "suffix" -> home, home2, home3 ...
#   "error"  -> abort without writing anything
collisions = "suffix"

# ---------------------------------------------------------------------------
# Emitted members
# ---------------------------------------------------------------------------
[emit]
# Emit `static String? getPathByName(String name)` in every group class.
lookup = true
"##
}
