//! Pipeline orchestration.
//!
//! Runs one full regeneration for a project:
//!
//! ```text
//! pubspec.yaml   →  declared entries
//! imgconst.toml  →  options (optional)
//! scan           →  AssetGroups + warnings
//! emit           →  units rendered in memory
//! write          →  output dir (staged or direct)
//! ```
//!
//! Nothing is written until every unit has rendered. An empty entry list or a
//! scan that finds no images ends the run successfully with nothing written;
//! the [`Outcome`] in the returned summary says which.

use crate::config::{self, ConfigError, GenConfig};
use crate::emit::{self, EmitError, EmitOptions, Emitter, WriteMode};
use crate::pubspec::{self, ConfigurationError};
use crate::scan::{ScanError, ScanWarning, Scanner};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("{file} error: {0}", file = config::CONFIG_FILE_NAME)]
    Options(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Units were written.
    Generated,
    /// `flutter.assets` is missing or empty.
    NoAssetPaths,
    /// Every declared directory was scanned and none held an image.
    NoAssetsFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub class_name: String,
    pub file_name: String,
    pub asset_count: usize,
}

/// Result of one run, printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub outcome: Outcome,
    pub output_dir: PathBuf,
    pub entries: Vec<String>,
    pub groups: Vec<GroupSummary>,
    pub total_assets: usize,
    pub generated_files: Vec<String>,
    pub warnings: Vec<ScanWarning>,
}

impl GenerationSummary {
    fn empty(outcome: Outcome, output_dir: PathBuf, entries: Vec<String>) -> Self {
        Self {
            outcome,
            output_dir,
            entries,
            groups: Vec::new(),
            total_assets: 0,
            generated_files: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Regenerate every unit for the project at `project_root`.
///
/// `output_override` replaces `[output] dir`; relative paths resolve against
/// the project root either way.
pub fn generate(
    project_root: &Path,
    output_override: Option<&Path>,
) -> Result<GenerationSummary, GenerateError> {
    generate_at(project_root, output_override, Utc::now())
}

/// [`generate`] with a fixed generation timestamp.
pub fn generate_at(
    project_root: &Path,
    output_override: Option<&Path>,
    generated_at: DateTime<Utc>,
) -> Result<GenerationSummary, GenerateError> {
    let entries = pubspec::load_asset_entries(project_root)?;
    let config = config::load_config(project_root)?;
    let output_dir = resolve_output_dir(project_root, output_override, &config);

    if entries.is_empty() {
        return Ok(GenerationSummary::empty(
            Outcome::NoAssetPaths,
            output_dir,
            entries,
        ));
    }

    let scanned = Scanner::from_config(&config).scan(project_root, &entries)?;
    if scanned.asset_count() == 0 {
        let mut summary = GenerationSummary::empty(Outcome::NoAssetsFound, output_dir, entries);
        summary.warnings = scanned.warnings;
        return Ok(summary);
    }

    let emitter = Emitter::new(EmitOptions::from_config(&config), generated_at);
    let units = emitter.render_all(&scanned.groups)?;

    let mode = if config.output.staged_writes {
        WriteMode::Staged
    } else {
        WriteMode::Direct
    };
    emit::write_units(&output_dir, &units, mode)?;

    let groups = scanned
        .groups
        .iter()
        .map(|(key, assets)| GroupSummary {
            key: key.clone(),
            class_name: emit::group_class_name(key),
            file_name: emit::group_file_name(key),
            asset_count: assets.len(),
        })
        .collect();

    Ok(GenerationSummary {
        outcome: Outcome::Generated,
        output_dir,
        entries,
        groups,
        total_assets: scanned.asset_count(),
        generated_files: units.into_iter().map(|u| u.file_name).collect(),
        warnings: scanned.warnings,
    })
}

fn resolve_output_dir(
    project_root: &Path,
    output_override: Option<&Path>,
    config: &GenConfig,
) -> PathBuf {
    let dir = output_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));
    if dir.is_absolute() {
        dir
    } else {
        project_root.join(dir)
    }
}
