//! Asset discovery.
//!
//! Stage 1 of the imgconst pipeline. Walks every declared asset directory,
//! keeps the files whose extension marks them as images, and groups them by
//! the folder that directly contains them.
//!
//! ## Grouping
//!
//! ```text
//! assets/                      # declared as `assets/`
//! ├── logo.png                 # group "root"
//! ├── icons/
//! │   ├── home.png             # group "Icons"
//! │   └── dark/
//! │       └── home.png         # group "Dark" (nearest folder only)
//! └── backgrounds/
//!     └── splash.jpg           # group "Backgrounds"
//! ```
//!
//! Files directly inside a top-level declared folder (`assets/`) land in the
//! synthetic `root` group. Files directly inside a nested declared folder
//! (`assets/icons/`) are grouped by that folder's name, so declaring
//! `assets/icons/` and declaring `assets/` yield the same `Icons` group.
//!
//! ## Entries
//!
//! A declared entry that names an existing file (or a file glob such as
//! `assets/*.png`) scans the directory containing it. Absolute entries are
//! made relative to the project root. An entry that is missing on disk or
//! lies outside the project produces a [`ScanWarning`] and contributes
//! nothing.
//!
//! Results from all entries are merged by group key without deduplicating
//! paths. Enumeration order is not meaningful; the emitter sorts.

use crate::config::GenConfig;
use crate::naming;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Image extensions recognized when no `[scan] extensions` override is set.
pub const DEFAULT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "svg"];

/// Group key for files directly inside a top-level asset folder.
pub const ROOT_GROUP: &str = "root";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to walk asset directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One discovered image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    /// Path relative to the project root, `/`-separated on every platform.
    pub relative_path: String,
    /// File name with extension (`home.png`).
    pub file_name: String,
    /// File name without extension (`home`).
    pub base_name: String,
    /// Sanitized constant name before collision handling (`home`).
    pub identifier: String,
}

impl Asset {
    /// Build an asset from its project-relative path.
    pub fn new(relative_path: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        let file_name = relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&relative_path)
            .to_string();
        let base_name = naming::strip_extension(&file_name).to_string();
        let identifier = naming::file_identifier(&file_name);
        Self {
            relative_path,
            file_name,
            base_name,
            identifier,
        }
    }
}

/// Assets keyed by group key. Keys iterate in ascending order.
pub type AssetGroups = BTreeMap<String, Vec<Asset>>;

/// Why a declared entry contributed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    MissingDirectory,
    MissingFile,
    OutsideProject,
}

/// A declared entry that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanWarning {
    pub kind: WarningKind,
    /// The entry as written in `pubspec.yaml`.
    pub entry: String,
    /// What was looked up: project-relative for missing paths, the entry
    /// itself for paths outside the project.
    pub path: String,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            WarningKind::MissingDirectory => "Asset directory not found",
            WarningKind::MissingFile => "Asset file not found",
            WarningKind::OutsideProject => {
                return write!(f, "Asset entry is outside the project: {}", self.entry);
            }
        };
        if self.entry.trim_end_matches('/') == self.path {
            write!(f, "{what}: {}", self.path)
        } else {
            write!(f, "{what}: {} (declared as {})", self.path, self.entry)
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub groups: AssetGroups,
    pub warnings: Vec<ScanWarning>,
}

impl ScanResult {
    pub fn asset_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Walks declared directories and builds [`AssetGroups`].
///
/// The extension set is fixed at construction.
#[derive(Debug, Clone)]
pub struct Scanner {
    extensions: BTreeSet<String>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl Scanner {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &GenConfig) -> Self {
        Self::new(&config.scan.extensions)
    }

    /// Whether `path` has a recognized image extension (case-insensitive).
    pub fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| self.extensions.contains(&ext))
    }

    /// Scan every declared entry under `project_root`, in order.
    pub fn scan(&self, project_root: &Path, entries: &[String]) -> Result<ScanResult, ScanError> {
        let mut result = ScanResult::default();

        for entry in entries {
            match resolve_entry(project_root, entry) {
                Ok(rel_dir) => {
                    let abs_dir = project_root.join(&rel_dir);
                    self.scan_directory(&abs_dir, &rel_dir, &mut result.groups)?;
                }
                Err(warning) => result.warnings.push(warning),
            }
        }

        Ok(result)
    }

    fn scan_directory(
        &self,
        abs_dir: &Path,
        rel_dir: &Path,
        groups: &mut AssetGroups,
    ) -> Result<(), ScanError> {
        let top_level = rel_dir.components().count() <= 1;

        for entry in WalkDir::new(abs_dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !self.is_image(path) {
                continue;
            }
            let Ok(inner) = path.strip_prefix(abs_dir) else {
                continue;
            };

            let key = group_key(inner, rel_dir, top_level);
            let asset = Asset::new(to_slash(&rel_dir.join(inner)));
            groups.entry(key).or_default().push(asset);
        }
        Ok(())
    }
}

/// Group key for a file at `inner` (relative to the scanned directory).
fn group_key(inner: &Path, rel_dir: &Path, top_level: bool) -> String {
    let parent = inner.parent().filter(|p| !p.as_os_str().is_empty());
    let folder = match parent {
        Some(p) => p.file_name(),
        None if top_level => return ROOT_GROUP.to_string(),
        None => rel_dir.file_name(),
    };
    match folder {
        Some(name) => naming::folder_type_name(&name.to_string_lossy()),
        None => ROOT_GROUP.to_string(),
    }
}

/// Resolve a declared entry to the project-relative directory to scan.
///
/// - existing directory: scanned as is
/// - existing file, or a glob such as `assets/*.png`: its parent is scanned
/// - absolute path: made project-relative first
///
/// Anything that cannot be scanned comes back as a warning.
fn resolve_entry(project_root: &Path, entry: &str) -> Result<PathBuf, ScanWarning> {
    let trimmed = entry.trim();
    let warning = |kind, path: String| ScanWarning {
        kind,
        entry: entry.to_string(),
        path,
    };

    let declared = Path::new(trimmed);
    let rel = if declared.is_absolute() {
        project_relative(project_root, declared)
            .ok_or_else(|| warning(WarningKind::OutsideProject, trimmed.to_string()))?
    } else {
        normalize(declared)
    };
    let abs = project_root.join(&rel);

    if abs.is_dir() {
        return Ok(rel);
    }
    if abs.is_file() {
        return Ok(parent_of(&rel));
    }
    if is_glob(&rel) {
        let parent = parent_of(&rel);
        if project_root.join(&parent).is_dir() {
            return Ok(parent);
        }
        return Err(warning(WarningKind::MissingDirectory, to_slash(&parent)));
    }
    if !trimmed.ends_with('/') && rel.extension().is_some() {
        return Err(warning(WarningKind::MissingFile, to_slash(&rel)));
    }
    Err(warning(WarningKind::MissingDirectory, to_slash(&rel)))
}

/// `path` relative to `project_root`, or `None` when it lies outside.
fn project_relative(project_root: &Path, path: &Path) -> Option<PathBuf> {
    if let Ok(rel) = path.strip_prefix(project_root) {
        return Some(normalize(rel));
    }
    // Relative or symlinked roots only match once both sides are canonical.
    let root = project_root.canonicalize().ok()?;
    let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    path.strip_prefix(&root).ok().map(normalize)
}

fn parent_of(rel: &Path) -> PathBuf {
    rel.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn is_glob(rel: &Path) -> bool {
    rel.file_name()
        .is_some_and(|name| name.to_string_lossy().contains(['*', '?', '[']))
}

/// Drop `.` components so `./assets/` and `assets` resolve alike.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Render a relative path with `/` separators regardless of platform.
fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
