//! Shared test utilities for the imgconst test suite.
//!
//! Provides fixture setup, group lookups and helpers for comparing generated
//! text across runs.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let entries = pubspec::load_asset_entries(tmp.path()).unwrap();
//! let result = Scanner::default().scan(tmp.path(), &entries).unwrap();
//!
//! assert_eq!(group_keys(&result.groups), vec!["Backgrounds", "Dark", "Icons", "root"]);
//! assert_eq!(identifiers(find_group(&result.groups, "Icons")), vec!["home", "settingsGear"]);
//! ```

use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::emit::TIMESTAMP_PREFIX;
use crate::pubspec::PUBSPEC_FILE_NAME;
use crate::scan::{Asset, AssetGroups};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/project/` to a temp directory and return it.
///
/// The fixture is a minimal Flutter project: a `pubspec.yaml` declaring
/// `assets/` and a missing `assets/missing/`, plus empty image files (the
/// scanner only looks at names).
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/project");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Create an empty file at `root/rel`, creating parent directories.
pub fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "").unwrap();
}

/// Write a `pubspec.yaml` declaring `entries` under `flutter.assets`.
pub fn write_pubspec(root: &Path, entries: &[&str]) {
    let mut doc = String::from("name: test_app\nflutter:\n  uses-material-design: true\n");
    if entries.is_empty() {
        doc.push_str("  assets: []\n");
    } else {
        doc.push_str("  assets:\n");
        for entry in entries {
            doc.push_str(&format!("    - {entry}\n"));
        }
    }
    fs::write(root.join(PUBSPEC_FILE_NAME), doc).unwrap();
}

// =========================================================================
// Group lookups (panic with the available keys on miss)
// =========================================================================

/// Find a group by key. Panics if not found.
pub fn find_group<'a>(groups: &'a AssetGroups, key: &str) -> &'a [Asset] {
    groups.get(key).map(Vec::as_slice).unwrap_or_else(|| {
        let keys = group_keys(groups);
        panic!("group '{key}' not found. Available: {keys:?}")
    })
}

/// All group keys in map order.
pub fn group_keys(groups: &AssetGroups) -> Vec<&str> {
    groups.keys().map(String::as_str).collect()
}

/// Identifiers of `assets` in their current order.
pub fn identifiers(assets: &[Asset]) -> Vec<&str> {
    assets.iter().map(|a| a.identifier.as_str()).collect()
}

// =========================================================================
// Generated text helpers
// =========================================================================

/// 2023-11-14T22:13:20Z
pub fn fixed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// One day after [`fixed_time`].
pub fn other_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_086_400, 0).unwrap()
}

/// Replace the timestamp header line so two runs can be compared byte for byte.
pub fn mask_timestamp(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.starts_with(TIMESTAMP_PREFIX) {
                "// Generated at: <masked>"
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// File names exported by an index unit, in file order.
pub fn exported_files(index_text: &str) -> Vec<&str> {
    index_text
        .lines()
        .filter_map(|line| line.strip_prefix("export '"))
        .filter_map(|rest| rest.strip_suffix("';"))
        .collect()
}
