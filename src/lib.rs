//! # imgconst
//!
//! Generates typed Dart constants for the image assets a Flutter project
//! declares. Every declared asset directory is scanned, images are grouped by
//! the folder that holds them, and each group becomes one Dart class of path
//! constants. An index file re-exports all of them.
//!
//! # Architecture: Scan → Emit → Write
//!
//! ```text
//! 1. Scan   pubspec.yaml + assets/  →  AssetGroups       (filesystem → structured data)
//! 2. Emit   AssetGroups             →  Vec<OutputUnit>   (pure rendering, in memory)
//! 3. Write  Vec<OutputUnit>         →  lib/generated/images/*.dart
//! ```
//!
//! Rendering is pure: the emitter takes the generation timestamp as input and
//! never touches the filesystem, so unit tests exercise naming, sorting and
//! collision rules without fixtures. Writing only starts once every unit has
//! rendered, so a naming error never leaves half an output directory behind.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pubspec`] | Reads the declared asset entries (`flutter.assets`) from `pubspec.yaml` |
//! | [`config`] | `imgconst.toml` loading, merging over stock defaults, validation |
//! | [`scan`] | Walks declared directories, filters images, groups them by folder |
//! | [`naming`] | Filesystem name → Dart identifier, type name and file name rules |
//! | [`emit`] | Renders group and index units, resolves collisions, writes files |
//! | [`generate`] | Runs the whole pipeline and returns a [`generate::GenerationSummary`] |
//! | [`output`] | CLI output formatting for the summary and scan warnings |
//!
//! # Design Decisions
//!
//! ## Deterministic Output
//!
//! Assets are sorted by identifier and groups by key before anything is
//! rendered. Filesystem enumeration order never reaches the output, so
//! regenerating over unchanged assets changes exactly one line per file (the
//! `Generated at:` header), and generated files diff cleanly in review.
//!
//! ## Nearest-Folder Grouping
//!
//! An image belongs to the folder that directly contains it, not to the full
//! path. `assets/icons/dark/home.png` lands in `Dark`, not `IconsDark`. This
//! keeps class names short at the cost of merging same-named folders from
//! different branches into one group.
//!
//! ## Full Regeneration
//!
//! There is no cache and no diffing against previous output. Every run
//! rewrites every unit. Units for folders that disappeared are left in place;
//! the index stops exporting them.

use std::sync::OnceLock;

pub mod config;
pub mod emit;
pub mod generate;
pub mod naming;
pub mod output;
pub mod pubspec;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Version string stamped into generated headers and `--version`.
///
/// The crate version on a release tag, `dev@<short hash>` otherwise.
pub fn generator_version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        if env!("IMGCONST_ON_RELEASE_TAG") == "true" {
            env!("CARGO_PKG_VERSION").to_string()
        } else {
            let hash = env!("IMGCONST_GIT_HASH");
            if hash.is_empty() {
                "dev@unknown".to_string()
            } else {
                format!("dev@{hash}")
            }
        }
    })
}
