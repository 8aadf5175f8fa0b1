//! CLI output formatting.
//!
//! Output is group-centric: each generated unit is listed by its group key
//! and class, with the file it was written to as secondary context.
//!
//! ```text
//! Groups
//! 001 Backgrounds → backgrounds_images.dart (1 image)
//!     class BackgroundsImages
//! 002 Icons → icons_images.dart (2 images)
//!     class IconsImages
//! 003 root → app_images.dart (1 image)
//!     class AppImages
//! Index → images.dart
//!
//! Generated 4 files for 4 images in lib/generated/images
//! ```
//!
//! Scan warnings go to stderr so they stay visible when stdout is piped.
//!
//! Each `format_*` function is pure and returns lines for testability; the
//! `print_*` wrappers do the writing.

use crate::emit::INDEX_FILE_NAME;
use crate::generate::{GenerationSummary, GroupSummary, Outcome};
use crate::pubspec::PUBSPEC_FILE_NAME;
use crate::scan::ScanWarning;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn group_lines(index: usize, group: &GroupSummary) -> [String; 2] {
    [
        format!(
            "{} {} → {} ({})",
            format_index(index),
            group.key,
            group.file_name,
            plural(group.asset_count, "image")
        ),
        format!("    class {}", group.class_name),
    ]
}

/// Display an output directory relative to the project root when possible.
fn display_dir(dir: &Path, project_root: &Path) -> String {
    dir.strip_prefix(project_root)
        .unwrap_or(dir)
        .display()
        .to_string()
}

/// Lines for stderr, one per scan warning.
pub fn format_warnings(warnings: &[ScanWarning]) -> Vec<String> {
    warnings.iter().map(|w| format!("warning: {w}")).collect()
}

/// Lines for stdout describing the run.
pub fn format_summary(summary: &GenerationSummary, project_root: &Path) -> Vec<String> {
    match summary.outcome {
        Outcome::NoAssetPaths => {
            return vec![format!(
                "No asset paths found in {PUBSPEC_FILE_NAME} (flutter.assets); nothing to generate"
            )];
        }
        Outcome::NoAssetsFound => {
            return vec![format!(
                "No images found in {}; nothing to generate",
                plural(summary.entries.len(), "declared asset path")
            )];
        }
        Outcome::Generated => {}
    }

    let mut lines = vec!["Groups".to_string()];
    for (i, group) in summary.groups.iter().enumerate() {
        lines.extend(group_lines(i + 1, group));
    }
    lines.push(format!("Index → {INDEX_FILE_NAME}"));
    lines.push(String::new());
    lines.push(format!(
        "Generated {} for {} in {}",
        plural(summary.generated_files.len(), "file"),
        plural(summary.total_assets, "image"),
        display_dir(&summary.output_dir, project_root)
    ));
    lines
}

pub fn print_summary(summary: &GenerationSummary, project_root: &Path) {
    for line in format_warnings(&summary.warnings) {
        eprintln!("{}", line);
    }
    for line in format_summary(summary, project_root) {
        println!("{}", line);
    }
}
