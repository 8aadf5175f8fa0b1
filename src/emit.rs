//! Dart source generation.
//!
//! Stage 2 of the imgconst pipeline. Turns [`AssetGroups`] into output units:
//! one Dart file per group plus an index that re-exports all of them.
//!
//! ## Output Structure
//!
//! ```text
//! lib/generated/images/
//! ├── images.dart                # Index: exports every unit, `Images` aggregate
//! ├── app_images.dart            # `root` group → class AppImages
//! ├── icons_images.dart          # `Icons` group → class IconsImages
//! └── app_bar_icons_images.dart  # `AppBarIcons` group → class AppBarIconsImages
//! ```
//!
//! ## Group Units
//!
//! ```dart
//! class IconsImages {
//!   IconsImages._();
//!
//!   static const String home = 'assets/icons/home.png';
//!   static const String homeName = 'home.png';
//!
//!   static const List<String> allPaths = <String>[
//!     home,
//!   ];
//!
//!   static const List<String> allFileNames = <String>[
//!     homeName,
//!   ];
//!
//!   static String? getPathByName(String name) { ... }
//! }
//! ```
//!
//! Assets are sorted by identifier (then path) and group keys are sorted
//! before rendering, so output depends only on what is on disk, never on
//! enumeration order. The only line that differs between two runs over the
//! same files is the `Generated at:` header line.
//!
//! ## Collisions
//!
//! Distinct files can sanitize to the same identifier (`home.png`,
//! `Home.svg`). The first in sorted order keeps the plain name; later ones
//! either get the smallest free numeric suffix (`home2`) or abort the run,
//! per [`CollisionPolicy`]. Generated member names (`allPaths`, ...) count as
//! taken.
//!
//! ## Writing
//!
//! [`write_units`] overwrites every unit unconditionally. In
//! [`WriteMode::Staged`] all units are written into a temporary directory
//! inside the output directory first and only then renamed into place, so a
//! failure while staging leaves the previous output intact. Renames are not
//! transactional: a rename that fails partway leaves some units updated.

use crate::config::{CollisionPolicy, GenConfig, NameValue, NamingConfig};
use crate::naming;
use crate::scan::{Asset, AssetGroups, ROOT_GROUP};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SOURCE_EXTENSION: &str = ".dart";
pub const INDEX_FILE_NAME: &str = "images.dart";
pub const ROOT_FILE_STEM: &str = "app_images";
pub const HEADER_MARKER: &str = "// GENERATED CODE - DO NOT MODIFY BY HAND";
pub const TIMESTAMP_PREFIX: &str = "// Generated at: ";

const ROOT_CLASS: &str = "AppImages";
const INDEX_CLASS: &str = "Images";
const ALL_PATHS: &str = "allPaths";
const LOOKUP_FN: &str = "getPathByName";
const ALL_PATHS_FN: &str = "getAllPaths";
const INDENT: &str = "  ";

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Identifier `{identifier}` in group {group} is claimed by both {first} and {second}")]
    IdentifierCollision {
        group: String,
        identifier: String,
        first: String,
        second: String,
    },
    #[error("Groups {first} and {second} would both be written to {file_name}")]
    DuplicateUnit {
        file_name: String,
        first: String,
        second: String,
    },
}

/// One generated source file, fully rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit {
    pub file_name: String,
    pub text: String,
}

/// An asset together with the member names it gets in its group's class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub asset: Asset,
    /// Path constant name, suffixed when it collided.
    pub identifier: String,
    /// Display-name constant name, derived from `identifier`.
    pub name_identifier: String,
}

impl Member {
    fn name_value(&self, name_value: NameValue) -> &str {
        match name_value {
            NameValue::FileName => &self.asset.file_name,
            NameValue::BaseName => &self.asset.base_name,
        }
    }
}

/// File name for a group's unit. Depends on the key alone.
pub fn group_file_name(group_key: &str) -> String {
    if group_key == ROOT_GROUP {
        format!("{ROOT_FILE_STEM}{SOURCE_EXTENSION}")
    } else {
        format!(
            "{}_images{SOURCE_EXTENSION}",
            naming::to_snake_case(group_key)
        )
    }
}

/// Dart class name for a group's unit.
pub fn group_class_name(group_key: &str) -> String {
    if group_key == ROOT_GROUP {
        ROOT_CLASS.to_string()
    } else {
        format!("{group_key}Images")
    }
}

/// Options that change what the emitter renders.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitOptions {
    pub naming: NamingConfig,
    /// Emit `getPathByName`.
    pub lookup: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self::from_config(&GenConfig::default())
    }
}

impl EmitOptions {
    pub fn from_config(config: &GenConfig) -> Self {
        Self {
            naming: config.naming.clone(),
            lookup: config.emit.lookup,
        }
    }
}

/// Renders output units. Holds everything that goes into the header so
/// rendering itself is pure.
#[derive(Debug, Clone)]
pub struct Emitter {
    options: EmitOptions,
    generator: String,
    generated_at: String,
}

impl Emitter {
    pub fn new(options: EmitOptions, generated_at: DateTime<Utc>) -> Self {
        Self {
            options,
            generator: format!("imgconst {}", crate::generator_version()),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Render every group unit (in key order) followed by the index unit.
    ///
    /// Fails before producing anything if two groups map to one file name.
    pub fn render_all(&self, groups: &AssetGroups) -> Result<Vec<OutputUnit>, EmitError> {
        let mut owners: HashMap<String, &str> = HashMap::new();
        for key in groups.keys() {
            let file_name = group_file_name(key);
            if let Some(first) = owners.insert(file_name.clone(), key) {
                return Err(EmitError::DuplicateUnit {
                    file_name,
                    first: first.to_string(),
                    second: key.clone(),
                });
            }
        }

        let mut units = Vec::with_capacity(groups.len() + 1);
        for (key, assets) in groups {
            units.push(self.render_group(key, assets)?);
        }
        let keys: Vec<String> = groups.keys().cloned().collect();
        units.push(self.render_index(&keys));
        Ok(units)
    }

    /// Assign member names to a group's assets, sorted, with collisions
    /// resolved.
    pub fn prepare_group(&self, group_key: &str, assets: &[Asset]) -> Result<Vec<Member>, EmitError> {
        let naming = &self.options.naming;
        let mut members: Vec<Member> = assets
            .iter()
            .map(|asset| Member {
                identifier: asset.identifier.clone(),
                name_identifier: naming.name_constant.name_identifier(&asset.identifier),
                asset: asset.clone(),
            })
            .collect();
        sort_members(&mut members);

        let generated = "a generated member".to_string();
        let mut owners: HashMap<String, String> = [
            ALL_PATHS,
            naming.name_value.list_identifier(),
            LOOKUP_FN,
        ]
        .into_iter()
        .map(|name| (name.to_string(), generated.clone()))
        .collect();

        // First pass: the first claimant of a natural name keeps it.
        let mut pending = Vec::new();
        for (i, member) in members.iter().enumerate() {
            if owners.contains_key(&member.identifier)
                || owners.contains_key(&member.name_identifier)
            {
                pending.push(i);
                continue;
            }
            let path = &member.asset.relative_path;
            owners.insert(member.identifier.clone(), path.clone());
            owners.insert(member.name_identifier.clone(), path.clone());
        }

        // Second pass: everyone else is renamed or rejected.
        for i in pending {
            let member = &mut members[i];
            match naming.collisions {
                CollisionPolicy::Error => {
                    let clash = if owners.contains_key(&member.identifier) {
                        &member.identifier
                    } else {
                        &member.name_identifier
                    };
                    return Err(EmitError::IdentifierCollision {
                        group: group_key.to_string(),
                        identifier: clash.clone(),
                        first: owners[clash].clone(),
                        second: member.asset.relative_path.clone(),
                    });
                }
                CollisionPolicy::Suffix => {
                    let base = member.identifier.clone();
                    let mut n = 2u32;
                    loop {
                        let identifier = format!("{base}{n}");
                        let name_identifier = naming.name_constant.name_identifier(&identifier);
                        if !owners.contains_key(&identifier) && !owners.contains_key(&name_identifier)
                        {
                            let path = &member.asset.relative_path;
                            owners.insert(identifier.clone(), path.clone());
                            owners.insert(name_identifier.clone(), path.clone());
                            member.identifier = identifier;
                            member.name_identifier = name_identifier;
                            break;
                        }
                        n += 1;
                    }
                }
            }
        }

        sort_members(&mut members);
        Ok(members)
    }

    /// Render one group's unit.
    pub fn render_group(&self, group_key: &str, assets: &[Asset]) -> Result<OutputUnit, EmitError> {
        let members = self.prepare_group(group_key, assets)?;
        let class = group_class_name(group_key);
        let name_value = self.options.naming.name_value;

        let scope = if group_key == ROOT_GROUP {
            format!("root group ({})", count_label(members.len()))
        } else {
            format!("group {group_key} ({})", count_label(members.len()))
        };

        let mut out = self.header(&scope);
        if group_key == ROOT_GROUP {
            out.push_str("/// Images found directly inside the top-level asset folders.\n");
        } else {
            let _ = writeln!(out, "/// Images found in `{group_key}` folders.");
        }
        let _ = writeln!(out, "class {class} {{");
        let _ = writeln!(out, "{INDENT}{class}._();");

        for member in &members {
            out.push('\n');
            let _ = writeln!(
                out,
                "{INDENT}static const String {} = {};",
                member.identifier,
                dart_string(&member.asset.relative_path)
            );
            let _ = writeln!(
                out,
                "{INDENT}static const String {} = {};",
                member.name_identifier,
                dart_string(member.name_value(name_value))
            );
        }

        out.push('\n');
        push_list(
            &mut out,
            ALL_PATHS,
            members.iter().map(|m| m.identifier.as_str()),
        );
        out.push('\n');
        push_list(
            &mut out,
            name_value.list_identifier(),
            members.iter().map(|m| m.name_identifier.as_str()),
        );

        if self.options.lookup {
            out.push('\n');
            push_lookup(&mut out, &members, name_value);
        }

        out.push_str("}\n");
        Ok(OutputUnit {
            file_name: group_file_name(group_key),
            text: out,
        })
    }

    /// Render the index unit over `group_keys` (sorted and deduplicated here).
    pub fn render_index(&self, group_keys: &[String]) -> OutputUnit {
        let mut keys: Vec<&str> = group_keys.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys.dedup();

        let mut out = self.header(&format!(
            "index of {} group{}",
            keys.len(),
            if keys.len() == 1 { "" } else { "s" }
        ));

        for key in &keys {
            let _ = writeln!(out, "export '{}';", group_file_name(key));
        }
        out.push('\n');
        for key in &keys {
            let _ = writeln!(out, "import '{}';", group_file_name(key));
        }
        out.push('\n');

        out.push_str("/// Every generated image group in one place.\n");
        let _ = writeln!(out, "class {INDEX_CLASS} {{");
        let _ = writeln!(out, "{INDENT}{INDEX_CLASS}._();");
        out.push('\n');

        let mut taken: HashSet<String> = HashSet::from([ALL_PATHS_FN.to_string()]);
        for key in &keys {
            let field = unique_field(index_field_name(key), &mut taken);
            let _ = writeln!(
                out,
                "{INDENT}static const List<String> {field} = {}.{ALL_PATHS};",
                group_class_name(key)
            );
        }

        out.push('\n');
        let _ = writeln!(out, "{INDENT}static List<String> {ALL_PATHS_FN}() => <String>[");
        for key in &keys {
            let _ = writeln!(
                out,
                "{INDENT}{INDENT}{INDENT}...{}.{ALL_PATHS},",
                group_class_name(key)
            );
        }
        let _ = writeln!(out, "{INDENT}{INDENT}];");
        out.push_str("}\n");

        OutputUnit {
            file_name: INDEX_FILE_NAME.to_string(),
            text: out,
        }
    }

    fn header(&self, scope: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{HEADER_MARKER}");
        let _ = writeln!(out, "// Generator: {}", self.generator);
        let _ = writeln!(out, "{TIMESTAMP_PREFIX}{}", self.generated_at);
        let _ = writeln!(out, "// Scope: {scope}");
        out.push_str("// ignore_for_file: type=lint\n\n");
        out
    }
}

/// Field name for a group in the index class: `root`, `icons`, `appBarIcons`.
pub fn index_field_name(group_key: &str) -> String {
    if group_key == ROOT_GROUP {
        ROOT_GROUP.to_string()
    } else {
        naming::to_lower_camel(group_key)
    }
}

fn unique_field(field: String, taken: &mut HashSet<String>) -> String {
    let mut candidate = field.clone();
    let mut n = 2u32;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{field}{n}");
        n += 1;
    }
    candidate
}

fn sort_members(members: &mut [Member]) {
    members.sort_by(|a, b| {
        a.identifier
            .cmp(&b.identifier)
            .then_with(|| a.asset.relative_path.cmp(&b.asset.relative_path))
    });
}

fn count_label(n: usize) -> String {
    if n == 1 {
        "1 image".to_string()
    } else {
        format!("{n} images")
    }
}

fn push_list<'a>(out: &mut String, name: &str, items: impl Iterator<Item = &'a str>) {
    let _ = writeln!(out, "{INDENT}static const List<String> {name} = <String>[");
    for item in items {
        let _ = writeln!(out, "{INDENT}{INDENT}{item},");
    }
    let _ = writeln!(out, "{INDENT}];");
}

/// `switch` over every name constant. A name value shared by several assets
/// only gets its first case; Dart rejects unreachable duplicates.
fn push_lookup(out: &mut String, members: &[Member], name_value: NameValue) {
    let _ = writeln!(out, "{INDENT}static String? {LOOKUP_FN}(String name) {{");
    let _ = writeln!(out, "{INDENT}{INDENT}switch (name) {{");
    let mut seen = HashSet::new();
    for member in members {
        if !seen.insert(member.name_value(name_value)) {
            continue;
        }
        let _ = writeln!(out, "{INDENT}{INDENT}{INDENT}case {}:", member.name_identifier);
        let _ = writeln!(
            out,
            "{INDENT}{INDENT}{INDENT}{INDENT}return {};",
            member.identifier
        );
    }
    let _ = writeln!(out, "{INDENT}{INDENT}{INDENT}default:");
    let _ = writeln!(out, "{INDENT}{INDENT}{INDENT}{INDENT}return null;");
    let _ = writeln!(out, "{INDENT}{INDENT}}}");
    let _ = writeln!(out, "{INDENT}}}");
}

/// Single-quoted Dart string literal. `$` is escaped so paths never
/// interpolate.
pub fn dart_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// How [`write_units`] puts files on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Write everything to a staging directory, then rename into place.
    Staged,
    /// Write each file in place.
    Direct,
}

/// Write every unit to `output_dir`, creating it if needed and overwriting
/// existing files. Returns the written paths in unit order.
pub fn write_units(
    output_dir: &Path,
    units: &[OutputUnit],
    mode: WriteMode,
) -> Result<Vec<PathBuf>, EmitError> {
    fs::create_dir_all(output_dir)?;

    match mode {
        WriteMode::Direct => units
            .iter()
            .map(|unit| -> Result<PathBuf, EmitError> {
                let target = output_dir.join(&unit.file_name);
                fs::write(&target, &unit.text)?;
                Ok(target)
            })
            .collect(),
        WriteMode::Staged => {
            let staging = tempfile::Builder::new()
                .prefix(".imgconst-")
                .tempdir_in(output_dir)?;
            for unit in units {
                fs::write(staging.path().join(&unit.file_name), &unit.text)?;
            }

            let mut written = Vec::with_capacity(units.len());
            for unit in units {
                let target = output_dir.join(&unit.file_name);
                fs::rename(staging.path().join(&unit.file_name), &target)?;
                written.push(target);
            }
            staging.close()?;
            Ok(written)
        }
    }
}
