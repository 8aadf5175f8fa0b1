//! Identifier sanitization for generated Dart source.
//!
//! Every constant, class and file name the emitter writes is derived from a
//! filesystem name. Filesystem names can hold anything (spaces, dashes, dots,
//! leading digits, unicode), so they go through one normalization pipeline
//! before any casing is applied:
//!
//! 1. strip the extension (file names only)
//! 2. replace every character outside `[a-zA-Z0-9_]` with `_`
//! 3. collapse runs of `_`
//! 4. trim leading and trailing `_`
//! 5. substitute a fallback when nothing is left
//! 6. prefix `img_` when the result starts with a digit
//!
//! The sanitized form is then cased:
//!
//! - `home-Icon@2x.png` → `home_Icon_2x` → `homeIcon2x` (identifier)
//! - `1st-icon.png` → `img_1st_icon` → `img1stIcon` (identifier)
//! - `app bar-icons/` → `app_bar_icons` → `AppBarIcons` (type name)
//!
//! Two distinct raw names can sanitize to the same identifier. This module
//! does not deduplicate; see [`crate::emit`] for collision handling.

const IDENTIFIER_FALLBACK: &str = "image";
const TYPE_NAME_FALLBACK: &str = "Images";
const DIGIT_PREFIX: &str = "img_";

/// Dart reserved words. None of these may be used as a member or field name.
const DART_RESERVED_WORDS: &[&str] = &[
    "assert", "await", "break", "case", "catch", "class", "const", "continue", "default", "do",
    "else", "enum", "extends", "false", "final", "finally", "for", "if", "in", "is", "new",
    "null", "rethrow", "return", "super", "switch", "this", "throw", "true", "try", "var",
    "void", "while", "with", "yield",
];

/// What kind of filesystem name is being sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// An image file name: the extension is stripped, fallback is `image`.
    File,
    /// A folder name: kept whole, fallback is `Images`.
    Folder,
}

impl NameKind {
    fn fallback(self) -> &'static str {
        match self {
            NameKind::File => IDENTIFIER_FALLBACK,
            NameKind::Folder => TYPE_NAME_FALLBACK,
        }
    }
}

/// Remove the last extension from a file name.
///
/// A leading dot is not an extension separator: `.png` stays `.png`.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(pos) => &name[..pos],
    }
}

/// Run steps 1–6 of the normalization pipeline.
///
/// The result is non-empty, contains only `[a-zA-Z0-9_]`, has no leading,
/// trailing or doubled underscores, and never starts with a digit.
pub fn sanitize_base_name(raw: &str, kind: NameKind) -> String {
    let stem = match kind {
        NameKind::File => strip_extension(raw),
        NameKind::Folder => raw,
    };

    let mut out = String::with_capacity(stem.len());
    for c in stem.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '_' {
            c
        } else {
            '_'
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches('_');
    let base = if trimmed.is_empty() {
        kind.fallback()
    } else {
        trimmed
    };

    if base.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{DIGIT_PREFIX}{base}")
    } else {
        base.to_string()
    }
}

/// camelCase: the first `_` segment is lowercased, later segments get an
/// uppercase first letter, underscores are dropped.
pub fn to_identifier_case(sanitized: &str) -> String {
    let mut out = String::with_capacity(sanitized.len());
    for (i, segment) in sanitized.split('_').filter(|s| !s.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(&segment.to_ascii_lowercase());
        } else {
            push_capitalized(&mut out, segment);
        }
    }
    out
}

/// PascalCase: every segment gets an uppercase first letter. Any
/// non-alphanumeric character splits segments, not only `_`.
pub fn to_type_name_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for segment in raw
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
    {
        push_capitalized(&mut out, segment);
    }
    out
}

fn push_capitalized(out: &mut String, segment: &str) {
    let mut chars = segment.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
        out.push_str(chars.as_str());
    }
}

/// Constant name for an image file: `home-icon.png` → `homeIcon`.
pub fn file_identifier(file_name: &str) -> String {
    let id = to_identifier_case(&sanitize_base_name(file_name, NameKind::File));
    guard_reserved(id)
}

/// Group key for a folder: `app-icons` → `AppIcons`.
pub fn folder_type_name(folder_name: &str) -> String {
    to_type_name_case(&sanitize_base_name(folder_name, NameKind::Folder))
}

/// PascalCase → snake_case, splitting acronyms at their last capital:
/// `AppBarIcons` → `app_bar_icons`, `HTTPIcons` → `http_icons`.
pub fn to_snake_case(type_name: &str) -> String {
    let chars: Vec<char> = type_name.chars().collect();
    let mut out = String::with_capacity(type_name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// PascalCase → lowerCamelCase for field names: `AppIcons` → `appIcons`.
pub fn to_lower_camel(type_name: &str) -> String {
    let mut chars = type_name.chars();
    let lowered = match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_lowercase(), chars.as_str()),
        None => IDENTIFIER_FALLBACK.to_string(),
    };
    guard_reserved(lowered)
}

/// Whether `name` is a Dart reserved word.
pub fn is_reserved_word(name: &str) -> bool {
    DART_RESERVED_WORDS.contains(&name)
}

/// Reserved words get the same prefix as digit-led names: `class` → `imgClass`.
fn guard_reserved(id: String) -> String {
    if is_reserved_word(&id) {
        to_identifier_case(&format!("{DIGIT_PREFIX}{id}"))
    } else {
        id
    }
}
