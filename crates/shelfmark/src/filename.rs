//! File name normalization and random naming.
//!
//! Client-supplied file names are untrusted: they may carry path
//! separators, shell metacharacters, or non-ASCII text that some object
//! stores mangle. Everything here reduces a name to lowercase ASCII
//! letters, digits, `.`, `-` and `_`.

use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::keys::KeyError;

/// Normalize a client file name into its canonical stored form.
///
/// Leading and trailing whitespace is trimmed, each space becomes an
/// underscore, accented letters are folded to their ASCII base form
/// (NFKD), every other disallowed character is dropped, and the result
/// is lowercased. Names that normalize to `""`, `"."` or `".."` are
/// rejected as [`KeyError::InvalidFilename`].
pub fn normalize_filename(filename: &str) -> Result<String, KeyError> {
    let normalized: String = filename
        .trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if matches!(normalized.as_str(), "" | "." | "..") {
        return Err(KeyError::InvalidFilename(filename.to_string()));
    }

    Ok(normalized)
}

/// Replace a file name with a random 32-digit hexadecimal identifier,
/// keeping the original extension (lowercased) when there is one.
pub fn uuid_filename(filename: &str) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    match file_suffix(filename) {
        Some(suffix) => format!("{stem}{}", suffix.to_lowercase()),
        None => stem,
    }
}

/// Turn arbitrary text into a path-safe slug.
///
/// The text is ASCII-folded and lowercased, characters outside
/// `[a-z0-9_\s-]` are dropped, runs of whitespace and hyphens collapse
/// into a single `-`, and leading or trailing `-`/`_` are stripped.
/// Text with no representable characters yields an empty slug.
pub fn slugify(value: &str) -> String {
    let cleaned: String = value
        .nfkd()
        .filter(|c| {
            c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-')
        })
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let mut slug = String::with_capacity(cleaned.len());
    let mut pending_separator = false;
    for c in cleaned.chars() {
        if c == '-' || c.is_whitespace() {
            pending_separator = !slug.is_empty();
        } else {
            if pending_separator {
                slug.push('-');
                pending_separator = false;
            }
            slug.push(c);
        }
    }

    slug.trim_matches(['-', '_']).to_string()
}

/// Final extension of `filename`, dot included (`".pdf"`).
///
/// Dotfiles (`".bashrc"`) and names with a trailing dot have no
/// extension. Only the last component of a path-like name counts.
fn file_suffix(filename: &str) -> Option<&str> {
    let base = filename.rsplit('/').next().unwrap_or(filename);
    match base.rfind('.') {
        Some(i) if i > 0 && i < base.len() - 1 => Some(&base[i..]),
        _ => None,
    }
}
