//! Storage key assembly.
//!
//! A key is the directory segments and the file name joined with `/`,
//! with `strftime`-style directives (`%Y`, `%m`, ...) expanded against
//! the current time. Segments never gain a leading or trailing slash,
//! and empty segments are skipped.

use std::fmt;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

/// Errors raised while assembling a storage key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Normalization left nothing usable of the client's file name.
    #[error("Invalid file name: {0:?}")]
    InvalidFilename(String),

    /// A `%` directive in the key is not a recognized timestamp directive.
    #[error("Invalid timestamp pattern in storage key: {0:?}")]
    InvalidPattern(String),
}

impl KeyError {
    /// Machine-readable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            KeyError::InvalidFilename(_) => "invalid_filename",
            KeyError::InvalidPattern(_) => "invalid_pattern",
        }
    }
}

/// Generate a storage key from directory segments and a file name,
/// expanding timestamp directives against the current UTC time.
///
/// ```
/// let key = shelfmark::storage_key(&["reports", "%Y"], "summary.pdf")?;
/// assert!(key.starts_with("reports/2"));
/// assert!(key.ends_with("/summary.pdf"));
/// # Ok::<(), shelfmark::KeyError>(())
/// ```
pub fn storage_key<S: AsRef<str>>(dirname: &[S], filename: &str) -> Result<String, KeyError> {
    storage_key_at(dirname, filename, &Utc::now())
}

/// Like [`storage_key`], but expands timestamp directives against `now`.
///
/// Useful for deterministic keys in tests and for honoring a configured
/// time zone (pass `Utc::now().with_timezone(&tz)`).
pub fn storage_key_at<S, Tz>(
    dirname: &[S],
    filename: &str,
    now: &DateTime<Tz>,
) -> Result<String, KeyError>
where
    S: AsRef<str>,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    expand_timestamps(&join_key(dirname, filename), now)
}

/// Expand `strftime` directives in `pattern` against `now`.
///
/// Patterns without `%` are returned unchanged. Unrecognized directives
/// are rejected as [`KeyError::InvalidPattern`] rather than silently
/// passed through (chrono's `format` would otherwise panic on display).
pub fn expand_timestamps<Tz>(pattern: &str, now: &DateTime<Tz>) -> Result<String, KeyError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if !pattern.contains('%') {
        return Ok(pattern.to_string());
    }

    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(KeyError::InvalidPattern(pattern.to_string()));
    }

    Ok(now.format_with_items(items.into_iter()).to_string())
}

/// Join non-empty segments and the file name with `/`.
fn join_key<S: AsRef<str>>(dirname: &[S], filename: &str) -> String {
    let mut key = String::new();
    for segment in dirname {
        let segment = segment.as_ref();
        if segment.is_empty() {
            continue;
        }
        key.push_str(segment);
        key.push('/');
    }
    key.push_str(filename);
    key
}
