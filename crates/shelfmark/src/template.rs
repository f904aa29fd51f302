//! Reusable storage-key templates.
//!
//! A template turns `(record, client file name)` into the final storage
//! key. [`KeyTemplate`] joins a fixed prefix with the normalized file
//! name; [`AttrKeyTemplate`] adds slugified record attributes between
//! the two; [`ModelKeyTemplate`] additionally groups keys under the
//! record type's metadata. Prefix segments may carry `strftime`
//! directives, expanded when the key is generated.

use chrono::Utc;
use chrono_tz::Tz;

use crate::filename::{normalize_filename, slugify, uuid_filename};
use crate::keys::{self, KeyError};
use crate::record::{RecordAttrs, RecordMeta};

/// How the stored file is named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileNaming {
    /// Normalized form of the client's file name.
    #[default]
    Normalized,
    /// Random 32-digit hexadecimal name, keeping the extension.
    Uuid,
}

impl FileNaming {
    /// Produce the stored file name for a client-supplied one.
    pub fn apply(&self, filename: &str) -> Result<String, KeyError> {
        match self {
            FileNaming::Normalized => normalize_filename(filename),
            FileNaming::Uuid => normalize_filename(&uuid_filename(filename)),
        }
    }
}

/// Anything that can compute a storage key for a record's upload.
pub trait KeyGenerator<R: ?Sized> {
    /// Compute the storage key for `filename` uploaded to `record`.
    fn storage_key(&self, record: &R, filename: &str) -> Result<String, KeyError>;
}

/// Adapter turning a plain function into a [`KeyGenerator`].
///
/// Handy when a one-off key scheme does not warrant a template:
///
/// ```
/// use shelfmark::{key_fn, KeyGenerator};
///
/// let generator = key_fn(|tag: &str, filename: &str| -> Result<String, shelfmark::KeyError> {
///     Ok(format!("{tag}/{filename}"))
/// });
/// assert_eq!(generator.storage_key("logs", "a.txt").unwrap(), "logs/a.txt");
/// ```
pub fn key_fn<F>(f: F) -> KeyFn<F> {
    KeyFn(f)
}

/// See [`key_fn`].
#[derive(Debug, Clone, Copy)]
pub struct KeyFn<F>(F);

impl<R: ?Sized, F> KeyGenerator<R> for KeyFn<F>
where
    F: Fn(&R, &str) -> Result<String, KeyError>,
{
    fn storage_key(&self, record: &R, filename: &str) -> Result<String, KeyError> {
        (self.0)(record, filename)
    }
}

/// Storage-key template with a fixed directory prefix.
///
/// The prefix is given as a `/`-separated string and kept as segments;
/// the generated key is `prefix.../filename`. The record is ignored,
/// which makes this template usable with any record type.
#[derive(Debug, Clone, Default)]
pub struct KeyTemplate {
    prefix: Vec<String>,
    naming: FileNaming,
    timezone: Option<Tz>,
}

impl KeyTemplate {
    /// Template from a `/`-separated prefix. Empty segments (and an
    /// empty prefix) are dropped.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: split_prefix(prefix),
            ..Self::default()
        }
    }

    /// Template from already-split prefix segments.
    pub fn from_segments<I>(segments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            prefix: segments.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set how stored files are named.
    pub fn naming(mut self, naming: FileNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Name stored files with random hexadecimal identifiers.
    pub fn uuid_names(self) -> Self {
        self.naming(FileNaming::Uuid)
    }

    /// Expand timestamp directives in this time zone instead of UTC.
    pub fn timezone(mut self, tz: Tz) -> Self {
        self.timezone = Some(tz);
        self
    }

    /// The directory segments of the prefix.
    pub fn dirname(&self) -> &[String] {
        &self.prefix
    }

    fn finish(&self, dirname: &[String], filename: &str) -> Result<String, KeyError> {
        let filename = self.naming.apply(filename)?;
        match self.timezone {
            Some(tz) => keys::storage_key_at(dirname, &filename, &Utc::now().with_timezone(&tz)),
            None => keys::storage_key(dirname, &filename),
        }
    }
}

impl<R: ?Sized> KeyGenerator<R> for KeyTemplate {
    fn storage_key(&self, _record: &R, filename: &str) -> Result<String, KeyError> {
        self.finish(&self.prefix, filename)
    }
}

/// Storage-key template that interpolates record attributes.
///
/// Attribute values are slugified and inserted between the prefix and
/// the file name, in the order the attribute names were given. Unset
/// attributes and attributes that slugify to nothing are skipped.
#[derive(Debug, Clone)]
pub struct AttrKeyTemplate {
    template: KeyTemplate,
    attrs: Vec<String>,
}

impl AttrKeyTemplate {
    pub fn new<I>(prefix: &str, attrs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::from_template(KeyTemplate::new(prefix), attrs)
    }

    /// Attach attribute interpolation to an existing template.
    pub fn from_template<I>(template: KeyTemplate, attrs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            template,
            attrs: attrs.into_iter().map(Into::into).collect(),
        }
    }

    /// Set how stored files are named.
    pub fn naming(mut self, naming: FileNaming) -> Self {
        self.template = self.template.naming(naming);
        self
    }

    /// Name stored files with random hexadecimal identifiers.
    pub fn uuid_names(self) -> Self {
        self.naming(FileNaming::Uuid)
    }

    /// Expand timestamp directives in this time zone instead of UTC.
    pub fn timezone(mut self, tz: Tz) -> Self {
        self.template = self.template.timezone(tz);
        self
    }

    /// The attribute names interpolated into keys.
    pub fn attrs(&self) -> &[String] {
        &self.attrs
    }

    /// Slugified segments for `record`'s attribute values.
    pub fn attr_segments<R: RecordAttrs + ?Sized>(&self, record: &R) -> Vec<String> {
        self.attrs
            .iter()
            .filter_map(|name| record.attr(name))
            .map(|value| slugify(&value))
            .filter(|slug| !slug.is_empty())
            .collect()
    }
}

impl<R: RecordAttrs + ?Sized> KeyGenerator<R> for AttrKeyTemplate {
    fn storage_key(&self, record: &R, filename: &str) -> Result<String, KeyError> {
        let mut dirname = self.template.prefix.clone();
        dirname.extend(self.attr_segments(record));
        self.template.finish(&dirname, filename)
    }
}

/// Storage-key template that groups keys by record type.
///
/// Keys take the form `prefix/namespace/type_name/attrs.../filename`,
/// with the two metadata segments read from the record's
/// [`RecordMeta`] implementation.
#[derive(Debug, Clone)]
pub struct ModelKeyTemplate {
    inner: AttrKeyTemplate,
}

impl ModelKeyTemplate {
    pub fn new(prefix: &str) -> Self {
        Self {
            inner: AttrKeyTemplate::new(prefix, std::iter::empty::<&str>()),
        }
    }

    /// Interpolate these record attributes after the metadata segments.
    pub fn attrs<I>(mut self, attrs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.inner.attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    /// Set how stored files are named.
    pub fn naming(mut self, naming: FileNaming) -> Self {
        self.inner = self.inner.naming(naming);
        self
    }

    /// Name stored files with random hexadecimal identifiers.
    pub fn uuid_names(self) -> Self {
        self.naming(FileNaming::Uuid)
    }

    /// Expand timestamp directives in this time zone instead of UTC.
    pub fn timezone(mut self, tz: Tz) -> Self {
        self.inner = self.inner.timezone(tz);
        self
    }
}

impl<R: RecordAttrs + RecordMeta + ?Sized> KeyGenerator<R> for ModelKeyTemplate {
    fn storage_key(&self, record: &R, filename: &str) -> Result<String, KeyError> {
        let mut dirname = self.inner.template.prefix.clone();
        let [namespace, type_name] = record.meta_segments();
        dirname.push(namespace.to_string());
        dirname.push(type_name.to_string());
        dirname.extend(self.inner.attr_segments(record));
        self.inner.template.finish(&dirname, filename)
    }
}

fn split_prefix(prefix: &str) -> Vec<String> {
    prefix
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Member {
        username: String,
        display_name: Option<String>,
    }

    impl RecordAttrs for Member {
        fn attr(&self, name: &str) -> Option<String> {
            match name {
                "username" => Some(self.username.clone()),
                "display_name" => self.display_name.clone(),
                _ => None,
            }
        }
    }

    impl RecordMeta for Member {
        fn namespace(&self) -> &str {
            "accounts"
        }

        fn type_name(&self) -> &str {
            "member"
        }
    }

    fn member() -> Member {
        Member {
            username: "Jo Doe".to_string(),
            display_name: Some("Jo's Files".to_string()),
        }
    }

    #[test]
    fn test_prefix_is_split_on_slashes() {
        assert_eq!(KeyTemplate::new("a/b/c").dirname(), ["a", "b", "c"]);
        assert_eq!(KeyTemplate::new("a/b/").dirname(), ["a", "b"]);
        assert!(KeyTemplate::new("").dirname().is_empty());
        assert!(KeyTemplate::default().dirname().is_empty());
    }

    #[test]
    fn test_template_normalizes_filename() {
        let template = KeyTemplate::new("folder/subfolder");
        let key = template.storage_key(&(), "Tést Report.PdF").unwrap();
        assert_eq!(key, "folder/subfolder/test_report.pdf");
    }

    #[test]
    fn test_template_from_segments() {
        let template = KeyTemplate::from_segments(["folder", "subfolder"]);
        let key = template.storage_key(&(), "test.pdf").unwrap();
        assert_eq!(key, "folder/subfolder/test.pdf");
    }

    #[test]
    fn test_template_expands_timestamps() {
        let template = KeyTemplate::new("folder/%Y");
        let key = template.storage_key(&(), "test.pdf").unwrap();
        let year = Utc::now().format("%Y").to_string();
        assert_eq!(key, format!("folder/{year}/test.pdf"));
    }

    #[test]
    fn test_template_uuid_names() {
        let template = KeyTemplate::new("a_folder").uuid_names();
        let key = template.storage_key(&(), "photo.PNG").unwrap();
        let name = key.strip_prefix("a_folder/").unwrap();
        let stem = name.strip_suffix(".png").unwrap();
        assert_eq!(stem.len(), 32);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_template_timezone_offsets_directives() {
        // Tokyo has a fixed +09:00 offset, so %z is deterministic.
        let template = KeyTemplate::new("%z").timezone(chrono_tz::Asia::Tokyo);
        let key = template.storage_key(&(), "f.txt").unwrap();
        assert_eq!(key, "+0900/f.txt");
    }

    #[test]
    fn test_template_rejects_invalid_filename() {
        let err = KeyTemplate::new("a").storage_key(&(), "..").unwrap_err();
        assert_eq!(err.code(), "invalid_filename");
    }

    #[test]
    fn test_key_fn_closure_generator() {
        let generator = key_fn(|tag: &str, filename: &str| -> Result<String, KeyError> {
            Ok(format!("{tag}/{filename}"))
        });
        assert_eq!(generator.storage_key("logs", "a.txt").unwrap(), "logs/a.txt");
    }

    #[test]
    fn test_attr_template_interpolates_attributes() {
        let template = AttrKeyTemplate::new("a/b", ["username", "display_name"]);
        let key = template.storage_key(&member(), "Tést.PdF").unwrap();
        assert_eq!(key, "a/b/jo-doe/jos-files/test.pdf");
    }

    #[test]
    fn test_attr_template_skips_unset_attributes() {
        let template = AttrKeyTemplate::new("a/b", ["username", "display_name"]);
        let record = Member {
            username: "Jo Doe".to_string(),
            display_name: None,
        };
        let key = template.storage_key(&record, "test.pdf").unwrap();
        assert_eq!(key, "a/b/jo-doe/test.pdf");
    }

    #[test]
    fn test_attr_template_skips_unknown_attributes() {
        let template = AttrKeyTemplate::new("a", ["no_such_attr"]);
        let key = template.storage_key(&member(), "test.pdf").unwrap();
        assert_eq!(key, "a/test.pdf");
    }

    #[test]
    fn test_attr_template_skips_empty_slug_values() {
        // The value is set but nothing survives slugification.
        let template = AttrKeyTemplate::new("a", ["username", "display_name"]);
        let record = Member {
            username: "Jo Doe".to_string(),
            display_name: Some("日本語".to_string()),
        };
        let key = template.storage_key(&record, "test.pdf").unwrap();
        assert_eq!(key, "a/jo-doe/test.pdf");
    }

    #[test]
    fn test_attr_template_accessors() {
        let template = AttrKeyTemplate::new("a", ["username"]);
        assert_eq!(template.attrs(), ["username"]);
        assert_eq!(template.attr_segments(&member()), ["jo-doe"]);
    }

    #[test]
    fn test_model_template_groups_by_record_type() {
        let template = ModelKeyTemplate::new("prefixfolder").attrs(["username", "display_name"]);
        let key = template.storage_key(&member(), "test.pdf").unwrap();
        assert_eq!(key, "prefixfolder/accounts/member/jo-doe/jos-files/test.pdf");
    }

    #[test]
    fn test_model_template_without_attributes() {
        let template = ModelKeyTemplate::new("uploads");
        let key = template.storage_key(&member(), "test.pdf").unwrap();
        assert_eq!(key, "uploads/accounts/member/test.pdf");
    }

    #[test]
    fn test_file_naming_default_is_normalized() {
        assert_eq!(FileNaming::default(), FileNaming::Normalized);
        assert_eq!(FileNaming::Normalized.apply("A B.txt").unwrap(), "a_b.txt");
    }
}
