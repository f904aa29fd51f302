//! Traits describing the record an upload is attached to.
//!
//! Key templates only need two things from the owning record: named
//! attribute values for interpolation, and type metadata for grouping.
//! Records stay decoupled from any particular ORM or storage layer.

/// Access to a record's attribute values by name.
pub trait RecordAttrs {
    /// Value of the attribute `name`, or `None` when the record has no
    /// such attribute or the attribute is unset. Unset attributes are
    /// skipped during key interpolation, not treated as errors.
    fn attr(&self, name: &str) -> Option<String>;
}

/// Type metadata for a record, used to group keys by record type.
pub trait RecordMeta {
    /// Collection the record type belongs to (e.g. an application or
    /// module name).
    fn namespace(&self) -> &str;

    /// Name of the record type itself.
    fn type_name(&self) -> &str;

    /// The two metadata path segments, in the order they appear in a
    /// storage key.
    fn meta_segments(&self) -> [&str; 2] {
        [self.namespace(), self.type_name()]
    }
}
