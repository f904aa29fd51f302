//! Shelfmark
//!
//! Storage-key generation and size validation for file uploads. A
//! [`KeyTemplate`] (or one of its record-aware variants) maps a client
//! file name to the key the payload is stored under, and the size
//! validators enforce configured byte-length bounds before anything is
//! written. [`UploadPolicy`] ties both together from the environment.

pub mod config;
pub mod filename;
pub mod keys;
pub mod record;
pub mod size;
pub mod template;
pub mod validators;

// Re-export commonly used types
pub use config::UploadPolicy;
pub use filename::{normalize_filename, slugify, uuid_filename};
pub use keys::{expand_timestamps, storage_key, storage_key_at, KeyError};
pub use record::{RecordAttrs, RecordMeta};
pub use size::{format_size, GB, KB, MB, PB, TB};
pub use template::{
    key_fn, AttrKeyTemplate, FileNaming, KeyFn, KeyGenerator, KeyTemplate, ModelKeyTemplate,
};
pub use validators::{FileSize, MaxSizeValidator, MinSizeValidator, SizeError, SizeLimit};
