//! Upload size validators.
//!
//! [`MaxSizeValidator`] and [`MinSizeValidator`] compare a payload's
//! byte length against a threshold. Thresholds are either fixed or
//! computed by a closure at validation time, so limits can follow
//! plan tiers or remaining quota without rebuilding the validator.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

use crate::size::format_size;

/// Size-rule violations.
///
/// The formatted message carries both the threshold and the offending
/// size; [`SizeError::code`] is the stable machine-readable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    #[error("File size must not exceed {} (current size: {})", format_size(*limit), format_size(*actual))]
    TooLarge { limit: u64, actual: u64 },

    #[error("File size must be at least {} (current size: {})", format_size(*limit), format_size(*actual))]
    TooSmall { limit: u64, actual: u64 },
}

impl SizeError {
    /// Machine-readable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SizeError::TooLarge { .. } => "max_file_size",
            SizeError::TooSmall { .. } => "min_file_size",
        }
    }

    /// The threshold that was violated, in bytes.
    pub fn limit(&self) -> u64 {
        match self {
            SizeError::TooLarge { limit, .. } | SizeError::TooSmall { limit, .. } => *limit,
        }
    }

    /// The payload size that violated it, in bytes.
    pub fn actual(&self) -> u64 {
        match self {
            SizeError::TooLarge { actual, .. } | SizeError::TooSmall { actual, .. } => *actual,
        }
    }
}

/// A byte-size threshold, fixed up front or computed when checked.
#[derive(Clone)]
pub enum SizeLimit {
    Fixed(u64),
    Computed(Arc<dyn Fn() -> u64 + Send + Sync>),
}

impl SizeLimit {
    /// Threshold recomputed by `f` on every validation.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        SizeLimit::Computed(Arc::new(f))
    }

    /// Resolve the threshold in bytes.
    pub fn bytes(&self) -> u64 {
        match self {
            SizeLimit::Fixed(bytes) => *bytes,
            SizeLimit::Computed(f) => f(),
        }
    }
}

impl From<u64> for SizeLimit {
    fn from(bytes: u64) -> Self {
        SizeLimit::Fixed(bytes)
    }
}

impl fmt::Debug for SizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeLimit::Fixed(bytes) => f.debug_tuple("Fixed").field(bytes).finish(),
            SizeLimit::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Anything with a knowable size in bytes.
pub trait FileSize {
    fn file_size(&self) -> u64;
}

impl FileSize for [u8] {
    fn file_size(&self) -> u64 {
        self.len() as u64
    }
}

impl FileSize for Vec<u8> {
    fn file_size(&self) -> u64 {
        self.len() as u64
    }
}

impl FileSize for Bytes {
    fn file_size(&self) -> u64 {
        self.len() as u64
    }
}

impl FileSize for std::fs::Metadata {
    fn file_size(&self) -> u64 {
        self.len()
    }
}

/// Rejects payloads larger than the limit. A payload exactly at the
/// limit passes.
#[derive(Debug, Clone)]
pub struct MaxSizeValidator {
    limit: SizeLimit,
}

impl MaxSizeValidator {
    pub fn new(limit_bytes: u64) -> Self {
        Self {
            limit: SizeLimit::Fixed(limit_bytes),
        }
    }

    /// Validator whose limit is recomputed by `f` on every check.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        Self {
            limit: SizeLimit::computed(f),
        }
    }

    pub fn with_limit(limit: SizeLimit) -> Self {
        Self { limit }
    }

    /// Current threshold in bytes.
    pub fn limit(&self) -> u64 {
        self.limit.bytes()
    }

    pub fn validate<P: FileSize + ?Sized>(&self, payload: &P) -> Result<(), SizeError> {
        self.validate_size(payload.file_size())
    }

    pub fn validate_size(&self, size: u64) -> Result<(), SizeError> {
        let limit = self.limit.bytes();
        if size > limit {
            return Err(SizeError::TooLarge {
                limit,
                actual: size,
            });
        }
        Ok(())
    }
}

/// Rejects payloads smaller than the limit. A payload exactly at the
/// limit passes.
#[derive(Debug, Clone)]
pub struct MinSizeValidator {
    limit: SizeLimit,
}

impl MinSizeValidator {
    pub fn new(limit_bytes: u64) -> Self {
        Self {
            limit: SizeLimit::Fixed(limit_bytes),
        }
    }

    /// Validator whose limit is recomputed by `f` on every check.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        Self {
            limit: SizeLimit::computed(f),
        }
    }

    pub fn with_limit(limit: SizeLimit) -> Self {
        Self { limit }
    }

    /// Current threshold in bytes.
    pub fn limit(&self) -> u64 {
        self.limit.bytes()
    }

    pub fn validate<P: FileSize + ?Sized>(&self, payload: &P) -> Result<(), SizeError> {
        self.validate_size(payload.file_size())
    }

    pub fn validate_size(&self, size: u64) -> Result<(), SizeError> {
        let limit = self.limit.bytes();
        if size < limit {
            return Err(SizeError::TooSmall {
                limit,
                actual: size,
            });
        }
        Ok(())
    }
}
