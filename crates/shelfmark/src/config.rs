//! Upload policy configuration.
//!
//! [`UploadPolicy`] bundles the key-template settings and size rules a
//! deployment applies to every upload, read from the environment in one
//! place so handlers and background jobs agree on them.

use std::env;

use chrono_tz::Tz;

use crate::size::MB;
use crate::template::{FileNaming, KeyTemplate};
use crate::validators::{FileSize, MaxSizeValidator, MinSizeValidator, SizeError};

/// Deployment-wide upload rules.
#[derive(Debug, Clone, Default)]
pub struct UploadPolicy {
    /// `/`-separated key prefix, may carry timestamp directives.
    pub prefix: String,
    /// How stored files are named.
    pub naming: FileNaming,
    /// Time zone for timestamp directives; UTC when unset.
    pub timezone: Option<Tz>,
    /// Upper size bound in bytes; `None` means unlimited.
    pub max_size: Option<u64>,
    /// Lower size bound in bytes; `None` means no minimum.
    pub min_size: Option<u64>,
}

impl UploadPolicy {
    /// Read the policy from the environment.
    ///
    /// * `UPLOAD_PATH_PREFIX` - key prefix (default: none)
    /// * `UPLOAD_FILE_NAMING` - `normalized` or `uuid` (default: `normalized`)
    /// * `UPLOAD_TIMEZONE` - IANA time zone name (default: UTC)
    /// * `UPLOAD_MAX_SIZE_MB` - upper bound in MB, `0` disables (default: unlimited)
    /// * `UPLOAD_MIN_SIZE_BYTES` - lower bound in bytes, `0` disables (default: none)
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let prefix = env::var("UPLOAD_PATH_PREFIX").unwrap_or_default();

        let naming = match env::var("UPLOAD_FILE_NAMING") {
            Ok(value) => match value.trim().to_lowercase().as_str() {
                "normalized" => FileNaming::Normalized,
                "uuid" => FileNaming::Uuid,
                other => {
                    return Err(anyhow::anyhow!(
                        "UPLOAD_FILE_NAMING must be 'normalized' or 'uuid', got {other:?}"
                    ))
                }
            },
            Err(_) => FileNaming::default(),
        };

        let timezone = match env::var("UPLOAD_TIMEZONE") {
            Ok(name) => Some(
                name.trim()
                    .parse::<Tz>()
                    .map_err(|e| anyhow::anyhow!("UPLOAD_TIMEZONE is not a valid time zone: {e}"))?,
            ),
            Err(_) => None,
        };

        let max_size = match read_limit_var("UPLOAD_MAX_SIZE_MB")? {
            Some(mb) => Some(
                mb.checked_mul(MB)
                    .ok_or_else(|| anyhow::anyhow!("UPLOAD_MAX_SIZE_MB is too large, got {mb}"))?,
            ),
            None => None,
        };
        let min_size = read_limit_var("UPLOAD_MIN_SIZE_BYTES")?;

        Ok(Self {
            prefix,
            naming,
            timezone,
            max_size,
            min_size,
        })
    }

    /// Key template configured by this policy.
    pub fn template(&self) -> KeyTemplate {
        let mut template = KeyTemplate::new(&self.prefix).naming(self.naming);
        if let Some(tz) = self.timezone {
            template = template.timezone(tz);
        }
        template
    }

    pub fn max_validator(&self) -> Option<MaxSizeValidator> {
        self.max_size.map(MaxSizeValidator::new)
    }

    pub fn min_validator(&self) -> Option<MinSizeValidator> {
        self.min_size.map(MinSizeValidator::new)
    }

    /// Check `size` against the configured bounds. The upper bound is
    /// checked first.
    pub fn validate_size(&self, size: u64) -> Result<(), SizeError> {
        if let Some(validator) = self.max_validator() {
            if let Err(err) = validator.validate_size(size) {
                self.log_rejection(&err, size);
                return Err(err);
            }
        }
        if let Some(validator) = self.min_validator() {
            if let Err(err) = validator.validate_size(size) {
                self.log_rejection(&err, size);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Check a payload's byte length against the configured bounds.
    pub fn validate<P: FileSize + ?Sized>(&self, payload: &P) -> Result<(), SizeError> {
        self.validate_size(payload.file_size())
    }

    fn log_rejection(&self, err: &SizeError, size: u64) {
        // Debug level, these are expected validation failures.
        tracing::debug!(
            size,
            limit = err.limit(),
            code = err.code(),
            "Upload rejected by size policy"
        );
    }
}

fn read_limit_var(name: &str) -> Result<Option<u64>, anyhow::Error> {
    match env::var(name) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("{name} must be a whole number, got {raw:?}"))?;
            Ok((value > 0).then_some(value))
        }
        Err(_) => Ok(None),
    }
}
