//! Machine-bound license validation
//!
//! A license artifact binds program usage to one machine and a date range.
//! Two on-disk layouts exist; both decode into the same [`LicenseRecord`]
//! and go through the same [`LicenseGate`] checks.

pub mod format;
pub mod gate;

pub use format::LicenseFormat;
pub use gate::{LicenseFailure, LicenseGate, EXIT_GRACE, EXIT_LICENSE};

use crate::platform::normalize_machine_id;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Date layout used by both license fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reasons a license fails validation, in the order they are checked
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LicenseError {
    #[error("license file not found: {0}")]
    MissingArtifact(String),

    #[error("license file is malformed: {0}")]
    MalformedArtifact(String),

    #[error("cannot determine this machine's hardware address: {0}")]
    MachineIdUnavailable(String),

    #[error("license is for another machine (licensed: {licensed}, this device: {device})")]
    MachineMismatch { licensed: String, device: String },

    #[error("invalid date in license: {0:?} (expected YYYY-MM-DD)")]
    BadDateFormat(String),

    #[error("license not active yet, valid from {0}")]
    NotYetValid(String),

    #[error("license expired on {0}")]
    Expired(String),

    #[error("license signature mismatch, the file may have been tampered with")]
    SignatureMismatch,
}

/// Decoded license artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRecord {
    pub machine_id: String,
    pub valid_from: String,
    pub valid_until: String,
    pub signature: String,
}

impl LicenseRecord {
    /// Build a correctly signed record for a machine and date range
    pub fn issue(machine_id: &str, valid_from: &str, valid_until: &str) -> Self {
        Self {
            machine_id: machine_id.to_string(),
            valid_from: valid_from.to_string(),
            valid_until: valid_until.to_string(),
            signature: compute_signature(machine_id, valid_from, valid_until),
        }
    }

    /// Whether the stored signature matches the record's fields
    pub fn signature_matches(&self) -> bool {
        let expected = compute_signature(&self.machine_id, &self.valid_from, &self.valid_until);
        self.signature.trim().eq_ignore_ascii_case(&expected)
    }
}

/// SHA-256 over `normalized_machine_id|valid_from|valid_until`, lowercase hex
pub fn compute_signature(machine_id: &str, valid_from: &str, valid_until: &str) -> String {
    let payload = format!(
        "{}|{}|{}",
        normalize_machine_id(machine_id),
        valid_from,
        valid_until
    );
    hex::encode(Sha256::digest(payload.as_bytes()))
}
