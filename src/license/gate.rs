//! Startup license check

use super::{LicenseError, LicenseFormat, LicenseRecord, DATE_FORMAT};
use crate::platform::{normalize_machine_id, MachineIdentity};
use chrono::{Local, NaiveDate};
use log::{debug, info};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Pause between reporting a license failure and exiting
pub const EXIT_GRACE: Duration = Duration::from_secs(20);

/// Process exit status after a license failure
pub const EXIT_LICENSE: i32 = 2;

/// What the program tells the user before it stops on a bad license
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseFailure {
    pub error: LicenseError,
    pub support_contact: String,
    pub exit_code: i32,
    pub grace: Duration,
}

impl LicenseFailure {
    pub fn new(error: LicenseError, support_contact: &str) -> Self {
        Self {
            error,
            support_contact: support_contact.to_string(),
            exit_code: EXIT_LICENSE,
            grace: EXIT_GRACE,
        }
    }
}

impl fmt::Display for LicenseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.error)?;
        writeln!(
            f,
            "\nThere is a problem with your license. Please contact: {}",
            self.support_contact
        )?;
        write!(
            f,
            "The program will exit in {} seconds...",
            self.grace.as_secs()
        )
    }
}

/// Validates a license artifact against this machine and today's date
pub struct LicenseGate {
    format: LicenseFormat,
    identity: Box<dyn MachineIdentity>,
}

impl LicenseGate {
    pub fn new(format: LicenseFormat, identity: Box<dyn MachineIdentity>) -> Self {
        Self { format, identity }
    }

    /// Validate against the local calendar date
    pub fn validate(&self, artifact_path: &Path) -> Result<LicenseRecord, LicenseError> {
        self.validate_on(artifact_path, Local::now().date_naive())
    }

    /// Validate at startup, turning a failure into the exit notice
    pub fn enforce(
        &self,
        artifact_path: &Path,
        support_contact: &str,
    ) -> Result<LicenseRecord, LicenseFailure> {
        self.validate(artifact_path)
            .map_err(|e| LicenseFailure::new(e, support_contact))
    }

    /// Validate as if today were `today`
    ///
    /// Checks run in a fixed order: presence, layout, machine, date syntax,
    /// date range, signature. The first failure wins.
    pub fn validate_on(
        &self,
        artifact_path: &Path,
        today: NaiveDate,
    ) -> Result<LicenseRecord, LicenseError> {
        debug!(
            "Validating {} license at {}",
            self.format,
            artifact_path.display()
        );

        if !artifact_path.exists() {
            return Err(LicenseError::MissingArtifact(
                artifact_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(artifact_path)
            .map_err(|e| LicenseError::MalformedArtifact(e.to_string()))?;
        let record = self.format.parse(&contents)?;

        let licensed = normalize_machine_id(&record.machine_id);
        let device = normalize_machine_id(&self.identity.machine_id()?);
        if licensed != device {
            return Err(LicenseError::MachineMismatch { licensed, device });
        }

        let valid_from = parse_date(&record.valid_from)?;
        let valid_until = parse_date(&record.valid_until)?;

        if today < valid_from {
            return Err(LicenseError::NotYetValid(record.valid_from.clone()));
        }
        if today > valid_until {
            return Err(LicenseError::Expired(record.valid_until.clone()));
        }

        if !record.signature_matches() {
            return Err(LicenseError::SignatureMismatch);
        }

        info!(
            "License valid from {} to {}",
            record.valid_from, record.valid_until
        );
        Ok(record)
    }
}

/// Parse a strict `YYYY-MM-DD` date
///
/// chrono alone accepts unpadded fields and a leading sign, so the shape is
/// checked first.
fn parse_date(value: &str) -> Result<NaiveDate, LicenseError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(LicenseError::BadDateFormat(value.to_string()));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| LicenseError::BadDateFormat(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::FixedMachineId;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("01/02/2024").is_err());
        assert!(parse_date("").is_err());
        assert!(parse_date("2024-1-5").is_err());
        assert!(parse_date("2024-01-5").is_err());
        assert!(parse_date("+2024-01-01").is_err());
        assert!(parse_date(" 2024-01-01").is_err());
    }

    #[test]
    fn test_missing_artifact() {
        let gate = LicenseGate::new(
            LicenseFormat::Text,
            Box::new(FixedMachineId("aabbccddeeff".into())),
        );
        let err = gate
            .validate(Path::new("/nonexistent/voicebatch/license.key"))
            .unwrap_err();
        assert!(matches!(err, LicenseError::MissingArtifact(_)));
    }

    #[test]
    fn test_enforce_failure_notice() {
        let gate = LicenseGate::new(
            LicenseFormat::Text,
            Box::new(FixedMachineId("aabbccddeeff".into())),
        );
        let failure = gate
            .enforce(
                Path::new("/nonexistent/voicebatch/license.key"),
                "support@example.com",
            )
            .unwrap_err();

        assert_eq!(failure.exit_code, 2);
        assert_eq!(failure.grace, Duration::from_secs(20));
        assert!(matches!(failure.error, LicenseError::MissingArtifact(_)));

        let notice = failure.to_string();
        assert!(notice.starts_with("license file not found"));
        assert!(notice.contains("Please contact: support@example.com"));
        assert!(notice.ends_with("exit in 20 seconds..."));
    }
}
