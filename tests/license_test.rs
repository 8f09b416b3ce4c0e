//! License gate tests
//!
//! Covers every failure category and the order in which checks run

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use voicebatch::license::{LicenseError, LicenseFormat, LicenseGate, LicenseRecord};
use voicebatch::platform::FixedMachineId;

const MACHINE: &str = "AA:BB:CC:DD:EE:FF";

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn gate(format: LicenseFormat, machine: &str) -> LicenseGate {
    LicenseGate::new(format, Box::new(FixedMachineId(machine.to_string())))
}

fn write_license(dir: &TempDir, format: LicenseFormat, record: &LicenseRecord) -> PathBuf {
    let path = dir.path().join("license.key");
    fs::write(&path, format.render(record)).unwrap();
    path
}

#[test]
fn test_valid_license_both_layouts() {
    let dir = TempDir::new().unwrap();
    let record = LicenseRecord::issue("aabbccddeeff", "2024-01-01", "2024-12-31");

    for format in [LicenseFormat::Text, LicenseFormat::Json] {
        let path = write_license(&dir, format, &record);
        let validated = gate(format, MACHINE)
            .validate_on(&path, day("2024-06-15"))
            .unwrap();
        assert_eq!(validated, record);
    }
}

#[test]
fn test_boundary_dates_are_inclusive() {
    let dir = TempDir::new().unwrap();
    let record = LicenseRecord::issue(MACHINE, "2024-01-01", "2024-12-31");
    let path = write_license(&dir, LicenseFormat::Text, &record);
    let gate = gate(LicenseFormat::Text, MACHINE);

    assert!(gate.validate_on(&path, day("2024-01-01")).is_ok());
    assert!(gate.validate_on(&path, day("2024-12-31")).is_ok());
}

#[test]
fn test_stored_id_with_dashes_matches() {
    let dir = TempDir::new().unwrap();
    let record = LicenseRecord::issue("aa-bb-cc-dd-ee-ff", "2024-01-01", "2024-12-31");
    let path = write_license(&dir, LicenseFormat::Json, &record);

    assert!(gate(LicenseFormat::Json, "aabbccddeeff")
        .validate_on(&path, day("2024-03-01"))
        .is_ok());
}

#[test]
fn test_missing_artifact() {
    let dir = TempDir::new().unwrap();
    let err = gate(LicenseFormat::Text, MACHINE)
        .validate_on(&dir.path().join("license.key"), day("2024-03-01"))
        .unwrap_err();
    assert!(matches!(err, LicenseError::MissingArtifact(_)));
}

#[test]
fn test_malformed_artifact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("license.key");
    fs::write(&path, "aabbccddeeff\n2024-01-01\n").unwrap();

    let err = gate(LicenseFormat::Text, MACHINE)
        .validate_on(&path, day("2024-03-01"))
        .unwrap_err();
    assert!(matches!(err, LicenseError::MalformedArtifact(_)));

    fs::write(&path, "{not json").unwrap();
    let err = gate(LicenseFormat::Json, MACHINE)
        .validate_on(&path, day("2024-03-01"))
        .unwrap_err();
    assert!(matches!(err, LicenseError::MalformedArtifact(_)));
}

#[test]
fn test_wrong_layout_is_malformed() {
    let dir = TempDir::new().unwrap();
    let record = LicenseRecord::issue(MACHINE, "2024-01-01", "2024-12-31");
    let path = write_license(&dir, LicenseFormat::Text, &record);

    let err = gate(LicenseFormat::Json, MACHINE)
        .validate_on(&path, day("2024-03-01"))
        .unwrap_err();
    assert!(matches!(err, LicenseError::MalformedArtifact(_)));
}

#[test]
fn test_machine_mismatch() {
    let dir = TempDir::new().unwrap();
    let record = LicenseRecord::issue(MACHINE, "2024-01-01", "2024-12-31");
    let path = write_license(&dir, LicenseFormat::Text, &record);

    let err = gate(LicenseFormat::Text, "11:22:33:44:55:66")
        .validate_on(&path, day("2024-03-01"))
        .unwrap_err();
    assert_eq!(
        err,
        LicenseError::MachineMismatch {
            licensed: "aabbccddeeff".into(),
            device: "112233445566".into(),
        }
    );
}

#[test]
fn test_bad_date_format() {
    let dir = TempDir::new().unwrap();
    let record = LicenseRecord::issue(MACHINE, "01/01/2024", "2024-12-31");
    let path = write_license(&dir, LicenseFormat::Text, &record);

    let err = gate(LicenseFormat::Text, MACHINE)
        .validate_on(&path, day("2024-03-01"))
        .unwrap_err();
    assert_eq!(err, LicenseError::BadDateFormat("01/01/2024".into()));
}

#[test]
fn test_unpadded_or_signed_dates_rejected() {
    for format in [LicenseFormat::Text, LicenseFormat::Json] {
        for (from, until) in [("2024-1-5", "2024-12-31"), ("2024-01-01", "+2024-12-31")] {
            let dir = TempDir::new().unwrap();
            let record = LicenseRecord::issue(MACHINE, from, until);
            let path = write_license(&dir, format, &record);

            let err = gate(format, MACHINE)
                .validate_on(&path, day("2024-03-01"))
                .unwrap_err();
            assert!(
                matches!(err, LicenseError::BadDateFormat(_)),
                "{} {}..{}: {:?}",
                format,
                from,
                until,
                err
            );
        }
    }
}

#[test]
fn test_not_yet_valid() {
    let dir = TempDir::new().unwrap();
    let record = LicenseRecord::issue(MACHINE, "2030-01-01", "2030-12-31");
    let path = write_license(&dir, LicenseFormat::Text, &record);

    let err = gate(LicenseFormat::Text, MACHINE)
        .validate_on(&path, day("2024-03-01"))
        .unwrap_err();
    assert_eq!(err, LicenseError::NotYetValid("2030-01-01".into()));
}

#[test]
fn test_expired() {
    let dir = TempDir::new().unwrap();
    let record = LicenseRecord::issue(MACHINE, "2020-01-01", "2020-01-02");
    let path = write_license(&dir, LicenseFormat::Text, &record);

    let err = gate(LicenseFormat::Text, MACHINE)
        .validate_on(&path, day("2020-01-03"))
        .unwrap_err();
    assert_eq!(err, LicenseError::Expired("2020-01-02".into()));

    // Against the real clock as well
    let err = gate(LicenseFormat::Text, MACHINE).validate(&path).unwrap_err();
    assert_eq!(err, LicenseError::Expired("2020-01-02".into()));
}

#[test]
fn test_signature_mismatch() {
    let dir = TempDir::new().unwrap();
    let mut record = LicenseRecord::issue(MACHINE, "2024-01-01", "2024-06-30");
    record.valid_until = "2024-12-31".to_string();
    let path = write_license(&dir, LicenseFormat::Json, &record);

    let err = gate(LicenseFormat::Json, MACHINE)
        .validate_on(&path, day("2024-03-01"))
        .unwrap_err();
    assert_eq!(err, LicenseError::SignatureMismatch);
}

#[test]
fn test_machine_checked_before_dates() {
    let dir = TempDir::new().unwrap();
    let record = LicenseRecord::issue(MACHINE, "2020-01-01", "2020-01-02");
    let path = write_license(&dir, LicenseFormat::Text, &record);

    let err = gate(LicenseFormat::Text, "11:22:33:44:55:66")
        .validate_on(&path, day("2024-03-01"))
        .unwrap_err();
    assert!(matches!(err, LicenseError::MachineMismatch { .. }));
}

#[test]
fn test_dates_checked_before_signature() {
    let dir = TempDir::new().unwrap();
    let mut record = LicenseRecord::issue(MACHINE, "2020-01-01", "2020-01-02");
    record.signature = "0".repeat(64);
    let path = write_license(&dir, LicenseFormat::Text, &record);

    let err = gate(LicenseFormat::Text, MACHINE)
        .validate_on(&path, day("2024-03-01"))
        .unwrap_err();
    assert!(matches!(err, LicenseError::Expired(_)));
}
