//! On-disk license layouts

use super::{LicenseError, LicenseRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// License artifact layout, chosen by the deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseFormat {
    /// Four lines: machine id, valid-from, valid-until, signature
    #[default]
    Text,
    /// Object with `mac`, `start_date`, `end_date`, `signature`
    Json,
}

#[derive(Deserialize)]
struct JsonLicense {
    mac: String,
    start_date: String,
    end_date: String,
    signature: String,
}

impl LicenseFormat {
    /// Decode a license artifact in this layout
    pub fn parse(self, contents: &str) -> Result<LicenseRecord, LicenseError> {
        match self {
            LicenseFormat::Text => parse_text(contents),
            LicenseFormat::Json => parse_json(contents),
        }
    }

    /// Encode a record in this layout
    pub fn render(self, record: &LicenseRecord) -> String {
        match self {
            LicenseFormat::Text => format!(
                "{}\n{}\n{}\n{}\n",
                record.machine_id, record.valid_from, record.valid_until, record.signature
            ),
            LicenseFormat::Json => serde_json::json!({
                "mac": record.machine_id,
                "start_date": record.valid_from,
                "end_date": record.valid_until,
                "signature": record.signature,
            })
            .to_string(),
        }
    }
}

fn parse_text(contents: &str) -> Result<LicenseRecord, LicenseError> {
    let mut lines = contents
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim);

    let mut field = |name: &str| -> Result<String, LicenseError> {
        match lines.next() {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(LicenseError::MalformedArtifact(format!("missing {} line", name))),
        }
    };

    Ok(LicenseRecord {
        machine_id: field("machine id")?,
        valid_from: field("valid-from")?,
        valid_until: field("valid-until")?,
        signature: field("signature")?,
    })
}

fn parse_json(contents: &str) -> Result<LicenseRecord, LicenseError> {
    let license: JsonLicense = serde_json::from_str(contents.trim_start_matches('\u{feff}'))
        .map_err(|e| LicenseError::MalformedArtifact(e.to_string()))?;

    Ok(LicenseRecord {
        machine_id: license.mac.trim().to_string(),
        valid_from: license.start_date.trim().to_string(),
        valid_until: license.end_date.trim().to_string(),
        signature: license.signature.trim().to_string(),
    })
}

impl FromStr for LicenseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(LicenseFormat::Text),
            "json" => Ok(LicenseFormat::Json),
            other => Err(format!("unknown license format: {}", other)),
        }
    }
}

impl fmt::Display for LicenseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseFormat::Text => write!(f, "text"),
            LicenseFormat::Json => write!(f, "json"),
        }
    }
}
