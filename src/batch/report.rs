//! Per-record outcomes and the batch summary

use std::fmt;
use std::path::PathBuf;

/// What happened to one input record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Audio written (and message text, in AI mode)
    Success {
        email: String,
        message: String,
        audio_path: PathBuf,
        text_path: Option<PathBuf>,
    },
    /// Name or email missing; no provider was called
    SkippedIncomplete { row: usize },
    /// The generative-text provider failed
    MessageGenerationFailed { email: String, error: String },
    /// The message exists but speech synthesis failed
    AudioGenerationFailed {
        email: String,
        message: String,
        error: String,
    },
    /// Writing an output file failed
    PersistenceFailed {
        email: String,
        message: String,
        error: String,
    },
}

impl RecordOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RecordOutcome::Success { .. })
    }

    /// Message text, when one was produced
    pub fn message(&self) -> Option<&str> {
        match self {
            RecordOutcome::Success { message, .. }
            | RecordOutcome::AudioGenerationFailed { message, .. }
            | RecordOutcome::PersistenceFailed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Aggregate result of one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Input rows, complete or not
    pub total: usize,
    /// Rows that reached a provider call
    pub attempted: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub message_failures: usize,
    pub audio_failures: usize,
    pub persistence_failures: usize,
    /// One entry per input row, in input order
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            outcomes: Vec::with_capacity(total),
            ..Self::default()
        }
    }

    /// Append an outcome and update the counters
    pub fn record(&mut self, outcome: RecordOutcome) {
        match &outcome {
            RecordOutcome::SkippedIncomplete { .. } => self.skipped += 1,
            RecordOutcome::Success { .. } => {
                self.attempted += 1;
                self.succeeded += 1;
            }
            RecordOutcome::MessageGenerationFailed { .. } => {
                self.attempted += 1;
                self.message_failures += 1;
            }
            RecordOutcome::AudioGenerationFailed { .. } => {
                self.attempted += 1;
                self.audio_failures += 1;
            }
            RecordOutcome::PersistenceFailed { .. } => {
                self.attempted += 1;
                self.persistence_failures += 1;
            }
        }
        self.outcomes.push(outcome);
    }

    pub fn failures(&self) -> usize {
        self.message_failures + self.audio_failures + self.persistence_failures
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows: {} attempted, {} succeeded, {} skipped, {} message failures, \
             {} audio failures, {} write failures",
            self.total,
            self.attempted,
            self.succeeded,
            self.skipped,
            self.message_failures,
            self.audio_failures,
            self.persistence_failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut report = BatchReport::new(4);
        report.record(RecordOutcome::SkippedIncomplete { row: 1 });
        report.record(RecordOutcome::MessageGenerationFailed {
            email: "a@x.com".into(),
            error: "boom".into(),
        });
        report.record(RecordOutcome::AudioGenerationFailed {
            email: "b@x.com".into(),
            message: "Hi".into(),
            error: "boom".into(),
        });
        report.record(RecordOutcome::Success {
            email: "c@x.com".into(),
            message: "Hi".into(),
            audio_path: PathBuf::from("c_x_com.mp3"),
            text_path: None,
        });

        assert_eq!(report.total, 4);
        assert_eq!(report.attempted, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failures(), 2);
        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.outcomes[2].message(), Some("Hi"));
        assert_eq!(report.outcomes[1].message(), None);
    }

    #[test]
    fn test_display() {
        let report = BatchReport::new(0);
        assert_eq!(
            report.to_string(),
            "0 rows: 0 attempted, 0 succeeded, 0 skipped, 0 message failures, \
             0 audio failures, 0 write failures"
        );
    }
}
