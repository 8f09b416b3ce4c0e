//! Batch processing of a contact list

pub mod input;
pub mod messenger;
pub mod report;

pub use input::{parse_records, read_records, BatchRecord};
pub use messenger::{BatchMessenger, MessageMode, OutputLayout};
pub use report::{BatchReport, RecordOutcome};
