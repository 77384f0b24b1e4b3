// File I/O: listing dataset loading and the submission log

pub mod csv;
pub mod responses;

pub use crate::csv::{load_dataset, parse_dataset, ColumnMapping, LoadError};
pub use crate::responses::{LogError, ResponseLog, SubmissionRecord, TIMESTAMP_FORMAT};
