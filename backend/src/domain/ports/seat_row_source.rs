//! Port for bulk upload input.
//!
//! A [`SeatRowSource`] yields header-keyed rows from whatever parsed the
//! upload. Blank lines never reach the reconciliation engine.

use async_trait::async_trait;

use crate::domain::RawSeatRow;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading upload rows.
    pub enum SeatRowSourceError {
        /// The upload could not be read or parsed.
        Unreadable { message: String } => "upload could not be read: {message}",
    }
}

/// Source of raw rows for one bulk import.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeatRowSource: Send + Sync {
    /// Every non-blank row, in upload order.
    async fn read_rows(&self) -> Result<Vec<RawSeatRow>, SeatRowSourceError>;
}

/// Rows already parsed by the caller, typically from a JSON request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRowSource {
    rows: Vec<RawSeatRow>,
}

impl ParsedRowSource {
    pub fn new(rows: Vec<RawSeatRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl SeatRowSource for ParsedRowSource {
    async fn read_rows(&self) -> Result<Vec<RawSeatRow>, SeatRowSourceError> {
        Ok(self
            .rows
            .iter()
            .filter(|row| !row.is_blank())
            .cloned()
            .collect())
    }
}
