//! Bulk reconciliation of uploaded seat rows.
//!
//! Upload rows are collapsed by normalised roll number (the last row for a
//! key wins) and forwarded to the store as a single upsert. The engine never
//! validates cells: rows missing fields or carrying bad integers go through
//! untouched and the store decides, rejecting the whole batch if it must.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::ports::SeatRowSource;
use crate::domain::{Error, RawSeatRow, RollNumber, SeatRecordStore};

/// A row dropped because a later row in the same upload had the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupersededRow {
    /// 1-based position of the dropped row in the upload.
    pub line: usize,
    /// 1-based position of the row that replaced it.
    pub by_line: usize,
    pub roll_number: RollNumber,
}

/// An upload with duplicate keys collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapsedBatch {
    /// Rows to submit, each with its roll number cell normalised. A key's
    /// row sits where the key first appeared and carries the last row's cells.
    pub rows: Vec<RawSeatRow>,
    /// Source line of each submitted row.
    pub lines: Vec<usize>,
    pub superseded: Vec<SupersededRow>,
}

/// Collapse `rows` so each roll number appears once, last row winning.
///
/// Rows with no usable key are kept as they are; the store rejects them.
pub fn collapse_batch(rows: &[RawSeatRow]) -> CollapsedBatch {
    let mut batch = CollapsedBatch::default();
    let mut slots: HashMap<RollNumber, usize> = HashMap::new();

    for (index, row) in rows.iter().enumerate() {
        let line = index + 1;
        let Some(key) = row.key() else {
            batch.rows.push(row.clone());
            batch.lines.push(line);
            continue;
        };
        match slots.get(&key) {
            Some(&slot) => {
                if let (Some(kept_row), Some(kept_line)) =
                    (batch.rows.get_mut(slot), batch.lines.get_mut(slot))
                {
                    batch.superseded.push(SupersededRow {
                        line: *kept_line,
                        by_line: line,
                        roll_number: key,
                    });
                    *kept_row = row.with_normalised_key();
                    *kept_line = line;
                }
            }
            None => {
                slots.insert(key, batch.rows.len());
                batch.rows.push(row.with_normalised_key());
                batch.lines.push(line);
            }
        }
    }
    batch
}

/// What an import would do with one upload row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "disposition", rename_all = "snake_case")]
pub enum RowDisposition {
    Insert {
        line: usize,
        #[serde(rename = "rollNumber")]
        roll_number: RollNumber,
    },
    Replace {
        line: usize,
        #[serde(rename = "rollNumber")]
        roll_number: RollNumber,
    },
    SupersededInBatch {
        line: usize,
        #[serde(rename = "byLine")]
        by_line: usize,
        #[serde(rename = "rollNumber")]
        roll_number: RollNumber,
    },
    MissingKey {
        line: usize,
    },
}

impl RowDisposition {
    fn line(&self) -> usize {
        match self {
            Self::Insert { line, .. }
            | Self::Replace { line, .. }
            | Self::SupersededInBatch { line, .. }
            | Self::MissingKey { line } => *line,
        }
    }
}

/// Itemised preview of an upload against the keys already stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPlan {
    pub rows: Vec<RowDisposition>,
}

impl ImportPlan {
    pub fn inserts(&self) -> usize {
        self.count(|d| matches!(d, RowDisposition::Insert { .. }))
    }

    pub fn replacements(&self) -> usize {
        self.count(|d| matches!(d, RowDisposition::Replace { .. }))
    }

    fn count(&self, pred: impl Fn(&RowDisposition) -> bool) -> usize {
        self.rows.iter().filter(|d| pred(d)).count()
    }
}

/// Classify every upload row against `existing` keys, in upload order.
pub fn plan(rows: &[RawSeatRow], existing: &HashSet<RollNumber>) -> ImportPlan {
    let batch = collapse_batch(rows);
    let mut dispositions: Vec<RowDisposition> = batch
        .superseded
        .iter()
        .map(|s| RowDisposition::SupersededInBatch {
            line: s.line,
            by_line: s.by_line,
            roll_number: s.roll_number.clone(),
        })
        .collect();
    for (row, &line) in batch.rows.iter().zip(&batch.lines) {
        dispositions.push(match row.key() {
            None => RowDisposition::MissingKey { line },
            Some(roll_number) if existing.contains(&roll_number) => {
                RowDisposition::Replace { line, roll_number }
            }
            Some(roll_number) => RowDisposition::Insert { line, roll_number },
        });
    }
    dispositions.sort_by_key(RowDisposition::line);
    ImportPlan { rows: dispositions }
}

/// Aggregate result of a committed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportReport {
    pub received: usize,
    pub submitted: usize,
    pub rows_written: usize,
    pub superseded: Vec<SupersededRow>,
}

/// Applies uploads to the seat record store.
#[derive(Clone)]
pub struct BulkReconciliationEngine {
    store: SeatRecordStore,
}

impl BulkReconciliationEngine {
    pub fn new(store: SeatRecordStore) -> Self {
        Self { store }
    }

    /// Collapse `rows` and submit them as one all-or-nothing upsert.
    pub async fn reconcile(&self, rows: &[RawSeatRow]) -> Result<BulkImportReport, Error> {
        let batch = collapse_batch(rows);
        if !batch.superseded.is_empty() {
            warn!(
                superseded = batch.superseded.len(),
                "upload repeats roll numbers; later rows win"
            );
        }
        let rows_written = self.store.upsert_many(&batch.rows).await?;
        info!(received = rows.len(), submitted = batch.rows.len(), "bulk import applied");
        Ok(BulkImportReport {
            received: rows.len(),
            submitted: batch.rows.len(),
            rows_written,
            superseded: batch.superseded,
        })
    }

    /// Read every row from `source` and reconcile them.
    pub async fn import_from(&self, source: &dyn SeatRowSource) -> Result<BulkImportReport, Error> {
        let rows = source
            .read_rows()
            .await
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.reconcile(&rows).await
    }

    /// Classify `rows` against the current store contents without writing.
    pub async fn preview(&self, rows: &[RawSeatRow]) -> Result<ImportPlan, Error> {
        let existing = self
            .store
            .list_all()
            .await?
            .into_iter()
            .map(|record| record.roll_number().clone())
            .collect();
        Ok(plan(rows, &existing))
    }
}

#[cfg(test)]
#[path = "bulk_import_tests.rs"]
mod tests;
