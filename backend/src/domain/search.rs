//! Admin record search.

use crate::domain::SeatRecord;

/// Records matching `query`, in input order.
///
/// Names match case-insensitively. Roll numbers match the query verbatim,
/// and stored roll numbers are upper case, so a lower-case fragment only
/// ever finds names. An empty query matches everything.
pub fn filter_records<'a>(records: &'a [SeatRecord], query: &str) -> Vec<&'a SeatRecord> {
    let lowered = query.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record.student_name().as_str().to_lowercase().contains(&lowered)
                || record.roll_number().as_str().contains(query)
        })
        .collect()
}
