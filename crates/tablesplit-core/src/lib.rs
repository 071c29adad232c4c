// tablesplit-core - Deterministic batch splitting over Arrow record batches
//
// This crate contains the PURE splitting logic: given a record batch, a
// strategy, and the identifiers pinning one batch, produce the rows that
// belong to that batch. No I/O, no async, no runtime dependencies.
//
// Strategy parameters are validated before any row is read; a value that
// matches no rows yields an empty batch, never an error.

pub mod date_part;
pub mod error;
pub mod hash;
pub mod identifiers;
pub mod method;
pub mod splitter;
pub mod strategy;

// Re-export commonly used types
pub use date_part::{validate_date_format, DatePart};
pub use error::SplitError;
pub use hash::HashFunction;
pub use identifiers::BatchIdentifiers;
pub use method::SplitMethod;
pub use splitter::HASH_VALUE_KEY;
pub use strategy::{SplitStrategy, DEFAULT_DATE_FORMAT};

use arrow::record_batch::RecordBatch;

/// Apply a splitting strategy to a record batch.
///
/// Convenience entry point delegating to [`SplitStrategy::split`]. The
/// result preserves the input schema and row order; for the same inputs it
/// is always the same rows.
pub fn split_batch(
    batch: &RecordBatch,
    strategy: &SplitStrategy,
    identifiers: &BatchIdentifiers,
) -> Result<RecordBatch, SplitError> {
    strategy.split(batch, identifiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Int64Array};
    use std::sync::Arc;

    #[test]
    fn test_split_batch_whole_table() {
        let batch = RecordBatch::try_from_iter(vec![(
            "id",
            Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef,
        )])
        .unwrap();

        let result = split_batch(
            &batch,
            &SplitStrategy::WholeTable,
            &BatchIdentifiers::new(),
        )
        .unwrap();
        assert_eq!(result.num_rows(), 3);
        assert_eq!(result.schema(), batch.schema());
    }
}
