// Splitting strategies: a method plus its resolved parameters
//
// `SplitStrategy` is the runtime form used by the engine. Declarative
// configuration deserializes elsewhere and converts into this type.

use arrow::record_batch::RecordBatch;
use tracing::debug;

use crate::date_part::DatePart;
use crate::error::Result;
use crate::hash::HashFunction;
use crate::identifiers::BatchIdentifiers;
use crate::method::SplitMethod;
use crate::splitter;

/// Format string used by converted-datetime splits when none is given.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A fully-parameterized splitting strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitStrategy {
    /// The entire table as one batch.
    WholeTable,
    /// Rows where `column` equals the identifier value.
    ColumnValue { column: String },
    /// Rows in the identifier's year.
    Year { column: String },
    /// Rows in the identifier's year and month.
    YearAndMonth { column: String },
    /// Rows on the identifier's calendar day.
    YearAndMonthAndDay { column: String },
    /// Rows matching an arbitrary list of date parts.
    DateParts {
        column: String,
        parts: Vec<DatePart>,
    },
    /// Rows whose datetime formats to the identifier string.
    ConvertedDatetime {
        column: String,
        date_format: String,
    },
    /// Rows bucketed by truncating division.
    DividedInteger { column: String, divisor: i64 },
    /// Rows bucketed by remainder.
    ModInteger { column: String, modulus: i64 },
    /// Rows matching identifier values across several columns.
    MultiColumnValues { columns: Vec<String> },
    /// Rows whose hashed value carries a given digest suffix.
    HashedColumn {
        column: String,
        hash_digits: usize,
        hash_function: HashFunction,
    },
}

impl SplitStrategy {
    /// The method this strategy parameterizes.
    pub fn method(&self) -> SplitMethod {
        match self {
            SplitStrategy::WholeTable => SplitMethod::WholeTable,
            SplitStrategy::ColumnValue { .. } => SplitMethod::ColumnValue,
            SplitStrategy::Year { .. } => SplitMethod::Year,
            SplitStrategy::YearAndMonth { .. } => SplitMethod::YearAndMonth,
            SplitStrategy::YearAndMonthAndDay { .. } => SplitMethod::YearAndMonthAndDay,
            SplitStrategy::DateParts { .. } => SplitMethod::DateParts,
            SplitStrategy::ConvertedDatetime { .. } => SplitMethod::ConvertedDatetime,
            SplitStrategy::DividedInteger { .. } => SplitMethod::DividedInteger,
            SplitStrategy::ModInteger { .. } => SplitMethod::ModInteger,
            SplitStrategy::MultiColumnValues { .. } => SplitMethod::MultiColumnValues,
            SplitStrategy::HashedColumn { .. } => SplitMethod::HashedColumn,
        }
    }

    /// Apply this strategy to a record batch, keeping the rows selected by
    /// `identifiers`.
    ///
    /// Rows come back in their original order with the schema unchanged.
    /// Strategy parameters are validated before any row is read.
    pub fn split(
        &self,
        batch: &RecordBatch,
        identifiers: &BatchIdentifiers,
    ) -> Result<RecordBatch> {
        debug!(
            method = %self.method(),
            rows_in = batch.num_rows(),
            "applying splitting strategy"
        );
        let result = match self {
            SplitStrategy::WholeTable => splitter::split_on_whole_table(batch),
            SplitStrategy::ColumnValue { column } => {
                splitter::split_on_column_value(batch, column, identifiers)
            }
            SplitStrategy::Year { column } => splitter::split_on_year(batch, column, identifiers),
            SplitStrategy::YearAndMonth { column } => {
                splitter::split_on_year_and_month(batch, column, identifiers)
            }
            SplitStrategy::YearAndMonthAndDay { column } => {
                splitter::split_on_year_and_month_and_day(batch, column, identifiers)
            }
            SplitStrategy::DateParts { column, parts } => {
                splitter::split_on_date_parts(batch, column, parts, identifiers)
            }
            SplitStrategy::ConvertedDatetime {
                column,
                date_format,
            } => splitter::split_on_converted_datetime(batch, column, date_format, identifiers),
            SplitStrategy::DividedInteger { column, divisor } => {
                splitter::split_on_divided_integer(batch, column, *divisor, identifiers)
            }
            SplitStrategy::ModInteger { column, modulus } => {
                splitter::split_on_mod_integer(batch, column, *modulus, identifiers)
            }
            SplitStrategy::MultiColumnValues { columns } => {
                splitter::split_on_multi_column_values(batch, columns, identifiers)
            }
            SplitStrategy::HashedColumn {
                column,
                hash_digits,
                hash_function,
            } => splitter::split_on_hashed_column(
                batch,
                column,
                *hash_digits,
                *hash_function,
                identifiers,
            ),
        }?;
        debug!(rows_out = result.num_rows(), "split complete");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_mapping() {
        let strategy = SplitStrategy::ModInteger {
            column: "id".to_string(),
            modulus: 10,
        };
        assert_eq!(strategy.method(), SplitMethod::ModInteger);
        assert_eq!(strategy.method().as_str(), "split_on_mod_integer");

        assert_eq!(SplitStrategy::WholeTable.method(), SplitMethod::WholeTable);
        assert_eq!(
            SplitStrategy::HashedColumn {
                column: "id".to_string(),
                hash_digits: 1,
                hash_function: HashFunction::Md5,
            }
            .method(),
            SplitMethod::HashedColumn
        );
    }
}
