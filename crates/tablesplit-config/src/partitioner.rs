// Declarative partitioner definitions
//
// One tagged variant per splitting strategy, deserializable from TOML or
// JSON. The `method` tag carries the canonical strategy name; parameter
// fields use the names callers pass to the engine (`column_name`,
// `divisor`, `mod`, `hash_digits`, `hash_function_name`,
// `date_format_string`, `date_parts`).

use serde::{Deserialize, Serialize};
use tablesplit_core::{DatePart, HashFunction, SplitMethod, SplitStrategy, DEFAULT_DATE_FORMAT};

/// A splitting strategy as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum Partitioner {
    #[serde(rename = "split_on_whole_table")]
    WholeTable,

    #[serde(rename = "split_on_column_value")]
    ColumnValue { column_name: String },

    #[serde(rename = "split_on_year")]
    Year { column_name: String },

    #[serde(rename = "split_on_year_and_month")]
    YearAndMonth { column_name: String },

    #[serde(rename = "split_on_year_and_month_and_day")]
    YearAndMonthAndDay { column_name: String },

    #[serde(rename = "split_on_date_parts")]
    DateParts {
        column_name: String,
        date_parts: Vec<DatePart>,
    },

    #[serde(rename = "split_on_converted_datetime")]
    ConvertedDatetime {
        column_name: String,
        #[serde(default = "default_date_format")]
        date_format_string: String,
    },

    #[serde(rename = "split_on_divided_integer")]
    DividedInteger { column_name: String, divisor: i64 },

    #[serde(rename = "split_on_mod_integer")]
    ModInteger {
        column_name: String,
        #[serde(rename = "mod")]
        modulus: i64,
    },

    #[serde(rename = "split_on_multi_column_values")]
    MultiColumnValues { column_names: Vec<String> },

    #[serde(rename = "split_on_hashed_column")]
    HashedColumn {
        column_name: String,
        hash_digits: usize,
        #[serde(default = "default_hash_function")]
        hash_function_name: HashFunction,
    },
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_hash_function() -> HashFunction {
    HashFunction::Md5
}

impl Partitioner {
    /// The canonical method this partitioner configures.
    pub fn method(&self) -> SplitMethod {
        match self {
            Partitioner::WholeTable => SplitMethod::WholeTable,
            Partitioner::ColumnValue { .. } => SplitMethod::ColumnValue,
            Partitioner::Year { .. } => SplitMethod::Year,
            Partitioner::YearAndMonth { .. } => SplitMethod::YearAndMonth,
            Partitioner::YearAndMonthAndDay { .. } => SplitMethod::YearAndMonthAndDay,
            Partitioner::DateParts { .. } => SplitMethod::DateParts,
            Partitioner::ConvertedDatetime { .. } => SplitMethod::ConvertedDatetime,
            Partitioner::DividedInteger { .. } => SplitMethod::DividedInteger,
            Partitioner::ModInteger { .. } => SplitMethod::ModInteger,
            Partitioner::MultiColumnValues { .. } => SplitMethod::MultiColumnValues,
            Partitioner::HashedColumn { .. } => SplitMethod::HashedColumn,
        }
    }

    /// Convert into the runtime strategy the engine executes.
    pub fn to_strategy(&self) -> SplitStrategy {
        match self {
            Partitioner::WholeTable => SplitStrategy::WholeTable,
            Partitioner::ColumnValue { column_name } => SplitStrategy::ColumnValue {
                column: column_name.clone(),
            },
            Partitioner::Year { column_name } => SplitStrategy::Year {
                column: column_name.clone(),
            },
            Partitioner::YearAndMonth { column_name } => SplitStrategy::YearAndMonth {
                column: column_name.clone(),
            },
            Partitioner::YearAndMonthAndDay { column_name } => SplitStrategy::YearAndMonthAndDay {
                column: column_name.clone(),
            },
            Partitioner::DateParts {
                column_name,
                date_parts,
            } => SplitStrategy::DateParts {
                column: column_name.clone(),
                parts: date_parts.clone(),
            },
            Partitioner::ConvertedDatetime {
                column_name,
                date_format_string,
            } => SplitStrategy::ConvertedDatetime {
                column: column_name.clone(),
                date_format: date_format_string.clone(),
            },
            Partitioner::DividedInteger {
                column_name,
                divisor,
            } => SplitStrategy::DividedInteger {
                column: column_name.clone(),
                divisor: *divisor,
            },
            Partitioner::ModInteger {
                column_name,
                modulus,
            } => SplitStrategy::ModInteger {
                column: column_name.clone(),
                modulus: *modulus,
            },
            Partitioner::MultiColumnValues { column_names } => SplitStrategy::MultiColumnValues {
                columns: column_names.clone(),
            },
            Partitioner::HashedColumn {
                column_name,
                hash_digits,
                hash_function_name,
            } => SplitStrategy::HashedColumn {
                column: column_name.clone(),
                hash_digits: *hash_digits,
                hash_function: *hash_function_name,
            },
        }
    }
}
