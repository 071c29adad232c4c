//! Error types for the splitting engine

use arrow::error::ArrowError;
use thiserror::Error;

use crate::date_part::DatePart;

/// Errors raised while resolving or applying a splitting strategy.
///
/// Everything here is a caller-side problem: either the strategy parameters
/// are malformed (configuration errors, raised before any row is touched) or
/// a parameter is structurally valid but unusable (domain errors such as a
/// zero divisor). A value that simply fails to match any row is NOT an
/// error; those calls return an empty batch.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Splitting method name not in the supported set.
    #[error("unknown splitting method '{name}'; supported methods: {supported}")]
    UnknownMethod { name: String, supported: String },

    /// Date part name not in the supported enumeration.
    #[error("unknown date part '{name}'; supported parts: {supported}")]
    UnknownDatePart { name: String, supported: String },

    /// Date-part split requested with an empty part list.
    #[error("date_parts must name at least one date part")]
    EmptyDateParts,

    /// Hash function name that no supported algorithm answers to.
    #[error("unknown hash function '{name}'; supported functions: {supported}")]
    UnknownHashFunction { name: String, supported: String },

    /// Date format string that strftime cannot interpret.
    #[error("invalid date format string '{format}'")]
    InvalidDateFormat { format: String },

    /// Batch identifier value that should carry a datetime but does not
    /// parse as one.
    #[error("batch identifier for column '{column}' is not a parseable datetime: {value}")]
    UnparseableDatetime { column: String, value: String },

    /// Nested per-part identifier map without an entry for a requested part.
    #[error("batch identifiers for column '{column}' have no value for date part '{part}'")]
    MissingDatePart { column: String, part: DatePart },

    /// Batch identifiers without an entry for a required key.
    #[error("batch identifiers contain no entry for '{column}'")]
    MissingIdentifier { column: String },

    /// Multi-column split where a named column maps to an empty value.
    #[error(
        "batch identifier for column '{column}' is empty; \
         multi-column splits require a value for every named column"
    )]
    EmptyIdentifier { column: String },

    /// Named column absent from the dataset schema.
    #[error("column '{column}' does not exist in the dataset")]
    ColumnNotFound { column: String },

    /// Divided-integer split with divisor zero.
    #[error("divisor must be non-zero for split_on_divided_integer")]
    ZeroDivisor,

    /// Mod-integer split with modulus zero.
    #[error("mod must be non-zero for split_on_mod_integer")]
    ZeroModulus,

    /// Arrow kernel failure while materializing the filtered batch.
    #[error(transparent)]
    Arrow(#[from] ArrowError),
}

/// Result type alias for splitting operations.
pub type Result<T> = std::result::Result<T, SplitError>;
