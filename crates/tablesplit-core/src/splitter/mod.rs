// Row-filtering implementations of the splitting strategies
//
// Every function here takes an immutable record batch plus the identifiers
// pinning one batch, and returns a new record batch holding the surviving
// rows in their original order. Parameter validation happens before any
// row is read; per-row comparison failures are non-matches, never errors.

mod cell;

use arrow::array::BooleanArray;
use arrow::compute::filter_record_batch;
use arrow::record_batch::RecordBatch;
use serde_json::Value;

use crate::date_part::{self, DatePart};
use crate::error::{Result, SplitError};
use crate::hash::{self, HashFunction};
use crate::identifiers::{self, BatchIdentifiers};

/// Identifier key carrying the expected digest suffix for hashed splits.
pub const HASH_VALUE_KEY: &str = "hash_value";

/// Keep the whole table as a single batch.
pub fn split_on_whole_table(batch: &RecordBatch) -> Result<RecordBatch> {
    Ok(batch.clone())
}

/// Keep rows where the column equals the identifier value for that column.
pub fn split_on_column_value(
    batch: &RecordBatch,
    column_name: &str,
    identifiers: &BatchIdentifiers,
) -> Result<RecordBatch> {
    let target = identifiers.require(column_name)?;
    let array = cell::column(batch, column_name)?;
    let mask = (0..batch.num_rows())
        .map(|row| cell::cell_matches(array.as_ref(), row, target))
        .collect();
    apply_mask(batch, mask)
}

/// Keep rows matching the identifier's year.
pub fn split_on_year(
    batch: &RecordBatch,
    column_name: &str,
    identifiers: &BatchIdentifiers,
) -> Result<RecordBatch> {
    split_on_date_parts(batch, column_name, &[DatePart::Year], identifiers)
}

/// Keep rows matching the identifier's year and month.
pub fn split_on_year_and_month(
    batch: &RecordBatch,
    column_name: &str,
    identifiers: &BatchIdentifiers,
) -> Result<RecordBatch> {
    split_on_date_parts(
        batch,
        column_name,
        &[DatePart::Year, DatePart::Month],
        identifiers,
    )
}

/// Keep rows matching the identifier's year, month, and day.
pub fn split_on_year_and_month_and_day(
    batch: &RecordBatch,
    column_name: &str,
    identifiers: &BatchIdentifiers,
) -> Result<RecordBatch> {
    split_on_date_parts(
        batch,
        column_name,
        &[DatePart::Year, DatePart::Month, DatePart::Day],
        identifiers,
    )
}

/// Keep rows where every requested date part of the column matches its
/// target.
///
/// Targets come either from a nested per-part object in the identifiers
/// (`{"ts": {"year": 2021, "month": 5}}`) or from a single datetime value
/// (`{"ts": "2021-05-01"}`) that each part is extracted from. Parts are
/// applied as successive filters, so their order does not change the
/// result. There is no truncation: month without year matches that month
/// in every year.
pub fn split_on_date_parts(
    batch: &RecordBatch,
    column_name: &str,
    date_parts: &[DatePart],
    identifiers: &BatchIdentifiers,
) -> Result<RecordBatch> {
    if date_parts.is_empty() {
        return Err(SplitError::EmptyDateParts);
    }
    let value = identifiers.require(column_name)?;
    let targets = resolve_part_targets(column_name, date_parts, value)?;

    let mut current = batch.clone();
    for (part, target) in date_parts.iter().zip(targets) {
        let array = cell::column(&current, column_name)?.clone();
        let mask = (0..current.num_rows())
            .map(|row| match (cell::cell_datetime(array.as_ref(), row), target) {
                (Some(dt), Some(expected)) => part.extract(&dt) == expected,
                _ => false,
            })
            .collect();
        current = apply_mask(&current, mask)?;
    }
    Ok(current)
}

/// Keep rows whose column, rendered through a strftime format, equals the
/// identifier value.
pub fn split_on_converted_datetime(
    batch: &RecordBatch,
    column_name: &str,
    date_format: &str,
    identifiers: &BatchIdentifiers,
) -> Result<RecordBatch> {
    let items = date_part::strftime_items(date_format)?;
    let target = identifiers.require(column_name)?;
    let array = cell::column(batch, column_name)?;
    let mask = match target.as_str() {
        Some(expected) => (0..batch.num_rows())
            .map(|row| {
                cell::cell_datetime(array.as_ref(), row)
                    .map(|dt| dt.format_with_items(items.iter()).to_string() == expected)
                    .unwrap_or(false)
            })
            .collect(),
        None => vec![false; batch.num_rows()],
    };
    apply_mask(batch, mask)
}

/// Keep rows where the column divided by `divisor` (truncating) equals the
/// identifier value.
pub fn split_on_divided_integer(
    batch: &RecordBatch,
    column_name: &str,
    divisor: i64,
    identifiers: &BatchIdentifiers,
) -> Result<RecordBatch> {
    if divisor == 0 {
        return Err(SplitError::ZeroDivisor);
    }
    let target = identifiers.require(column_name)?;
    let expected = value_as_i64(target);
    let array = cell::column(batch, column_name)?;
    let mask = (0..batch.num_rows())
        .map(|row| match (cell::cell_i64(array.as_ref(), row), expected) {
            (Some(v), Some(t)) => v.checked_div(divisor) == Some(t),
            _ => false,
        })
        .collect();
    apply_mask(batch, mask)
}

/// Keep rows where the column mod `modulus` equals the identifier value.
///
/// Uses the non-negative remainder for positive moduli, so -5 mod 10 lands
/// in bucket 5 and the buckets 0..modulus cover every row.
pub fn split_on_mod_integer(
    batch: &RecordBatch,
    column_name: &str,
    modulus: i64,
    identifiers: &BatchIdentifiers,
) -> Result<RecordBatch> {
    if modulus == 0 {
        return Err(SplitError::ZeroModulus);
    }
    let target = identifiers.require(column_name)?;
    let expected = value_as_i64(target);
    let array = cell::column(batch, column_name)?;
    let mask = (0..batch.num_rows())
        .map(|row| match (cell::cell_i64(array.as_ref(), row), expected) {
            (Some(v), Some(t)) => v.checked_rem_euclid(modulus) == Some(t),
            _ => false,
        })
        .collect();
    apply_mask(batch, mask)
}

/// Keep rows where every named column equals its identifier value.
///
/// Every named column must have a non-empty identifier value; that is
/// checked up front so a bad identifier set fails before any row is
/// filtered. Columns are applied incrementally, each narrowing the
/// candidate set.
pub fn split_on_multi_column_values(
    batch: &RecordBatch,
    column_names: &[String],
    identifiers: &BatchIdentifiers,
) -> Result<RecordBatch> {
    let mut targets = Vec::with_capacity(column_names.len());
    for column_name in column_names {
        let value = identifiers.require(column_name)?;
        if identifiers::is_falsy(value) {
            return Err(SplitError::EmptyIdentifier {
                column: column_name.clone(),
            });
        }
        targets.push((column_name, value));
    }

    let mut current = batch.clone();
    for (column_name, target) in targets {
        let array = cell::column(&current, column_name)?.clone();
        let mask = (0..current.num_rows())
            .map(|row| cell::cell_matches(array.as_ref(), row, target))
            .collect();
        current = apply_mask(&current, mask)?;
    }
    Ok(current)
}

/// Keep rows whose hashed column value ends with the identifier's
/// `hash_value`.
///
/// Each cell is rendered as text, digested with the configured algorithm,
/// and compared on the last `hash_digits` hex characters. Zero digits
/// compares the full digest.
pub fn split_on_hashed_column(
    batch: &RecordBatch,
    column_name: &str,
    hash_digits: usize,
    hash_function: HashFunction,
    identifiers: &BatchIdentifiers,
) -> Result<RecordBatch> {
    let target = identifiers.require(HASH_VALUE_KEY)?;
    let array = cell::column(batch, column_name)?;
    let mask = match target.as_str() {
        Some(expected) => (0..batch.num_rows())
            .map(|row| {
                cell::cell_string(array.as_ref(), row)
                    .map(|text| {
                        let digest = hash_function.hex_digest(text.as_bytes());
                        hash::hex_suffix(&digest, hash_digits) == expected
                    })
                    .unwrap_or(false)
            })
            .collect(),
        None => vec![false; batch.num_rows()],
    };
    apply_mask(batch, mask)
}

fn apply_mask(batch: &RecordBatch, mask: Vec<bool>) -> Result<RecordBatch> {
    let mask = BooleanArray::from(mask);
    Ok(filter_record_batch(batch, &mask)?)
}

/// Resolve the per-part target integers from the identifier value for a
/// column.
///
/// A nested object is looked up per part (case-insensitively); an entry
/// that is not an integer makes that part unmatchable rather than erroring.
/// A string is parsed as a datetime and every part extracted from it.
fn resolve_part_targets(
    column_name: &str,
    date_parts: &[DatePart],
    value: &Value,
) -> Result<Vec<Option<i64>>> {
    match value {
        Value::Object(map) => date_parts
            .iter()
            .map(|part| {
                let entry = map
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(part.as_str()))
                    .map(|(_, v)| v)
                    .ok_or_else(|| SplitError::MissingDatePart {
                        column: column_name.to_string(),
                        part: *part,
                    })?;
                Ok(value_as_i64(entry))
            })
            .collect(),
        Value::String(raw) => {
            let dt = date_part::parse_datetime(raw).ok_or_else(|| {
                SplitError::UnparseableDatetime {
                    column: column_name.to_string(),
                    value: raw.clone(),
                }
            })?;
            Ok(date_parts
                .iter()
                .map(|part| Some(part.extract(&dt)))
                .collect())
        }
        other => Err(SplitError::UnparseableDatetime {
            column: column_name.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Integer view of a JSON value, accepting integral floats.
fn value_as_i64(value: &Value) -> Option<i64> {
    if let Some(v) = value.as_i64() {
        return Some(v);
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}
