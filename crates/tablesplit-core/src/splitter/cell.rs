// Typed access to individual cells of an Arrow record batch
//
// Splitting strategies never branch on Arrow types themselves; they go
// through these accessors, which return None for nulls and for column types
// outside the supported set. A None from here means "row does not match",
// never an error.

use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Date64Array, Float32Array, Float64Array,
    Int16Array, Int32Array, Int64Array, Int8Array, LargeStringArray, StringArray,
    TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::error::SplitError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Look up a column by name, erroring with the offending name.
pub(crate) fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, SplitError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| SplitError::ColumnNotFound {
            column: name.to_string(),
        })
}

/// Read a cell as a UTC datetime.
///
/// Supports all four timestamp units (timezone metadata is ignored; stored
/// values are epoch offsets either way) plus Date32 and Date64.
pub(crate) fn cell_datetime(array: &dyn Array, row: usize) -> Option<DateTime<Utc>> {
    if array.is_null(row) {
        return None;
    }
    match array.data_type() {
        DataType::Timestamp(TimeUnit::Second, _) => {
            let values = array.as_any().downcast_ref::<TimestampSecondArray>()?;
            DateTime::from_timestamp(values.value(row), 0)
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            let values = array.as_any().downcast_ref::<TimestampMillisecondArray>()?;
            DateTime::from_timestamp_millis(values.value(row))
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            let values = array.as_any().downcast_ref::<TimestampMicrosecondArray>()?;
            DateTime::from_timestamp_micros(values.value(row))
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            let values = array.as_any().downcast_ref::<TimestampNanosecondArray>()?;
            Some(DateTime::from_timestamp_nanos(values.value(row)))
        }
        DataType::Date32 => {
            let values = array.as_any().downcast_ref::<Date32Array>()?;
            let days = i64::from(values.value(row));
            DateTime::from_timestamp(days * SECONDS_PER_DAY, 0)
        }
        DataType::Date64 => {
            let values = array.as_any().downcast_ref::<Date64Array>()?;
            DateTime::from_timestamp_millis(values.value(row))
        }
        _ => None,
    }
}

/// Read a cell as a signed 64-bit integer.
///
/// Covers every Arrow integer width; unsigned values above i64::MAX do not
/// fit and read as None.
pub(crate) fn cell_i64(array: &dyn Array, row: usize) -> Option<i64> {
    if array.is_null(row) {
        return None;
    }
    match array.data_type() {
        DataType::Int8 => {
            let values = array.as_any().downcast_ref::<Int8Array>()?;
            Some(i64::from(values.value(row)))
        }
        DataType::Int16 => {
            let values = array.as_any().downcast_ref::<Int16Array>()?;
            Some(i64::from(values.value(row)))
        }
        DataType::Int32 => {
            let values = array.as_any().downcast_ref::<Int32Array>()?;
            Some(i64::from(values.value(row)))
        }
        DataType::Int64 => {
            let values = array.as_any().downcast_ref::<Int64Array>()?;
            Some(values.value(row))
        }
        DataType::UInt8 => {
            let values = array.as_any().downcast_ref::<UInt8Array>()?;
            Some(i64::from(values.value(row)))
        }
        DataType::UInt16 => {
            let values = array.as_any().downcast_ref::<UInt16Array>()?;
            Some(i64::from(values.value(row)))
        }
        DataType::UInt32 => {
            let values = array.as_any().downcast_ref::<UInt32Array>()?;
            Some(i64::from(values.value(row)))
        }
        DataType::UInt64 => {
            let values = array.as_any().downcast_ref::<UInt64Array>()?;
            i64::try_from(values.value(row)).ok()
        }
        _ => None,
    }
}

fn cell_f64(array: &dyn Array, row: usize) -> Option<f64> {
    match array.data_type() {
        DataType::Float32 => {
            let values = array.as_any().downcast_ref::<Float32Array>()?;
            Some(f64::from(values.value(row)))
        }
        DataType::Float64 => {
            let values = array.as_any().downcast_ref::<Float64Array>()?;
            Some(values.value(row))
        }
        _ => cell_i64(array, row).map(|v| v as f64),
    }
}

fn cell_str<'a>(array: &'a dyn Array, row: usize) -> Option<&'a str> {
    match array.data_type() {
        DataType::Utf8 => {
            let values = array.as_any().downcast_ref::<StringArray>()?;
            Some(values.value(row))
        }
        DataType::LargeUtf8 => {
            let values = array.as_any().downcast_ref::<LargeStringArray>()?;
            Some(values.value(row))
        }
        _ => None,
    }
}

/// Render a cell as text, for hashing.
///
/// Strings pass through, numbers and booleans use their display form, and
/// datetimes render as RFC 3339 so the digest is stable across storage
/// units.
pub(crate) fn cell_string(array: &dyn Array, row: usize) -> Option<String> {
    if array.is_null(row) {
        return None;
    }
    if let Some(s) = cell_str(array, row) {
        return Some(s.to_string());
    }
    match array.data_type() {
        DataType::Boolean => {
            let values = array.as_any().downcast_ref::<BooleanArray>()?;
            Some(values.value(row).to_string())
        }
        DataType::Float32 | DataType::Float64 => cell_f64(array, row).map(|v| v.to_string()),
        dt if dt.is_integer() => cell_i64(array, row).map(|v| v.to_string()),
        DataType::Timestamp(_, _) | DataType::Date32 | DataType::Date64 => cell_datetime(array, row)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        _ => None,
    }
}

/// Whether a cell equals an identifier value.
///
/// Null cells and null targets never match. Integer cells compare exactly
/// against integer targets; a float on either side compares as f64.
/// Unsupported column types match nothing.
pub(crate) fn cell_matches(array: &dyn Array, row: usize, target: &Value) -> bool {
    if array.is_null(row) || target.is_null() {
        return false;
    }
    match array.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => match (cell_str(array, row), target.as_str()) {
            (Some(cell), Some(expected)) => cell == expected,
            _ => false,
        },
        DataType::Boolean => {
            let values = match array.as_any().downcast_ref::<BooleanArray>() {
                Some(values) => values,
                None => return false,
            };
            target.as_bool() == Some(values.value(row))
        }
        dt if dt.is_integer() => match (cell_i64(array, row), target.as_i64()) {
            (Some(cell), Some(expected)) => cell == expected,
            (Some(cell), None) => target.as_f64() == Some(cell as f64),
            _ => false,
        },
        DataType::Float32 | DataType::Float64 => match (cell_f64(array, row), target.as_f64()) {
            (Some(cell), Some(expected)) => cell == expected,
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_column_lookup() {
        let batch = RecordBatch::try_from_iter(vec![(
            "id",
            Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef,
        )])
        .unwrap();
        assert!(column(&batch, "id").is_ok());
        let err = column(&batch, "absent").unwrap_err();
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn test_cell_datetime_units_agree() {
        // 2021-05-01 12:00:00 UTC
        let secs = 1_619_870_400_i64;
        let expected = DateTime::from_timestamp(secs, 0).unwrap();

        let s = TimestampSecondArray::from(vec![secs]);
        let ms = TimestampMillisecondArray::from(vec![secs * 1_000]);
        let us = TimestampMicrosecondArray::from(vec![secs * 1_000_000]);
        let ns = TimestampNanosecondArray::from(vec![secs * 1_000_000_000]);
        assert_eq!(cell_datetime(&s, 0), Some(expected));
        assert_eq!(cell_datetime(&ms, 0), Some(expected));
        assert_eq!(cell_datetime(&us, 0), Some(expected));
        assert_eq!(cell_datetime(&ns, 0), Some(expected));
    }

    #[test]
    fn test_cell_datetime_dates() {
        // 2021-05-01 is 18748 days after the epoch
        let d32 = Date32Array::from(vec![18_748]);
        let d64 = Date64Array::from(vec![18_748 * SECONDS_PER_DAY * 1_000]);
        let expected = DateTime::from_timestamp(18_748 * SECONDS_PER_DAY, 0).unwrap();
        assert_eq!(cell_datetime(&d32, 0), Some(expected));
        assert_eq!(cell_datetime(&d64, 0), Some(expected));
    }

    #[test]
    fn test_cell_datetime_rejects_non_temporal() {
        let ints = Int64Array::from(vec![1_619_870_400]);
        assert_eq!(cell_datetime(&ints, 0), None);
    }

    #[test]
    fn test_cell_i64_widths() {
        assert_eq!(cell_i64(&Int8Array::from(vec![-3i8]), 0), Some(-3));
        assert_eq!(cell_i64(&UInt32Array::from(vec![7u32]), 0), Some(7));
        assert_eq!(cell_i64(&UInt64Array::from(vec![u64::MAX]), 0), None);
        let with_null = Int64Array::from(vec![Some(1), None]);
        assert_eq!(cell_i64(&with_null, 1), None);
    }

    #[test]
    fn test_cell_string_forms() {
        let strings = StringArray::from(vec!["abc"]);
        assert_eq!(cell_string(&strings, 0), Some("abc".to_string()));
        let ints = Int32Array::from(vec![42]);
        assert_eq!(cell_string(&ints, 0), Some("42".to_string()));
        let bools = BooleanArray::from(vec![true]);
        assert_eq!(cell_string(&bools, 0), Some("true".to_string()));
        let ts = TimestampSecondArray::from(vec![1_619_870_400]);
        assert_eq!(
            cell_string(&ts, 0),
            Some("2021-05-01T12:00:00Z".to_string())
        );
    }

    #[test]
    fn test_cell_matches_strings_and_numbers() {
        let strings = StringArray::from(vec!["emea", "apac"]);
        assert!(cell_matches(&strings, 0, &json!("emea")));
        assert!(!cell_matches(&strings, 1, &json!("emea")));
        assert!(!cell_matches(&strings, 0, &json!(1)));

        let ints = Int64Array::from(vec![5, -5]);
        assert!(cell_matches(&ints, 0, &json!(5)));
        assert!(cell_matches(&ints, 1, &json!(-5)));
        assert!(cell_matches(&ints, 0, &json!(5.0)));
        assert!(!cell_matches(&ints, 0, &json!("5")));

        let floats = Float64Array::from(vec![2.5]);
        assert!(cell_matches(&floats, 0, &json!(2.5)));
        assert!(!cell_matches(&floats, 0, &json!(2.4)));
    }

    #[test]
    fn test_cell_matches_nulls() {
        let with_null = Int64Array::from(vec![Some(1), None]);
        assert!(!cell_matches(&with_null, 1, &json!(1)));
        assert!(!cell_matches(&with_null, 0, &json!(null)));
        assert!(!cell_matches(&with_null, 1, &json!(null)));
    }
}
