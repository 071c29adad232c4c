// Canonical names of the supported splitting methods

use std::fmt;
use std::str::FromStr;

use crate::error::SplitError;

/// Identifies a splitting method by name, independent of its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitMethod {
    WholeTable,
    ColumnValue,
    Year,
    YearAndMonth,
    YearAndMonthAndDay,
    DateParts,
    ConvertedDatetime,
    DividedInteger,
    ModInteger,
    MultiColumnValues,
    HashedColumn,
}

impl SplitMethod {
    pub const ALL: [SplitMethod; 11] = [
        SplitMethod::WholeTable,
        SplitMethod::ColumnValue,
        SplitMethod::Year,
        SplitMethod::YearAndMonth,
        SplitMethod::YearAndMonthAndDay,
        SplitMethod::DateParts,
        SplitMethod::ConvertedDatetime,
        SplitMethod::DividedInteger,
        SplitMethod::ModInteger,
        SplitMethod::MultiColumnValues,
        SplitMethod::HashedColumn,
    ];

    /// Canonical method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMethod::WholeTable => "split_on_whole_table",
            SplitMethod::ColumnValue => "split_on_column_value",
            SplitMethod::Year => "split_on_year",
            SplitMethod::YearAndMonth => "split_on_year_and_month",
            SplitMethod::YearAndMonthAndDay => "split_on_year_and_month_and_day",
            SplitMethod::DateParts => "split_on_date_parts",
            SplitMethod::ConvertedDatetime => "split_on_converted_datetime",
            SplitMethod::DividedInteger => "split_on_divided_integer",
            SplitMethod::ModInteger => "split_on_mod_integer",
            SplitMethod::MultiColumnValues => "split_on_multi_column_values",
            SplitMethod::HashedColumn => "split_on_hashed_column",
        }
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMethod {
    type Err = SplitError;

    /// Case-insensitive lookup by canonical name. Leading underscores are
    /// stripped so names written as private-method references still resolve.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().trim_start_matches('_').to_ascii_lowercase();
        SplitMethod::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == lowered)
            .ok_or_else(|| SplitError::UnknownMethod {
                name: s.to_string(),
                supported: supported_names(),
            })
    }
}

fn supported_names() -> String {
    SplitMethod::ALL
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
