//! Timestamp formatting for folder names and catalogue entries.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogueError, Result};

/// Layout of provider timestamps, always UTC with a literal `Z`.
const TIMESTAMP_LAYOUT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Supported output layouts, named by their human pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    #[serde(rename = "YYYY-MM")]
    YearMonth,
    #[serde(rename = "YYYY/MM")]
    YearMonthSlash,
    #[serde(rename = "YYYY/MM/DD")]
    DateSlash,
    #[default]
    #[serde(rename = "YYYY-MM-DD")]
    Date,
    /// Used in folder names.
    #[serde(rename = "YYYYMMDD")]
    Compact,
}

impl DateFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::YearMonth => "YYYY-MM",
            DateFormat::YearMonthSlash => "YYYY/MM",
            DateFormat::DateSlash => "YYYY/MM/DD",
            DateFormat::Date => "YYYY-MM-DD",
            DateFormat::Compact => "YYYYMMDD",
        }
    }

    fn strftime(self) -> &'static str {
        match self {
            DateFormat::YearMonth => "%Y-%m",
            DateFormat::YearMonthSlash => "%Y/%m",
            DateFormat::DateSlash => "%Y/%m/%d",
            DateFormat::Date => "%Y-%m-%d",
            DateFormat::Compact => "%Y%m%d",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

/// Reformats a provider timestamp such as `2024-06-17T09:30:09Z`.
pub fn format_date(timestamp: &str, format: DateFormat) -> Result<String> {
    let parsed = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_LAYOUT).map_err(|_| {
        CatalogueError::InvalidTimestamp {
            value: timestamp.to_owned(),
        }
    })?;
    Ok(parsed.format(format.strftime()).to_string())
}
