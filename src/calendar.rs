//! Calendar keys and the inclusive month-range walker.
//!
//! Year and month keys are validated at ingestion; nothing outside the
//! twelve canonical month names or 4-digit years enters a ledger.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::errors::{LedgerError, LedgerResult};

/// One of the twelve canonical month names, ordered January through December.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum MonthName {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl MonthName {
    pub const ALL: [MonthName; 12] = [
        MonthName::January,
        MonthName::February,
        MonthName::March,
        MonthName::April,
        MonthName::May,
        MonthName::June,
        MonthName::July,
        MonthName::August,
        MonthName::September,
        MonthName::October,
        MonthName::November,
        MonthName::December,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonthName::January => "January",
            MonthName::February => "February",
            MonthName::March => "March",
            MonthName::April => "April",
            MonthName::May => "May",
            MonthName::June => "June",
            MonthName::July => "July",
            MonthName::August => "August",
            MonthName::September => "September",
            MonthName::October => "October",
            MonthName::November => "November",
            MonthName::December => "December",
        }
    }

    /// Zero-based position in the calendar year.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// One-based calendar month number.
    pub fn number(&self) -> u32 {
        self.index() as u32 + 1
    }

    pub fn from_index(index: usize) -> Option<MonthName> {
        Self::ALL.get(index).copied()
    }

    /// Parses a month name, case-insensitively and ignoring surrounding
    /// whitespace. Anything outside the twelve canonical names fails.
    pub fn parse(raw: &str) -> LedgerResult<MonthName> {
        MONTH_LOOKUP
            .get(raw.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| {
                LedgerError::InvalidMonth(format!("`{}` is not a calendar month", raw))
            })
    }
}

impl fmt::Display for MonthName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static MONTH_LOOKUP: Lazy<HashMap<String, MonthName>> = Lazy::new(|| {
    MonthName::ALL
        .iter()
        .map(|month| (month.as_str().to_ascii_lowercase(), *month))
        .collect()
});

/// A validated 4-digit year key. String ordering is chronological for
/// 4-digit years, which keeps `BTreeMap` iteration in calendar order.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct YearKey(String);

impl YearKey {
    pub fn parse(raw: &str) -> LedgerResult<YearKey> {
        let trimmed = raw.trim();
        if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
            Ok(YearKey(trimmed.to_string()))
        } else {
            Err(LedgerError::Validation(format!(
                "`{}` is not a 4-digit year",
                raw
            )))
        }
    }

    pub fn from_number(year: i32) -> LedgerResult<YearKey> {
        if (1000..=9999).contains(&year) {
            Ok(YearKey(year.to_string()))
        } else {
            Err(LedgerError::Validation(format!(
                "`{}` is not a 4-digit year",
                year
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn number(&self) -> i32 {
        // Always parses: construction guarantees 4 ASCII digits.
        self.0.parse().unwrap_or(0)
    }
}

impl fmt::Display for YearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An inclusive, chronologically ordered span of calendar months.
///
/// The range is a value: `months()` produces a fresh sequence every call,
/// so callers may walk the same range repeatedly without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRange {
    start_year: YearKey,
    start_month: MonthName,
    end_year: YearKey,
    end_month: MonthName,
}

impl MonthRange {
    pub fn new(
        start_month: MonthName,
        start_year: YearKey,
        end_month: MonthName,
        end_year: YearKey,
    ) -> LedgerResult<MonthRange> {
        let start = (start_year.number(), start_month.index());
        let end = (end_year.number(), end_month.index());
        if end < start {
            return Err(LedgerError::InvalidRange(format!(
                "{} {} precedes {} {}",
                end_month, end_year, start_month, start_year
            )));
        }
        Ok(MonthRange {
            start_year,
            start_month,
            end_year,
            end_month,
        })
    }

    /// Walks the range, yielding every `(year, month)` pair from start to
    /// end inclusive, crossing year boundaries as needed.
    pub fn months(&self) -> Vec<(YearKey, MonthName)> {
        let mut out = Vec::with_capacity(self.len());
        let mut year = self.start_year.number();
        let mut month = self.start_month.index();
        let end = (self.end_year.number(), self.end_month.index());
        loop {
            let key = YearKey(year.to_string());
            let name = MonthName::from_index(month)
                .unwrap_or(self.start_month);
            out.push((key, name));
            if (year, month) == end {
                break;
            }
            month += 1;
            if month == 12 {
                month = 0;
                year += 1;
            }
        }
        out
    }

    /// Number of months the walk will yield.
    pub fn len(&self) -> usize {
        let start = self.start_year.number() * 12 + self.start_month.index() as i32;
        let end = self.end_year.number() * 12 + self.end_month.index() as i32;
        (end - start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Human label for report subtitles, e.g. `January 2024 to March 2024`.
    pub fn label(&self) -> String {
        if self.start_year == self.end_year && self.start_month == self.end_month {
            format!("{} {}", self.start_month, self.start_year)
        } else {
            format!(
                "{} {} to {} {}",
                self.start_month, self.start_year, self.end_month, self.end_year
            )
        }
    }

    pub fn start(&self) -> (&YearKey, MonthName) {
        (&self.start_year, self.start_month)
    }

    pub fn end(&self) -> (&YearKey, MonthName) {
        (&self.end_year, self.end_month)
    }
}
