//! Calendar ranges and the quick-select presets offered by the range widgets.
//!
//! Every preset takes `today` explicitly and derives both bounds from that one
//! value, so the result never depends on evaluation order or the wall clock.

use std::{fmt, str::FromStr};

use jiff::{ToSpan, civil::Date};
use serde::{Deserialize, Serialize};

use crate::{Error, err};

/// Inclusive range of calendar days, either bound may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }
}

/// A calendar month, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i16,
    month: i8,
}

impl YearMonth {
    pub fn new(year: i16, month: i8) -> crate::Result<Self> {
        if !(0..=9999).contains(&year) {
            return Err(err!("year {year} is out of range"));
        }
        if !(1..=12).contains(&month) {
            return Err(err!("month {month} is out of range"));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i16 {
        self.year
    }

    pub fn month(&self) -> i8 {
        self.month
    }

    /// Moves by a signed number of months, clamping at the edges of 0000-01..9999-12.
    pub fn shift(self, months: i32) -> Self {
        let index = i32::from(self.year) * 12 + i32::from(self.month) - 1 + months;
        let index = index.clamp(0, 9999 * 12 + 11);
        Self {
            year: (index / 12) as i16,
            month: (index % 12 + 1) as i8,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| err!("expected YYYY-MM, got '{s}'"))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err!("expected YYYY-MM, got '{s}'"));
        }
        let year = year
            .parse::<i16>()
            .map_err(|_| err!("invalid year in '{s}'"))?;
        let month = month
            .parse::<i8>()
            .map_err(|_| err!("invalid month in '{s}'"))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = Error;

    fn try_from(value: String) -> crate::Result<Self> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// Inclusive range of months, either bound may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub start: Option<YearMonth>,
    pub end: Option<YearMonth>,
}

impl MonthRange {
    pub fn new(start: YearMonth, end: YearMonth) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    pub fn contains(&self, month: YearMonth) -> bool {
        self.start.is_none_or(|start| start <= month) && self.end.is_none_or(|end| month <= end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatePreset {
    Today,
    Last7Days,
    Last30Days,
    ThisMonth,
    LastMonth,
}

impl DatePreset {
    pub const ALL: [DatePreset; 5] = [
        DatePreset::Today,
        DatePreset::Last7Days,
        DatePreset::Last30Days,
        DatePreset::ThisMonth,
        DatePreset::LastMonth,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DatePreset::Today => "today",
            DatePreset::Last7Days => "last7Days",
            DatePreset::Last30Days => "last30Days",
            DatePreset::ThisMonth => "thisMonth",
            DatePreset::LastMonth => "lastMonth",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatePreset::Today => "Today",
            DatePreset::Last7Days => "Last 7 Days",
            DatePreset::Last30Days => "Last 30 Days",
            DatePreset::ThisMonth => "This Month",
            DatePreset::LastMonth => "Last Month",
        }
    }

    pub fn range(&self, today: Date) -> DateRange {
        match self {
            DatePreset::Today => DateRange::new(today, today),
            DatePreset::Last7Days => DateRange::new(today.saturating_sub(7.days()), today),
            DatePreset::Last30Days => DateRange::new(today.saturating_sub(30.days()), today),
            DatePreset::ThisMonth => DateRange::new(today.first_of_month(), today),
            DatePreset::LastMonth => {
                let last = today.first_of_month().saturating_sub(1.day());
                DateRange::new(last.first_of_month(), last)
            }
        }
    }
}

impl FromStr for DatePreset {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        DatePreset::ALL
            .into_iter()
            .find(|preset| preset.key() == s)
            .ok_or_else(|| err!("unknown date preset '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonthPreset {
    Last3Months,
    Last6Months,
    ThisYear,
    LastYear,
}

impl MonthPreset {
    pub const ALL: [MonthPreset; 4] = [
        MonthPreset::Last3Months,
        MonthPreset::Last6Months,
        MonthPreset::ThisYear,
        MonthPreset::LastYear,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MonthPreset::Last3Months => "last3Months",
            MonthPreset::Last6Months => "last6Months",
            MonthPreset::ThisYear => "thisYear",
            MonthPreset::LastYear => "lastYear",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MonthPreset::Last3Months => "Last 3 Months",
            MonthPreset::Last6Months => "Last 6 Months",
            MonthPreset::ThisYear => "This Year",
            MonthPreset::LastYear => "Last Year",
        }
    }

    pub fn range(&self, today: Date) -> MonthRange {
        let current = YearMonth::of(today);
        let january = YearMonth {
            year: current.year,
            month: 1,
        };
        match self {
            MonthPreset::Last3Months => MonthRange::new(current.shift(-2), current),
            MonthPreset::Last6Months => MonthRange::new(current.shift(-5), current),
            MonthPreset::ThisYear => MonthRange::new(january, current),
            MonthPreset::LastYear => MonthRange::new(january.shift(-12), january.shift(-1)),
        }
    }
}

impl FromStr for MonthPreset {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        MonthPreset::ALL
            .into_iter()
            .find(|preset| preset.key() == s)
            .ok_or_else(|| err!("unknown month preset '{s}'"))
    }
}
