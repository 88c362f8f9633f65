//! Calendar primitives for the fixed generation calendar.
//!
//! The generators use a fixed, non-leap days-per-month table; February always
//! has 28 days. Days are identified by their two-digit, zero-padded string
//! ("01"…"31"), which is also how they serialize.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseKindError;

pub type Year = i16;

/// Days per month in the generation calendar (no leap years)
pub const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
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

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// 1-based month number
    #[must_use]
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        let index = number.checked_sub(1)?;
        Self::ALL.get(index as usize).copied()
    }

    #[must_use]
    pub fn day_count(self) -> u8 {
        DAYS_IN_MONTH[self as usize]
    }

    /// The preceding month within the same year (`None` for January)
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Day of month, displayed and serialized as a two-digit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Day(u8);

impl Day {
    #[must_use]
    pub fn new(number: u8) -> Option<Self> {
        (1..=31).contains(&number).then_some(Day(number))
    }

    #[must_use]
    pub fn number(self) -> u8 {
        self.0
    }

    /// The preceding day within the same month (`None` for day 01)
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        Day::new(self.0 - 1)
    }

    /// Every day of `month` in the generation calendar, in order
    pub fn all_in(month: Month) -> impl Iterator<Item = Day> {
        (1..=month.day_count()).map(Day)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl FromStr for Day {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u8>()
            .ok()
            .and_then(Day::new)
            .ok_or_else(|| ParseKindError::new("day", s))
    }
}

impl From<Day> for String {
    fn from(day: Day) -> Self {
        day.to_string()
    }
}

impl TryFrom<String> for Day {
    type Error = ParseKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A fully specified position in the generation calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: Year,
    pub month: Month,
    pub day: Day,
}

impl CalendarDate {
    #[must_use]
    pub fn new(year: Year, month: Month, day: Day) -> Self {
        Self { year, month, day }
    }

    /// Convert a civil date. February 29 converts as-is and simply has no node
    /// in a generated tree.
    #[must_use]
    pub fn from_civil(date: jiff::civil::Date) -> Self {
        Self {
            year: date.year(),
            month: Month::ALL[(date.month() - 1) as usize],
            day: Day(date.day() as u8),
        }
    }

    /// ISO-style `YYYY-MM-DD` label
    #[must_use]
    pub fn label(self) -> String {
        format!("{}-{:02}-{}", self.year, self.month.number(), self.day)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
