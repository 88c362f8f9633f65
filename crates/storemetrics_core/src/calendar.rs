//! Calendar scaffold: the Year → Month → Day index a generator walks.
//!
//! One index is built per generation unit from the location's opening year
//! through a final year, using the fixed non-leap days-per-month table.

use std::collections::BTreeMap;

use crate::config::OperatingHistory;
use crate::error::CalendarError;
use crate::model::{Day, Month, StoreLocation, Year};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarIndex {
    years: BTreeMap<Year, BTreeMap<Month, Vec<Day>>>,
}

impl CalendarIndex {
    /// Build the index for every year from `location`'s opening year through
    /// `through_year` inclusive.
    pub fn for_location(
        location: StoreLocation,
        history: &OperatingHistory,
        through_year: Year,
    ) -> Result<Self, CalendarError> {
        let opened = history
            .opening_year(location)
            .ok_or(CalendarError::NoOperatingHistory(location))?;
        if opened > through_year {
            return Err(CalendarError::OpensAfter {
                location,
                opened,
                through: through_year,
            });
        }

        let years = (opened..=through_year)
            .map(|year| (year, full_year()))
            .collect();
        Ok(Self { years })
    }

    /// Build an index from arbitrary entries without validating them. Empty
    /// years or months are kept as given.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Year, BTreeMap<Month, Vec<Day>>)>,
    {
        Self {
            years: entries.into_iter().collect(),
        }
    }

    /// Years in ascending order, with their months
    pub fn years(&self) -> impl Iterator<Item = (Year, &BTreeMap<Month, Vec<Day>>)> {
        self.years.iter().map(|(year, months)| (*year, months))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    #[must_use]
    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    #[must_use]
    pub fn day_count(&self) -> usize {
        self.years
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    #[must_use]
    pub fn first_year(&self) -> Option<Year> {
        self.years.keys().next().copied()
    }

    #[must_use]
    pub fn last_year(&self) -> Option<Year> {
        self.years.keys().next_back().copied()
    }
}

fn full_year() -> BTreeMap<Month, Vec<Day>> {
    Month::ALL
        .iter()
        .map(|&month| (month, Day::all_in(month).collect()))
        .collect()
}

/// The current civil year in the system time zone.
#[must_use]
pub fn current_year() -> Year {
    jiff::Zoned::now().year()
}
