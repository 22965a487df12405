//! Inclusive calendar date ranges used for store-side range queries.

use serde::Serialize;
use time::{Date, Month};

/// An inclusive range of calendar dates.
///
/// The store compares dates as ISO `YYYY-MM-DD` strings, so use
/// [DateRange::lower_bound] and [DateRange::upper_bound] when building a
/// query instead of relying on any time-of-day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// The range covering every day of `month` in `year`.
    ///
    /// Returns `None` if the dates cannot be represented.
    pub fn month(year: i32, month: Month) -> Option<Self> {
        Some(Self {
            start: Date::from_calendar_date(year, month, 1).ok()?,
            end: last_day_of_month(year, month)?,
        })
    }

    /// The range from the 1st of January to the 31st of December of `year`.
    ///
    /// Returns `None` if the dates cannot be represented.
    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: Date::from_calendar_date(year, Month::January, 1).ok()?,
            end: Date::from_calendar_date(year, Month::December, 31).ok()?,
        })
    }

    /// Whether `date` falls inside the range, including both ends.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// The start of the range as an ISO `YYYY-MM-DD` string.
    pub fn lower_bound(&self) -> String {
        self.start.to_string()
    }

    /// The end of the range as an ISO `YYYY-MM-DD` string.
    pub fn upper_bound(&self) -> String {
        self.end.to_string()
    }
}

/// Map a zero-based month index (0 = January) to a [Month].
pub fn month_from_index(index: u8) -> Option<Month> {
    index
        .checked_add(1)
        .and_then(|month| Month::try_from(month).ok())
}

/// The day before the 1st of the following month.
fn last_day_of_month(year: i32, month: Month) -> Option<Date> {
    if month == Month::December {
        return Date::from_calendar_date(year, Month::December, 31).ok();
    }

    Date::from_calendar_date(year, month.next(), 1)
        .ok()?
        .previous_day()
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use super::{DateRange, month_from_index};

    #[test]
    fn february_of_leap_year_ends_on_29th() {
        let range = DateRange::month(2024, Month::February).unwrap();

        assert_eq!(range.start, date!(2024 - 02 - 01));
        assert_eq!(range.end, date!(2024 - 02 - 29));
    }

    #[test]
    fn february_of_common_year_ends_on_28th() {
        let range = DateRange::month(2023, Month::February).unwrap();

        assert_eq!(range.end, date!(2023 - 02 - 28));
    }

    #[test]
    fn month_ends_match_calendar() {
        assert_eq!(
            DateRange::month(2024, Month::April).unwrap().end,
            date!(2024 - 04 - 30)
        );
        assert_eq!(
            DateRange::month(2024, Month::December).unwrap().end,
            date!(2024 - 12 - 31)
        );
    }

    #[test]
    fn year_covers_whole_year() {
        let range = DateRange::year(2023).unwrap();

        assert_eq!(range.lower_bound(), "2023-01-01");
        assert_eq!(range.upper_bound(), "2023-12-31");
    }

    #[test]
    fn contains_is_inclusive() {
        let range = DateRange::month(2024, Month::March).unwrap();

        assert!(range.contains(date!(2024 - 03 - 01)));
        assert!(range.contains(date!(2024 - 03 - 31)));
        assert!(!range.contains(date!(2024 - 04 - 01)));
    }

    #[test]
    fn month_index_is_zero_based() {
        assert_eq!(month_from_index(0), Some(Month::January));
        assert_eq!(month_from_index(11), Some(Month::December));
        assert_eq!(month_from_index(12), None);
        assert_eq!(month_from_index(u8::MAX), None);
    }
}
