//! Calendar arithmetic used by the scheduler and the materializer.
//!
//! Everything operates on wall-clock `NaiveDateTime` values and steps in whole
//! calendar days or months, so results never depend on the host time zone or
//! on daylight-saving transitions.

use crate::models::MonthKey;
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Calendar capability injected into the recurring engine.
pub trait Calendar {
    /// Midnight of the day containing `at`.
    fn start_of_day(&self, at: NaiveDateTime) -> NaiveDateTime;

    /// Midnight of the first day of the week containing `at`.
    fn start_of_week(&self, at: NaiveDateTime) -> NaiveDateTime;

    /// Midnight of the first day of the month containing `at`.
    fn start_of_month(&self, at: NaiveDateTime) -> NaiveDateTime;

    /// Number of days in `month`.
    fn days_in_month(&self, month: MonthKey) -> u32;

    /// `at` moved forward by `days` calendar days, keeping the time of day.
    /// `None` when the result leaves the representable range.
    fn add_days(&self, at: NaiveDateTime, days: u64) -> Option<NaiveDateTime>;

    /// `at` moved forward by `months` calendar months, keeping the time of day.
    /// The day of month is clamped to the last day of the target month.
    fn add_months(&self, at: NaiveDateTime, months: u32) -> Option<NaiveDateTime>;
}

/// Proleptic Gregorian calendar with a configurable first day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GregorianCalendar {
    week_start: Weekday,
}

impl GregorianCalendar {
    /// Creates a calendar whose weeks begin on `week_start`.
    #[must_use]
    pub const fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }

    /// First day of the week.
    #[must_use]
    pub const fn week_start(&self) -> Weekday {
        self.week_start
    }
}

impl Default for GregorianCalendar {
    fn default() -> Self {
        Self::new(Weekday::Sun)
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

impl Calendar for GregorianCalendar {
    fn start_of_day(&self, at: NaiveDateTime) -> NaiveDateTime {
        midnight(at.date())
    }

    fn start_of_week(&self, at: NaiveDateTime) -> NaiveDateTime {
        let offset = (at.weekday().num_days_from_monday() + 7
            - self.week_start.num_days_from_monday())
            % 7;
        let date = at.date();
        midnight(
            date.checked_sub_days(Days::new(u64::from(offset)))
                .unwrap_or(date),
        )
    }

    fn start_of_month(&self, at: NaiveDateTime) -> NaiveDateTime {
        let date = at.date();
        midnight(date.with_day(1).unwrap_or(date))
    }

    fn days_in_month(&self, month: MonthKey) -> u32 {
        month
            .first_day()
            .and_then(|first| first.checked_add_months(Months::new(1)))
            .and_then(|next| next.pred_opt())
            .map_or(31, |last| last.day())
    }

    fn add_days(&self, at: NaiveDateTime, days: u64) -> Option<NaiveDateTime> {
        at.checked_add_days(Days::new(days))
    }

    fn add_months(&self, at: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
        at.checked_add_months(Months::new(months))
    }
}
