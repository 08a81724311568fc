//! Occurrence scheduling for recurring templates.
//!
//! Given a template's anchor date, its interval and a cutoff, the scheduler
//! yields the dates strictly after the anchor and no later than the cutoff on
//! which an instance is due. The anchor itself is never yielded: the template
//! already stands for that occurrence.
//!
//! Occurrence `k` is always computed from the anchor (`anchor + k` steps), not
//! from the previous occurrence, so a monthly series anchored on the 31st goes
//! Feb 29, Mar 31, Apr 30 rather than drifting to the 29th.

use crate::{core::calendar::Calendar, models::MonthKey, models::RecurringInterval};
use chrono::NaiveDateTime;

/// Ordered, finite iterator over the due occurrences of one template.
#[derive(Debug, Clone)]
pub struct Occurrences<'a, C: ?Sized> {
    calendar: &'a C,
    anchor: NaiveDateTime,
    interval: RecurringInterval,
    cutoff: NaiveDateTime,
    step: u32,
    done: bool,
}

impl<C: Calendar + ?Sized> Occurrences<'_, C> {
    fn nth_occurrence(&self, step: u32) -> Option<NaiveDateTime> {
        match self.interval {
            RecurringInterval::Daily => self.calendar.add_days(self.anchor, u64::from(step)),
            RecurringInterval::Weekly => self.calendar.add_days(self.anchor, 7 * u64::from(step)),
            RecurringInterval::Monthly => self.calendar.add_months(self.anchor, step),
        }
    }
}

impl<C: Calendar + ?Sized> Iterator for Occurrences<'_, C> {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(step) = self.step.checked_add(1) else {
            self.done = true;
            return None;
        };
        self.step = step;

        // Occurrences increase with the step, so the first one past the
        // cutoff ends the series.
        match self.nth_occurrence(step) {
            Some(occurrence) if occurrence <= self.cutoff => Some(occurrence),
            _ => {
                self.done = true;
                None
            }
        }
    }
}

/// Due occurrences of a template anchored at `anchor`, up to and including `now`.
///
/// Daily and weekly occurrences are compared against `now` by elapsed
/// wall-clock time. Monthly occurrences fall on the anchor's day of month
/// (clamped to the month's last day) at the anchor's time of day, in each
/// month after the anchor's month. A clamped occurrence becomes due at its
/// clamped instant: a Jan 31 series is not due for February until Feb 28
/// (or 29) at the anchor's time. Use [`occurrence_in_month`] to produce a
/// month's occurrence ahead of that instant.
pub fn occurrences<C: Calendar + ?Sized>(
    calendar: &C,
    anchor: NaiveDateTime,
    interval: RecurringInterval,
    now: NaiveDateTime,
) -> Occurrences<'_, C> {
    Occurrences {
        calendar,
        anchor,
        interval,
        cutoff: now,
        step: 0,
        done: false,
    }
}

/// The occurrence of a monthly series anchored at `anchor` that falls in `month`.
///
/// `None` when `month` is not after the anchor's month.
pub fn occurrence_in_month<C: Calendar + ?Sized>(
    calendar: &C,
    anchor: NaiveDateTime,
    month: MonthKey,
) -> Option<NaiveDateTime> {
    let steps = months_between(MonthKey::from_datetime(anchor), month)?;
    calendar.add_months(anchor, steps)
}

/// Number of months from `from` forward to `to`, if `to` is strictly later.
fn months_between(from: MonthKey, to: MonthKey) -> Option<u32> {
    let ordinal = |key: MonthKey| i64::from(key.year) * 12 + i64::from(key.month);
    let diff = ordinal(to) - ordinal(from);
    if diff > 0 {
        u32::try_from(diff).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::calendar::GregorianCalendar;
    use chrono::{Duration, NaiveDate};

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn collect(
        anchor: NaiveDateTime,
        interval: RecurringInterval,
        now: NaiveDateTime,
    ) -> Vec<NaiveDateTime> {
        occurrences(&GregorianCalendar::default(), anchor, interval, now).collect()
    }

    #[test]
    fn test_daily_catch_up_counts_elapsed_days() {
        let now = at(2025, 6, 10, 12, 0);
        for n in 1..=10 {
            let anchor = now - Duration::days(n);
            let due = collect(anchor, RecurringInterval::Daily, now);
            assert_eq!(due.len(), usize::try_from(n).unwrap());
            assert_eq!(due.last(), Some(&now));
        }
    }

    #[test]
    fn test_daily_requires_a_full_day() {
        let now = at(2025, 6, 10, 12, 0);
        assert!(collect(now - Duration::hours(23), RecurringInterval::Daily, now).is_empty());
        assert_eq!(
            collect(now - Duration::hours(24), RecurringInterval::Daily, now),
            vec![now]
        );
        assert!(collect(now, RecurringInterval::Daily, now).is_empty());
    }

    #[test]
    fn test_weekly_boundaries() {
        let now = at(2025, 6, 10, 12, 0);
        assert!(collect(now - Duration::days(6), RecurringInterval::Weekly, now).is_empty());
        assert_eq!(
            collect(now - Duration::days(7), RecurringInterval::Weekly, now).len(),
            1
        );

        let anchor = now - Duration::days(21);
        assert_eq!(
            collect(anchor, RecurringInterval::Weekly, now),
            vec![
                anchor + Duration::days(7),
                anchor + Duration::days(14),
                anchor + Duration::days(21),
            ]
        );
    }

    #[test]
    fn test_monthly_same_month_is_not_due() {
        let anchor = at(2025, 3, 6, 9, 0);
        let now = at(2025, 3, 11, 9, 0);
        assert!(collect(anchor, RecurringInterval::Monthly, now).is_empty());
    }

    #[test]
    fn test_monthly_preserves_day_and_time() {
        let anchor = at(2025, 1, 15, 9, 0);
        let now = at(2025, 2, 16, 0, 0);
        assert_eq!(
            collect(anchor, RecurringInterval::Monthly, now),
            vec![at(2025, 2, 15, 9, 0)]
        );
    }

    #[test]
    fn test_monthly_clamps_month_end_without_drift() {
        let anchor = at(2024, 1, 31, 10, 0);
        let now = at(2024, 5, 31, 10, 0);
        assert_eq!(
            collect(anchor, RecurringInterval::Monthly, now),
            vec![
                at(2024, 2, 29, 10, 0),
                at(2024, 3, 31, 10, 0),
                at(2024, 4, 30, 10, 0),
                at(2024, 5, 31, 10, 0),
            ]
        );
    }

    #[test]
    fn test_monthly_stops_before_future_occurrence_in_current_month() {
        let anchor = at(2025, 1, 31, 10, 0);
        // February's occurrence is clamped to the 28th, which is still ahead
        assert!(collect(anchor, RecurringInterval::Monthly, at(2025, 2, 1, 8, 0)).is_empty());
        assert_eq!(
            collect(anchor, RecurringInterval::Monthly, at(2025, 2, 28, 10, 0)),
            vec![at(2025, 2, 28, 10, 0)]
        );
    }

    #[test]
    fn test_monthly_crosses_year_boundary() {
        let anchor = at(2024, 11, 20, 8, 30);
        let now = at(2025, 2, 20, 8, 30);
        assert_eq!(
            collect(anchor, RecurringInterval::Monthly, now),
            vec![
                at(2024, 12, 20, 8, 30),
                at(2025, 1, 20, 8, 30),
                at(2025, 2, 20, 8, 30),
            ]
        );
    }

    #[test]
    fn test_cutoff_before_anchor_yields_nothing() {
        let anchor = at(2025, 6, 10, 12, 0);
        let now = at(2025, 1, 1, 0, 0);
        assert!(collect(anchor, RecurringInterval::Daily, now).is_empty());
        assert!(collect(anchor, RecurringInterval::Monthly, now).is_empty());
    }

    #[test]
    fn test_schedule_is_repeatable() {
        let anchor = at(2024, 8, 31, 7, 0);
        let now = at(2025, 3, 1, 0, 0);
        let first = collect(anchor, RecurringInterval::Monthly, now);
        let second = collect(anchor, RecurringInterval::Monthly, now);
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
    }

    #[test]
    fn test_occurrence_in_month() {
        let cal = GregorianCalendar::default();
        let anchor = at(2024, 1, 31, 18, 0);

        assert_eq!(
            occurrence_in_month(&cal, anchor, MonthKey::new(2024, 2).unwrap()),
            Some(at(2024, 2, 29, 18, 0))
        );
        assert_eq!(
            occurrence_in_month(&cal, anchor, MonthKey::new(2025, 6).unwrap()),
            Some(at(2025, 6, 30, 18, 0))
        );
        assert_eq!(
            occurrence_in_month(&cal, anchor, MonthKey::new(2024, 1).unwrap()),
            None
        );
        assert_eq!(
            occurrence_in_month(&cal, anchor, MonthKey::new(2023, 12).unwrap()),
            None
        );
    }
}
