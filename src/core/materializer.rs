//! Idempotent materialization of a single occurrence.
//!
//! For one template and one due date the materializer checks whether the
//! series already has an instance in the matching calendar period (day, week
//! or month) and stages a new instance only when it does not. At most one
//! instance exists per `(group id, period)` pair.

use crate::{
    core::{calendar::Calendar, store::RecurringStore},
    entities::transaction,
    errors::Result,
    models::RecurringInterval,
};
use chrono::{Local, NaiveDateTime};
use tracing::debug;
use uuid::Uuid;

/// Result of materializing one occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum Materialized {
    /// A new instance was staged.
    Created(transaction::Model),
    /// The period already had an instance; nothing was staged.
    AlreadyExists,
    /// The occurrence's period cannot be represented; nothing was staged.
    OutOfRange,
}

/// Half-open `[start, end)` period of `interval` that contains `occurrence`.
///
/// `None` if the period end is outside the representable range.
pub fn period_bounds<C: Calendar + ?Sized>(
    calendar: &C,
    interval: RecurringInterval,
    occurrence: NaiveDateTime,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    match interval {
        RecurringInterval::Daily => {
            let start = calendar.start_of_day(occurrence);
            calendar.add_days(start, 1).map(|end| (start, end))
        }
        RecurringInterval::Weekly => {
            let start = calendar.start_of_week(occurrence);
            calendar.add_days(start, 7).map(|end| (start, end))
        }
        RecurringInterval::Monthly => {
            let start = calendar.start_of_month(occurrence);
            calendar.add_months(start, 1).map(|end| (start, end))
        }
    }
}

/// Builds the instance of `template` for `occurrence`.
///
/// Descriptive fields are copied verbatim; the instance is never a template
/// and carries the group id both as its own group and as its source.
#[must_use]
pub fn build_instance(
    template: &transaction::Model,
    group_id: Uuid,
    occurrence: NaiveDateTime,
    created_at: NaiveDateTime,
) -> transaction::Model {
    transaction::Model {
        id: Uuid::new_v4(),
        date: occurrence,
        amount: template.amount,
        category: template.category.clone(),
        payment_method: template.payment_method.clone(),
        notes: template.notes.clone(),
        merchant: template.merchant.clone(),
        kind: template.kind,
        is_template: false,
        recurring_interval: None,
        recurring_group_id: Some(group_id),
        generated_from_recurring_id: Some(group_id),
        created_at,
    }
}

/// Stages an instance of `template` for `occurrence` unless its period is already covered.
///
/// Nothing is committed here; the caller commits once per generation pass.
pub async fn materialize<S, C>(
    store: &mut S,
    calendar: &C,
    template: &transaction::Model,
    group_id: Uuid,
    interval: RecurringInterval,
    occurrence: NaiveDateTime,
) -> Result<Materialized>
where
    S: RecurringStore + ?Sized,
    C: Calendar + ?Sized,
{
    let Some((start, end)) = period_bounds(calendar, interval, occurrence) else {
        debug!(%group_id, %occurrence, "Occurrence period out of range, skipping");
        return Ok(Materialized::OutOfRange);
    };

    if store.instance_exists(group_id, start, end).await? {
        debug!(%group_id, %occurrence, "Instance already present for period");
        return Ok(Materialized::AlreadyExists);
    }

    let instance = build_instance(template, group_id, occurrence, Local::now().naive_local());
    store.insert(instance.clone()).await?;
    Ok(Materialized::Created(instance))
}
