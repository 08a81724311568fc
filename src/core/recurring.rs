//! Recurring transaction generation.
//!
//! The engine walks every recurring template, asks the scheduler which
//! occurrences are due, materializes the missing ones and commits once at the
//! end of the pass. Two entry points exist:
//!
//! * [`RecurringEngine::generate_due_transactions`] catches every template up
//!   to a given instant. This is what runs on launch or when the app returns
//!   to the foreground.
//! * [`RecurringEngine::generate_for_month`] produces the occurrence of every
//!   monthly template in one explicit month.
//!
//! Read failures never abort a pass: a failed template query yields an empty
//! pass and a failed existence check skips that occurrence. A failed commit is
//! returned to the caller and leaves the store unchanged.

use crate::{
    core::{
        calendar::{Calendar, GregorianCalendar},
        materializer::{Materialized, materialize},
        scheduler,
        store::{RecurringStore, SeaOrmStore},
        system_state,
    },
    entities::transaction,
    errors::Result,
    models::{MonthKey, RecurrenceRole, RecurringInterval},
};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use std::fmt::{self, Write};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// What a generation pass was asked to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationScope {
    /// Every template, every occurrence up to and including the instant.
    CatchUp(NaiveDateTime),
    /// Monthly templates, the occurrence within the month only.
    Month(MonthKey),
}

impl fmt::Display for GenerationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatchUp(as_of) => write!(f, "Catch-up as of {}", as_of.format("%Y-%m-%d %H:%M")),
            Self::Month(month) => write!(f, "Month of {month}"),
        }
    }
}

/// Outcome of one generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// What the pass covered
    pub scope: GenerationScope,
    /// Templates with a valid schedule that were evaluated
    pub templates_processed: usize,
    /// Template-flagged records skipped for lacking a usable interval or group id
    pub templates_skipped: usize,
    /// Due occurrences whose period already had an instance
    pub already_present: usize,
    /// Due occurrences skipped because the existence check failed
    pub read_failures: usize,
    /// Due occurrences skipped because their period cannot be represented
    pub out_of_range: usize,
    /// Instances created and committed by this pass, in generation order
    pub created: Vec<transaction::Model>,
}

impl GenerationReport {
    const fn new(scope: GenerationScope) -> Self {
        Self {
            scope,
            templates_processed: 0,
            templates_skipped: 0,
            already_present: 0,
            read_failures: 0,
            out_of_range: 0,
            created: Vec::new(),
        }
    }
}

/// A template ready for scheduling.
struct Schedule {
    template: transaction::Model,
    interval: RecurringInterval,
    group_id: Uuid,
}

/// Generates recurring transaction instances against an injected store and calendar.
///
/// Generation methods take `&mut self`, so passes on one engine never overlap.
#[derive(Debug)]
pub struct RecurringEngine<S, C = GregorianCalendar> {
    store: S,
    calendar: C,
}

impl<S: RecurringStore, C: Calendar> RecurringEngine<S, C> {
    /// Creates an engine over `store` using `calendar` for date arithmetic.
    pub const fn new(store: S, calendar: C) -> Self {
        Self { store, calendar }
    }

    /// Materializes every occurrence due up to and including `now`, for every template.
    ///
    /// Calling this again with the same `now` creates nothing new.
    #[instrument(skip(self))]
    pub async fn generate_due_transactions(&mut self, now: NaiveDateTime) -> Result<GenerationReport> {
        let mut report = GenerationReport::new(GenerationScope::CatchUp(now));

        for schedule in self.load_schedules(&mut report).await {
            report.templates_processed += 1;
            let due: Vec<NaiveDateTime> = scheduler::occurrences(
                &self.calendar,
                schedule.template.date,
                schedule.interval,
                now,
            )
            .collect();
            debug!(
                group_id = %schedule.group_id,
                interval = %schedule.interval,
                due = due.len(),
                "Evaluated template"
            );

            for occurrence in due {
                self.materialize_one(&schedule, occurrence, &mut report).await;
            }
        }

        self.finish(report).await
    }

    /// Materializes the occurrence in `month` of every monthly template anchored before it.
    ///
    /// Unlike the catch-up, this is not bounded by the current time.
    #[instrument(skip(self))]
    pub async fn generate_for_month(&mut self, month: MonthKey) -> Result<GenerationReport> {
        let mut report = GenerationReport::new(GenerationScope::Month(month));

        for schedule in self.load_schedules(&mut report).await {
            if schedule.interval != RecurringInterval::Monthly {
                continue;
            }
            report.templates_processed += 1;

            if let Some(occurrence) =
                scheduler::occurrence_in_month(&self.calendar, schedule.template.date, month)
            {
                self.materialize_one(&schedule, occurrence, &mut report).await;
            }
        }

        self.finish(report).await
    }

    async fn load_schedules(&self, report: &mut GenerationReport) -> Vec<Schedule> {
        let templates = match self.store.fetch_recurring_templates().await {
            Ok(templates) => templates,
            Err(e) => {
                warn!("Failed to load recurring templates, nothing to generate: {}", e);
                return Vec::new();
            }
        };

        let mut schedules = Vec::with_capacity(templates.len());
        for template in templates {
            match template.role() {
                RecurrenceRole::Template { interval, group_id } => schedules.push(Schedule {
                    template,
                    interval,
                    group_id,
                }),
                RecurrenceRole::Plain | RecurrenceRole::Generated { .. } => {
                    debug!(
                        id = %template.id,
                        interval = ?template.recurring_interval,
                        "Skipping template without a usable schedule"
                    );
                    report.templates_skipped += 1;
                }
            }
        }
        schedules
    }

    async fn materialize_one(
        &mut self,
        schedule: &Schedule,
        occurrence: NaiveDateTime,
        report: &mut GenerationReport,
    ) {
        let outcome = materialize(
            &mut self.store,
            &self.calendar,
            &schedule.template,
            schedule.group_id,
            schedule.interval,
            occurrence,
        )
        .await;

        match outcome {
            Ok(Materialized::Created(instance)) => report.created.push(instance),
            Ok(Materialized::AlreadyExists) => report.already_present += 1,
            Ok(Materialized::OutOfRange) => report.out_of_range += 1,
            Err(e) => {
                warn!(
                    group_id = %schedule.group_id,
                    %occurrence,
                    "Skipping occurrence, existence check failed: {}", e
                );
                report.read_failures += 1;
            }
        }
    }

    async fn finish(&mut self, report: GenerationReport) -> Result<GenerationReport> {
        let written = self.store.commit().await?;
        info!(
            scope = %report.scope,
            templates = report.templates_processed,
            created = written,
            "Recurring generation pass complete"
        );
        Ok(report)
    }
}

/// Runs the launch-time catch-up against a database and records when it ran.
///
/// The run time is only recorded after a successful commit. Bookkeeping is
/// best-effort: failing to read or record it never fails the pass.
pub async fn catch_up<C: Calendar>(
    db: &DatabaseConnection,
    calendar: C,
    now: NaiveDateTime,
) -> Result<GenerationReport> {
    match system_state::get_last_generation_run(db).await {
        Ok(Some(previous)) => debug!("Previous generation pass ran at {}", previous),
        Ok(None) => debug!("No previous generation pass recorded"),
        Err(e) => warn!("Ignoring unreadable last generation run: {}", e),
    }

    let mut engine = RecurringEngine::new(SeaOrmStore::new(db), calendar);
    let report = engine.generate_due_transactions(now).await?;

    if let Err(e) = system_state::set_last_generation_run(db, now).await {
        warn!("Generated instances were saved but the run time was not: {}", e);
    }
    Ok(report)
}

/// Formats a generation report into a human-readable summary.
#[must_use]
pub fn format_generation_summary(report: &GenerationReport) -> String {
    let mut summary = format!(
        "Recurring Generation - {} - Processed {} templates\n",
        report.scope, report.templates_processed
    );

    // Writing to a String cannot fail
    let _ = write!(
        summary,
        "  Created: {} | Already present: {} | Skipped templates: {}",
        report.created.len(),
        report.already_present,
        report.templates_skipped
    );
    if report.read_failures > 0 {
        let _ = write!(summary, " | Read failures: {}", report.read_failures);
    }
    if report.out_of_range > 0 {
        let _ = write!(summary, " | Out of range: {}", report.out_of_range);
    }
    summary.push('\n');

    for instance in &report.created {
        let _ = writeln!(
            summary,
            "  {} - {} | ${:.2} ({})",
            instance.date.format("%Y-%m-%d"),
            instance.category(),
            instance.amount,
            instance.merchant.as_deref().unwrap_or("no merchant")
        );
    }

    summary
}
