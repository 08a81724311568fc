//! Store access for the recurring engine.
//!
//! The engine only needs four capabilities from persistence: list templates,
//! check whether an instance exists for a group within a period, stage a new
//! record and commit the staged records. [`RecurringStore`] names exactly those;
//! [`SeaOrmStore`] implements them over a SeaORM connection.

use crate::{
    entities::{Transaction, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use sea_orm::{DatabaseConnection, QueryOrder, TransactionTrait, prelude::*};
use tracing::{debug, info, warn};

/// Persistence operations consumed by the recurring engine.
#[allow(async_fn_in_trait)]
pub trait RecurringStore {
    /// All records flagged as templates that were not themselves generated.
    async fn fetch_recurring_templates(&self) -> Result<Vec<transaction::Model>>;

    /// Whether an instance of `group_id` dated within `[period_start, period_end)` exists,
    /// counting records staged but not yet committed.
    async fn instance_exists(
        &self,
        group_id: Uuid,
        period_start: NaiveDateTime,
        period_end: NaiveDateTime,
    ) -> Result<bool>;

    /// Stages a fully populated record for the next commit.
    async fn insert(&mut self, instance: transaction::Model) -> Result<()>;

    /// Durably persists every staged record, all or nothing.
    /// Returns how many records were written; a no-op when nothing is staged.
    async fn commit(&mut self) -> Result<usize>;
}

/// [`RecurringStore`] backed by a SeaORM database connection.
///
/// Inserts are held in memory until [`RecurringStore::commit`], which writes
/// them inside a single database transaction.
#[derive(Debug)]
pub struct SeaOrmStore<'a> {
    db: &'a DatabaseConnection,
    staged: Vec<transaction::Model>,
}

impl<'a> SeaOrmStore<'a> {
    /// Wraps a database connection.
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            staged: Vec::new(),
        }
    }

    /// Records staged since the last commit.
    #[must_use]
    pub fn staged(&self) -> &[transaction::Model] {
        &self.staged
    }
}

impl RecurringStore for SeaOrmStore<'_> {
    async fn fetch_recurring_templates(&self) -> Result<Vec<transaction::Model>> {
        Transaction::find()
            .filter(transaction::Column::IsTemplate.eq(true))
            .filter(transaction::Column::GeneratedFromRecurringId.is_null())
            .order_by_asc(transaction::Column::Date)
            .all(self.db)
            .await
            .map_err(Into::into)
    }

    async fn instance_exists(
        &self,
        group_id: Uuid,
        period_start: NaiveDateTime,
        period_end: NaiveDateTime,
    ) -> Result<bool> {
        let staged = self.staged.iter().any(|t| {
            t.generated_from_recurring_id == Some(group_id)
                && t.date >= period_start
                && t.date < period_end
        });
        if staged {
            return Ok(true);
        }

        let count = Transaction::find()
            .filter(transaction::Column::GeneratedFromRecurringId.eq(group_id))
            .filter(transaction::Column::Date.gte(period_start))
            .filter(transaction::Column::Date.lt(period_end))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    async fn insert(&mut self, instance: transaction::Model) -> Result<()> {
        debug!(id = %instance.id, date = %instance.date, "Staging transaction");
        self.staged.push(instance);
        Ok(())
    }

    async fn commit(&mut self) -> Result<usize> {
        if self.staged.is_empty() {
            return Ok(0);
        }

        let staged = std::mem::take(&mut self.staged);
        let count = staged.len();

        let commit_error = |source| Error::Commit {
            staged: count,
            source,
        };

        let txn = self.db.begin().await.map_err(commit_error)?;
        for instance in staged {
            if let Err(source) = instance.into_insertable().insert(&txn).await {
                if let Err(e) = txn.rollback().await {
                    warn!("Rollback after failed insert also failed: {}", e);
                }
                return Err(commit_error(source));
            }
        }
        txn.commit().await.map_err(commit_error)?;

        info!("Committed {} generated transactions", count);
        Ok(count)
    }
}
