//! Transaction business logic - Handles logging transactions and marking them recurring.
//!
//! A plain transaction becomes the template of a recurring series through
//! [`make_recurring`]; the recurring engine then derives instances from it.
//! Instances and templates live in the same table and are told apart by their
//! recurring columns.

use crate::{
    entities::{Transaction, transaction},
    errors::{Error, Result},
    models::{Category, PaymentMethod, RecurrenceRole, RecurringInterval, TransactionKind},
};
use chrono::{Local, NaiveDateTime};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Fields supplied when logging a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// When the transaction takes effect
    pub date: NaiveDateTime,
    /// Non-negative amount
    pub amount: f64,
    /// Spending category
    pub category: Category,
    /// How it was paid, if recorded
    pub payment_method: Option<PaymentMethod>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Merchant or payee
    pub merchant: Option<String>,
    /// Expense, income or transfer
    pub kind: TransactionKind,
}

/// Logs a new, non-recurring transaction.
///
/// The amount must be finite and non-negative; direction is carried by `kind`.
pub async fn create_transaction(
    db: &DatabaseConnection,
    new: NewTransaction,
) -> Result<transaction::Model> {
    if !new.amount.is_finite() || new.amount < 0.0 {
        return Err(Error::InvalidAmount { amount: new.amount });
    }

    let model = transaction::Model {
        id: Uuid::new_v4(),
        date: new.date,
        amount: new.amount,
        category: new.category.as_str().to_string(),
        payment_method: new.payment_method.map(|p| p.as_str().to_string()),
        notes: new.notes,
        merchant: new.merchant,
        kind: new.kind.as_raw(),
        is_template: false,
        recurring_interval: None,
        recurring_group_id: None,
        generated_from_recurring_id: None,
        created_at: Local::now().naive_local(),
    };

    model.into_insertable().insert(db).await.map_err(Into::into)
}

/// Turns an existing transaction into the template of a recurring series.
///
/// The transaction's own date becomes the series anchor. A transaction that
/// already belongs to a group keeps its group id, so changing the interval of
/// an existing template does not orphan its instances.
pub async fn make_recurring(
    db: &DatabaseConnection,
    id: Uuid,
    interval: RecurringInterval,
) -> Result<transaction::Model> {
    let existing = Transaction::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::TransactionNotFound { id })?;

    if let RecurrenceRole::Generated { .. } = existing.role() {
        return Err(Error::GeneratedInstance { id });
    }

    let group_id = existing.recurring_group_id.unwrap_or_else(Uuid::new_v4);

    let mut active: transaction::ActiveModel = existing.into();
    active.is_template = Set(true);
    active.recurring_interval = Set(Some(interval.as_str().to_string()));
    active.recurring_group_id = Set(Some(group_id));
    let template = active.update(db).await?;

    info!(%id, %group_id, %interval, "Transaction marked recurring");
    Ok(template)
}

/// Retrieves a transaction by id, `None` if it doesn't exist.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(id).one(db).await.map_err(Into::into)
}

/// All instances generated for a recurring group, oldest first.
pub async fn get_instances_for_group(
    db: &DatabaseConnection,
    group_id: Uuid,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::GeneratedFromRecurringId.eq(group_id))
        .order_by_asc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a transaction.
///
/// Deleting a template stops future generation for its group; instances
/// already generated are kept.
pub async fn delete_transaction(db: &DatabaseConnection, id: Uuid) -> Result<()> {
    let result = Transaction::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::TransactionNotFound { id });
    }
    Ok(())
}
