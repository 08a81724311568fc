//! Shared test utilities for `moneytrack`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating plain transactions and recurring templates with sensible defaults.

use crate::{
    core::{
        materializer::build_instance,
        transaction::{self, NewTransaction},
    },
    entities::{self, Transaction},
    errors::Result,
    models::{Category, PaymentMethod, RecurringInterval, TransactionKind},
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use uuid::Uuid;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a wall-clock instant.
///
/// # Panics
/// Panics on an invalid date or time; tests only.
#[allow(clippy::unwrap_used)]
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Creates a plain transaction with sensible defaults.
///
/// # Defaults
/// * amount: 12.5
/// * category: Food
/// * `payment_method`: Cash
/// * merchant: "Test Cafe"
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    date: NaiveDateTime,
) -> Result<entities::transaction::Model> {
    transaction::create_transaction(
        db,
        NewTransaction {
            date,
            amount: 12.5,
            category: Category::Food,
            payment_method: Some(PaymentMethod::Cash),
            notes: None,
            merchant: Some("Test Cafe".to_string()),
            kind: TransactionKind::Expense,
        },
    )
    .await
}

/// Creates a recurring template anchored at `anchor`.
///
/// # Defaults
/// * amount: 1500.0
/// * category: Housing
/// * merchant: "Monthly Rent"
/// * `payment_method`: Debit
pub async fn create_test_template(
    db: &DatabaseConnection,
    interval: RecurringInterval,
    anchor: NaiveDateTime,
) -> Result<entities::transaction::Model> {
    create_custom_template(db, interval, anchor, 1500.0, "Housing", Some("Monthly Rent")).await
}

/// Creates a recurring template with custom descriptive fields.
pub async fn create_custom_template(
    db: &DatabaseConnection,
    interval: RecurringInterval,
    anchor: NaiveDateTime,
    amount: f64,
    category: &str,
    merchant: Option<&str>,
) -> Result<entities::transaction::Model> {
    let plain = transaction::create_transaction(
        db,
        NewTransaction {
            date: anchor,
            amount,
            category: Category::from_raw(category),
            payment_method: Some(PaymentMethod::Debit),
            notes: Some("Set up as recurring".to_string()),
            merchant: merchant.map(str::to_string),
            kind: TransactionKind::Expense,
        },
    )
    .await?;
    transaction::make_recurring(db, plain.id, interval).await
}

/// An unsaved template record dated `date`, with a fresh group id.
pub fn template_model(date: NaiveDateTime) -> entities::transaction::Model {
    entities::transaction::Model {
        id: Uuid::new_v4(),
        date,
        amount: 1500.0,
        category: "Housing".to_string(),
        payment_method: Some("Debit".to_string()),
        notes: None,
        merchant: Some("Monthly Rent".to_string()),
        kind: TransactionKind::Expense.as_raw(),
        is_template: true,
        recurring_interval: Some("monthly".to_string()),
        recurring_group_id: Some(Uuid::new_v4()),
        generated_from_recurring_id: None,
        created_at: date,
    }
}

/// An unsaved instance of `template` dated `date`.
pub fn generated_instance(
    template: &entities::transaction::Model,
    date: NaiveDateTime,
) -> entities::transaction::Model {
    let group_id = template.recurring_group_id.unwrap_or_else(Uuid::new_v4);
    build_instance(template, group_id, date, date)
}

/// Instances stored for `group_id`, oldest first.
pub async fn get_instances(
    db: &DatabaseConnection,
    group_id: Uuid,
) -> Result<Vec<entities::transaction::Model>> {
    transaction::get_instances_for_group(db, group_id).await
}

/// Number of stored instances generated for `group_id`.
pub async fn count_generated_instances(db: &DatabaseConnection, group_id: Uuid) -> Result<usize> {
    Ok(get_instances(db, group_id).await?.len())
}

/// Number of stored transactions of any kind.
pub async fn count_all_transactions(db: &DatabaseConnection) -> Result<u64> {
    Ok(Transaction::find().count(db).await?)
}
