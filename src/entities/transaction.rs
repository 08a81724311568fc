//! Transaction entity - Represents every logged expense, income or transfer.
//!
//! The same table holds plain transactions, recurring templates and the
//! instances generated from them. The recurring columns (`is_template`,
//! `recurring_interval`, `recurring_group_id`, `generated_from_recurring_id`)
//! are decoded into a [`RecurrenceRole`] by [`Model::role`].

use crate::models::{Category, PaymentMethod, RecurrenceRole, RecurringInterval, TransactionKind};
use sea_orm::{Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier, assigned at creation and never reused
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Wall-clock date and time at which the transaction takes effect
    pub date: DateTime,
    /// Non-negative amount in the base currency; direction comes from `kind`
    pub amount: f64,
    /// Raw category value (see [`Category`])
    pub category: String,
    /// Raw payment method value (see [`PaymentMethod`])
    pub payment_method: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Merchant or payee
    pub merchant: Option<String>,
    /// Raw kind code: 0 expense, 1 income, 2 transfer
    pub kind: i16,
    /// True only for the definition of a recurring series
    pub is_template: bool,
    /// Raw interval of a template: `"daily"`, `"weekly"` or `"monthly"`
    pub recurring_interval: Option<String>,
    /// Identifier shared by a template and all of its instances
    pub recurring_group_id: Option<Uuid>,
    /// Group id of the template that produced this instance
    pub generated_from_recurring_id: Option<Uuid>,
    /// When the record was created
    pub created_at: DateTime,
}

/// Transactions have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Decoded category.
    #[must_use]
    pub fn category(&self) -> Category {
        Category::from_raw(&self.category)
    }

    /// Decoded payment method; absent values read as [`PaymentMethod::Other`].
    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
            .as_deref()
            .map_or(PaymentMethod::Other, PaymentMethod::from_raw)
    }

    /// Decoded kind.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        TransactionKind::from_raw(self.kind)
    }

    /// Decoded interval, `None` when absent or unrecognised.
    #[must_use]
    pub fn recurring_interval(&self) -> Option<RecurringInterval> {
        self.recurring_interval
            .as_deref()
            .and_then(RecurringInterval::from_raw)
    }

    /// Active model with every column set, ready for insertion.
    #[must_use]
    pub fn into_insertable(self) -> ActiveModel {
        ActiveModel {
            id: Set(self.id),
            date: Set(self.date),
            amount: Set(self.amount),
            category: Set(self.category),
            payment_method: Set(self.payment_method),
            notes: Set(self.notes),
            merchant: Set(self.merchant),
            kind: Set(self.kind),
            is_template: Set(self.is_template),
            recurring_interval: Set(self.recurring_interval),
            recurring_group_id: Set(self.recurring_group_id),
            generated_from_recurring_id: Set(self.generated_from_recurring_id),
            created_at: Set(self.created_at),
        }
    }

    /// The record's place in a recurring series.
    ///
    /// A generated instance is never a template, whatever its other flags say.
    /// A record flagged as a template without both an interval and a group id
    /// is treated as plain.
    #[must_use]
    pub fn role(&self) -> RecurrenceRole {
        if let Some(group_id) = self.generated_from_recurring_id {
            return RecurrenceRole::Generated { group_id };
        }
        match (self.is_template, self.recurring_interval(), self.recurring_group_id) {
            (true, Some(interval), Some(group_id)) => {
                RecurrenceRole::Template { interval, group_id }
            }
            _ => RecurrenceRole::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Model {
        let at = NaiveDate::from_ymd_opt(2025, 1, 15)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap_or_default();
        Model {
            id: Uuid::new_v4(),
            date: at,
            amount: 1500.0,
            category: "Housing".to_string(),
            payment_method: Some("Debit".to_string()),
            notes: None,
            merchant: Some("Monthly Rent".to_string()),
            kind: 0,
            is_template: false,
            recurring_interval: None,
            recurring_group_id: None,
            generated_from_recurring_id: None,
            created_at: at,
        }
    }

    #[test]
    fn test_role_plain() {
        assert_eq!(sample().role(), RecurrenceRole::Plain);
    }

    #[test]
    fn test_role_template() {
        let group_id = Uuid::new_v4();
        let model = Model {
            is_template: true,
            recurring_interval: Some("weekly".to_string()),
            recurring_group_id: Some(group_id),
            ..sample()
        };
        assert_eq!(
            model.role(),
            RecurrenceRole::Template {
                interval: RecurringInterval::Weekly,
                group_id
            }
        );
    }

    #[test]
    fn test_role_generated_wins_over_template_flag() {
        let group_id = Uuid::new_v4();
        let model = Model {
            is_template: true,
            recurring_interval: Some("monthly".to_string()),
            recurring_group_id: Some(group_id),
            generated_from_recurring_id: Some(group_id),
            ..sample()
        };
        assert_eq!(model.role(), RecurrenceRole::Generated { group_id });
    }

    #[test]
    fn test_role_template_without_schedule_is_plain() {
        let no_interval = Model {
            is_template: true,
            recurring_group_id: Some(Uuid::new_v4()),
            ..sample()
        };
        assert_eq!(no_interval.role(), RecurrenceRole::Plain);

        let bad_interval = Model {
            is_template: true,
            recurring_interval: Some("fortnightly".to_string()),
            recurring_group_id: Some(Uuid::new_v4()),
            ..sample()
        };
        assert_eq!(bad_interval.role(), RecurrenceRole::Plain);

        let no_group = Model {
            is_template: true,
            recurring_interval: Some("daily".to_string()),
            ..sample()
        };
        assert_eq!(no_group.role(), RecurrenceRole::Plain);
    }

    #[test]
    fn test_decoded_fields() {
        let model = Model {
            payment_method: None,
            kind: 1,
            ..sample()
        };
        assert_eq!(model.category(), Category::Housing);
        assert_eq!(model.payment_method(), PaymentMethod::Other);
        assert_eq!(model.kind(), TransactionKind::Income);
    }
}
