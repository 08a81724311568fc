//! Domain enumerations decoded from persisted raw values.
//!
//! Categories, payment methods and transaction kinds are stored as raw strings
//! (or a small integer for the kind). Decoding never fails: values written by a
//! newer or older version of the app land in an `Unknown` variant that keeps
//! the raw value, so copying a template into an instance is lossless.

use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Spending category of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Rent, mortgage
    Housing,
    /// Utilities, phone, insurance
    FixedBills,
    /// Groceries and eating out
    Food,
    /// Fuel, transit, car
    Transportation,
    /// Medical and pharmacy
    Healthcare,
    /// Entertainment and leisure
    FunLifestyle,
    /// General shopping
    Shopping,
    /// Recurring digital services
    Subscriptions,
    /// Money put aside
    Savings,
    /// Brokerage and retirement contributions
    Investing,
    /// Trips
    Travel,
    /// Presents
    Gifts,
    /// Anything else
    Misc,
    /// A persisted value this version does not recognise
    Unknown(String),
}

impl Category {
    /// Every known category, in display order.
    pub const ALL: [Self; 13] = [
        Self::Housing,
        Self::FixedBills,
        Self::Food,
        Self::Transportation,
        Self::Healthcare,
        Self::FunLifestyle,
        Self::Shopping,
        Self::Subscriptions,
        Self::Savings,
        Self::Investing,
        Self::Travel,
        Self::Gifts,
        Self::Misc,
    ];

    /// Decodes a persisted raw value.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "Housing" => Self::Housing,
            "Fixed Bills" => Self::FixedBills,
            "Food" => Self::Food,
            "Transportation" => Self::Transportation,
            "Healthcare" => Self::Healthcare,
            "Fun/Lifestyle" => Self::FunLifestyle,
            "Shopping" => Self::Shopping,
            "Subscriptions" => Self::Subscriptions,
            "Savings" => Self::Savings,
            "Investing" => Self::Investing,
            "Travel" => Self::Travel,
            "Gifts" => Self::Gifts,
            "Misc" => Self::Misc,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The raw value as persisted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Housing => "Housing",
            Self::FixedBills => "Fixed Bills",
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Healthcare => "Healthcare",
            Self::FunLifestyle => "Fun/Lifestyle",
            Self::Shopping => "Shopping",
            Self::Subscriptions => "Subscriptions",
            Self::Savings => "Savings",
            Self::Investing => "Investing",
            Self::Travel => "Travel",
            Self::Gifts => "Gifts",
            Self::Misc => "Misc",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a transaction was paid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// Cash
    Cash,
    /// Debit card
    Debit,
    /// Credit card
    Credit,
    /// Apple Pay
    ApplePay,
    /// Venmo
    Venmo,
    /// Anything else
    Other,
    /// A persisted value this version does not recognise
    Unknown(String),
}

impl PaymentMethod {
    /// Decodes a persisted raw value.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "Cash" => Self::Cash,
            "Debit" => Self::Debit,
            "Credit" => Self::Credit,
            "Apple Pay" => Self::ApplePay,
            "Venmo" => Self::Venmo,
            "Other" => Self::Other,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The raw value as persisted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cash => "Cash",
            Self::Debit => "Debit",
            Self::Credit => "Credit",
            Self::ApplePay => "Apple Pay",
            Self::Venmo => "Venmo",
            Self::Other => "Other",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a transaction. The amount itself is always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Money out
    Expense,
    /// Money in
    Income,
    /// Movement between own accounts
    Transfer,
    /// A persisted code this version does not recognise
    Unknown(i16),
}

impl TransactionKind {
    /// Decodes the persisted integer code.
    #[must_use]
    pub const fn from_raw(raw: i16) -> Self {
        match raw {
            0 => Self::Expense,
            1 => Self::Income,
            2 => Self::Transfer,
            other => Self::Unknown(other),
        }
    }

    /// The persisted integer code.
    #[must_use]
    pub const fn as_raw(self) -> i16 {
        match self {
            Self::Expense => 0,
            Self::Income => 1,
            Self::Transfer => 2,
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => f.write_str("Expense"),
            Self::Income => f.write_str("Income"),
            Self::Transfer => f.write_str("Transfer"),
            Self::Unknown(raw) => write!(f, "Unknown({raw})"),
        }
    }
}

/// Schedule of a recurring template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringInterval {
    /// Every calendar day
    Daily,
    /// Every seven days
    Weekly,
    /// Same day of every month, clamped to the month's last day
    Monthly,
}

impl RecurringInterval {
    /// Decodes a persisted raw value. Unrecognised values yield `None`.
    #[must_use]
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// The raw value as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RecurringInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What part a transaction plays in a recurring series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceRole {
    /// An ordinary one-off transaction.
    Plain,
    /// The definition of a series; never regenerated itself.
    Template {
        /// Schedule of the series
        interval: RecurringInterval,
        /// Identifier shared by the template and its instances
        group_id: Uuid,
    },
    /// An instance produced from the template of `group_id`.
    Generated {
        /// Group id of the producing template
        group_id: Uuid,
    },
}

/// A calendar month, ordered by `(year, month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    /// Calendar year
    pub year: i32,
    /// Month of the year, 1 through 12
    pub month: u32,
}

impl MonthKey {
    /// Builds a key, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if (1..=12).contains(&month) && NaiveDate::from_ymd_opt(year, month, 1).is_some() {
            Ok(Self { year, month })
        } else {
            Err(Error::InvalidMonth {
                input: format!("{year}-{month:02}"),
            })
        }
    }

    /// The month containing `at`.
    #[must_use]
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// First day of the month, `None` if the year is outside chrono's range.
    #[must_use]
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonth {
            input: s.to_string(),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_day() {
            Some(day) => write!(f, "{}", day.format("%B %Y")),
            None => write!(f, "{}-{:02}", self.year, self.month),
        }
    }
}
