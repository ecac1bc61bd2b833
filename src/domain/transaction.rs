use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Amounted;

const UNCATEGORIZED: &str = "Other";

/// An expense recorded by the transaction-entry collaborator. Never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_recurring: bool,
}

impl Transaction {
    pub fn new(amount: f64, category: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        let category = category.into();
        let category = if category.trim().is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            category
        };
        Self {
            id: Uuid::new_v4(),
            amount,
            category,
            merchant: None,
            timestamp,
            is_recurring: false,
        }
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    /// Marks the expense as a recurring charge (subscription).
    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    pub fn occurred_on(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Merchant when known, otherwise the category.
    pub fn label(&self) -> &str {
        self.merchant.as_deref().unwrap_or(&self.category)
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// Income recorded for a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Income {
    pub id: Uuid,
    pub amount: f64,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_recurring: bool,
}

impl Income {
    pub fn new(amount: f64, source: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            source: source.into(),
            timestamp,
            is_recurring: false,
        }
    }

    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    pub fn occurred_on(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

impl Amounted for Income {
    fn amount(&self) -> f64 {
        self.amount
    }
}
