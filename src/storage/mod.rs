pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    domain::{Income, ProgressionState, Transaction, UserId, UserProfile},
    errors::StoreError,
};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Read-only access to recorded expenses and income. Date bounds are inclusive.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn expenses_between(
        &self,
        user: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>>;

    async fn income_between(
        &self,
        user: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Income>>;
}

/// User profile lookup and progression persistence.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user: UserId) -> Result<UserProfile>;

    /// Replaces the stored progression with `updated` only if it still equals `expected`.
    ///
    /// Returns [`StoreError::Contention`] when another writer got there first; the
    /// caller must retry the whole action.
    async fn persist_progression(
        &self,
        user: UserId,
        expected: ProgressionState,
        updated: ProgressionState,
    ) -> Result<()>;
}

pub use memory::MemoryStore;
