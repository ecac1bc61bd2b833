use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::{
    domain::{Income, ProgressionState, Transaction, UserId, UserProfile},
    errors::StoreError,
};

use super::{ProfileStore, Result, TransactionSource};

#[derive(Debug, Default)]
struct UserData {
    profile: Option<UserProfile>,
    expenses: Vec<Transaction>,
    income: Vec<Income>,
}

/// In-process store backing both data collaborators.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, UserData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert_profile(&self, profile: UserProfile) {
        let user_id = profile.user_id;
        let mut users = self.users.write().await;
        users.entry(user_id).or_default().profile = Some(profile);
    }

    pub async fn record_expense(&self, user: UserId, transaction: Transaction) {
        let mut users = self.users.write().await;
        users.entry(user).or_default().expenses.push(transaction);
    }

    pub async fn record_income(&self, user: UserId, income: Income) {
        let mut users = self.users.write().await;
        users.entry(user).or_default().income.push(income);
    }

    pub async fn progression(&self, user: UserId) -> Result<ProgressionState> {
        self.get(user).await.map(|profile| profile.progression)
    }
}

fn within(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}

#[async_trait]
impl TransactionSource for MemoryStore {
    async fn expenses_between(
        &self,
        user: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let users = self.users.read().await;
        Ok(users
            .get(&user)
            .map(|data| {
                data.expenses
                    .iter()
                    .filter(|txn| within(txn.occurred_on(), start, end))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn income_between(
        &self,
        user: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Income>> {
        let users = self.users.read().await;
        Ok(users
            .get(&user)
            .map(|data| {
                data.income
                    .iter()
                    .filter(|income| within(income.occurred_on(), start, end))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, user: UserId) -> Result<UserProfile> {
        let users = self.users.read().await;
        users
            .get(&user)
            .and_then(|data| data.profile.clone())
            .ok_or(StoreError::UserNotFound(user))
    }

    async fn persist_progression(
        &self,
        user: UserId,
        expected: ProgressionState,
        updated: ProgressionState,
    ) -> Result<()> {
        let mut users = self.users.write().await;
        let profile = users
            .get_mut(&user)
            .and_then(|data| data.profile.as_mut())
            .ok_or(StoreError::UserNotFound(user))?;
        if profile.progression != expected {
            return Err(StoreError::Contention(user));
        }
        profile.progression = updated;
        Ok(())
    }
}
