#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use finmate_core::{
    config::ConfigManager,
    domain::{Income, OutboundMessage, Transaction, UserProfile},
    errors::TransportError,
    realtime::LiveConnection,
    storage::MemoryStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a config manager backed by a unique directory for each test.
pub fn temp_config_manager() -> ConfigManager {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    ConfigManager::with_base_dir(base)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn expense(amount: f64, category: &str, on: NaiveDate) -> Transaction {
    let at = Utc
        .from_local_datetime(&on.and_hms_opt(10, 0, 0).expect("valid time"))
        .single()
        .expect("unambiguous utc time");
    Transaction::new(amount, category, at)
}

pub fn income(amount: f64, on: NaiveDate) -> Income {
    let at = Utc
        .from_local_datetime(&on.and_hms_opt(8, 0, 0).expect("valid time"))
        .single()
        .expect("unambiguous utc time");
    Income::new(amount, "Salary", at)
}

/// A store holding one user with a 1000 budget and 2000 income.
pub async fn seeded_store(user: u64) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .upsert_profile(UserProfile::new(user, 1000.0, 2000.0))
        .await;
    store
}

/// How a [`FakeConnection`] answers sends and pings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Healthy,
    FailSends,
    Stall,
    IgnorePings,
}

/// In-memory connection that records every payload it accepts.
pub struct FakeConnection {
    behavior: Mutex<Behavior>,
    open: AtomicBool,
    received: Mutex<Vec<String>>,
}

impl FakeConnection {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(behavior),
            open: AtomicBool::new(true),
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn healthy() -> Arc<Self> {
        Self::new(Behavior::Healthy)
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().expect("behavior lock") = behavior;
    }

    fn behavior(&self) -> Behavior {
        *self.behavior.lock().expect("behavior lock")
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().expect("received lock").clone()
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.received()
            .iter()
            .map(|payload| serde_json::from_str(payload).expect("valid outbound message"))
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        !self.open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LiveConnection for FakeConnection {
    async fn send(&self, payload: &str) -> Result<(), TransportError> {
        match self.behavior() {
            Behavior::FailSends => Err(TransportError::Failed("connection reset".into())),
            Behavior::Stall => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
            Behavior::Healthy | Behavior::IgnorePings => {
                self.received
                    .lock()
                    .expect("received lock")
                    .push(payload.to_string());
                Ok(())
            }
        }
    }

    async fn ping(&self) -> Result<(), TransportError> {
        match self.behavior() {
            Behavior::IgnorePings | Behavior::Stall => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
            Behavior::FailSends => Err(TransportError::Closed),
            Behavior::Healthy => Ok(()),
        }
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}
