//! Test double for `PositionStore` with write failure and a save gate that holds
//! position writes in flight. The service's `InMemoryPositionStore` is the
//! production counterpart; this crate cannot depend on it.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use uuid::Uuid;

use crate::domain::{DailyCursor, ReadingPosition, VerseId};
use crate::ports::{PortError, PortResult, PositionStore};

#[derive(Default, Clone)]
struct Record {
    position: Option<ReadingPosition>,
    read_set: BTreeSet<VerseId>,
    daily: Option<DailyCursor>,
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    records: Mutex<HashMap<Uuid, Record>>,
    fail_writes: AtomicBool,
    /// When set, every `save_position` waits for one permit.
    save_gate: Option<Arc<Semaphore>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn failing() -> Arc<Self> {
        let store = Self::default();
        store.fail_writes.store(true, Ordering::SeqCst);
        Arc::new(store)
    }

    /// A store whose position saves block until the returned semaphore gets permits.
    pub(crate) fn gated() -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let store = Self {
            save_gate: Some(gate.clone()),
            ..Self::default()
        };
        (Arc::new(store), gate)
    }

    pub(crate) async fn saved_position(&self, user_id: Uuid) -> Option<ReadingPosition> {
        self.records
            .lock()
            .await
            .get(&user_id)
            .and_then(|r| r.position.clone())
    }

    fn check_writable(&self) -> PortResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("store is read-only".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PositionStore for MemoryStore {
    async fn load_position(&self, user_id: Uuid) -> PortResult<Option<ReadingPosition>> {
        Ok(self.saved_position(user_id).await)
    }

    async fn save_position(&self, position: &ReadingPosition) -> PortResult<()> {
        if let Some(gate) = &self.save_gate {
            gate.acquire()
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .forget();
        }
        self.check_writable()?;
        self.records
            .lock()
            .await
            .entry(position.user_id)
            .or_default()
            .position = Some(position.clone());
        Ok(())
    }

    async fn load_read_set(&self, user_id: Uuid) -> PortResult<BTreeSet<VerseId>> {
        Ok(self
            .records
            .lock()
            .await
            .get(&user_id)
            .map(|r| r.read_set.clone())
            .unwrap_or_default())
    }

    async fn mark_read(&self, user_id: Uuid, verse: VerseId) -> PortResult<()> {
        self.check_writable()?;
        self.records
            .lock()
            .await
            .entry(user_id)
            .or_default()
            .read_set
            .insert(verse);
        Ok(())
    }

    async fn reset_all(&self, user_id: Uuid) -> PortResult<()> {
        self.check_writable()?;
        let mut records = self.records.lock().await;
        let record = records.entry(user_id).or_default();
        record.position = None;
        record.read_set.clear();
        Ok(())
    }

    async fn load_daily_cursor(&self, user_id: Uuid) -> PortResult<DailyCursor> {
        Ok(self
            .records
            .lock()
            .await
            .get(&user_id)
            .and_then(|r| r.daily)
            .unwrap_or_default())
    }

    async fn save_daily_cursor(&self, user_id: Uuid, cursor: &DailyCursor) -> PortResult<()> {
        self.check_writable()?;
        self.records.lock().await.entry(user_id).or_default().daily = Some(*cursor);
        Ok(())
    }
}
