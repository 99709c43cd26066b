//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `PositionStore` port. State is lost when
//! the process exits; it backs the service when no database is configured.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tilawah_core::domain::{DailyCursor, ReadingPosition, VerseId};
use tilawah_core::ports::{PortResult, PositionStore};
use tokio::sync::RwLock;
use uuid::Uuid;

/// The three independent per-user records.
#[derive(Default)]
struct UserRecord {
    position: Option<ReadingPosition>,
    read_set: BTreeSet<VerseId>,
    daily_cursor: Option<DailyCursor>,
}

/// A `PositionStore` held entirely in memory.
#[derive(Default)]
pub struct InMemoryPositionStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryPositionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PositionStore for InMemoryPositionStore {
    async fn load_position(&self, user_id: Uuid) -> PortResult<Option<ReadingPosition>> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).and_then(|u| u.position.clone()))
    }

    async fn save_position(&self, position: &ReadingPosition) -> PortResult<()> {
        let mut users = self.users.write().await;
        users.entry(position.user_id).or_default().position = Some(position.clone());
        Ok(())
    }

    async fn load_read_set(&self, user_id: Uuid) -> PortResult<BTreeSet<VerseId>> {
        let users = self.users.read().await;
        Ok(users
            .get(&user_id)
            .map(|u| u.read_set.clone())
            .unwrap_or_default())
    }

    async fn mark_read(&self, user_id: Uuid, verse: VerseId) -> PortResult<()> {
        let mut users = self.users.write().await;
        users.entry(user_id).or_default().read_set.insert(verse);
        Ok(())
    }

    async fn reset_all(&self, user_id: Uuid) -> PortResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&user_id) {
            user.position = None;
            user.read_set.clear();
        }
        Ok(())
    }

    async fn load_daily_cursor(&self, user_id: Uuid) -> PortResult<DailyCursor> {
        let users = self.users.read().await;
        Ok(users
            .get(&user_id)
            .and_then(|u| u.daily_cursor)
            .unwrap_or_default())
    }

    async fn save_daily_cursor(&self, user_id: Uuid, cursor: &DailyCursor) -> PortResult<()> {
        let mut users = self.users.write().await;
        users.entry(user_id).or_default().daily_cursor = Some(*cursor);
        Ok(())
    }
}
