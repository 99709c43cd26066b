//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-user reading sessions.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tilawah_core::daily::DailySelection;
use tilawah_core::domain::Corpus;
use tilawah_core::navigation::NavigationController;
use tilawah_core::ports::{PortError, PortResult, PositionStore};
use tilawah_core::reference::ReferenceIndex;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};
use uuid::Uuid;

/// A user's navigation controller, shared between that user's requests.
pub type SharedReader = Arc<Mutex<NavigationController>>;

/// Registry slot for one user. The cell is filled by the first request that
/// loads the user's state; concurrent requests for the same user wait on it.
struct ReaderSlot {
    cell: Arc<OnceCell<SharedReader>>,
    last_used: Instant,
}

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub store: Arc<dyn PositionStore>,
    pub index: Arc<ReferenceIndex>,
    pub corpus: Arc<Corpus>,
    pub daily: DailySelection,
    /// One controller per active user, created on that user's first request.
    readers: Mutex<HashMap<Uuid, ReaderSlot>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn PositionStore>,
        index: Arc<ReferenceIndex>,
        corpus: Arc<Corpus>,
    ) -> Self {
        let daily = DailySelection::new(store.clone(), index.clone());
        Self {
            store,
            index,
            corpus,
            daily,
            readers: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the user's controller, loading their saved state on first use.
    ///
    /// The registry lock is held only to find the user's slot; loading happens
    /// outside it, so a slow load never delays other users.
    pub async fn reader(&self, user_id: Uuid) -> PortResult<SharedReader> {
        let cell = {
            let mut readers = self.readers.lock().await;
            let slot = readers.entry(user_id).or_insert_with(|| ReaderSlot {
                cell: Arc::new(OnceCell::new()),
                last_used: Instant::now(),
            });
            slot.last_used = Instant::now();
            slot.cell.clone()
        };

        let reader = cell
            .get_or_try_init(|| async {
                let controller = NavigationController::load(
                    self.store.clone(),
                    self.index.clone(),
                    self.corpus.clone(),
                    user_id,
                )
                .await?;
                Ok::<_, PortError>(Arc::new(Mutex::new(controller)))
            })
            .await?;
        Ok(reader.clone())
    }

    /// Number of users with a registry slot.
    pub async fn active_readers(&self) -> usize {
        self.readers.lock().await.len()
    }

    /// Drops controllers unused for at least `max_idle`, after flushing their writes.
    ///
    /// A controller that a request is still holding, or whose move is still being
    /// saved, is kept until a later sweep. Returns how many were evicted.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let evicted: Vec<SharedReader> = {
            let mut readers = self.readers.lock().await;
            let idle: Vec<Uuid> = readers
                .iter()
                .filter(|(_, slot)| slot.last_used.elapsed() >= max_idle)
                .filter(|(_, slot)| match slot.cell.get() {
                    // Only the registry holds it, and no save is pending.
                    Some(reader) => {
                        Arc::strong_count(reader) == 1
                            && reader.try_lock().is_ok_and(|nav| !nav.is_navigating())
                    }
                    // Empty after a failed load, and nobody is retrying it.
                    None => Arc::strong_count(&slot.cell) == 1,
                })
                .map(|(user_id, _)| *user_id)
                .collect();
            idle.iter()
                .filter_map(|user_id| readers.remove(user_id))
                .filter_map(|slot| slot.cell.get().cloned())
                .collect()
        };

        let count = evicted.len();
        join_all(evicted.iter().map(|reader| async move {
            reader.lock().await.settle().await;
        }))
        .await;
        if count > 0 {
            debug!(evicted = count, "Evicted idle reading sessions.");
        }
        count
    }

    /// Waits for every controller's queued writes. Called on shutdown.
    pub async fn settle_all(&self) {
        let readers: Vec<SharedReader> = self
            .readers
            .lock()
            .await
            .values()
            .filter_map(|slot| slot.cell.get().cloned())
            .collect();
        info!(readers = readers.len(), "Flushing pending reading-state writes.");
        join_all(readers.iter().map(|reader| async move {
            reader.lock().await.settle().await;
        }))
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryPositionStore;
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tilawah_core::domain::{DailyCursor, GlobalPosition, ReadingPosition, VerseId};
    use tokio::sync::{Notify, Semaphore};
    use tokio::time::timeout;

    /// Delegates to the in-memory store, but holds `load_position` for one user
    /// until the gate gets a permit.
    struct SlowLoadStore {
        inner: InMemoryPositionStore,
        slow_user: Uuid,
        entered: Notify,
        gate: Semaphore,
        loads: AtomicUsize,
    }

    impl SlowLoadStore {
        fn new(slow_user: Uuid) -> Arc<Self> {
            Arc::new(Self {
                inner: InMemoryPositionStore::new(),
                slow_user,
                entered: Notify::new(),
                gate: Semaphore::new(0),
                loads: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PositionStore for SlowLoadStore {
        async fn load_position(&self, user_id: Uuid) -> PortResult<Option<ReadingPosition>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if user_id == self.slow_user {
                self.entered.notify_one();
                if let Ok(permit) = self.gate.acquire().await {
                    permit.forget();
                }
            }
            self.inner.load_position(user_id).await
        }
        async fn save_position(&self, position: &ReadingPosition) -> PortResult<()> {
            self.inner.save_position(position).await
        }
        async fn load_read_set(&self, user_id: Uuid) -> PortResult<BTreeSet<VerseId>> {
            self.inner.load_read_set(user_id).await
        }
        async fn mark_read(&self, user_id: Uuid, verse: VerseId) -> PortResult<()> {
            self.inner.mark_read(user_id, verse).await
        }
        async fn reset_all(&self, user_id: Uuid) -> PortResult<()> {
            self.inner.reset_all(user_id).await
        }
        async fn load_daily_cursor(&self, user_id: Uuid) -> PortResult<DailyCursor> {
            self.inner.load_daily_cursor(user_id).await
        }
        async fn save_daily_cursor(&self, user_id: Uuid, cursor: &DailyCursor) -> PortResult<()> {
            self.inner.save_daily_cursor(user_id, cursor).await
        }
    }

    fn state_with(store: Arc<dyn PositionStore>) -> Arc<AppState> {
        let index = Arc::new(ReferenceIndex::standard().unwrap());
        let corpus = Arc::new(index.placeholder_corpus());
        Arc::new(AppState::new(store, index, corpus))
    }

    #[tokio::test]
    async fn slow_load_does_not_block_other_users() {
        let slow = Uuid::new_v4();
        let store = SlowLoadStore::new(slow);
        let state = state_with(store.clone());

        let other = Uuid::new_v4();
        state.reader(other).await.unwrap();

        let loading = tokio::spawn({
            let state = state.clone();
            async move { state.reader(slow).await.map(|_| ()) }
        });
        store.entered.notified().await;

        timeout(Duration::from_secs(1), state.reader(other))
            .await
            .expect("cached user waited on another user's load")
            .unwrap();
        timeout(Duration::from_secs(1), state.reader(Uuid::new_v4()))
            .await
            .expect("new user waited on another user's load")
            .unwrap();

        store.gate.add_permits(1);
        loading.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn concurrent_first_requests_share_one_load() {
        let slow = Uuid::new_v4();
        let store = SlowLoadStore::new(slow);
        let state = state_with(store.clone());

        let first = tokio::spawn({
            let state = state.clone();
            async move { state.reader(slow).await.unwrap() }
        });
        store.entered.notified().await;
        let second = tokio::spawn({
            let state = state.clone();
            async move { state.reader(slow).await.unwrap() }
        });
        tokio::task::yield_now().await;

        store.gate.add_permits(1);
        let (first, second) = (first.await.unwrap(), second.await.unwrap());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn idle_readers_are_evicted_after_flushing() {
        let state = state_with(Arc::new(InMemoryPositionStore::new()));
        let user = Uuid::new_v4();

        {
            let reader = state.reader(user).await.unwrap();
            let mut nav = reader.lock().await;
            nav.jump_to(42).unwrap();
            nav.settle().await;
        }
        assert_eq!(state.active_readers().await, 1);

        assert_eq!(state.evict_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(state.active_readers().await, 1);

        assert_eq!(state.evict_idle(Duration::ZERO).await, 1);
        assert_eq!(state.active_readers().await, 0);

        // The next request reloads from the store.
        let reader = state.reader(user).await.unwrap();
        assert_eq!(
            reader.lock().await.current_index(),
            GlobalPosition::new(42)
        );
    }

    #[tokio::test]
    async fn readers_in_use_are_not_evicted() {
        let state = state_with(Arc::new(InMemoryPositionStore::new()));
        let held = state.reader(Uuid::new_v4()).await.unwrap();

        assert_eq!(state.evict_idle(Duration::ZERO).await, 0);
        assert_eq!(state.active_readers().await, 1);

        drop(held);
        assert_eq!(state.evict_idle(Duration::ZERO).await, 1);
    }
}
