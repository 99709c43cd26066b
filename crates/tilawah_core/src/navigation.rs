//! crates/tilawah_core/src/navigation.rs
//!
//! The navigation state machine over a loaded verse sequence.
//!
//! Every committed move updates the in-memory position immediately and hands the
//! durable write to a per-controller persistence worker (write-behind). The
//! worker applies writes in submission order. From the moment a move is queued
//! until its write has been attempted, the controller is `Navigating` and further
//! moves return [`Step::Busy`]. A failed write is logged and counted; it never
//! rolls back the in-memory position, and the next successful save reconciles.

use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::coordinates::CoordinateError;
use crate::domain::{
    Corpus, GlobalPosition, Progress, ReadingPosition, Verse, VerseId, VersePosition,
};
use crate::ports::{PortResult, PositionStore};
use crate::reference::ReferenceIndex;

//=========================================================================================
// Outcomes and Errors
//=========================================================================================

/// The result of a navigation request that was not a caller error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The position changed (or was re-committed) and a save was queued.
    Moved(VersePosition),
    /// Already at the first or last loaded verse; nothing happened.
    AtBoundary,
    /// A previous move is still being persisted; nothing happened.
    Busy,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Verse index {index} is outside the loaded sequence of {len} verses")]
    OutOfRange { index: usize, len: usize },
    #[error(transparent)]
    UnknownVerse(#[from] CoordinateError),
}

//=========================================================================================
// Persistence Worker
//=========================================================================================

enum WriteOp {
    /// Ends the move that queued it.
    SavePosition(ReadingPosition),
    /// Rewrites the cached read count; does not end a move.
    RefreshPosition(ReadingPosition),
    MarkRead(VerseId),
    ResetAll,
    Flush(oneshot::Sender<()>),
}

#[derive(Default)]
struct WriterStatus {
    navigating: AtomicBool,
    failures: AtomicU64,
}

impl WriterStatus {
    fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    fn finish_move(&self) {
        self.navigating.store(false, Ordering::Release);
    }
}

/// Drains queued writes until the owning controller is dropped.
async fn persistence_worker(
    store: Arc<dyn PositionStore>,
    user_id: Uuid,
    mut writes: mpsc::UnboundedReceiver<WriteOp>,
    status: Arc<WriterStatus>,
) {
    while let Some(op) = writes.recv().await {
        match op {
            WriteOp::SavePosition(record) => {
                if let Err(e) = store.save_position(&record).await {
                    error!(%user_id, position = record.position.get(), "Failed to save reading position: {}", e);
                    status.record_failure();
                }
                status.finish_move();
            }
            WriteOp::RefreshPosition(record) => {
                if let Err(e) = store.save_position(&record).await {
                    error!(%user_id, read = record.read_count, "Failed to refresh cached read count: {}", e);
                    status.record_failure();
                }
            }
            WriteOp::MarkRead(verse) => {
                if let Err(e) = store.mark_read(user_id, verse).await {
                    error!(%user_id, %verse, "Failed to mark verse as read: {}", e);
                    status.record_failure();
                }
            }
            WriteOp::ResetAll => {
                if let Err(e) = store.reset_all(user_id).await {
                    error!(%user_id, "Failed to reset reading state: {}", e);
                    status.record_failure();
                }
                status.finish_move();
            }
            WriteOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(%user_id, "Persistence worker stopped.");
}

//=========================================================================================
// Navigation Controller
//=========================================================================================

/// One user's reading session over a loaded corpus.
pub struct NavigationController {
    user_id: Uuid,
    index: Arc<ReferenceIndex>,
    corpus: Arc<Corpus>,
    /// Operational upper bound: the loaded sequence length, never the declared total.
    loaded_len: usize,
    current: GlobalPosition,
    read_set: BTreeSet<VerseId>,
    writes: mpsc::UnboundedSender<WriteOp>,
    status: Arc<WriterStatus>,
}

impl NavigationController {
    /// Loads the user's saved position and read set and starts the persistence worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn load(
        store: Arc<dyn PositionStore>,
        index: Arc<ReferenceIndex>,
        corpus: Arc<Corpus>,
        user_id: Uuid,
    ) -> PortResult<Self> {
        let declared = index.total_verses();
        let loaded_len = corpus.len().min(declared);
        if loaded_len < declared {
            warn!(
                loaded = loaded_len,
                declared, "Verse sequence is incomplete; navigation is limited to the loaded verses"
            );
        }

        let saved = store
            .load_position(user_id)
            .await?
            .map_or(GlobalPosition::START, |record| record.position);
        let current = match loaded_len {
            0 => GlobalPosition::START,
            len if saved.get() >= len => {
                warn!(
                    %user_id,
                    saved = saved.get(),
                    loaded = len,
                    "Saved position is beyond the loaded verses; resuming at the last loaded verse"
                );
                GlobalPosition::new(len - 1)
            }
            _ => saved,
        };
        let read_set = store.load_read_set(user_id).await?;

        let (writes, receiver) = mpsc::unbounded_channel();
        let status = Arc::new(WriterStatus::default());
        tokio::spawn(persistence_worker(store, user_id, receiver, status.clone()));

        info!(
            %user_id,
            position = current.get(),
            read = read_set.len(),
            "Reading state loaded."
        );
        Ok(Self {
            user_id,
            index,
            corpus,
            loaded_len,
            current,
            read_set,
            writes,
            status,
        })
    }

    // --- Navigation ---

    /// Advances one verse unless already at the last loaded verse.
    pub fn next(&mut self) -> Step {
        if self.is_navigating() {
            return Step::Busy;
        }
        if !self.can_go_next() {
            return Step::AtBoundary;
        }
        self.commit(GlobalPosition::new(self.current.get() + 1))
    }

    /// Retreats one verse unless already at the first verse.
    pub fn previous(&mut self) -> Step {
        if self.is_navigating() {
            return Step::Busy;
        }
        if !self.can_go_previous() {
            return Step::AtBoundary;
        }
        self.commit(GlobalPosition::new(self.current.get() - 1))
    }

    /// Moves directly to `index`. Out-of-range targets are rejected, never clamped.
    pub fn jump_to(&mut self, index: usize) -> Result<Step, NavigationError> {
        if index >= self.loaded_len {
            return Err(NavigationError::OutOfRange {
                index,
                len: self.loaded_len,
            });
        }
        if self.is_navigating() {
            return Ok(Step::Busy);
        }
        Ok(self.commit(GlobalPosition::new(index)))
    }

    /// Moves directly to the verse identified by chapter and verse number.
    pub fn jump_to_verse(&mut self, verse: VerseId) -> Result<Step, NavigationError> {
        let position = self.index.global_index_of(verse)?;
        self.jump_to(position.get())
    }

    /// Returns to the first verse and clears the read set, in memory and in the store.
    ///
    /// Destructive; confirmation is the caller's responsibility.
    pub fn reset(&mut self) -> Step {
        if self.is_navigating() {
            return Step::Busy;
        }
        self.current = GlobalPosition::START;
        self.read_set.clear();
        self.status.navigating.store(true, Ordering::Release);
        self.enqueue(WriteOp::ResetAll);
        info!(user_id = %self.user_id, "Reading state reset.");
        Step::Moved(self.current_verse_position())
    }

    /// Adds the current verse to the read set and persists it along with the
    /// cached read count. Returns `false` if it was already there.
    pub fn mark_current_as_read(&mut self) -> bool {
        if self.loaded_len == 0 {
            return false;
        }
        let verse = self.current_verse_position().verse_id();
        if !self.read_set.insert(verse) {
            return false;
        }
        debug!(user_id = %self.user_id, %verse, read = self.read_set.len(), "Verse marked as read.");
        self.enqueue(WriteOp::MarkRead(verse));
        self.enqueue(WriteOp::RefreshPosition(self.snapshot()));
        true
    }

    /// Waits until every write queued so far has been attempted.
    pub async fn settle(&self) {
        let (done, finished) = oneshot::channel();
        if self.writes.send(WriteOp::Flush(done)).is_ok() {
            let _ = finished.await;
        }
    }

    fn commit(&mut self, target: GlobalPosition) -> Step {
        self.current = target;
        let position = self.current_verse_position();
        debug!(
            user_id = %self.user_id,
            position = target.get(),
            verse = %position.verse_id(),
            "Navigation committed."
        );
        self.status.navigating.store(true, Ordering::Release);
        self.enqueue(WriteOp::SavePosition(self.snapshot()));
        Step::Moved(position)
    }

    fn enqueue(&self, op: WriteOp) {
        if self.writes.send(op).is_err() {
            error!(user_id = %self.user_id, "Persistence worker is gone; write dropped.");
            self.status.record_failure();
            self.status.finish_move();
        }
    }

    fn snapshot(&self) -> ReadingPosition {
        ReadingPosition {
            user_id: self.user_id,
            position: self.current,
            last_read_at: Utc::now(),
            progress: self.current_progress(),
            read_count: self.read_set.len(),
        }
    }

    // --- Accessors ---

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn current_index(&self) -> GlobalPosition {
        self.current
    }

    pub fn current_verse_position(&self) -> VersePosition {
        self.index.verse_position(self.current)
    }

    pub fn current_verse(&self) -> Option<&Verse> {
        self.corpus.get(self.current)
    }

    pub fn current_progress(&self) -> Progress {
        Progress::at(&self.index, self.current)
    }

    pub fn loaded_len(&self) -> usize {
        self.loaded_len
    }

    pub fn can_go_next(&self) -> bool {
        self.current.get() + 1 < self.loaded_len
    }

    pub fn can_go_previous(&self) -> bool {
        self.current.get() > 0
    }

    pub fn is_first(&self) -> bool {
        self.current.get() == 0
    }

    pub fn is_last(&self) -> bool {
        self.current.get() + 1 >= self.loaded_len
    }

    pub fn read_set(&self) -> &BTreeSet<VerseId> {
        &self.read_set
    }

    pub fn read_count(&self) -> usize {
        self.read_set.len()
    }

    pub fn is_current_read(&self) -> bool {
        self.read_set
            .contains(&self.current_verse_position().verse_id())
    }

    /// True while a committed move is waiting on its durable write.
    pub fn is_navigating(&self) -> bool {
        self.status.navigating.load(Ordering::Acquire)
    }

    /// Number of durable writes that have failed since the controller was loaded.
    pub fn persistence_failures(&self) -> u64 {
        self.status.failures.load(Ordering::Relaxed)
    }
}
