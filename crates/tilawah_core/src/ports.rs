//! crates/tilawah_core/src/ports.rs
//!
//! Defines the service contract (trait) through which the engine persists per-user
//! reading state. This trait forms the boundary of the hexagonal architecture,
//! allowing the core to be independent of the concrete store behind it.

use async_trait::async_trait;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::domain::{DailyCursor, ReadingPosition, VerseId};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the external store (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence for the three independent per-user records: reading position,
/// read set and daily cursor. No operation spans more than one record, except
/// `reset_all`, which clears the first two.
#[async_trait]
pub trait PositionStore: Send + Sync {
    // --- Reading Position ---
    /// The last saved position, or `None` for a user who has never navigated.
    async fn load_position(&self, user_id: Uuid) -> PortResult<Option<ReadingPosition>>;

    async fn save_position(&self, position: &ReadingPosition) -> PortResult<()>;

    // --- Read Set ---
    async fn load_read_set(&self, user_id: Uuid) -> PortResult<BTreeSet<VerseId>>;

    /// Adds `verse` to the read set. Marking an already-read verse is not an error.
    async fn mark_read(&self, user_id: Uuid, verse: VerseId) -> PortResult<()>;

    /// Clears the reading position and the read set.
    async fn reset_all(&self, user_id: Uuid) -> PortResult<()>;

    // --- Daily Cursor ---
    /// The daily cursor, defaulting to the first verse when none is stored.
    async fn load_daily_cursor(&self, user_id: Uuid) -> PortResult<DailyCursor>;

    async fn save_daily_cursor(&self, user_id: Uuid, cursor: &DailyCursor) -> PortResult<()>;
}
