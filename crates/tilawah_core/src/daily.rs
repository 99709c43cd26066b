//! crates/tilawah_core/src/daily.rs
//!
//! "Verse of the day" selection. The daily cursor is separate from the free
//! navigation position and only moves when the user marks the daily verse read.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{DailyCursor, DailyVerse, VerseId};
use crate::ports::{PortResult, PositionStore};
use crate::reference::ReferenceIndex;

/// Chooses and advances each user's daily verse.
#[derive(Clone)]
pub struct DailySelection {
    store: Arc<dyn PositionStore>,
    index: Arc<ReferenceIndex>,
}

impl DailySelection {
    pub fn new(store: Arc<dyn PositionStore>, index: Arc<ReferenceIndex>) -> Self {
        Self { store, index }
    }

    /// The verse to present on `date`. Repeated calls never move the cursor.
    ///
    /// Once the daily verse has been read on `date`, that verse keeps being
    /// presented for the rest of the day; the advanced cursor shows from the next day.
    pub async fn todays_verse(&self, user_id: Uuid, date: NaiveDate) -> PortResult<DailyVerse> {
        let cursor = self.store.load_daily_cursor(user_id).await?;
        let (verse, read_today) = match cursor.last_read {
            Some((read, on)) if on == date => (read, true),
            _ => (cursor.verse, false),
        };
        debug!(%user_id, %date, %verse, read_today, "Daily verse selected.");
        Ok(self.present(verse, date, read_today))
    }

    /// Marks the daily verse for `date` as read and advances the cursor by one.
    ///
    /// At most one advance happens per calendar day; a second call on the same
    /// day returns the same result without touching the store.
    pub async fn mark_daily_read(&self, user_id: Uuid, date: NaiveDate) -> PortResult<DailyVerse> {
        let cursor = self.store.load_daily_cursor(user_id).await?;
        if let Some((read, on)) = cursor.last_read {
            if on == date {
                return Ok(self.present(read, date, true));
            }
        }

        let read = cursor.verse;
        let advanced = DailyCursor {
            verse: self.index.successor(read),
            last_read: Some((read, date)),
        };
        self.store.save_daily_cursor(user_id, &advanced).await?;
        info!(%user_id, %date, read = %read, next = %advanced.verse, "Daily verse read.");
        Ok(self.present(read, date, true))
    }

    /// Moves the cursor one verse forward, saturating at the final verse.
    pub async fn advance_daily_cursor(&self, user_id: Uuid) -> PortResult<VerseId> {
        let mut cursor = self.store.load_daily_cursor(user_id).await?;
        cursor.verse = self.index.successor(cursor.verse);
        self.store.save_daily_cursor(user_id, &cursor).await?;
        Ok(cursor.verse)
    }

    fn present(&self, verse: VerseId, date: NaiveDate, read_today: bool) -> DailyVerse {
        // Cursors written against a different table resolve to the first verse.
        let position = self
            .index
            .global_index_of(verse)
            .unwrap_or_default();
        DailyVerse {
            date,
            position: self.index.verse_position(position),
            read_today,
        }
    }
}
