//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `PositionStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Position, read set and daily cursor live in three separate tables and are
//! written independently.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::BTreeSet;
use tilawah_core::domain::{DailyCursor, GlobalPosition, Progress, ReadingPosition, VerseId};
use tilawah_core::ports::{PortError, PortResult, PositionStore};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `PositionStore` port.
#[derive(Clone)]
pub struct PgPositionStore {
    pool: PgPool,
}

impl PgPositionStore {
    /// Creates a new `PgPositionStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn verse_id(chapter: i16, verse: i16) -> PortResult<VerseId> {
    match (u16::try_from(chapter), u16::try_from(verse)) {
        (Ok(chapter), Ok(verse)) if chapter > 0 && verse > 0 => Ok(VerseId::new(chapter, verse)),
        _ => Err(PortError::Unexpected(format!(
            "Stored verse {}:{} is not a valid verse identifier",
            chapter, verse
        ))),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ReadingPositionRecord {
    user_id: Uuid,
    global_position: i32,
    last_read_at: DateTime<Utc>,
    overall_percentage: f64,
    part_percentage: f64,
    chapter_percentage: f64,
    part_number: i16,
    chapter_number: i16,
    read_count: i32,
}
impl ReadingPositionRecord {
    fn to_domain(self) -> ReadingPosition {
        ReadingPosition {
            user_id: self.user_id,
            position: GlobalPosition::new(self.global_position.max(0) as usize),
            last_read_at: self.last_read_at,
            progress: Progress {
                overall: self.overall_percentage,
                part: self.part_percentage,
                chapter: self.chapter_percentage,
                part_number: self.part_number.clamp(0, i16::from(u8::MAX)) as u8,
                chapter_number: self.chapter_number.max(0) as u16,
            },
            read_count: self.read_count.max(0) as usize,
        }
    }
}

#[derive(FromRow)]
struct ReadVerseRecord {
    chapter: i16,
    verse: i16,
}

#[derive(FromRow)]
struct DailyCursorRecord {
    chapter: i16,
    verse: i16,
    last_read_chapter: Option<i16>,
    last_read_verse: Option<i16>,
    last_read_on: Option<NaiveDate>,
}
impl DailyCursorRecord {
    fn to_domain(self) -> PortResult<DailyCursor> {
        let last_read = match (self.last_read_chapter, self.last_read_verse, self.last_read_on) {
            (Some(chapter), Some(verse), Some(on)) => Some((verse_id(chapter, verse)?, on)),
            _ => None,
        };
        Ok(DailyCursor {
            verse: verse_id(self.chapter, self.verse)?,
            last_read,
        })
    }
}

//=========================================================================================
// `PositionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl PositionStore for PgPositionStore {
    async fn load_position(&self, user_id: Uuid) -> PortResult<Option<ReadingPosition>> {
        let record = sqlx::query_as::<_, ReadingPositionRecord>(
            "SELECT user_id, global_position, last_read_at, overall_percentage, part_percentage, \
             chapter_percentage, part_number, chapter_number, read_count \
             FROM reading_positions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(|r| r.to_domain()))
    }

    async fn save_position(&self, position: &ReadingPosition) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO reading_positions (user_id, global_position, last_read_at, overall_percentage, \
             part_percentage, chapter_percentage, part_number, chapter_number, read_count) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (user_id) DO UPDATE SET global_position = EXCLUDED.global_position, \
             last_read_at = EXCLUDED.last_read_at, overall_percentage = EXCLUDED.overall_percentage, \
             part_percentage = EXCLUDED.part_percentage, chapter_percentage = EXCLUDED.chapter_percentage, \
             part_number = EXCLUDED.part_number, chapter_number = EXCLUDED.chapter_number, \
             read_count = EXCLUDED.read_count",
        )
        .bind(position.user_id)
        .bind(position.position.get() as i32)
        .bind(position.last_read_at)
        .bind(position.progress.overall)
        .bind(position.progress.part)
        .bind(position.progress.chapter)
        .bind(i16::from(position.progress.part_number))
        .bind(position.progress.chapter_number as i16)
        .bind(position.read_count as i32)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn load_read_set(&self, user_id: Uuid) -> PortResult<BTreeSet<VerseId>> {
        let records = sqlx::query_as::<_, ReadVerseRecord>(
            "SELECT chapter, verse FROM read_verses WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records
            .into_iter()
            .map(|r| verse_id(r.chapter, r.verse))
            .collect()
    }

    async fn mark_read(&self, user_id: Uuid, verse: VerseId) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO read_verses (user_id, chapter, verse) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, chapter, verse) DO NOTHING",
        )
        .bind(user_id)
        .bind(verse.chapter as i16)
        .bind(verse.verse as i16)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn reset_all(&self, user_id: Uuid) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        sqlx::query("DELETE FROM reading_positions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        sqlx::query("DELETE FROM read_verses WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    async fn load_daily_cursor(&self, user_id: Uuid) -> PortResult<DailyCursor> {
        let record = sqlx::query_as::<_, DailyCursorRecord>(
            "SELECT chapter, verse, last_read_chapter, last_read_verse, last_read_on \
             FROM daily_cursors WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        match record {
            Some(record) => record.to_domain(),
            None => Ok(DailyCursor::default()),
        }
    }

    async fn save_daily_cursor(&self, user_id: Uuid, cursor: &DailyCursor) -> PortResult<()> {
        let (last_chapter, last_verse, last_on) = match cursor.last_read {
            Some((verse, on)) => (
                Some(verse.chapter as i16),
                Some(verse.verse as i16),
                Some(on),
            ),
            None => (None, None, None),
        };
        sqlx::query(
            "INSERT INTO daily_cursors (user_id, chapter, verse, last_read_chapter, last_read_verse, last_read_on) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id) DO UPDATE SET chapter = EXCLUDED.chapter, verse = EXCLUDED.verse, \
             last_read_chapter = EXCLUDED.last_read_chapter, last_read_verse = EXCLUDED.last_read_verse, \
             last_read_on = EXCLUDED.last_read_on",
        )
        .bind(user_id)
        .bind(cursor.verse.chapter as i16)
        .bind(cursor.verse.verse as i16)
        .bind(last_chapter)
        .bind(last_verse)
        .bind(last_on)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }
}
