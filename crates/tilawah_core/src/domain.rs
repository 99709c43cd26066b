//! crates/tilawah_core/src/domain.rs
//!
//! Defines the pure, core data structures for the reading engine.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Static Reference Data
//=========================================================================================

/// A name carried in both display scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName {
    pub latin: String,
    pub arabic: String,
}

impl DisplayName {
    pub fn new(latin: impl Into<String>, arabic: impl Into<String>) -> Self {
        Self {
            latin: latin.into(),
            arabic: arabic.into(),
        }
    }
}

/// A large grouping of consecutive verses used for mid-level progress reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralPart {
    pub number: u8,
    pub name: DisplayName,
    /// First verse of the part, inclusive.
    pub start: VerseId,
    /// Last verse of the part, inclusive.
    pub end: VerseId,
    pub verse_count: usize,
}

/// A named grouping of consecutively numbered verses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterInfo {
    pub number: u16,
    pub name: DisplayName,
    pub verse_count: u16,
    /// Ordinals of every structural part this chapter touches, ascending.
    pub parts: Vec<u8>,
}

//=========================================================================================
// Positions
//=========================================================================================

/// A 0-based index uniquely locating one verse in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GlobalPosition(usize);

impl GlobalPosition {
    pub const START: GlobalPosition = GlobalPosition(0);

    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for GlobalPosition {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for GlobalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a verse by its chapter and its 1-based number within that chapter.
///
/// The derived ordering compares chapter first, which matches traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerseId {
    pub chapter: u16,
    pub verse: u16,
}

impl VerseId {
    pub const FIRST: VerseId = VerseId {
        chapter: 1,
        verse: 1,
    };

    pub const fn new(chapter: u16, verse: u16) -> Self {
        Self { chapter, verse }
    }
}

impl fmt::Display for VerseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("'{0}' is not a verse identifier of the form chapter:verse")]
pub struct ParseVerseIdError(String);

impl FromStr for VerseId {
    type Err = ParseVerseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVerseIdError(s.to_string());
        let (chapter, verse) = s.trim().split_once(':').ok_or_else(invalid)?;
        let chapter = chapter.parse::<u16>().map_err(|_| invalid())?;
        let verse = verse.parse::<u16>().map_err(|_| invalid())?;
        if chapter == 0 || verse == 0 {
            return Err(invalid());
        }
        Ok(Self { chapter, verse })
    }
}

/// The full set of coordinates for one verse. Always re-derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersePosition {
    pub global_index: GlobalPosition,
    pub chapter_number: u16,
    pub verse_number: u16,
    pub part_number: u8,
    pub chapter_name: DisplayName,
}

impl VersePosition {
    pub fn verse_id(&self) -> VerseId {
        VerseId::new(self.chapter_number, self.verse_number)
    }
}

/// Completion percentages at one position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Progress {
    pub overall: f64,
    pub part: f64,
    pub chapter: f64,
    pub part_number: u8,
    pub chapter_number: u16,
}

//=========================================================================================
// Per-User Persisted Records
//=========================================================================================

/// A user's last committed reading position plus cached progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingPosition {
    pub user_id: Uuid,
    pub position: GlobalPosition,
    pub last_read_at: DateTime<Utc>,
    pub progress: Progress,
    pub read_count: usize,
}

/// The persisted "verse of the day" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCursor {
    /// The verse to present on the next day that has not been read yet.
    pub verse: VerseId,
    /// The verse most recently marked read, and the calendar day it happened on.
    pub last_read: Option<(VerseId, NaiveDate)>,
}

impl Default for DailyCursor {
    fn default() -> Self {
        Self {
            verse: VerseId::FIRST,
            last_read: None,
        }
    }
}

/// What the daily selection presents for a given day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyVerse {
    pub date: NaiveDate,
    pub position: VersePosition,
    pub read_today: bool,
}

//=========================================================================================
// Corpus
//=========================================================================================

/// A single verse with its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub id: VerseId,
    pub text: String,
}

/// The ordered verse sequence supplied by the host. May be shorter than the
/// full reference when the data set is only partially loaded.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    verses: Vec<Verse>,
}

impl Corpus {
    pub fn new(verses: Vec<Verse>) -> Self {
        Self { verses }
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn get(&self, position: GlobalPosition) -> Option<&Verse> {
        self.verses.get(position.get())
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verse_id_parses_and_displays() {
        let id: VerseId = "2:255".parse().unwrap();
        assert_eq!(id, VerseId::new(2, 255));
        assert_eq!(id.to_string(), "2:255");
    }

    #[test]
    fn verse_id_rejects_malformed_input() {
        assert!("2".parse::<VerseId>().is_err());
        assert!("0:1".parse::<VerseId>().is_err());
        assert!("1:x".parse::<VerseId>().is_err());
        assert!("1:0".parse::<VerseId>().is_err());
    }

    #[test]
    fn verse_id_orders_like_traversal() {
        assert!(VerseId::new(1, 7) < VerseId::new(2, 1));
        assert!(VerseId::new(2, 9) < VerseId::new(2, 10));
    }
}
