//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tilawah_core::domain::{
    ChapterInfo, DailyVerse, Progress, StructuralPart, Verse, VersePosition,
};
use tilawah_core::navigation::NavigationController;
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// Requests Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Target of a direct jump: either a global index or a chapter/verse pair.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(untagged)]
pub enum JumpRequest {
    Index { index: usize },
    Verse { chapter: u16, verse: u16 },
}

/// Optional calendar day for the daily verse endpoints. Defaults to today (UTC).
#[derive(Deserialize, Debug, IntoParams)]
pub struct DailyQuery {
    pub date: Option<NaiveDate>,
}

//=========================================================================================
// Responses Sent FROM the Server TO the Client (Browser)
//=========================================================================================

#[derive(Serialize, Debug, ToSchema)]
pub struct VerseView {
    /// `"chapter:verse"`.
    pub id: String,
    pub global_index: usize,
    pub chapter: u16,
    pub verse: u16,
    pub part: u8,
    pub chapter_name: String,
    pub chapter_name_arabic: String,
    /// Absent when the server runs without verse text.
    pub text: Option<String>,
}

impl VerseView {
    pub fn new(position: &VersePosition, verse: Option<&Verse>) -> Self {
        Self {
            id: position.verse_id().to_string(),
            global_index: position.global_index.get(),
            chapter: position.chapter_number,
            verse: position.verse_number,
            part: position.part_number,
            chapter_name: position.chapter_name.latin.clone(),
            chapter_name_arabic: position.chapter_name.arabic.clone(),
            text: verse
                .filter(|v| !v.text.is_empty())
                .map(|v| v.text.clone()),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ProgressView {
    pub overall: f64,
    pub part: f64,
    pub chapter: f64,
    pub part_number: u8,
    pub chapter_number: u16,
}

impl From<Progress> for ProgressView {
    fn from(progress: Progress) -> Self {
        Self {
            overall: progress.overall,
            part: progress.part,
            chapter: progress.chapter,
            part_number: progress.part_number,
            chapter_number: progress.chapter_number,
        }
    }
}

/// Everything the reading screen needs after any request.
#[derive(Serialize, Debug, ToSchema)]
pub struct ReadingView {
    pub verse: VerseView,
    pub progress: ProgressView,
    pub read_count: usize,
    pub is_read: bool,
    pub can_go_next: bool,
    pub can_go_previous: bool,
    pub is_first: bool,
    pub is_last: bool,
    pub loaded_verses: usize,
    pub persistence_failures: u64,
}

impl ReadingView {
    pub fn from_controller(nav: &NavigationController) -> Self {
        Self {
            verse: VerseView::new(&nav.current_verse_position(), nav.current_verse()),
            progress: nav.current_progress().into(),
            read_count: nav.read_count(),
            is_read: nav.is_current_read(),
            can_go_next: nav.can_go_next(),
            can_go_previous: nav.can_go_previous(),
            is_first: nav.is_first(),
            is_last: nav.is_last(),
            loaded_verses: nav.loaded_len(),
            persistence_failures: nav.persistence_failures(),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Moved,
    AtBoundary,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct StepResponse {
    pub outcome: StepOutcome,
    pub reading: ReadingView,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MarkReadResponse {
    /// False when the verse was already in the read set.
    pub newly_read: bool,
    pub reading: ReadingView,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct DailyVerseView {
    pub date: NaiveDate,
    pub verse: VerseView,
    pub read_today: bool,
}

impl DailyVerseView {
    pub fn new(daily: &DailyVerse, verse: Option<&Verse>) -> Self {
        Self {
            date: daily.date,
            verse: VerseView::new(&daily.position, verse),
            read_today: daily.read_today,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ChapterView {
    pub number: u16,
    pub name: String,
    pub name_arabic: String,
    pub verse_count: u16,
    pub parts: Vec<u8>,
}

impl From<&ChapterInfo> for ChapterView {
    fn from(chapter: &ChapterInfo) -> Self {
        Self {
            number: chapter.number,
            name: chapter.name.latin.clone(),
            name_arabic: chapter.name.arabic.clone(),
            verse_count: chapter.verse_count,
            parts: chapter.parts.clone(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PartView {
    pub number: u8,
    pub name: String,
    pub name_arabic: String,
    /// `"chapter:verse"` of the first verse.
    pub start: String,
    /// `"chapter:verse"` of the last verse.
    pub end: String,
    pub verse_count: usize,
}

impl From<&StructuralPart> for PartView {
    fn from(part: &StructuralPart) -> Self {
        Self {
            number: part.number,
            name: part.name.latin.clone(),
            name_arabic: part.name.arabic.clone(),
            start: part.start.to_string(),
            end: part.end.to_string(),
            verse_count: part.verse_count,
        }
    }
}
