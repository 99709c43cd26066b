//! crates/tilawah_core/src/coordinates.rs
//!
//! Conversions between a global position and (part, chapter, verse) coordinates.
//!
//! All lookups are pure with respect to the tables. Out-of-range input is clamped
//! or defaulted rather than rejected, so a partially loaded data set degrades
//! gracefully; every such fallback is logged and counted in
//! [`ReferenceIndex::clamp_events`] so that a real data-loading bug stays visible.

use crate::domain::{DisplayName, GlobalPosition, VerseId, VersePosition};
use crate::reference::ReferenceIndex;
use std::sync::atomic::Ordering;
use tracing::warn;

/// A (chapter, verse) pair that does not exist in the reference tables.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{0} is not a verse of the reference corpus")]
pub struct CoordinateError(pub VerseId);

impl ReferenceIndex {
    /// Global position of `verse` within `chapter`.
    pub fn global_index(&self, chapter: u16, verse: u16) -> Result<GlobalPosition, CoordinateError> {
        let id = VerseId::new(chapter, verse);
        self.offsets
            .global(id)
            .map(GlobalPosition::new)
            .ok_or(CoordinateError(id))
    }

    pub fn global_index_of(&self, id: VerseId) -> Result<GlobalPosition, CoordinateError> {
        self.global_index(id.chapter, id.verse)
    }

    /// The verse at `position`. Positions past the end clamp to the last verse.
    pub fn from_global_index(&self, position: GlobalPosition) -> VerseId {
        match self.offsets.locate(position.get()) {
            Some(id) => id,
            None => {
                let last = self.last_verse();
                self.record_clamp();
                warn!(
                    position = position.get(),
                    total = self.total_verses(),
                    clamped_to = %last,
                    "Global position is past the end of the corpus; clamping to the last verse"
                );
                last
            }
        }
    }

    /// The part containing `position`, or part 1 if none does.
    pub fn part_for_position(&self, position: GlobalPosition) -> u8 {
        if position.get() >= self.total_verses() {
            self.record_clamp();
            warn!(
                position = position.get(),
                "No part contains this position; defaulting to part 1"
            );
            return 1;
        }
        // Parts are contiguous from 0, so the last start at or before the position wins.
        let containing = self
            .part_starts
            .partition_point(|&start| start <= position.get());
        containing as u8
    }

    /// The part containing (`chapter`, `verse`), or part 1 for malformed input.
    pub fn part_for_chapter_verse(&self, chapter: u16, verse: u16) -> u8 {
        match self.global_index(chapter, verse) {
            Ok(position) => self.part_for_position(position),
            Err(err) => {
                self.record_clamp();
                warn!(%err, "Cannot resolve a part for an unknown verse; defaulting to part 1");
                1
            }
        }
    }

    /// Fully derived coordinates for `position`, clamped like [`Self::from_global_index`].
    pub fn verse_position(&self, position: GlobalPosition) -> VersePosition {
        let id = self.from_global_index(position);
        // Re-derive so a clamped lookup reports the clamped index, not the input.
        let global_index = self
            .offsets
            .global(id)
            .map_or(position, GlobalPosition::new);
        let chapter_name = self
            .chapter(id.chapter)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| DisplayName::new("", ""));
        VersePosition {
            global_index,
            chapter_number: id.chapter,
            verse_number: id.verse,
            part_number: self.part_for_position(global_index),
            chapter_name,
        }
    }

    /// The verse after `id` in traversal order, saturating at the final verse.
    ///
    /// An unknown `id` resolves to the first verse.
    pub fn successor(&self, id: VerseId) -> VerseId {
        match self.offsets.global(id) {
            Some(global) => self.offsets.locate(global + 1).unwrap_or(id),
            None => {
                self.record_clamp();
                warn!(verse = %id, "Unknown verse has no successor; using the first verse");
                VerseId::FIRST
            }
        }
    }

    /// How many lookups have fallen back to a clamped or default value.
    pub fn clamp_events(&self) -> u64 {
        self.clamp_events.load(Ordering::Relaxed)
    }

    fn record_clamp(&self) {
        self.clamp_events.fetch_add(1, Ordering::Relaxed);
    }
}
