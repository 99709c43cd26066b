//! crates/tilawah_core/src/progress.rs
//!
//! Completion percentages derived from a global position.

use crate::domain::{GlobalPosition, Progress};
use crate::reference::ReferenceIndex;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Share of the corpus before `position`, rounded to 2 decimal places.
pub fn overall_percentage(index: &ReferenceIndex, position: GlobalPosition) -> f64 {
    let total = index.total_verses();
    if total == 0 {
        return 0.0;
    }
    let position = position.get().min(total - 1);
    round_to(position as f64 / total as f64 * 100.0, 2).clamp(0.0, 100.0)
}

/// Share of the chapter before `verse`, rounded to a whole percent.
pub fn chapter_percentage(index: &ReferenceIndex, chapter: u16, verse: u16) -> f64 {
    let Some(info) = index.chapter(chapter) else {
        return 0.0;
    };
    let done = f64::from(verse.saturating_sub(1));
    round_to(done / f64::from(info.verse_count) * 100.0, 0).clamp(0.0, 100.0)
}

/// Share of `part` before `position`, rounded to 2 decimal places.
///
/// Positions outside the part clamp to 0 or 100.
pub fn part_percentage(index: &ReferenceIndex, part: u8, position: GlobalPosition) -> f64 {
    let Some(info) = index.part(part) else {
        return 0.0;
    };
    let Ok(start) = index.global_index_of(info.start) else {
        return 0.0;
    };
    let offset = position.get() as f64 - start.get() as f64;
    round_to(offset / info.verse_count as f64 * 100.0, 2).clamp(0.0, 100.0)
}

impl Progress {
    /// All three percentages at `position`.
    pub fn at(index: &ReferenceIndex, position: GlobalPosition) -> Self {
        let verse = index.verse_position(position);
        Self {
            overall: overall_percentage(index, verse.global_index),
            part: part_percentage(index, verse.part_number, verse.global_index),
            chapter: chapter_percentage(index, verse.chapter_number, verse.verse_number),
            part_number: verse.part_number,
            chapter_number: verse.chapter_number,
        }
    }
}
