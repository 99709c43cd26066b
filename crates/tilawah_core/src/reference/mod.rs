//! crates/tilawah_core/src/reference/mod.rs
//!
//! The static catalog of chapters and structural parts. This is the ground truth
//! for all coordinate math, and it is validated once when it is built: an index
//! that exists is an index whose tables are consistent.

pub mod data;

use crate::domain::{ChapterInfo, Corpus, DisplayName, StructuralPart, Verse, VerseId};
use std::sync::atomic::AtomicU64;

//=========================================================================================
// Reference Errors
//=========================================================================================

/// Inconsistencies detected while building a [`ReferenceIndex`].
///
/// These are configuration errors: the engine must not start with a table that
/// fails any of these checks.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("The {0} table is empty")]
    EmptyTable(&'static str),
    #[error("Chapter at position {position} has ordinal {found}, expected {expected}")]
    ChapterOutOfOrder {
        position: usize,
        expected: usize,
        found: u16,
    },
    #[error("Chapter {0} has no verses")]
    EmptyChapter(u16),
    #[error("Chapter verse counts sum to {actual}, but the corpus declares {declared}")]
    ChapterTotalMismatch { declared: usize, actual: usize },
    #[error("Part at position {position} has ordinal {found}, expected {expected}")]
    PartOutOfOrder {
        position: usize,
        expected: usize,
        found: u8,
    },
    #[error("Part {part} refers to {verse}, which is not a verse of the corpus")]
    InvalidBoundary { part: u8, verse: VerseId },
    #[error("Part {part} starts at global index {found}, expected {expected}")]
    PartGap {
        part: u8,
        expected: usize,
        found: usize,
    },
    #[error("Part {part} ends before it starts")]
    InvertedPart { part: u8 },
    #[error("Part {part} declares {declared} verses but its boundaries hold {actual}")]
    PartVerseCount {
        part: u8,
        declared: usize,
        actual: usize,
    },
    #[error("Parts cover {covered} of {total} verses")]
    PartCoverage { covered: usize, total: usize },
    #[error("Chapter {chapter} lists parts {declared:?}, but its verses fall in {actual:?}")]
    ChapterSpanMismatch {
        chapter: u16,
        declared: Vec<u8>,
        actual: Vec<u8>,
    },
}

//=========================================================================================
// Chapter Offsets
//=========================================================================================

/// Cumulative verse counts: `starts[i]` is the global index of the first verse of
/// chapter `i + 1`, and the final entry is the corpus total.
#[derive(Debug, Clone)]
pub(crate) struct ChapterOffsets {
    starts: Vec<usize>,
}

impl ChapterOffsets {
    pub(crate) fn from_counts(counts: impl IntoIterator<Item = u16>) -> Self {
        let mut starts = vec![0];
        let mut running = 0usize;
        for count in counts {
            running += usize::from(count);
            starts.push(running);
        }
        Self { starts }
    }

    pub(crate) fn total(&self) -> usize {
        self.starts.last().copied().unwrap_or(0)
    }

    fn chapter_count(&self) -> usize {
        self.starts.len() - 1
    }

    /// Inclusive global range of a chapter.
    pub(crate) fn chapter_range(&self, chapter: u16) -> Option<(usize, usize)> {
        let c = usize::from(chapter);
        if c == 0 || c > self.chapter_count() {
            return None;
        }
        let (start, next) = (self.starts[c - 1], self.starts[c]);
        (next > start).then(|| (start, next - 1))
    }

    pub(crate) fn global(&self, id: VerseId) -> Option<usize> {
        let (start, end) = self.chapter_range(id.chapter)?;
        let verse = usize::from(id.verse);
        if verse == 0 || start + verse - 1 > end {
            return None;
        }
        Some(start + verse - 1)
    }

    /// The verse at `global`, or `None` past the end of the corpus.
    pub(crate) fn locate(&self, global: usize) -> Option<VerseId> {
        if global >= self.total() {
            return None;
        }
        // Number of chapter starts at or before `global`; starts[0] == 0 so this is >= 1.
        let chapter = self.starts.partition_point(|&start| start <= global);
        let verse = global - self.starts[chapter - 1] + 1;
        Some(VerseId::new(chapter as u16, verse as u16))
    }
}

//=========================================================================================
// Reference Index
//=========================================================================================

/// Validated, immutable chapter and part tables with precomputed offsets.
#[derive(Debug)]
pub struct ReferenceIndex {
    pub(crate) chapters: Vec<ChapterInfo>,
    pub(crate) parts: Vec<StructuralPart>,
    pub(crate) offsets: ChapterOffsets,
    /// `part_starts[i]` is the global index of the first verse of part `i + 1`.
    pub(crate) part_starts: Vec<usize>,
    /// Number of times an out-of-range lookup was clamped or defaulted.
    pub(crate) clamp_events: AtomicU64,
}

impl ReferenceIndex {
    /// Builds an index from explicit tables, checking every structural invariant.
    pub fn new(
        parts: Vec<StructuralPart>,
        chapters: Vec<ChapterInfo>,
        declared_total: usize,
    ) -> Result<Self, ReferenceError> {
        if chapters.is_empty() {
            return Err(ReferenceError::EmptyTable("chapter"));
        }
        if parts.is_empty() {
            return Err(ReferenceError::EmptyTable("part"));
        }

        for (position, chapter) in chapters.iter().enumerate() {
            if usize::from(chapter.number) != position + 1 {
                return Err(ReferenceError::ChapterOutOfOrder {
                    position,
                    expected: position + 1,
                    found: chapter.number,
                });
            }
            if chapter.verse_count == 0 {
                return Err(ReferenceError::EmptyChapter(chapter.number));
            }
        }

        let offsets = ChapterOffsets::from_counts(chapters.iter().map(|c| c.verse_count));
        if offsets.total() != declared_total {
            return Err(ReferenceError::ChapterTotalMismatch {
                declared: declared_total,
                actual: offsets.total(),
            });
        }

        let mut part_starts = Vec::with_capacity(parts.len());
        let mut expected_start = 0usize;
        for (position, part) in parts.iter().enumerate() {
            if usize::from(part.number) != position + 1 {
                return Err(ReferenceError::PartOutOfOrder {
                    position,
                    expected: position + 1,
                    found: part.number,
                });
            }
            let start = offsets
                .global(part.start)
                .ok_or(ReferenceError::InvalidBoundary {
                    part: part.number,
                    verse: part.start,
                })?;
            let end = offsets
                .global(part.end)
                .ok_or(ReferenceError::InvalidBoundary {
                    part: part.number,
                    verse: part.end,
                })?;
            if start != expected_start {
                return Err(ReferenceError::PartGap {
                    part: part.number,
                    expected: expected_start,
                    found: start,
                });
            }
            if end < start {
                return Err(ReferenceError::InvertedPart { part: part.number });
            }
            if part.verse_count != end - start + 1 {
                return Err(ReferenceError::PartVerseCount {
                    part: part.number,
                    declared: part.verse_count,
                    actual: end - start + 1,
                });
            }
            part_starts.push(start);
            expected_start = end + 1;
        }
        if expected_start != declared_total {
            return Err(ReferenceError::PartCoverage {
                covered: expected_start,
                total: declared_total,
            });
        }

        for chapter in &chapters {
            let actual = parts_touching(&offsets, &part_starts, declared_total, chapter.number);
            if actual != chapter.parts {
                return Err(ReferenceError::ChapterSpanMismatch {
                    chapter: chapter.number,
                    declared: chapter.parts.clone(),
                    actual,
                });
            }
        }

        Ok(Self {
            chapters,
            parts,
            offsets,
            part_starts,
            clamp_events: AtomicU64::new(0),
        })
    }

    /// Builds and validates the built-in 114-chapter, 30-part tables.
    pub fn standard() -> Result<Self, ReferenceError> {
        Self::from_tables(&data::CHAPTERS, &data::PARTS, data::TOTAL_VERSES)
    }

    /// Expands compact table rows and validates them. Part ends come from the next
    /// part's start, so a declared count that disagrees with them is rejected.
    fn from_tables(
        chapter_rows: &[data::ChapterRow],
        part_rows: &[data::PartRow],
        declared_total: usize,
    ) -> Result<Self, ReferenceError> {
        let offsets = ChapterOffsets::from_counts(chapter_rows.iter().map(|c| c.2));

        let mut part_starts = Vec::with_capacity(part_rows.len());
        for (number, (_, _, (chapter, verse), _)) in (1u8..).zip(part_rows.iter()) {
            let start = VerseId::new(*chapter, *verse);
            let global = offsets
                .global(start)
                .ok_or(ReferenceError::InvalidBoundary { part: number, verse: start })?;
            part_starts.push(global);
        }

        let mut parts = Vec::with_capacity(part_rows.len());
        for (i, (latin, arabic, (chapter, verse), verse_count)) in part_rows.iter().enumerate() {
            let number = (i + 1) as u8;
            let start_global = part_starts[i];
            let next_start = part_starts.get(i + 1).copied().unwrap_or(declared_total);
            // Overlapping starts surface as a part gap when `new` validates the tables.
            let end_global = next_start.saturating_sub(1).max(start_global);
            let end = offsets
                .locate(end_global)
                .ok_or(ReferenceError::PartCoverage {
                    covered: end_global,
                    total: declared_total,
                })?;
            parts.push(StructuralPart {
                number,
                name: DisplayName::new(*latin, *arabic),
                start: VerseId::new(*chapter, *verse),
                end,
                verse_count: *verse_count,
            });
        }

        let chapters = chapter_rows
            .iter()
            .enumerate()
            .map(|(i, (latin, arabic, verse_count))| {
                let number = (i + 1) as u16;
                ChapterInfo {
                    number,
                    name: DisplayName::new(*latin, *arabic),
                    verse_count: *verse_count,
                    parts: parts_touching(&offsets, &part_starts, declared_total, number),
                }
            })
            .collect();

        Self::new(parts, chapters, declared_total)
    }

    pub fn total_verses(&self) -> usize {
        self.offsets.total()
    }

    pub fn chapters(&self) -> &[ChapterInfo] {
        &self.chapters
    }

    pub fn parts(&self) -> &[StructuralPart] {
        &self.parts
    }

    /// O(1) lookup by 1-based chapter ordinal.
    pub fn chapter(&self, number: u16) -> Option<&ChapterInfo> {
        usize::from(number)
            .checked_sub(1)
            .and_then(|i| self.chapters.get(i))
    }

    /// O(1) lookup by 1-based part ordinal.
    pub fn part(&self, number: u8) -> Option<&StructuralPart> {
        usize::from(number)
            .checked_sub(1)
            .and_then(|i| self.parts.get(i))
    }

    /// Every verse of the index in order, with empty text. Used when the host has
    /// no verse text to supply.
    pub fn placeholder_corpus(&self) -> Corpus {
        let verses = self
            .chapters
            .iter()
            .flat_map(|chapter| {
                (1..=chapter.verse_count).map(move |verse| Verse {
                    id: VerseId::new(chapter.number, verse),
                    text: String::new(),
                })
            })
            .collect();
        Corpus::new(verses)
    }

    pub fn last_verse(&self) -> VerseId {
        self.chapters
            .last()
            .map(|c| VerseId::new(c.number, c.verse_count))
            .unwrap_or(VerseId::FIRST)
    }
}

/// Ordinals of the parts whose ranges intersect the given chapter.
fn parts_touching(
    offsets: &ChapterOffsets,
    part_starts: &[usize],
    total: usize,
    chapter: u16,
) -> Vec<u8> {
    let Some((first, last)) = offsets.chapter_range(chapter) else {
        return Vec::new();
    };
    part_starts
        .iter()
        .enumerate()
        .filter(|&(i, &start)| {
            let end = part_starts.get(i + 1).map_or(total, |&next| next) - 1;
            start <= last && end >= first
        })
        .map(|(i, _)| (i + 1) as u8)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_chapters() -> Vec<ChapterInfo> {
        vec![
            ChapterInfo {
                number: 1,
                name: DisplayName::new("One", "واحد"),
                verse_count: 3,
                parts: vec![1],
            },
            ChapterInfo {
                number: 2,
                name: DisplayName::new("Two", "اثنان"),
                verse_count: 4,
                parts: vec![1, 2],
            },
        ]
    }

    fn tiny_parts() -> Vec<StructuralPart> {
        vec![
            StructuralPart {
                number: 1,
                name: DisplayName::new("First", "الأول"),
                start: VerseId::new(1, 1),
                end: VerseId::new(2, 2),
                verse_count: 5,
            },
            StructuralPart {
                number: 2,
                name: DisplayName::new("Second", "الثاني"),
                start: VerseId::new(2, 3),
                end: VerseId::new(2, 4),
                verse_count: 2,
            },
        ]
    }

    #[test]
    fn standard_tables_validate() {
        let index = ReferenceIndex::standard().unwrap();
        assert_eq!(index.total_verses(), 6236);
        assert_eq!(index.chapters().len(), 114);
        assert_eq!(index.parts().len(), 30);
    }

    #[test]
    fn chapter_counts_cover_the_corpus_exactly() {
        let index = ReferenceIndex::standard().unwrap();
        let sum: usize = index
            .chapters()
            .iter()
            .map(|c| usize::from(c.verse_count))
            .sum();
        assert_eq!(sum, data::TOTAL_VERSES);
        let part_sum: usize = index.parts().iter().map(|p| p.verse_count).sum();
        assert_eq!(part_sum, data::TOTAL_VERSES);
    }

    #[test]
    fn standard_part_boundaries_are_derived() {
        let index = ReferenceIndex::standard().unwrap();
        let first = index.part(1).unwrap();
        assert_eq!(first.end, VerseId::new(2, 141));
        assert_eq!(first.verse_count, 148);
        let last = index.part(30).unwrap();
        assert_eq!(last.start, VerseId::new(78, 1));
        assert_eq!(last.end, VerseId::new(114, 6));
        assert_eq!(last.verse_count, 564);
    }

    #[test]
    fn declared_part_count_must_match_its_boundaries() {
        let mut part_rows = data::PARTS;
        part_rows[0].3 = 147;
        let err = ReferenceIndex::from_tables(&data::CHAPTERS, &part_rows, data::TOTAL_VERSES)
            .unwrap_err();
        assert_eq!(
            err,
            ReferenceError::PartVerseCount {
                part: 1,
                declared: 147,
                actual: 148
            }
        );
    }

    #[test]
    fn chapters_record_every_part_they_touch() {
        let index = ReferenceIndex::standard().unwrap();
        assert_eq!(index.chapter(1).unwrap().parts, vec![1]);
        assert_eq!(index.chapter(2).unwrap().parts, vec![1, 2, 3]);
        assert_eq!(index.chapter(114).unwrap().parts, vec![30]);
    }

    #[test]
    fn lookup_by_ordinal() {
        let index = ReferenceIndex::standard().unwrap();
        assert_eq!(index.chapter(36).unwrap().name.latin, "Ya-Sin");
        assert!(index.chapter(0).is_none());
        assert!(index.chapter(115).is_none());
        assert!(index.part(31).is_none());
        assert_eq!(index.last_verse(), VerseId::new(114, 6));
    }

    #[test]
    fn placeholder_corpus_lists_every_verse_in_order() {
        let index = ReferenceIndex::standard().unwrap();
        let corpus = index.placeholder_corpus();
        assert_eq!(corpus.len(), data::TOTAL_VERSES);
        assert_eq!(corpus.verses()[7].id, VerseId::new(2, 1));
        assert_eq!(corpus.verses().last().unwrap().id, VerseId::new(114, 6));
    }

    #[test]
    fn accepts_consistent_custom_tables() {
        let index = ReferenceIndex::new(tiny_parts(), tiny_chapters(), 7).unwrap();
        assert_eq!(index.total_verses(), 7);
    }

    #[test]
    fn rejects_wrong_declared_total() {
        let err = ReferenceIndex::new(tiny_parts(), tiny_chapters(), 8).unwrap_err();
        assert_eq!(
            err,
            ReferenceError::ChapterTotalMismatch {
                declared: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn rejects_gap_between_parts() {
        let mut parts = tiny_parts();
        parts[1].start = VerseId::new(2, 4);
        parts[1].verse_count = 1;
        let err = ReferenceIndex::new(parts, tiny_chapters(), 7).unwrap_err();
        assert_eq!(
            err,
            ReferenceError::PartGap {
                part: 2,
                expected: 5,
                found: 6
            }
        );
    }

    #[test]
    fn rejects_incomplete_coverage() {
        let mut parts = tiny_parts();
        parts[1].end = VerseId::new(2, 3);
        parts[1].verse_count = 1;
        let err = ReferenceIndex::new(parts, tiny_chapters(), 7).unwrap_err();
        assert_eq!(err, ReferenceError::PartCoverage { covered: 6, total: 7 });
    }

    #[test]
    fn rejects_boundary_outside_corpus() {
        let mut parts = tiny_parts();
        parts[1].end = VerseId::new(2, 9);
        let err = ReferenceIndex::new(parts, tiny_chapters(), 7).unwrap_err();
        assert!(matches!(err, ReferenceError::InvalidBoundary { part: 2, .. }));
    }

    #[test]
    fn rejects_wrong_part_verse_count() {
        let mut parts = tiny_parts();
        parts[0].verse_count = 4;
        let err = ReferenceIndex::new(parts, tiny_chapters(), 7).unwrap_err();
        assert!(matches!(err, ReferenceError::PartVerseCount { part: 1, .. }));
    }

    #[test]
    fn rejects_chapter_span_mismatch() {
        let mut chapters = tiny_chapters();
        chapters[1].parts = vec![2];
        let err = ReferenceIndex::new(tiny_parts(), chapters, 7).unwrap_err();
        assert!(matches!(err, ReferenceError::ChapterSpanMismatch { chapter: 2, .. }));
    }

    #[test]
    fn rejects_out_of_order_and_empty_tables() {
        let mut chapters = tiny_chapters();
        chapters.swap(0, 1);
        assert!(matches!(
            ReferenceIndex::new(tiny_parts(), chapters, 7),
            Err(ReferenceError::ChapterOutOfOrder { position: 0, .. })
        ));
        assert_eq!(
            ReferenceIndex::new(Vec::new(), tiny_chapters(), 7).unwrap_err(),
            ReferenceError::EmptyTable("part")
        );
    }
}
