//! services/api/src/adapters/corpus.rs
//!
//! Loads the ordered verse text that the navigation engine walks over.
//!
//! The file is a JSON array of `{ "chapter": 1, "verse": 1, "text": "..." }`
//! objects in traversal order. A file that stops early, or that goes out of
//! order, yields a partial corpus: everything up to the first entry that does
//! not sit at its expected position is kept.

use serde::Deserialize;
use std::path::Path;
use tilawah_core::domain::{Corpus, Verse, VerseId};
use tilawah_core::reference::ReferenceIndex;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("Failed to read the corpus file: {0}")]
    Io(#[from] std::io::Error),
    #[error("The corpus file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("The corpus file contains no usable verses")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct VerseRecord {
    chapter: u16,
    verse: u16,
    text: String,
}

/// Reads and validates a corpus file against the reference index.
pub async fn load_corpus(path: &Path, index: &ReferenceIndex) -> Result<Corpus, CorpusError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let corpus = parse_corpus(&raw, index)?;
    info!(
        path = %path.display(),
        verses = corpus.len(),
        declared = index.total_verses(),
        "Corpus loaded."
    );
    Ok(corpus)
}

/// Parses corpus JSON, keeping the longest prefix that lines up with the index.
pub fn parse_corpus(raw: &str, index: &ReferenceIndex) -> Result<Corpus, CorpusError> {
    let records: Vec<VerseRecord> = serde_json::from_str(raw)?;
    let total = index.total_verses();

    if records.len() > total {
        warn!(
            found = records.len(),
            declared = total,
            "Corpus holds more verses than the reference declares; extra verses are ignored"
        );
    }

    let mut verses = Vec::with_capacity(records.len().min(total));
    for (position, record) in records.into_iter().take(total).enumerate() {
        let id = VerseId::new(record.chapter, record.verse);
        let expected = index.global_index_of(id).map(|p| p.get());
        if expected != Ok(position) {
            warn!(
                position,
                verse = %id,
                "Corpus entry is out of order; keeping only the verses before it"
            );
            break;
        }
        verses.push(Verse {
            id,
            text: record.text,
        });
    }

    if verses.is_empty() {
        return Err(CorpusError::Empty);
    }
    Ok(Corpus::new(verses))
}
