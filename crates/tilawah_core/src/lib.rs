pub mod coordinates;
pub mod daily;
pub mod domain;
pub mod navigation;
pub mod ports;
pub mod progress;
pub mod reference;

#[cfg(test)]
mod testing;

pub use coordinates::CoordinateError;
pub use daily::DailySelection;
pub use domain::{
    ChapterInfo, Corpus, DailyCursor, DailyVerse, DisplayName, GlobalPosition, Progress,
    ReadingPosition, StructuralPart, Verse, VerseId, VersePosition,
};
pub use navigation::{NavigationController, NavigationError, Step};
pub use ports::{PortError, PortResult, PositionStore};
pub use reference::{ReferenceError, ReferenceIndex};
