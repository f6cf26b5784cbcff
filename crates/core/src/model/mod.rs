mod catalog;
mod events;
mod exam;
mod ids;
mod progress;

pub use catalog::{CatalogError, ContentSource, CourseCatalog, CourseItem, ItemContent, Section};
pub use events::{CourseEvent, PlayVideo, VideoComplete};
pub use exam::{Exam, ExamCatalog, ExamQuestion};
pub use ids::{ExamId, ItemKey, ParseItemKeyError};
pub use progress::{BOOTSTRAP_ITEMS, ProgressRecord, ProgressState, bootstrap_keys};

#[cfg(test)]
pub(crate) use catalog::fixtures;
