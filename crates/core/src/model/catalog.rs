use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::model::ids::{ExamId, ItemKey};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("content source cannot be empty")]
    EmptySource,

    #[error("invalid content url: {0}")]
    InvalidUrl(String),

    #[error("invalid catalog data: {0}")]
    Parse(String),
}

//
// ─── CONTENT SOURCE ────────────────────────────────────────────────────────────
//

/// Where a video or document lives: a path served next to the app, or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContentSource {
    FilePath(PathBuf),
    Url(Url),
}

impl ContentSource {
    /// Parse a raw content reference.
    ///
    /// Anything carrying a scheme (`https://…`) is parsed as a URL; everything
    /// else is kept as a path.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptySource` for blank input and
    /// `CatalogError::InvalidUrl` if a scheme is present but the URL is malformed.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, CatalogError> {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            return Err(CatalogError::EmptySource);
        }
        if s.contains("://") {
            let url = Url::parse(s).map_err(|err| CatalogError::InvalidUrl(err.to_string()))?;
            return Ok(ContentSource::Url(url));
        }
        Ok(ContentSource::FilePath(PathBuf::from(s)))
    }

    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ContentSource::FilePath(p) => Some(p.as_path()),
            ContentSource::Url(_) => None,
        }
    }

    #[must_use]
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            ContentSource::Url(u) => Some(u),
            ContentSource::FilePath(_) => None,
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::FilePath(p) => write!(f, "{}", p.display()),
            ContentSource::Url(u) => f.write_str(u.as_str()),
        }
    }
}

impl TryFrom<String> for ContentSource {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ContentSource> for String {
    fn from(value: ContentSource) -> Self {
        value.to_string()
    }
}

//
// ─── ITEMS & SECTIONS ──────────────────────────────────────────────────────────
//

/// What a curriculum item shows when opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemContent {
    Video {
        source: ContentSource,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thumbnail: Option<ContentSource>,
    },
    Document {
        source: ContentSource,
    },
    Exam {
        exam_id: ExamId,
        #[serde(default)]
        question_count: u32,
        #[serde(default)]
        duration_minutes: u32,
    },
}

impl ItemContent {
    #[must_use]
    pub fn exam_id(&self) -> Option<&ExamId> {
        match self {
            ItemContent::Exam { exam_id, .. } => Some(exam_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseItem {
    pub title: String,
    #[serde(flatten)]
    pub content: ItemContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub items: Vec<CourseItem>,
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Ordered, read-only curriculum: sections of items.
///
/// The progression engine only ever reads positions out of it; nothing in this
/// crate mutates a catalog after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCatalog {
    sections: Vec<Section>,
}

impl CourseCatalog {
    #[must_use]
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Parse a catalog from its JSON dataset.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the JSON does not describe a catalog.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|err| CatalogError::Parse(err.to_string()))
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of items in a section; `0` for an unknown section.
    #[must_use]
    pub fn item_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, |s| s.items.len())
    }

    #[must_use]
    pub fn total_items(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    #[must_use]
    pub fn contains(&self, key: ItemKey) -> bool {
        key.item() < self.item_count(key.section())
    }

    #[must_use]
    pub fn item(&self, key: ItemKey) -> Option<&CourseItem> {
        self.sections
            .get(key.section())
            .and_then(|s| s.items.get(key.item()))
    }

    /// The position that must be completed before `key` unlocks by progression.
    ///
    /// Same section, previous index; for the first item of a section it is the
    /// last item of the nearest earlier non-empty section. Returns `None` at the
    /// very start of the course.
    #[must_use]
    pub fn predecessor(&self, key: ItemKey) -> Option<ItemKey> {
        if key.item() > 0 {
            return Some(ItemKey::new(key.section(), key.item() - 1));
        }
        (0..key.section())
            .rev()
            .find(|s| self.item_count(*s) > 0)
            .map(|s| ItemKey::new(s, self.item_count(s) - 1))
    }

    /// The next position in curriculum order: the following item of the same
    /// section, or the first item of the next non-empty section.
    #[must_use]
    pub fn successor(&self, key: ItemKey) -> Option<ItemKey> {
        if key.item() + 1 < self.item_count(key.section()) {
            return Some(ItemKey::new(key.section(), key.item() + 1));
        }
        self.first_key_after(key.section())
    }

    /// First item of the nearest non-empty section after `section`.
    #[must_use]
    pub fn first_key_after(&self, section: usize) -> Option<ItemKey> {
        (section + 1..self.section_count())
            .find(|s| self.item_count(*s) > 0)
            .map(|s| ItemKey::new(s, 0))
    }

    /// All positions in curriculum order.
    pub fn keys(&self) -> impl Iterator<Item = ItemKey> + '_ {
        self.sections.iter().enumerate().flat_map(|(s, section)| {
            (0..section.items.len()).map(move |i| ItemKey::new(s, i))
        })
    }

    /// Positions of a single section, in order.
    pub fn section_keys(&self, section: usize) -> impl Iterator<Item = ItemKey> {
        (0..self.item_count(section)).map(move |i| ItemKey::new(section, i))
    }
}
