use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier for a catalog position: `(section index, item index)`.
///
/// Ordering is section-major, so iterating a sorted collection of keys walks
/// the curriculum front to back.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    section: usize,
    item: usize,
}

impl ItemKey {
    /// Creates a new `ItemKey`
    #[must_use]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    #[must_use]
    pub const fn section(&self) -> usize {
        self.section
    }

    #[must_use]
    pub const fn item(&self) -> usize {
        self.item
    }
}

/// Identifier of an exam in the exam content dataset.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamId(String);

impl ExamId {
    /// Creates a new `ExamId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemKey({}, {})", self.section, self.item)
    }
}

impl fmt::Debug for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExamId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section-{}-item-{}", self.section, self.item)
    }
}

impl fmt::Display for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing an `ItemKey` from its persisted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseItemKeyError {
    raw: String,
}

impl fmt::Display for ParseItemKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse item key from {:?}", self.raw)
    }
}

impl std::error::Error for ParseItemKeyError {}

impl FromStr for ItemKey {
    type Err = ParseItemKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseItemKeyError { raw: s.to_string() };
        let rest = s.strip_prefix("section-").ok_or_else(err)?;
        let (section, item) = rest.split_once("-item-").ok_or_else(err)?;
        let section = section.parse::<usize>().map_err(|_| err())?;
        let item = item.parse::<usize>().map_err(|_| err())?;
        Ok(ItemKey::new(section, item))
    }
}

impl From<&str> for ExamId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
