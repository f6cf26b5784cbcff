use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::ItemKey;

/// Number of leading items of the first section that are always unlocked.
pub const BOOTSTRAP_ITEMS: usize = 3;

/// Keys covered by the bootstrap rule: the first three items of section 0.
pub fn bootstrap_keys() -> impl Iterator<Item = ItemKey> {
    (0..BOOTSTRAP_ITEMS).map(|i| ItemKey::new(0, i))
}

//
// ─── PROGRESS STATE ────────────────────────────────────────────────────────────
//

/// Unlock/completion state of the curriculum.
///
/// Presence of a key means the item is unlocked; the flag tells whether it is
/// also completed. There is no way to remove a key or clear a flag, so state
/// only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    entries: BTreeMap<ItemKey, bool>,
}

impl ProgressState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state with the bootstrap keys present as unlocked-not-completed.
    #[must_use]
    pub fn bootstrapped() -> Self {
        let mut state = Self::new();
        state.ensure_bootstrap();
        state
    }

    /// Present in the mapping, completed or not.
    #[must_use]
    pub fn contains(&self, key: ItemKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Absent keys count as not completed.
    #[must_use]
    pub fn is_completed(&self, key: ItemKey) -> bool {
        self.entries.get(&key).copied().unwrap_or(false)
    }

    /// Insert `key` as unlocked-not-completed if absent.
    ///
    /// Returns `true` if the key was newly inserted.
    pub fn unlock(&mut self, key: ItemKey) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, false);
        true
    }

    /// Mark `key` completed, inserting it if absent.
    ///
    /// Returns `true` if anything changed.
    pub fn complete(&mut self, key: ItemKey) -> bool {
        let previous = self.entries.insert(key, true);
        previous != Some(true)
    }

    /// Make sure every bootstrap key is present. Existing flags are left alone.
    pub fn ensure_bootstrap(&mut self) {
        for key in bootstrap_keys() {
            self.unlock(key);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.entries.values().filter(|done| **done).count()
    }

    /// Entries in curriculum order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKey, bool)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    /// True if every key present in `earlier` is still present here and no
    /// completed flag went back to `false`.
    #[must_use]
    pub fn extends(&self, earlier: &ProgressState) -> bool {
        earlier
            .iter()
            .all(|(key, done)| self.contains(key) && (!done || self.is_completed(key)))
    }

    /// Convert to the persisted shape.
    #[must_use]
    pub fn to_record(&self) -> ProgressRecord {
        ProgressRecord {
            completed_items: self
                .entries
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }

    /// Rebuild state from the persisted shape.
    ///
    /// Keys that do not parse as an `ItemKey` are dropped and returned so the
    /// caller can report them.
    #[must_use]
    pub fn from_record(record: ProgressRecord) -> (Self, Vec<String>) {
        let mut entries = BTreeMap::new();
        let mut rejected = Vec::new();
        for (raw, done) in record.completed_items {
            match raw.parse::<ItemKey>() {
                Ok(key) => {
                    entries.insert(key, done);
                }
                Err(_) => rejected.push(raw),
            }
        }
        (Self { entries }, rejected)
    }
}

impl FromIterator<(ItemKey, bool)> for ProgressState {
    fn from_iter<T: IntoIterator<Item = (ItemKey, bool)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

//
// ─── PERSISTED RECORD ──────────────────────────────────────────────────────────
//

/// Serialized form stored under the progress key:
/// `{"completedItems": {"section-<S>-item-<I>": bool}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub completed_items: BTreeMap<String, bool>,
}
