use crate::model::{BOOTSTRAP_ITEMS, CourseCatalog, ItemKey, ProgressState};

/// How an item should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Locked,
    Unlocked,
    Completed,
}

/// Whether the learner is barred from opening `key`.
///
/// 1. The first three items of section 0 are always open.
/// 2. Anything already present in `state` is open.
/// 3. Otherwise the item opens once its predecessor is completed; with no
///    predecessor it stays locked.
#[must_use]
pub fn is_locked(catalog: &CourseCatalog, key: ItemKey, state: &ProgressState) -> bool {
    if key.section() == 0 && key.item() < BOOTSTRAP_ITEMS {
        return false;
    }
    if state.contains(key) {
        return false;
    }
    match catalog.predecessor(key) {
        Some(prev) => !state.is_completed(prev),
        None => true,
    }
}

#[must_use]
pub fn is_unlocked(catalog: &CourseCatalog, key: ItemKey, state: &ProgressState) -> bool {
    !is_locked(catalog, key, state)
}

#[must_use]
pub fn status(catalog: &CourseCatalog, key: ItemKey, state: &ProgressState) -> ItemStatus {
    if state.is_completed(key) {
        ItemStatus::Completed
    } else if is_locked(catalog, key, state) {
        ItemStatus::Locked
    } else {
        ItemStatus::Unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::catalog;

    #[test]
    fn bootstrap_items_open_on_fresh_state() {
        let catalog = catalog(&[3, 2]);
        let fresh = ProgressState::new();
        for i in 0..3 {
            assert!(!is_locked(&catalog, ItemKey::new(0, i), &fresh));
        }
        assert!(is_locked(&catalog, ItemKey::new(1, 0), &fresh));
    }

    #[test]
    fn bootstrap_overrides_catalog_shape() {
        // Section 0 has a single item; the rule still reports 0..3 as open.
        let catalog = catalog(&[1, 1]);
        assert!(!is_locked(&catalog, ItemKey::new(0, 2), &ProgressState::new()));
    }

    #[test]
    fn presence_unlocks_regardless_of_flag() {
        let catalog = catalog(&[4, 2]);
        let state: ProgressState = [(ItemKey::new(1, 1), false)].into_iter().collect();
        assert!(!is_locked(&catalog, ItemKey::new(1, 1), &state));
        assert!(is_locked(&catalog, ItemKey::new(0, 3), &state));
    }

    #[test]
    fn completed_predecessor_unlocks_next() {
        let catalog = catalog(&[4, 2]);
        let state: ProgressState = [(ItemKey::new(0, 2), true)].into_iter().collect();
        assert!(!is_locked(&catalog, ItemKey::new(0, 3), &state));
        assert!(is_locked(&catalog, ItemKey::new(1, 0), &state));

        let state: ProgressState = [(ItemKey::new(0, 3), true)].into_iter().collect();
        assert!(!is_locked(&catalog, ItemKey::new(1, 0), &state));
    }

    #[test]
    fn unlocked_predecessor_is_not_enough() {
        let catalog = catalog(&[4]);
        let state: ProgressState = [(ItemKey::new(0, 2), false)].into_iter().collect();
        assert!(is_locked(&catalog, ItemKey::new(0, 3), &state));
    }

    #[test]
    fn status_distinguishes_completed() {
        let catalog = catalog(&[4]);
        let state: ProgressState = [(ItemKey::new(0, 0), true)].into_iter().collect();
        assert_eq!(status(&catalog, ItemKey::new(0, 0), &state), ItemStatus::Completed);
        assert_eq!(status(&catalog, ItemKey::new(0, 1), &state), ItemStatus::Unlocked);
        assert_eq!(status(&catalog, ItemKey::new(0, 3), &state), ItemStatus::Locked);
    }
}
