use crate::model::{CourseCatalog, ItemKey, ProgressState};

use super::cascade::reconcile;

/// Apply a completion event.
///
/// Marks `key` completed, opens its immediate successor, then reconciles the
/// cascade. The direct unlock only materializes what the lock rule already
/// implies for the successor; `reconcile` is what keeps cross-section state
/// consistent. Keys outside the catalog leave the state unchanged.
#[must_use]
pub fn complete_item(catalog: &CourseCatalog, key: ItemKey, state: &ProgressState) -> ProgressState {
    if !catalog.contains(key) {
        return state.clone();
    }

    let mut next = state.clone();
    next.complete(key);
    if let Some(successor) = catalog.successor(key) {
        next.unlock(successor);
    }
    reconcile(catalog, &next)
}
