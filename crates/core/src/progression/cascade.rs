use crate::model::{CourseCatalog, ProgressState};

use super::lock::is_unlocked;

/// True if every item of `section` is open. Unknown sections are not.
///
/// An empty section counts as open when the nearest non-empty section before
/// it does, or when every earlier section is empty as well.
#[must_use]
pub fn all_items_unlocked(catalog: &CourseCatalog, section: usize, state: &ProgressState) -> bool {
    if section >= catalog.section_count() {
        return false;
    }
    let Some(filled) = (0..=section).rev().find(|s| catalog.item_count(*s) > 0) else {
        return true;
    };
    catalog
        .section_keys(filled)
        .all(|key| is_unlocked(catalog, key, state))
}

/// Restore the cascade invariant: for each fully unlocked section, the first
/// item of the next non-empty section is present in the result.
///
/// Sections are visited low to high, so an unlock that completes the next
/// section is picked up in the same sweep. The sweep repeats until nothing
/// changes; on a consistent state it returns an equal copy.
#[must_use]
pub fn reconcile(catalog: &CourseCatalog, state: &ProgressState) -> ProgressState {
    let mut next = state.clone();
    loop {
        let mut changed = false;
        for section in 0..catalog.section_count() {
            if !all_items_unlocked(catalog, section, &next) {
                continue;
            }
            if let Some(first) = catalog.first_key_after(section) {
                changed |= next.unlock(first);
            }
        }
        if !changed {
            return next;
        }
    }
}
