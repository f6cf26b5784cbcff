use crate::model::{CourseCatalog, ProgressState};

use super::lock::is_unlocked;

/// Unlocked vs. total item counts for a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemCounts {
    pub unlocked: usize,
    pub total: usize,
}

impl ItemCounts {
    /// Share of unlocked items as a whole percent, rounded half up.
    /// An empty catalog reports `0`.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let unlocked = self.unlocked.min(self.total);
        let pct = (200 * unlocked + self.total) / (2 * self.total);
        u8::try_from(pct).unwrap_or(100)
    }
}

#[must_use]
pub fn counts(catalog: &CourseCatalog, state: &ProgressState) -> ItemCounts {
    catalog.keys().fold(ItemCounts::default(), |mut acc, key| {
        acc.total += 1;
        if is_unlocked(catalog, key, state) {
            acc.unlocked += 1;
        }
        acc
    })
}

#[must_use]
pub fn percentage(catalog: &CourseCatalog, state: &ProgressState) -> u8 {
    counts(catalog, state).percentage()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::catalog;

    #[test]
    fn empty_catalog_is_zero_percent() {
        let catalog = CourseCatalog::default();
        assert_eq!(percentage(&catalog, &ProgressState::new()), 0);
        assert_eq!(
            counts(&catalog, &ProgressState::new()),
            ItemCounts { unlocked: 0, total: 0 }
        );
    }

    #[test]
    fn fresh_state_counts_bootstrap_items() {
        let catalog = catalog(&[6, 2]);
        let c = counts(&catalog, &ProgressState::new());
        assert_eq!(c, ItemCounts { unlocked: 3, total: 8 });
        // 37.5 rounds up.
        assert_eq!(c.percentage(), 38);
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(ItemCounts { unlocked: 1, total: 3 }.percentage(), 33);
        assert_eq!(ItemCounts { unlocked: 2, total: 3 }.percentage(), 67);
        assert_eq!(ItemCounts { unlocked: 1, total: 8 }.percentage(), 13);
        assert_eq!(ItemCounts { unlocked: 5, total: 5 }.percentage(), 100);
    }
}
