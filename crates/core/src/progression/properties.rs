//! Whole-engine checks over many catalog shapes and completion orders.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::model::fixtures::catalog;
use crate::model::{CourseCatalog, ItemKey, ProgressState};

use super::{complete_item, counts, is_locked, is_unlocked, percentage, reconcile};

const SHAPES: &[&[usize]] = &[
    &[3, 2],
    &[1],
    &[6, 1, 4],
    &[3, 0, 2, 5],
    &[2, 2, 2, 2],
    &[0, 3, 1],
    &[0, 0, 2],
];

/// Seeded random walk over catalog keys; repeats are expected.
fn scrambled_keys(catalog: &CourseCatalog, seed: u64, len: usize) -> Vec<ItemKey> {
    let keys: Vec<_> = catalog.keys().collect();
    if keys.is_empty() {
        return Vec::new();
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..len)
        .map(|_| keys[rng.random_range(0..keys.len())])
        .collect()
}

#[test]
fn bootstrap_items_never_locked() {
    for shape in SHAPES {
        let catalog = catalog(shape);
        let mut state = ProgressState::new();
        for key in scrambled_keys(&catalog, 7, 12) {
            for i in 0..3 {
                assert!(!is_locked(&catalog, ItemKey::new(0, i), &state));
            }
            state = complete_item(&catalog, key, &state);
        }
    }
}

#[test]
fn completion_sequences_are_monotone() {
    for (n, shape) in (0_u64..).zip(SHAPES) {
        let catalog = catalog(shape);
        for seed in 1..20_u64 {
            let mut state = reconcile(&catalog, &ProgressState::new());
            let mut last_pct = percentage(&catalog, &state);
            for key in scrambled_keys(&catalog, seed * 31 + n, 15) {
                let next = complete_item(&catalog, key, &state);
                assert!(next.extends(&state), "shape {shape:?} seed {seed} key {key}");
                let pct = percentage(&catalog, &next);
                assert!(pct >= last_pct);
                last_pct = pct;
                state = next;
            }
        }
    }
}

#[test]
fn reconcile_reaches_fixed_point() {
    for shape in SHAPES {
        let catalog = catalog(shape);
        for seed in 1..10_u64 {
            let mut state = ProgressState::new();
            for key in scrambled_keys(&catalog, seed, 6) {
                state.complete(key);
            }
            let once = reconcile(&catalog, &state);
            assert_eq!(reconcile(&catalog, &once), once);
        }
    }
}

#[test]
fn cascade_invariant_holds_after_every_completion() {
    for shape in SHAPES {
        let catalog = catalog(shape);
        let mut state = ProgressState::new();
        for key in catalog.keys().collect::<Vec<_>>() {
            state = complete_item(&catalog, key, &state);
            for section in 0..catalog.section_count() {
                if super::all_items_unlocked(&catalog, section, &state) {
                    if let Some(first) = catalog.first_key_after(section) {
                        assert!(!is_locked(&catalog, first, &state));
                    }
                }
            }
        }
        let c = counts(&catalog, &state);
        assert_eq!(c.unlocked, c.total);
    }
}

#[test]
fn learner_reaches_every_item_through_open_items_only() {
    for shape in SHAPES {
        let catalog = catalog(shape);
        for seed in 1..10_u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut state = reconcile(&catalog, &ProgressState::bootstrapped());
            loop {
                let open: Vec<_> = catalog
                    .keys()
                    .filter(|key| is_unlocked(&catalog, *key, &state) && !state.is_completed(*key))
                    .collect();
                if open.is_empty() {
                    break;
                }
                let key = open[rng.random_range(0..open.len())];
                state = complete_item(&catalog, key, &state);
            }
            let c = counts(&catalog, &state);
            assert_eq!(c.unlocked, c.total, "shape {shape:?} seed {seed}");
            assert!(catalog.keys().all(|key| state.is_completed(key)));
        }
    }
}

#[test]
fn direct_unlock_is_covered_by_lock_rule() {
    // Whatever `complete_item` opens directly, the lock rule already reports
    // open once the key is completed.
    for shape in SHAPES {
        let catalog = catalog(shape);
        for key in catalog.keys().collect::<Vec<_>>() {
            let mut completed_only = ProgressState::new();
            completed_only.complete(key);
            if let Some(successor) = catalog.successor(key) {
                assert!(!is_locked(&catalog, successor, &completed_only));
            }
        }
    }
}

#[test]
fn scenario_three_and_two() {
    let catalog = catalog(&[3, 2]);
    let fresh = ProgressState::new();
    assert!(!is_locked(&catalog, ItemKey::new(0, 2), &fresh));
    assert!(is_locked(&catalog, ItemKey::new(1, 0), &fresh));

    let result = complete_item(&catalog, ItemKey::new(0, 2), &fresh);
    assert!(!is_locked(&catalog, ItemKey::new(1, 0), &result));
    assert!(is_locked(&catalog, ItemKey::new(1, 1), &result));
    assert_eq!(percentage(&catalog, &result), 80);
}
