//! Injectable randomness.
//!
//! Movie, theme, scene-archetype and voice selection all go through a
//! [`Picker`] so tests can swap in a deterministic source and assert exact
//! prompt contents.

use std::sync::{Mutex, PoisonError};

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Length of the random suffix appended to uniqueness tokens.
pub const SUFFIX_LENGTH: usize = 8;

/// A source of uniform random choices.
pub trait Picker: Send + Sync {
    /// Return an index in `0..len`. Callers never pass `len == 0`.
    fn pick_index(&self, len: usize) -> usize;

    /// Return a short random alphanumeric string.
    fn suffix(&self) -> String;
}

/// Pick one element of a non-empty catalog uniformly at random.
///
/// # Panics
///
/// Panics if `catalog` is empty. All catalogs in this crate are non-empty
/// constants.
pub fn pick<'a, T>(picker: &dyn Picker, catalog: &'a [T]) -> &'a T {
    assert!(!catalog.is_empty(), "cannot pick from an empty catalog");
    let index = picker.pick_index(catalog.len()).min(catalog.len() - 1);
    &catalog[index]
}

/// Production picker backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngPicker;

impl Picker for ThreadRngPicker {
    fn pick_index(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }

    fn suffix(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LENGTH)
            .map(char::from)
            .collect()
    }
}

/// Deterministic picker seeded from a fixed value.
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Picker for SeededPicker {
    fn pick_index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..len)
    }

    fn suffix(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (&mut *rng)
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LENGTH)
            .map(char::from)
            .collect()
    }
}
