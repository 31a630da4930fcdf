//! Random selection of films from a scraped list

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::Film;

/// Picks `count` films out of a collection
pub trait FilmPicker: Send + Sync {
    /// Returns at most `count` distinct films, consuming the collection
    fn pick(&self, films: Vec<Film>, count: usize) -> Vec<Film>;
}

/// Shuffle `films` with `rng` and keep the first `count`.
///
/// Sampling without replacement; the result length is
/// `min(count, films.len())`.
pub fn pick_films<R: Rng + ?Sized>(mut films: Vec<Film>, count: usize, rng: &mut R) -> Vec<Film> {
    films.shuffle(rng);
    films.truncate(count);
    films
}

/// Picker seeded from OS entropy on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl FilmPicker for RandomPicker {
    fn pick(&self, films: Vec<Film>, count: usize) -> Vec<Film> {
        pick_films(films, count, &mut StdRng::from_entropy())
    }
}

/// Deterministic picker, every call starts from the same seed
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct SeededPicker {
    seed: u64,
}

#[cfg(test)]
impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

#[cfg(test)]
impl FilmPicker for SeededPicker {
    fn pick(&self, films: Vec<Film>, count: usize) -> Vec<Film> {
        pick_films(films, count, &mut StdRng::seed_from_u64(self.seed))
    }
}
