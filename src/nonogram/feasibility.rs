#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Enumeration of every valid fill pattern of a single line.
//!
//! A line with `k` hints and slack `s` has one placement per way of
//! distributing the `s` spare cells over the `k + 1` gaps around and between
//! the runs (leading gap, `k - 1` inner gaps on top of their mandatory empty
//! cell, trailing gap). There are `C(s + k, k)` such distributions and each
//! yields a distinct placement.
//!
//! [`Placements`] walks these distributions in lexicographic order without
//! materialising them, so a large-slack line costs memory only when a caller
//! collects it. [`FeasibilityCache`] is the memoising front end used by the
//! placement encoding: it collects each distinct `(hints, length)` pair once
//! per session.

use crate::nonogram::error::NonogramError;
use crate::nonogram::puzzle::{Hints, line_slack};
use bit_vec::BitVec;
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// One concrete line: bit `i` is set when cell `i` is filled.
pub type Placement = BitVec;

/// `C(n, r)`, saturating at `u128::MAX`.
#[must_use]
pub fn binomial(n: usize, r: usize) -> u128 {
    if r > n {
        return 0;
    }
    let r = r.min(n - r);
    let mut result: u128 = 1;
    for i in 0..r {
        let Some(product) = result.checked_mul((n - i) as u128) else {
            return u128::MAX;
        };
        result = product / (i as u128 + 1);
    }
    result
}

/// The feasibility set of one `(hints, length)` pair, generated on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineFeasibility {
    hints: Hints,
    length: usize,
    slack: usize,
}

impl LineFeasibility {
    /// # Errors
    ///
    /// `NonogramError::Overfull` if the hints do not fit in `length` cells.
    pub fn new(hints: &[usize], length: usize) -> Result<Self, NonogramError> {
        let slack = line_slack(hints, length)?;
        Ok(Self {
            hints: hints.iter().copied().collect(),
            length,
            slack,
        })
    }

    #[must_use]
    pub fn hints(&self) -> &[usize] {
        &self.hints
    }

    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub const fn slack(&self) -> usize {
        self.slack
    }

    /// Number of placements, `C(slack + k, k)`.
    #[must_use]
    pub fn count(&self) -> u128 {
        binomial(self.slack + self.hints.len(), self.hints.len())
    }

    /// A fresh pass over every placement. Each call starts from the beginning.
    #[must_use]
    pub fn iter(&self) -> Placements<'_> {
        let mut extras = vec![0; self.hints.len() + 1];
        extras[self.hints.len()] = self.slack;
        Placements {
            line: self,
            extras,
            exhausted: false,
        }
    }

    /// Lays out the runs with `extras[0]` leading empties, `extras[i]` extra
    /// empties after run `i`, and `extras[k]` trailing empties.
    fn build(&self, extras: &[usize]) -> Placement {
        let mut placement = BitVec::from_elem(self.length, false);
        let mut position = extras[0];
        for (i, &hint) in self.hints.iter().enumerate() {
            for cell in position..position + hint {
                placement.set(cell, true);
            }
            position += hint + 1 + extras[i + 1];
        }
        placement
    }
}

impl<'a> IntoIterator for &'a LineFeasibility {
    type Item = Placement;
    type IntoIter = Placements<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over the placements of a [`LineFeasibility`].
#[derive(Clone, Debug)]
pub struct Placements<'a> {
    line: &'a LineFeasibility,
    /// Current slack distribution; the last bucket holds whatever is left.
    extras: Vec<usize>,
    exhausted: bool,
}

impl Placements<'_> {
    /// Moves `extras` to its lexicographic successor, or marks the walk finished.
    fn advance(&mut self) {
        let k = self.line.hints.len();
        if k == 0 {
            self.exhausted = true;
            return;
        }
        if self.extras[k] > 0 {
            self.extras[k] -= 1;
            self.extras[k - 1] += 1;
            return;
        }
        match (0..k).rev().find(|&i| self.extras[i] > 0) {
            Some(t) if t > 0 => {
                let moved = self.extras[t];
                self.extras[t] = 0;
                self.extras[t - 1] += 1;
                self.extras[k] = moved - 1;
            }
            _ => self.exhausted = true,
        }
    }
}

impl Iterator for Placements<'_> {
    type Item = Placement;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let placement = self.line.build(&self.extras);
        self.advance();
        Some(placement)
    }
}

/// Session-scoped memo of feasibility sets keyed by `(hints, length)`.
#[derive(Debug, Default)]
pub struct FeasibilityCache {
    sets: FxHashMap<(Hints, usize), Rc<[Placement]>>,
    hits: usize,
    misses: usize,
}

impl FeasibilityCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All placements of `hints` in a line of `length` cells, computed at most once per pair.
    ///
    /// # Errors
    ///
    /// `NonogramError::Overfull` if the hints do not fit.
    pub fn get(&mut self, hints: &[usize], length: usize) -> Result<Rc<[Placement]>, NonogramError> {
        let key = (hints.iter().copied().collect::<Hints>(), length);
        if let Some(set) = self.sets.get(&key) {
            self.hits += 1;
            return Ok(Rc::clone(set));
        }

        let line = LineFeasibility::new(hints, length)?;
        let set: Rc<[Placement]> = line.iter().collect();
        log::trace!(
            "feasibility {hints:?}/{length}: {} placements (slack {})",
            set.len(),
            line.slack()
        );
        self.misses += 1;
        self.sets.insert(key, Rc::clone(&set));
        Ok(set)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    #[must_use]
    pub const fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonogram::puzzle::{Cell, runs_of};
    use std::collections::HashSet;

    fn render(placement: &Placement) -> String {
        placement.iter().map(|b| if b { '#' } else { '.' }).collect()
    }

    fn all(hints: &[usize], length: usize) -> Vec<String> {
        LineFeasibility::new(hints, length)
            .unwrap()
            .iter()
            .map(|p| render(&p))
            .collect()
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(4, 0), 1);
        assert_eq!(binomial(4, 4), 1);
        assert_eq!(binomial(2, 3), 0);
        assert_eq!(binomial(60, 30), 118_264_581_564_861_424);
    }

    #[test]
    fn test_tight_packing() {
        assert_eq!(all(&[1, 1], 3), vec!["#.#"]);
        assert_eq!(all(&[2, 1, 3], 8), vec!["##.#.###"]);
    }

    #[test]
    fn test_empty_hints() {
        assert_eq!(all(&[], 4), vec!["...."]);
        assert_eq!(all(&[], 0), vec![""]);
    }

    #[test]
    fn test_single_run_positions() {
        assert_eq!(all(&[2], 4), vec!["##..", ".##.", "..##"]);
    }

    #[test]
    fn test_two_runs_with_slack() {
        assert_eq!(
            all(&[1, 1], 4),
            vec!["#.#.", "#..#", ".#.#"]
        );
    }

    #[test]
    fn test_overfull_rejected() {
        assert!(matches!(
            LineFeasibility::new(&[3, 1], 4),
            Err(NonogramError::Overfull {
                required: 5,
                length: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_iter_restarts() {
        let line = LineFeasibility::new(&[1, 2], 6).unwrap();
        let first: Vec<_> = line.iter().collect();
        let second: Vec<_> = (&line).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_counts_and_validity_random() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let k = rng.usize(0..5);
            let hints: Vec<usize> = (0..k).map(|_| rng.usize(1..4)).collect();
            let length = crate::nonogram::puzzle::min_span(&hints) + rng.usize(0..6);

            let line = LineFeasibility::new(&hints, length).unwrap();
            let placements: Vec<Placement> = line.iter().collect();
            assert_eq!(
                placements.len() as u128,
                binomial(line.slack() + k, k),
                "count for {hints:?}/{length}"
            );

            let distinct: HashSet<_> = placements.iter().cloned().collect();
            assert_eq!(distinct.len(), placements.len(), "duplicates for {hints:?}/{length}");

            for placement in &placements {
                assert_eq!(placement.len(), length);
                let runs = runs_of(placement.iter().map(Cell::from_bool));
                assert_eq!(runs.as_slice(), hints.as_slice());
            }
        }
    }

    #[test]
    fn test_count_without_enumerating() {
        let line = LineFeasibility::new(&[1, 1, 1], 40).unwrap();
        assert_eq!(line.count(), binomial(38, 3));
    }

    #[test]
    fn test_cache_memoises() {
        let mut cache = FeasibilityCache::new();
        let a = cache.get(&[1, 2], 6).unwrap();
        let b = cache.get(&[1, 2], 6).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);

        let _ = cache.get(&[1, 2], 7).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&[9], 3).is_err());
        assert_eq!(cache.len(), 2);
    }
}
