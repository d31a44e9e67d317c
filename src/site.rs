//! # Site Table
//!
//! Struct-of-arrays storage for every electron trap (ET) and rare
//! earth (RE) site in a run. ETs occupy the contiguous index range
//! `[0, n_et)`, REs occupy `[n_et, n_et + n_re)`; callers never need
//! a per-site tag test to find "all the REs" or "all the ETs".

use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;

/// Immutable site kind, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SiteKind {
    ElectronTrap,
    RareEarth,
}

/// Internal electronic state of a rare earth. Meaningless for ET rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ReState {
    Ground,
    Excited,
    Ionized,
}

/// Flat, columnar store of every site in a run.
///
/// Invariant: for an RE site, `populated` is true iff `re_state` is
/// `Ground` or `Excited`; `re_state == Ionized` iff `!populated`. ET
/// rows carry an unused `re_state` column (always `Ground`) to keep
/// all columns the same length without a tag test.
#[derive(Debug, Clone)]
pub struct SiteTable {
    x: Vec<f64>,
    y: Vec<f64>,
    kind: Vec<SiteKind>,
    populated: Vec<bool>,
    re_state: Vec<ReState>,

    // RE-only cumulative decision thresholds, monotone non-decreasing.
    p_decay: Vec<f64>,
    p_ionize: Vec<f64>,
    p_excite: Vec<f64>,
    p_repump: Vec<f64>,
    p_deplete: Vec<f64>,

    // ET-only decision threshold.
    p_ionize_et: Vec<f64>,

    // RE-only residence counters, reset on every recorder flush.
    n_ground: Vec<u64>,
    n_excited: Vec<u64>,

    n_et: usize,
    n_re: usize,
}

impl SiteTable {
    /// Builds a table with all ET sites first, then all RE sites.
    /// Every site starts populated: RE sites hold their electron in
    /// `Ground` state, and ET sites hold theirs until ionized.
    pub fn new(et_positions: &[(f64, f64)], re_positions: &[(f64, f64)]) -> Self {
        let n_et = et_positions.len();
        let n_re = re_positions.len();
        let n = n_et + n_re;

        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        let mut kind = Vec::with_capacity(n);
        for &(px, py) in et_positions {
            x.push(px);
            y.push(py);
            kind.push(SiteKind::ElectronTrap);
        }
        for &(px, py) in re_positions {
            x.push(px);
            y.push(py);
            kind.push(SiteKind::RareEarth);
        }

        SiteTable {
            x,
            y,
            kind,
            populated: vec![true; n],
            re_state: vec![ReState::Ground; n],
            p_decay: vec![0.0; n],
            p_ionize: vec![0.0; n],
            p_excite: vec![0.0; n],
            p_repump: vec![0.0; n],
            p_deplete: vec![0.0; n],
            p_ionize_et: vec![0.0; n],
            n_ground: vec![0; n],
            n_excited: vec![0; n],
            n_et,
            n_re,
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn positions(&self) -> (&[f64], &[f64]) {
        (&self.x, &self.y)
    }

    pub fn position(&self, i: usize) -> (f64, f64) {
        (self.x[i], self.y[i])
    }

    pub fn is_re(&self, i: usize) -> bool {
        self.kind[i] == SiteKind::RareEarth
    }

    pub fn populated(&self, i: usize) -> bool {
        self.populated[i]
    }

    pub fn re_state(&self, i: usize) -> ReState {
        self.re_state[i]
    }

    pub fn set_populated(&mut self, i: usize, value: bool) {
        self.populated[i] = value;
    }

    pub fn set_re_state(&mut self, i: usize, state: ReState) {
        self.re_state[i] = state;
    }

    /// Contiguous range covering every ET site.
    pub fn et_indices(&self) -> Range<usize> {
        0..self.n_et
    }

    /// Contiguous range covering every RE site.
    pub fn re_indices(&self) -> Range<usize> {
        self.n_et..self.n_et + self.n_re
    }

    pub fn n_et(&self) -> usize {
        self.n_et
    }

    pub fn n_re(&self) -> usize {
        self.n_re
    }

    /// Indices of every currently-unpopulated site, materialised fresh
    /// on each call (the vacancy set changes tick to tick).
    pub fn vacant_indices(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| !self.populated[i]).collect()
    }

    /// Threshold columns, exposed for the probability builder.
    pub fn thresholds_mut(&mut self, i: usize) -> ReThresholdsMut<'_> {
        ReThresholdsMut {
            decay: &mut self.p_decay[i],
            ionize: &mut self.p_ionize[i],
            excite: &mut self.p_excite[i],
            repump: &mut self.p_repump[i],
            deplete: &mut self.p_deplete[i],
        }
    }

    pub fn set_et_threshold(&mut self, i: usize, value: f64) {
        self.p_ionize_et[i] = value;
    }

    pub fn et_threshold(&self, i: usize) -> f64 {
        self.p_ionize_et[i]
    }

    pub fn re_thresholds(&self, i: usize) -> ReThresholds {
        ReThresholds {
            decay: self.p_decay[i],
            ionize: self.p_ionize[i],
            excite: self.p_excite[i],
            repump: self.p_repump[i],
            deplete: self.p_deplete[i],
        }
    }

    /// Every tick: increment this RE's ground/excited residence
    /// counter according to its current state. Ionized increments
    /// neither.
    pub fn observe_re(&mut self, i: usize) {
        match self.re_state[i] {
            ReState::Ground => self.n_ground[i] += 1,
            ReState::Excited => self.n_excited[i] += 1,
            ReState::Ionized => {}
        }
    }

    pub fn take_residence_counts(&mut self, i: usize) -> (u64, u64) {
        let counts = (self.n_ground[i], self.n_excited[i]);
        self.n_ground[i] = 0;
        self.n_excited[i] = 0;
        counts
    }

    /// Builds this tick's candidate index list: ⌈0.01·n_et + 1⌉ ET
    /// indices sampled without replacement, concatenated with *all*
    /// RE indices, then shuffled together so the two classes interleave
    /// uniformly at random.
    pub fn sample_candidates(&self, rng: &mut impl Rng) -> Vec<usize> {
        let n_sample = (0.01 * self.n_et as f64 + 1.0).ceil() as usize;
        let n_sample = n_sample.min(self.n_et);

        let mut et_pool: Vec<usize> = self.et_indices().collect();
        let (sampled, _) = et_pool.partial_shuffle(rng, n_sample);
        let mut candidates: Vec<usize> = sampled.to_vec();
        candidates.extend(self.re_indices());
        candidates.shuffle(rng);
        candidates
    }
}

/// Read-only view of one RE site's five cumulative thresholds.
#[derive(Debug, Clone, Copy)]
pub struct ReThresholds {
    pub decay: f64,
    pub ionize: f64,
    pub excite: f64,
    pub repump: f64,
    pub deplete: f64,
}

/// Mutable view used only during threshold construction.
pub struct ReThresholdsMut<'a> {
    pub decay: &'a mut f64,
    pub ionize: &'a mut f64,
    pub excite: &'a mut f64,
    pub repump: &'a mut f64,
    pub deplete: &'a mut f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn ranges_are_contiguous_and_ordered_et_then_re() {
        let table = SiteTable::new(&[(0.0, 0.0), (1.0, 0.0)], &[(2.0, 0.0)]);
        assert_eq!(table.et_indices(), 0..2);
        assert_eq!(table.re_indices(), 2..3);
        assert!(!table.is_re(0));
        assert!(!table.is_re(1));
        assert!(table.is_re(2));
    }

    #[test]
    fn sites_start_populated_and_re_ground() {
        let table = SiteTable::new(&[(0.0, 0.0)], &[(1.0, 0.0)]);
        for i in 0..table.len() {
            assert!(table.populated(i));
        }
        assert_eq!(table.re_state(2), ReState::Ground);
    }

    #[test]
    fn vacant_indices_tracks_mutation() {
        let mut table = SiteTable::new(&[(0.0, 0.0), (1.0, 0.0)], &[]);
        assert!(table.vacant_indices().is_empty());
        table.set_populated(0, false);
        assert_eq!(table.vacant_indices(), vec![0]);
    }

    #[test]
    fn candidate_sampling_always_includes_every_re() {
        let et: Vec<(f64, f64)> = (0..500).map(|i| (i as f64, 0.0)).collect();
        let re = vec![(0.0, 1.0), (0.0, 2.0), (0.0, 3.0)];
        let table = SiteTable::new(&et, &re);
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = table.sample_candidates(&mut rng);

        for re_idx in table.re_indices() {
            assert!(candidates.contains(&re_idx));
        }
        let expected_et_count = (0.01 * 500.0 + 1.0).ceil() as usize;
        assert_eq!(candidates.len(), expected_et_count + 3);
    }
}
