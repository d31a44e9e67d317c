//! # Step Kernel
//!
//! Owns the mutable simulation state for one run and advances it tick
//! by tick. Each tick draws a fresh candidate set from the site table,
//! resolves at most one transition per candidate from a single
//! uniform draw against that site's cumulative thresholds, and routes
//! freed electrons through the recombination resolver.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

use crate::recombination::recombine;
use crate::recorder::EvolutionRecorder;
use crate::site::{ReState, SiteTable};

/// Mutable run state plus the RNG and bookkeeping counters that
/// accumulate over the course of a run.
pub struct Engine {
    table: SiteTable,
    travel_radius: f64,
    rng: StdRng,

    /// One recorder per RE site, same order as `table.re_indices()`.
    recorders: Vec<EvolutionRecorder>,

    /// Per-site count of ticks observed populated, sampled every
    /// other tick. Index aligned with the full site table, ET range
    /// first then RE range.
    population_heatmap: Vec<f64>,

    /// Electrons handed back directly from the valence band on a
    /// repump event, bypassing the recombination resolver entirely.
    valence_band_donations: u64,

    /// Ionizations whose freed electron found no reachable vacancy.
    electron_lost_count: u64,

    tick: u64,
    flush_interval: u64,
}

impl Engine {
    pub fn new(table: SiteTable, travel_radius: f64, rng: StdRng, ticks: u64) -> Self {
        let n_re = table.n_re();
        let n_sites = table.len();
        let flush_interval = ((ticks + 19) / 20).max(1);

        Engine {
            table,
            travel_radius,
            rng,
            recorders: (0..n_re).map(|_| EvolutionRecorder::new()).collect(),
            population_heatmap: vec![0.0; n_sites],
            valence_band_donations: 0,
            electron_lost_count: 0,
            tick: 0,
            flush_interval,
        }
    }

    pub fn table(&self) -> &SiteTable {
        &self.table
    }

    pub fn recorders(&self) -> &[EvolutionRecorder] {
        &self.recorders
    }

    pub fn population_heatmap(&self) -> &[f64] {
        &self.population_heatmap
    }

    pub fn valence_band_donations(&self) -> u64 {
        self.valence_band_donations
    }

    pub fn electron_lost_count(&self) -> u64 {
        self.electron_lost_count
    }

    /// Drives `total_ticks` steps, flushing recorders on a fixed
    /// cadence and logging coarse progress. The run driver passes
    /// `N + 1` here for a configuration with tick count `N`.
    pub fn run(&mut self, total_ticks: u64) {
        let progress_step = (total_ticks / 100).max(1);
        for t in 0..total_ticks {
            self.step();
            if t % progress_step == 0 {
                info!(
                    "tick {t}/{total_ticks} ({:.0}%)",
                    100.0 * t as f64 / total_ticks as f64
                );
            }
        }
    }

    /// Advances the simulation by one tick.
    fn step(&mut self) {
        let candidates = self.table.sample_candidates(&mut self.rng);

        for i in candidates {
            if self.table.is_re(i) {
                self.step_re(i);
            } else {
                self.step_et(i);
            }
        }

        for i in self.table.re_indices() {
            self.table.observe_re(i);
        }

        self.tick += 1;

        if self.tick % 2 == 0 {
            for i in 0..self.table.len() {
                if self.table.populated(i) {
                    self.population_heatmap[i] += 1.0;
                }
            }
        }

        if self.tick % self.flush_interval == 0 {
            self.flush_recorders();
        }
    }

    fn step_et(&mut self, i: usize) {
        let u: f64 = self.rng.random();
        if !self.table.populated(i) {
            return;
        }
        if u < self.table.et_threshold(i) {
            self.table.set_populated(i, false);
            self.ionize_and_recombine(i);
        }
    }

    fn step_re(&mut self, i: usize) {
        let u: f64 = self.rng.random();
        let t = self.table.re_thresholds(i);
        let state = self.table.re_state(i);

        if u < t.decay {
            if state == ReState::Excited {
                self.table.set_re_state(i, ReState::Ground);
            }
        } else if u < t.ionize {
            if state == ReState::Excited {
                self.table.set_populated(i, false);
                self.table.set_re_state(i, ReState::Ionized);
                self.ionize_and_recombine(i);
            }
        } else if u < t.excite {
            if state == ReState::Ground {
                self.table.set_re_state(i, ReState::Excited);
            }
        } else if u < t.repump {
            if state == ReState::Ionized {
                self.table.set_re_state(i, ReState::Ground);
                self.table.set_populated(i, true);
                self.valence_band_donations += 1;
                debug!("site {i} repumped directly from the valence band");
            }
        } else if u < t.deplete {
            if state == ReState::Excited {
                self.table.set_re_state(i, ReState::Ground);
            }
        }
    }

    fn ionize_and_recombine(&mut self, source: usize) {
        let found = recombine(&mut self.table, source, self.travel_radius, &mut self.rng);
        if !found {
            self.electron_lost_count += 1;
        }
    }

    fn flush_recorders(&mut self) {
        for (offset, i) in self.table.re_indices().enumerate() {
            let (ground, excited) = self.table.take_residence_counts(i);
            self.recorders[offset].flush(self.tick, ground, excited);
        }
    }
}
