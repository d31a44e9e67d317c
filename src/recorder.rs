//! # Evolution Recorder
//!
//! Accumulates the coarse-grained time series a run reports for one
//! rare earth: tick index, plus how many ticks since the last flush it
//! spent in `Ground` versus `Excited`. The per-tick residence counts
//! themselves live on `SiteTable`; this module only owns the flushed
//! history.

use serde::{Deserialize, Serialize};

/// Flushed history for a single rare earth site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionRecorder {
    t: Vec<u64>,
    g: Vec<u64>,
    e: Vec<u64>,
}

impl EvolutionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one flushed observation. `tick` must be strictly greater
    /// than the previous flush's tick; callers flush on a fixed cadence
    /// so this holds by construction.
    pub fn flush(&mut self, tick: u64, ground: u64, excited: u64) {
        self.t.push(tick);
        self.g.push(ground);
        self.e.push(excited);
    }

    pub fn ticks(&self) -> &[u64] {
        &self.t
    }

    pub fn ground_counts(&self) -> &[u64] {
        &self.g
    }

    pub fn excited_counts(&self) -> &[u64] {
        &self.e
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Mean of the excited-residence counts over the second half of
    /// the flushed series, the window after early transients have
    /// settled.
    pub fn excited_state_average(&self) -> f64 {
        let n = self.t.len();
        if n == 0 {
            return 0.0;
        }
        let start = n / 2;
        let window = &self.e[start..];
        window.iter().map(|&e| e as f64).sum::<f64>() / window.len() as f64
    }
}
