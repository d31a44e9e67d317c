//! # Probability Builder
//!
//! Converts raw beam intensities and cross-sections into the
//! normalized, cumulative per-site decision thresholds the step
//! kernel draws against. Invoked exactly once per run, after site
//! construction and before tick 0.

use crate::beam::{BeamParams, BeamProfile};
use crate::error::{EngineError, Result};
use crate::site::SiteTable;

/// The five cross-sections shared by every RE site in a run, in the
/// order `(gamma, sigma_pump, sigma_ionize, sigma_repump, sigma_sted)`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CrossSections {
    pub gamma: f64,
    pub sigma_pump: f64,
    pub sigma_ionize: f64,
    pub sigma_repump: f64,
    pub sigma_sted: f64,
}

/// Builds ET and RE decision thresholds in place.
///
/// ET thresholds: `raw_i = I_pump_i + I_sted_i`, normalized by the
/// maximum raw value across all ET sites.
///
/// RE thresholds: five raw channels (decay, ionize, excite, repump,
/// deplete) are each normalized by the single largest *summed* raw
/// value `M` across all RE sites, then accumulated in that fixed
/// order to produce monotone cumulative thresholds. Finally, every
/// site's five cumulative thresholds are rescaled by
/// `10 * (sum of that site's own five cumulative thresholds)`;
/// this compresses the hottest RE's maximum achievable per-tick
/// probability to at most 0.1, which is what keeps many-tick
/// stochastic competition from collapsing into a deterministic fire
/// every tick. The physical meaning of the `10x` constant is not
/// otherwise specified upstream; it is preserved verbatim.
///
/// Returns `NumericDegenerate` if either normalizer is zero (e.g. both
/// beam amplitudes are zero and no RE has nonzero `gamma`).
pub fn build_thresholds(
    table: &mut SiteTable,
    pump: &BeamParams,
    sted: &BeamParams,
    cross_sections: CrossSections,
) -> Result<()> {
    let (xs, ys) = table.positions();
    let i_pump: Vec<f64> = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| BeamProfile::Gaussian.intensity(pump, x, y))
        .collect();
    let i_sted: Vec<f64> = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| BeamProfile::Donut.intensity(sted, x, y))
        .collect();

    build_et_thresholds(table, &i_pump, &i_sted)?;
    build_re_thresholds(table, &i_pump, &i_sted, cross_sections)?;
    Ok(())
}

fn build_et_thresholds(table: &mut SiteTable, i_pump: &[f64], i_sted: &[f64]) -> Result<()> {
    let et_range = table.et_indices();
    if et_range.is_empty() {
        return Ok(());
    }

    let raw: Vec<f64> = et_range.clone().map(|i| i_pump[i] + i_sted[i]).collect();
    let max_raw = raw.iter().cloned().fold(0.0_f64, f64::max);
    if max_raw <= 0.0 {
        return Err(EngineError::NumericDegenerate(
            "all electron-trap intensities are zero".to_string(),
        ));
    }

    for (offset, i) in et_range.enumerate() {
        table.set_et_threshold(i, raw[offset] / max_raw);
    }
    Ok(())
}

fn build_re_thresholds(
    table: &mut SiteTable,
    i_pump: &[f64],
    i_sted: &[f64],
    cs: CrossSections,
) -> Result<()> {
    let re_range = table.re_indices();
    if re_range.is_empty() {
        return Ok(());
    }

    struct Channels {
        decay: f64,
        ionize: f64,
        excite: f64,
        repump: f64,
        deplete: f64,
        total: f64,
    }

    let channels: Vec<Channels> = re_range
        .clone()
        .map(|i| {
            let excite = i_pump[i] * cs.sigma_pump;
            let ionize = (i_pump[i] + i_sted[i]) * cs.sigma_ionize;
            let repump = i_pump[i] * cs.sigma_repump;
            let decay = cs.gamma;
            let deplete = i_sted[i] * cs.sigma_sted;
            Channels {
                decay,
                ionize,
                excite,
                repump,
                deplete,
                total: decay + ionize + excite + repump + deplete,
            }
        })
        .collect();

    let m = channels.iter().map(|c| c.total).fold(0.0_f64, f64::max);
    if m <= 0.0 {
        return Err(EngineError::NumericDegenerate(
            "all rare-earth transition channels are zero".to_string(),
        ));
    }

    for (offset, i) in re_range.enumerate() {
        let c = &channels[offset];
        let decay = c.decay / m;
        let ionize = decay + c.ionize / m;
        let excite = ionize + c.excite / m;
        let repump = excite + c.repump / m;
        let deplete = repump + c.deplete / m;

        let site_sum = decay + ionize + excite + repump + deplete;
        let scale = 10.0 * site_sum;
        let (decay, ionize, excite, repump, deplete) = if scale > 0.0 {
            (
                decay / scale,
                ionize / scale,
                excite / scale,
                repump / scale,
                deplete / scale,
            )
        } else {
            (0.0, 0.0, 0.0, 0.0, 0.0)
        };

        let t = table.thresholds_mut(i);
        *t.decay = decay;
        *t.ionize = ionize;
        *t.excite = excite;
        *t.repump = repump;
        *t.deplete = deplete;
    }

    Ok(())
}
