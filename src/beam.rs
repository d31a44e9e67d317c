//! # Beam Field Evaluator
//!
//! Pure scalar-intensity functions for the two overlapping lasers
//! (Gaussian excitation pump, donut-shaped STED depletion beam) used
//! to illuminate the crystal. Both profiles share the same derived
//! geometry (`FWHM`, `sigma`) and differ only in their radial shape.
//!
//! ## Usage Example
//!
//! ```rust
//! use sted_kmc::beam::{BeamParams, BeamProfile};
//!
//! let pump = BeamParams {
//!     center: (0.0, 0.0),
//!     amplitude: 1.0,
//!     wavelength: 470e-9,
//!     numerical_aperture: 1.3,
//! };
//!
//! let i = BeamProfile::Gaussian.intensity(&pump, 10e-9, 0.0);
//! assert!(i > 0.0 && i <= pump.amplitude);
//! ```

/// Parameters describing a single focused laser beam.
///
/// `FWHM` and `sigma` are derived from `wavelength` and
/// `numerical_aperture` rather than stored directly, so a `BeamParams`
/// can never drift out of sync with its own optics.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BeamParams {
    /// Beam center in the sample plane, meters.
    pub center: (f64, f64),
    /// Peak intensity at the profile's maximum.
    pub amplitude: f64,
    /// Wavelength, meters.
    pub wavelength: f64,
    /// Numerical aperture of the focusing optics.
    pub numerical_aperture: f64,
}

impl BeamParams {
    /// Full width at half maximum: `wavelength / numerical_aperture`.
    pub fn fwhm(&self) -> f64 {
        self.wavelength / self.numerical_aperture
    }

    /// Gaussian standard deviation equivalent to this beam's FWHM.
    pub fn sigma(&self) -> f64 {
        self.fwhm() / (2.0 * (2.0_f64).ln().sqrt() * std::f64::consts::SQRT_2)
    }

    /// The dimensionless radial coordinate shared by both profiles:
    /// `4 ln2 * r^2 / FWHM^2`.
    fn u(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.center.0;
        let dy = y - self.center.1;
        let fwhm = self.fwhm();
        4.0 * std::f64::consts::LN_2 * (dx * dx + dy * dy) / (fwhm * fwhm)
    }
}

/// The two beam shapes used by the engine.
///
/// `Gaussian` is the focused excitation pump; `Donut` is the
/// depletion STED beam, which vanishes at its own center and peaks on
/// a surrounding ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BeamProfile {
    Gaussian,
    Donut,
}

impl BeamProfile {
    /// Scalar intensity at `(x, y)` for the given beam parameters.
    ///
    /// Non-finite `(x, y)` is undefined behaviour; the caller must
    /// ensure finite positions. This function performs no validation
    /// of its own.
    pub fn intensity(&self, params: &BeamParams, x: f64, y: f64) -> f64 {
        let u = params.u(x, y);
        match self {
            BeamProfile::Gaussian => params.amplitude * (-u).exp(),
            BeamProfile::Donut => params.amplitude * u * (1.0 - u).exp(),
        }
    }
}
