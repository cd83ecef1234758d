// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use std::ops::RangeInclusive;

use tracing::{debug, warn};

use crate::{
    distribution::{Distribution, SQRT_3},
    error::{Result, RoundingError},
    round::round_to_significant_digits,
};

/// The most significant digits of an uncertainty the selector will keep.
pub const MAX_UNCERTAINTY_DIGITS: u32 = 4;

/// Rounding losses for which the Gaussian fit of δ is accurate to 0.0123.
pub const GAUSSIAN_FIT_BAND: RangeInclusive<f64> = 0.005..=0.1;

/// The outcome of choosing where to round a value, with the quantities that
/// led to it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoundingSelection {
    /// The position `m` to pass to [`round_at_position`](crate::round_at_position).
    pub position: i32,
    /// The uncertainty rounded to the requested significant digits, σ*.
    pub rounded_uncertainty: f64,
    /// The ratio of rounded to unrounded uncertainty, γ ≤ 1.
    pub gamma: f64,
    /// The largest shift of the mean, in units of the uncertainty, that the
    /// rounding loss tolerates.
    pub delta: f64,
}

/// Returns `min(a/b, b/a)`, so the order of rounded and unrounded values
/// does not matter and the result is never above 1.
#[inline]
pub fn rounded_ratio(rounded: f64, unrounded: f64) -> f64 {
    let ratio = rounded / unrounded;
    if ratio > 1.0 { ratio.recip() } else { ratio }
}

/// The smallest γ for which a rounding loss of `rounding_loss` is
/// achievable at all.
pub fn gamma_threshold(rounding_loss: f64, distribution: Distribution) -> f64 {
    let eps = rounding_loss;
    match distribution.resolved() {
        Distribution::Uniform => 1.0 - eps,
        Distribution::Triangular => (1.0 - eps) / (1.0 + eps),
        _ => 1.0001 - 2.058 * eps + 1.93 * eps * eps,
    }
}

/// The largest shift δ of the mean, in units of the uncertainty, that keeps
/// the loss of confidence-interval coverage within `rounding_loss`, given
/// that the uncertainty itself was shrunk by `gamma`.
///
/// Returns `None` when no positive shift is allowed.
///
/// The Gaussian form is a fit to the exact result. The uniform and
/// triangular forms are exact: the worst-case coverage loss over all
/// interval widths is `(1 - γ)/2 + δ/(2√3)` for the uniform distribution and
/// `(1 - γ)/(1 + γ) + δ²/6` for the triangular.
pub fn delta(rounding_loss: f64, gamma: f64, distribution: Distribution) -> Option<f64> {
    let eps = rounding_loss;
    let delta = match distribution.resolved() {
        Distribution::Uniform => SQRT_3 * (gamma - 1.0 + 2.0 * eps),
        Distribution::Triangular => (6.0 * (eps - (1.0 - gamma) / (1.0 + gamma))).sqrt(),
        _ => {
            (1.348 + 0.9886 * eps + 0.2288 * eps.sqrt())
                * (gamma - 1.0001 + 2.058 * eps - 1.93 * eps * eps).sqrt()
        }
    };
    (delta > 0.0).then_some(delta)
}

/// Chooses the position `m` at which to round a value whose uncertainty is
/// shown to `uncertainty_digits` significant digits, so that rounding loses
/// at most `rounding_loss` of the confidence interval's coverage.
///
/// `uncertainty_digits` is clamped into `1..=4`.
///
/// # Errors
///
/// Returns [`RoundingError::RoundingLossTooTight`] when rounding the
/// uncertainty alone already costs more than `rounding_loss`; keep more
/// uncertainty digits or accept a larger loss.
///
/// # Example
///
/// ```
/// # use sciround::{select_rounding_position, Distribution};
/// #
/// let m = select_rounding_position(0.01, 15.287, 2, Distribution::Gaussian).unwrap();
/// assert_eq!(m, -1);
/// ```
pub fn select_rounding_position(
    rounding_loss: f64,
    uncertainty: f64,
    uncertainty_digits: u32,
    distribution: Distribution,
) -> Result<i32> {
    rounding_selection(rounding_loss, uncertainty, uncertainty_digits, distribution)
        .map(|selection| selection.position)
}

/// As [`select_rounding_position`], also returning σ*, γ, and δ.
pub fn rounding_selection(
    rounding_loss: f64,
    uncertainty: f64,
    uncertainty_digits: u32,
    distribution: Distribution,
) -> Result<RoundingSelection> {
    if !(rounding_loss > 0.0 && rounding_loss < 1.0) {
        return Err(RoundingError::InvalidRoundingLoss(rounding_loss));
    }
    if !(uncertainty.is_finite() && uncertainty > 0.0) {
        return Err(RoundingError::InvalidUncertainty(uncertainty));
    }
    let distribution = distribution.resolved();
    if distribution == Distribution::Gaussian && !GAUSSIAN_FIT_BAND.contains(&rounding_loss) {
        warn!(rounding_loss, "rounding loss outside the accurate range of the Gaussian fit");
    }
    let digits = uncertainty_digits.clamp(1, MAX_UNCERTAINTY_DIGITS);
    if digits != uncertainty_digits {
        debug!(requested = uncertainty_digits, used = digits, "uncertainty digits clamped");
    }

    let rounded_uncertainty = round_to_significant_digits(uncertainty, digits)?;
    let gamma = rounded_ratio(rounded_uncertainty, uncertainty);
    let threshold = gamma_threshold(rounding_loss, distribution);
    let too_tight = || {
        debug!(rounding_loss, gamma, threshold, "rounding loss cannot be met");
        RoundingError::RoundingLossTooTight {
            rounding_loss,
            gamma,
            threshold,
        }
    };
    if gamma < threshold {
        return Err(too_tight());
    }
    let delta = delta(rounding_loss, gamma, distribution).ok_or_else(too_tight)?;

    let position = (delta * rounded_uncertainty / (5.0 * gamma)).log10().floor() as i32;
    debug!(
        ?distribution,
        rounded_uncertainty, gamma, delta, position, "rounding position selected"
    );
    Ok(RoundingSelection {
        position,
        rounded_uncertainty,
        gamma,
        delta,
    })
}
