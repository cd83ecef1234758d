// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use crate::{
    distribution::Distribution,
    error::{Result, RoundingError},
};

/// A two-sided confidence interval around a mean.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    #[inline]
    pub fn half_width(&self) -> f64 {
        self.width() / 2.0
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }
}

/// Computes the two-sided interval expected to hold the true value with
/// probability `1 - alpha`.
///
/// The half-width is the upper `alpha / 2` quantile of the standardized
/// distribution times a scale. For a Gaussian with more than one degree of
/// freedom the scale is the standard error `uncertainty / √df`; otherwise
/// it is the uncertainty itself. No Student-t correction is applied for
/// small samples.
///
/// # Example
///
/// ```
/// # use sciround::{confidence_interval, Distribution};
/// #
/// let ci = confidence_interval(127.835, 15.287, 1.0, 0.05, Distribution::Gaussian).unwrap();
/// assert!((ci.lower - 97.873).abs() < 1e-3);
/// assert!((ci.upper - 157.797).abs() < 1e-3);
/// ```
pub fn confidence_interval(
    mean: f64,
    uncertainty: f64,
    degrees_of_freedom: f64,
    alpha: f64,
    distribution: Distribution,
) -> Result<ConfidenceInterval> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(RoundingError::InvalidConfidenceLevel(alpha));
    }
    if uncertainty < 0.0 {
        return Err(RoundingError::CorrelatedUncertainty);
    }
    let distribution = distribution.resolved();
    let coverage_factor = distribution.quantile_complement(alpha / 2.0);
    let scale = if distribution == Distribution::Gaussian && degrees_of_freedom > 1.0 {
        uncertainty / degrees_of_freedom.sqrt()
    } else {
        uncertainty
    };
    let half_width = coverage_factor * scale;
    Ok(ConfidenceInterval {
        lower: mean - half_width,
        upper: mean + half_width,
    })
}
