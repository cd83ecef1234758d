// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use tracing::warn;

use crate::distribution::Distribution;

/// The most significant digits shown for an uncertainty in fixed mode.
pub const MAX_FIXED_UNCERTAINTY_DIGITS: u32 = 3;

/// How many significant digits to keep.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitsMode {
    /// Let the statistics decide.
    #[default]
    Auto,
    Fixed(u32),
}

/// Presentation settings for [`Measurement::format`](crate::Measurement::format).
///
/// Built from the defaults with the `with_*` setters, or deserialized; any
/// field missing from the input takes its default.
///
/// # Example
///
/// ```
/// # use sciround::{FormatOptions, format_measurement};
/// #
/// let options = FormatOptions::default().with_confidence_interval(true);
/// assert_eq!(
///     format_measurement(127.835, 15.287, 1, &options).unwrap(),
///     "128. +/-15 <97.9, 157.8>"
/// );
/// ```
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub show_plus_minus: bool,
    pub show_confidence_interval: bool,
    pub show_degrees_of_freedom: bool,
    /// Print ` +/-0` after exact values.
    pub show_exact_uncertainty: bool,
    pub significant_digits: DigitsMode,
    pub uncertainty_significant_digits: DigitsMode,
    /// The fraction of confidence-interval coverage that rounding may cost.
    pub rounding_loss: f64,
    /// One minus the confidence level of the printed interval.
    pub confidence_alpha: f64,
    pub distribution: Distribution,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            show_plus_minus: true,
            show_confidence_interval: false,
            show_degrees_of_freedom: false,
            show_exact_uncertainty: false,
            significant_digits: DigitsMode::Auto,
            uncertainty_significant_digits: DigitsMode::Auto,
            rounding_loss: 0.01,
            confidence_alpha: 0.05,
            distribution: Distribution::Gaussian,
        }
    }
}

impl FormatOptions {
    pub fn with_plus_minus(mut self, show: bool) -> Self {
        self.show_plus_minus = show;
        self
    }

    pub fn with_confidence_interval(mut self, show: bool) -> Self {
        self.show_confidence_interval = show;
        self
    }

    pub fn with_degrees_of_freedom(mut self, show: bool) -> Self {
        self.show_degrees_of_freedom = show;
        self
    }

    pub fn with_exact_uncertainty(mut self, show: bool) -> Self {
        self.show_exact_uncertainty = show;
        self
    }

    pub fn with_significant_digits(mut self, mode: DigitsMode) -> Self {
        self.significant_digits = mode;
        self
    }

    pub fn with_uncertainty_significant_digits(mut self, mode: DigitsMode) -> Self {
        self.uncertainty_significant_digits = mode;
        self
    }

    pub fn with_rounding_loss(mut self, rounding_loss: f64) -> Self {
        self.rounding_loss = rounding_loss;
        self
    }

    pub fn with_confidence_alpha(mut self, alpha: f64) -> Self {
        self.confidence_alpha = alpha;
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// The number of significant digits to show for an uncertainty backed
    /// by `degrees_of_freedom`.
    ///
    /// In auto mode that is 2, or 3 once there are enough degrees of freedom
    /// for the third digit to carry information. Fixed counts outside
    /// `1..=3` are clamped.
    pub fn uncertainty_digits(&self, degrees_of_freedom: u32) -> u32 {
        match self.uncertainty_significant_digits {
            DigitsMode::Auto if degrees_of_freedom >= 1000 => 3,
            DigitsMode::Auto => 2,
            DigitsMode::Fixed(n) => {
                let clamped = n.clamp(1, MAX_FIXED_UNCERTAINTY_DIGITS);
                if clamped != n {
                    warn!(requested = n, used = clamped, "uncertainty digits clamped");
                }
                clamped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = FormatOptions::default();
        assert!(options.show_plus_minus);
        assert!(!options.show_confidence_interval);
        assert!(!options.show_degrees_of_freedom);
        assert_eq!(options.rounding_loss, 0.01);
        assert_eq!(options.confidence_alpha, 0.05);
        assert_eq!(options.distribution, Distribution::Gaussian);
    }

    #[test]
    fn builder() {
        let options = FormatOptions::default()
            .with_plus_minus(false)
            .with_degrees_of_freedom(true)
            .with_rounding_loss(0.05)
            .with_distribution(Distribution::Uniform)
            .with_significant_digits(DigitsMode::Fixed(4));
        assert!(!options.show_plus_minus);
        assert!(options.show_degrees_of_freedom);
        assert_eq!(options.rounding_loss, 0.05);
        assert_eq!(options.distribution, Distribution::Uniform);
        assert_eq!(options.significant_digits, DigitsMode::Fixed(4));
        // Untouched fields keep their defaults
        assert_eq!(options.confidence_alpha, 0.05);
    }

    #[test]
    fn auto_uncertainty_digits() {
        let options = FormatOptions::default();
        assert_eq!(options.uncertainty_digits(1), 2);
        assert_eq!(options.uncertainty_digits(999), 2);
        assert_eq!(options.uncertainty_digits(1000), 3);
    }

    #[test]
    fn fixed_uncertainty_digits_clamped() {
        let digits =
            |n| FormatOptions::default().with_uncertainty_significant_digits(DigitsMode::Fixed(n));
        assert_eq!(digits(0).uncertainty_digits(1), 1);
        assert_eq!(digits(2).uncertainty_digits(5000), 2);
        assert_eq!(digits(7).uncertainty_digits(1), 3);
    }

    #[test]
    fn deserialize_partial() {
        let options: FormatOptions = serde_json::from_str(
            r#"{"show_confidence_interval": true, "significant_digits": {"fixed": 3}, "distribution": "triangular"}"#,
        )
        .unwrap();
        assert_eq!(
            options,
            FormatOptions::default()
                .with_confidence_interval(true)
                .with_significant_digits(DigitsMode::Fixed(3))
                .with_distribution(Distribution::Triangular)
        );
    }

    #[test]
    fn serde_round_trip() {
        let options = FormatOptions::default()
            .with_confidence_alpha(0.32)
            .with_uncertainty_significant_digits(DigitsMode::Fixed(1));
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains(r#""uncertainty_significant_digits":{"fixed":1}"#));
        let back: FormatOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }
}
