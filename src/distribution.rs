// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};

use statrs::function::erf::{erfc, erfc_inv};

pub(crate) const SQRT_3: f64 = 1.732_050_807_568_877_2;
pub(crate) const SQRT_6: f64 = 2.449_489_742_783_178;

/// The distribution assumed for a measured value around its mean.
///
/// All the functions here work on the standardized form, with zero mean and
/// unit variance, so the uniform distribution spans ±√3 and the triangular
/// distribution ±√6. `Undefined` is treated as `Gaussian`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    #[default]
    Gaussian,
    Uniform,
    Triangular,
    Undefined,
}

impl Distribution {
    /// Returns the distribution with `Undefined` resolved to `Gaussian`.
    #[inline]
    pub fn resolved(self) -> Self {
        match self {
            Distribution::Undefined => Distribution::Gaussian,
            other => other,
        }
    }

    /// The cumulative probability P(X ≤ x).
    pub fn cdf(self, x: f64) -> f64 {
        match self.resolved() {
            Distribution::Uniform => ((x + SQRT_3) / (2.0 * SQRT_3)).clamp(0.0, 1.0),
            Distribution::Triangular => {
                if x <= -SQRT_6 {
                    0.0
                } else if x <= 0.0 {
                    (x + SQRT_6).powi(2) / 12.0
                } else if x < SQRT_6 {
                    1.0 - (SQRT_6 - x).powi(2) / 12.0
                } else {
                    1.0
                }
            }
            _ => 0.5 * erfc(-x * FRAC_1_SQRT_2),
        }
    }

    /// The x for which P(X ≤ x) = p.
    pub fn quantile(self, p: f64) -> f64 {
        match self.resolved() {
            Distribution::Uniform => SQRT_3 * (2.0 * p - 1.0),
            Distribution::Triangular => {
                if p < 0.5 {
                    (12.0 * p).sqrt() - SQRT_6
                } else {
                    SQRT_6 - (12.0 * (1.0 - p)).sqrt()
                }
            }
            _ => -SQRT_2 * erfc_inv(2.0 * p),
        }
    }

    /// The x for which P(X > x) = q.
    ///
    /// Computed directly rather than as `quantile(1 - q)`, which loses
    /// precision for small `q`.
    pub fn quantile_complement(self, q: f64) -> f64 {
        match self.resolved() {
            Distribution::Uniform => SQRT_3 * (1.0 - 2.0 * q),
            Distribution::Triangular => -Distribution::Triangular.quantile(q),
            _ => SQRT_2 * erfc_inv(2.0 * q),
        }
    }

    /// The interval outside which the probability density is zero.
    pub fn support(self) -> (f64, f64) {
        match self.resolved() {
            Distribution::Uniform => (-SQRT_3, SQRT_3),
            Distribution::Triangular => (-SQRT_6, SQRT_6),
            _ => (f64::NEG_INFINITY, f64::INFINITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::{ContinuousCDF, Normal, Triangular, Uniform};

    const ALL: [Distribution; 3] = [
        Distribution::Gaussian,
        Distribution::Uniform,
        Distribution::Triangular,
    ];

    fn probabilities() -> impl Iterator<Item = f64> {
        (1..100).map(|i| f64::from(i) / 100.0)
    }

    #[test]
    fn cdf_inverts_quantile() {
        for dist in ALL {
            for p in probabilities() {
                let round_trip = dist.cdf(dist.quantile(p));
                assert!((round_trip - p).abs() < 1e-9, "{dist:?} at {p}: {round_trip}");
            }
        }
    }

    #[test]
    fn complement_is_symmetric() {
        for dist in ALL {
            for p in probabilities() {
                let upper = dist.quantile_complement(p / 2.0);
                let lower = dist.quantile(p / 2.0);
                assert!((upper + lower).abs() < 1e-12, "{dist:?} at {p}");
            }
        }
    }

    #[test]
    fn centred_at_zero() {
        for dist in ALL {
            assert!(dist.quantile(0.5).abs() < 1e-12);
            assert!((dist.cdf(0.0) - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn gaussian_matches_statrs() {
        let normal = Normal::new(0.0, 1.0).unwrap();
        for p in probabilities() {
            assert!((Distribution::Gaussian.quantile(p) - normal.inverse_cdf(p)).abs() < 1e-9);
        }
        assert!((Distribution::Gaussian.quantile_complement(0.025) - 1.959_963_984_540_054).abs() < 1e-9);
    }

    #[test]
    fn uniform_matches_statrs() {
        let uniform = Uniform::new(-SQRT_3, SQRT_3).unwrap();
        for x in [-2.0, -1.7, -0.5, 0.0, 0.3, 1.2, 1.73, 5.0] {
            assert!((Distribution::Uniform.cdf(x) - uniform.cdf(x)).abs() < 1e-12, "{x}");
        }
        assert!((Distribution::Uniform.quantile_complement(0.025) - SQRT_3 * 0.95).abs() < 1e-12);
    }

    #[test]
    fn triangular_matches_statrs() {
        let triangular = Triangular::new(-SQRT_6, SQRT_6, 0.0).unwrap();
        for x in [-3.0, -2.0, -0.5, 0.0, 0.4, 1.9, 2.44, 3.0] {
            assert!((Distribution::Triangular.cdf(x) - triangular.cdf(x)).abs() < 1e-12, "{x}");
        }
    }

    #[test]
    fn support() {
        assert_eq!(Distribution::Uniform.support(), (-SQRT_3, SQRT_3));
        assert_eq!(Distribution::Triangular.support(), (-SQRT_6, SQRT_6));
        assert_eq!(Distribution::Gaussian.support().1, f64::INFINITY);
    }

    #[test]
    fn undefined_behaves_as_gaussian() {
        assert_eq!(Distribution::Undefined.resolved(), Distribution::Gaussian);
        assert_eq!(
            Distribution::Undefined.quantile(0.9),
            Distribution::Gaussian.quantile(0.9)
        );
    }

    #[test]
    fn constants() {
        assert_eq!(SQRT_3, 3.0_f64.sqrt());
        assert_eq!(SQRT_6, 6.0_f64.sqrt());
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(serde_json::to_string(&Distribution::Triangular).unwrap(), "\"triangular\"");
        let d: Distribution = serde_json::from_str("\"uniform\"").unwrap();
        assert_eq!(d, Distribution::Uniform);
    }
}
