// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use std::{error::Error, fmt};

pub type Result<T> = std::result::Result<T, RoundingError>;

/// Errors returned by the rounding, selection, and formatting functions.
///
/// Non-finite values are not errors; they pass through every function as the
/// tokens `inf`, `-inf`, `NaN`, and `-NaN`.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundingError {
    /// A significant digit count of zero was requested.
    InvalidDigitCount(u32),
    /// The uncertainty, once rounded, is too distorted for the requested
    /// rounding loss to be respected.
    RoundingLossTooTight {
        rounding_loss: f64,
        gamma: f64,
        threshold: f64,
    },
    /// The rounding loss must lie strictly between 0 and 1.
    InvalidRoundingLoss(f64),
    /// The confidence alpha must lie strictly between 0 and 1.
    InvalidConfidenceLevel(f64),
    /// The selector needs a finite, strictly positive uncertainty.
    InvalidUncertainty(f64),
    /// Correlated uncertainties (or negative ones, which encode them) cannot
    /// be rounded yet.
    CorrelatedUncertainty,
    Parse(String),
}

impl fmt::Display for RoundingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoundingError::InvalidDigitCount(n) => {
                write!(f, "Invalid number of significant digits: {n}. Must be at least 1.")
            }
            RoundingError::RoundingLossTooTight {
                rounding_loss,
                gamma,
                threshold,
            } => write!(
                f,
                "Rounding loss {rounding_loss} cannot be met: gamma {gamma:.4} is below the threshold {threshold:.4}"
            ),
            RoundingError::InvalidRoundingLoss(eps) => {
                write!(f, "Invalid rounding loss: {eps}. Must satisfy 0 < loss < 1.")
            }
            RoundingError::InvalidConfidenceLevel(alpha) => {
                write!(f, "Invalid confidence alpha: {alpha}. Must satisfy 0 < alpha < 1.")
            }
            RoundingError::InvalidUncertainty(unc) => {
                write!(f, "Invalid uncertainty: {unc}. Must be finite and positive.")
            }
            RoundingError::CorrelatedUncertainty => {
                write!(f, "Correlated uncertainties are not supported")
            }
            RoundingError::Parse(string) => write!(f, "Failed to parse: {string}"),
        }
    }
}

impl Error for RoundingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_embeds_payload() {
        assert_eq!(
            RoundingError::InvalidDigitCount(0).to_string(),
            "Invalid number of significant digits: 0. Must be at least 1."
        );
        assert_eq!(
            RoundingError::Parse("1.2.3".into()).to_string(),
            "Failed to parse: 1.2.3"
        );
        let tight = RoundingError::RoundingLossTooTight {
            rounding_loss: 0.05,
            gamma: 0.862068,
            threshold: 0.902025,
        };
        assert_eq!(
            tight.to_string(),
            "Rounding loss 0.05 cannot be met: gamma 0.8621 is below the threshold 0.9020"
        );
    }
}
