// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

use crate::{
    digits::NonFinite,
    distribution::Distribution,
    error::{Result, RoundingError},
    interval::{ConfidenceInterval, confidence_interval},
    options::{DigitsMode, FormatOptions},
    round::{
        Rounded, position_for_significant_digits, render_exact, round_at_position,
        round_to_significant_fixed,
    },
    selector::select_rounding_position,
};

static MEASUREMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)(?: \+/-(\S+))?(?: <(\S+), (\S+)>)?(?: \((\d+)\))?$")
        .expect("measurement pattern is valid")
});

/// Whether an uncertainty is independent of those it is combined with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correlation {
    #[default]
    Uncorrelated,
    /// Not yet supported by the formatter.
    Correlated,
}

/// A measured value with its standard uncertainty.
///
/// An uncertainty of zero marks the value as exact. A `Distribution` of
/// `Undefined` defers to the one in the [`FormatOptions`] it is printed
/// with.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Measurement {
    value: f64,
    uncertainty: f64,
    degrees_of_freedom: u32,
    distribution: Distribution,
    integer: bool,
    correlation: Correlation,
}

impl Default for Measurement {
    fn default() -> Self {
        Self {
            value: 0.0,
            uncertainty: 0.0,
            degrees_of_freedom: 1,
            distribution: Distribution::Undefined,
            integer: false,
            correlation: Correlation::Uncorrelated,
        }
    }
}

impl Measurement {
    /// Creates a measurement backed by a single degree of freedom.
    ///
    /// # Example
    ///
    /// ```
    /// # use sciround::Measurement;
    /// #
    /// let m = Measurement::new(127.835, 15.287);
    /// assert_eq!(m.to_string(), "128. +/-15");
    /// ```
    pub fn new(value: f64, uncertainty: f64) -> Self {
        Self {
            value,
            uncertainty,
            ..Self::default()
        }
    }

    /// Creates a measurement with no uncertainty.
    pub fn exact(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    /// Creates a count, which is printed without a decimal point.
    pub fn integer(value: i64) -> Self {
        Self {
            integer: true,
            ..Self::exact(value as f64)
        }
    }

    pub fn with_uncertainty(mut self, uncertainty: f64) -> Self {
        self.uncertainty = uncertainty;
        self
    }

    pub fn with_degrees_of_freedom(mut self, degrees_of_freedom: u32) -> Self {
        self.degrees_of_freedom = degrees_of_freedom;
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_correlation(mut self, correlation: Correlation) -> Self {
        self.correlation = correlation;
        self
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn uncertainty(&self) -> f64 {
        self.uncertainty
    }

    #[inline]
    pub fn degrees_of_freedom(&self) -> u32 {
        self.degrees_of_freedom
    }

    #[inline]
    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    #[inline]
    pub fn correlation(&self) -> Correlation {
        self.correlation
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        self.integer
    }

    #[inline]
    pub fn is_exact(&self) -> bool {
        self.uncertainty == 0.0
    }

    /// The unrounded interval expected to hold the true value with
    /// probability `1 - alpha`.
    pub fn confidence_interval(&self, alpha: f64) -> Result<ConfidenceInterval> {
        confidence_interval(
            self.value,
            self.uncertainty,
            f64::from(self.degrees_of_freedom),
            alpha,
            self.distribution,
        )
    }

    /// Renders the measurement as `value[ +/-uncertainty][ <lower, upper>][ (df)]`.
    ///
    /// The value is rounded at the position chosen by
    /// [`select_rounding_position`], or to a fixed number of significant
    /// digits if the options ask for that, and the interval bounds one
    /// decimal place finer. Integers, exact values and zero skip the
    /// statistics; a zero is shown to the scale of its uncertainty.
    ///
    /// # Errors
    ///
    /// Fails rather than print a misleading string when the rounding loss
    /// cannot be met, when the options are out of range, or when the
    /// uncertainty is correlated or negative.
    pub fn format(&self, options: &FormatOptions) -> Result<String> {
        if self.correlation == Correlation::Correlated || self.uncertainty < 0.0 {
            return Err(RoundingError::CorrelatedUncertainty);
        }
        let distribution = match self.distribution {
            Distribution::Undefined => options.distribution,
            other => other,
        };

        if self.integer {
            return self.format_integer(options, distribution);
        }
        if self.is_exact() {
            let mut out = render_exact(self.value).into_string();
            if options.show_plus_minus && options.show_exact_uncertainty {
                out.push_str(" +/-0");
            }
            return Ok(out);
        }

        let uncertainty_digits = options.uncertainty_digits(self.degrees_of_freedom);
        let (value, uncertainty, bounds_position) =
            if self.value.is_finite() && self.uncertainty.is_finite() {
                let position = if self.value == 0.0 {
                    // A zero has no digits of its own; the uncertainty sets the scale
                    position_for_significant_digits(self.uncertainty, uncertainty_digits)?
                        .unwrap_or_default()
                } else {
                    match options.significant_digits {
                        DigitsMode::Auto => select_rounding_position(
                            options.rounding_loss,
                            self.uncertainty,
                            uncertainty_digits,
                            distribution,
                        )?,
                        DigitsMode::Fixed(n) => {
                            position_for_significant_digits(self.value, n)?.unwrap_or_default()
                        }
                    }
                };
                (
                    round_at_position(self.value, position),
                    round_to_significant_fixed(self.uncertainty, uncertainty_digits)?,
                    Some(position.saturating_sub(1)),
                )
            } else {
                // Nothing to round against; show what is known in full
                (
                    render_exact(self.value),
                    round_to_significant_fixed(self.uncertainty, uncertainty_digits)?,
                    None,
                )
            };

        let mut out = value.into_string();
        if options.show_plus_minus {
            out.push_str(" +/-");
            out.push_str(uncertainty.without_trailing_point());
        }
        if options.show_confidence_interval {
            let ci = confidence_interval(
                self.value,
                self.uncertainty,
                f64::from(self.degrees_of_freedom),
                options.confidence_alpha,
                distribution,
            )?;
            let bound = |x: f64| match bounds_position {
                Some(position) => round_at_position(x, position),
                None => render_exact(x),
            };
            out.push_str(&format!(" <{}, {}>", bound(ci.lower), bound(ci.upper)));
        }
        if options.show_degrees_of_freedom {
            out.push_str(&format!(" ({})", self.degrees_of_freedom));
        }
        Ok(out)
    }

    fn format_integer(&self, options: &FormatOptions, distribution: Distribution) -> Result<String> {
        let whole = |x: f64| round_at_position(x, -1).without_trailing_point().to_string();
        let mut out = whole(self.value);
        let uncertainty = round_at_position(self.uncertainty, -1);
        let has_uncertainty = uncertainty.to_f64() != 0.0;
        if options.show_plus_minus && has_uncertainty {
            out.push_str(" +/-");
            out.push_str(uncertainty.without_trailing_point());
        }
        if options.show_confidence_interval && has_uncertainty {
            let ci = confidence_interval(
                self.value,
                self.uncertainty,
                f64::from(self.degrees_of_freedom),
                options.confidence_alpha,
                distribution,
            )?;
            out.push_str(&format!(" <{}, {}>", whole(ci.lower), whole(ci.upper)));
        }
        if options.show_degrees_of_freedom && has_uncertainty {
            out.push_str(&format!(" ({})", self.degrees_of_freedom));
        }
        Ok(out)
    }
}

/// Rounds and renders a mean with its uncertainty.
///
/// # Example
///
/// ```
/// # use sciround::{FormatOptions, format_measurement};
/// #
/// let options = FormatOptions::default().with_degrees_of_freedom(true);
/// assert_eq!(
///     format_measurement(0.0152, 0.00232, 9, &options).unwrap(),
///     "0.0152 +/-0.0023 (9)"
/// );
/// ```
pub fn format_measurement(
    mean: f64,
    uncertainty: f64,
    degrees_of_freedom: u32,
    options: &FormatOptions,
) -> Result<String> {
    Measurement::new(mean, uncertainty)
        .with_degrees_of_freedom(degrees_of_freedom)
        .format(options)
}

impl fmt::Display for Measurement {
    /// Formats with the default options.
    ///
    /// A measurement that cannot be rounded prints the error in angle
    /// brackets instead of a plausible-looking number.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format(&FormatOptions::default()) {
            Ok(text) => f.write_str(&text),
            Err(err) => write!(f, "<{err}>"),
        }
    }
}

fn parse_number(text: &str, s: &str) -> Result<f64> {
    match text {
        "inf" | "-inf" | "NaN" | "-NaN" => Ok(Rounded::from_str(text)?.to_f64()),
        _ => f64::from_str(text)
            .ok()
            .filter(|x| x.is_finite())
            .ok_or(RoundingError::Parse(s.into())),
    }
}

impl FromStr for Measurement {
    type Err = RoundingError;

    /// Parses the line format written by [`Measurement::format`].
    ///
    /// Interval bounds are checked but otherwise ignored, since they follow
    /// from the other fields. A finite value written without a decimal point
    /// or exponent is read as an integer.
    fn from_str(s: &str) -> Result<Self> {
        let caps = MEASUREMENT_PATTERN
            .captures(s)
            .ok_or(RoundingError::Parse(s.into()))?;
        let value_str = caps.get(1).ok_or(RoundingError::Parse(s.into()))?.as_str();
        let value = parse_number(value_str, s)?;
        let uncertainty = caps
            .get(2)
            .map_or(Ok(0.0), |m| parse_number(m.as_str(), s))?;
        if uncertainty < 0.0 || (uncertainty.is_nan() && uncertainty.is_sign_negative()) {
            return Err(RoundingError::Parse(s.into()));
        }
        for bound in [caps.get(3), caps.get(4)].into_iter().flatten() {
            parse_number(bound.as_str(), s)?;
        }
        let degrees_of_freedom = caps
            .get(5)
            .map_or(Ok(1), |m| u32::from_str(m.as_str()))
            .map_err(|_e| RoundingError::Parse(s.into()))?;
        let integer = NonFinite::classify(value).is_none() && !value_str.contains(['.', 'e']);
        Ok(Self {
            value,
            uncertainty,
            degrees_of_freedom,
            integer,
            ..Self::default()
        })
    }
}
