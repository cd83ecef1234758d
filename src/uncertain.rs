// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use num_traits::{Float, cast};

use crate::{
    distribution::Distribution,
    error::Result,
    measurement::Measurement,
    options::FormatOptions,
};

/// A trait for numeric types that have an associated uncertainty.
///
/// Implement this for a record type to format it with [`format_uncertain`]
/// without building a [`Measurement`] by hand.
pub trait Uncertain {
    /// The type that is returned by accessing the value or uncertainty
    type Numeric: Float;

    /// Returns the value without its uncertainty.
    fn value(&self) -> Self::Numeric;

    /// Returns the absolute standard uncertainty.
    ///
    /// Zero means the value is exact.
    fn uncertainty(&self) -> Self::Numeric;

    fn degrees_of_freedom(&self) -> u32 {
        1
    }

    /// `Undefined` lets the formatting options decide.
    fn distribution(&self) -> Distribution {
        Distribution::Undefined
    }

    /// Counts are printed without a decimal point.
    fn is_integer(&self) -> bool {
        false
    }
}

impl<F: Float> Uncertain for (F, F) {
    type Numeric = F;

    fn value(&self) -> F {
        self.0
    }

    fn uncertainty(&self) -> F {
        self.1
    }
}

impl Uncertain for Measurement {
    type Numeric = f64;

    fn value(&self) -> f64 {
        Measurement::value(self)
    }

    fn uncertainty(&self) -> f64 {
        Measurement::uncertainty(self)
    }

    fn degrees_of_freedom(&self) -> u32 {
        Measurement::degrees_of_freedom(self)
    }

    fn distribution(&self) -> Distribution {
        Measurement::distribution(self)
    }

    fn is_integer(&self) -> bool {
        Measurement::is_integer(self)
    }
}

impl<T: Uncertain + ?Sized> From<&T> for Measurement {
    fn from(item: &T) -> Self {
        let value = cast::<_, f64>(item.value()).unwrap_or(f64::NAN);
        let uncertainty = cast::<_, f64>(item.uncertainty()).unwrap_or(f64::NAN);
        let measurement = if item.is_integer() && value.is_finite() {
            Measurement::integer(value.round() as i64).with_uncertainty(uncertainty)
        } else {
            Measurement::new(value, uncertainty)
        };
        measurement
            .with_degrees_of_freedom(item.degrees_of_freedom())
            .with_distribution(item.distribution())
    }
}

/// Formats anything carrying an uncertainty, like [`Measurement::format`].
///
/// # Example
///
/// ```
/// # use sciround::{FormatOptions, format_uncertain};
/// #
/// let pair = (127.835_f32, 15.287_f32);
/// assert_eq!(format_uncertain(&pair, &FormatOptions::default()).unwrap(), "128. +/-15");
/// ```
pub fn format_uncertain<T: Uncertain + ?Sized>(item: &T, options: &FormatOptions) -> Result<String> {
    Measurement::from(item).format(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Count {
        events: u32,
        runs: u32,
    }

    impl Uncertain for Count {
        type Numeric = f64;

        fn value(&self) -> f64 {
            f64::from(self.events)
        }

        fn uncertainty(&self) -> f64 {
            f64::from(self.events).sqrt()
        }

        fn degrees_of_freedom(&self) -> u32 {
            self.runs
        }

        fn distribution(&self) -> Distribution {
            Distribution::Gaussian
        }

        fn is_integer(&self) -> bool {
            true
        }
    }

    #[test]
    fn pair() {
        let options = FormatOptions::default().with_confidence_interval(true);
        assert_eq!(
            format_uncertain(&(127.835, 15.287), &options).unwrap(),
            "128. +/-15 <97.9, 157.8>"
        );
    }

    #[test]
    fn pair_defaults() {
        let pair = (1.0_f64, 0.5_f64);
        assert_eq!(Uncertain::degrees_of_freedom(&pair), 1);
        assert_eq!(Uncertain::distribution(&pair), Distribution::Undefined);
        assert!(!Uncertain::is_integer(&pair));
    }

    #[test]
    fn custom_record() {
        let count = Count { events: 100, runs: 4 };
        let options = FormatOptions::default()
            .with_confidence_interval(true)
            .with_degrees_of_freedom(true);
        // 100 ± 10, standard error 5
        assert_eq!(
            format_uncertain(&count, &options).unwrap(),
            "100 +/-10 <90, 110> (4)"
        );
    }

    #[test]
    fn measurement_round_trips_through_trait() {
        let m = Measurement::new(2.5, 0.1)
            .with_degrees_of_freedom(12)
            .with_distribution(Distribution::Triangular);
        assert_eq!(Measurement::from(&m), m);
    }
}
