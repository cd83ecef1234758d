// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use rust_decimal::Decimal;
use tracing::warn;

use crate::{
    digits::{DecimalDigits, NonFinite, Rendered, clamp_precision},
    error::{Result, RoundingError},
};

/// The finest useful rounding position. The last of the 15 digits of the
/// smallest subnormal `f64` (about 4.9e-324) sits at 10^-338; every position
/// below that is a padding zero for any value.
pub const MIN_POSITION: i32 = -339;

static ROUNDED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:-?[0-9]+\.[0-9]*|-?[0-9]\.[0-9]*e-?[0-9]+|-?inf|-?NaN)$")
        .expect("rounded-string pattern is valid")
});

/// The exact decimal rendering of a rounded value.
///
/// Always one of:
/// - fixed notation with a decimal point, e.g. `128.`, `-0.0152`
/// - scientific notation, e.g. `1.28e2`, `-1.5e-3`
/// - one of the tokens `inf`, `-inf`, `NaN`, `-NaN`
///
/// A trailing decimal point marks the zeros before it as significant, so
/// `1200.` is not the same statement as `1.2e3`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde_with::DeserializeFromStr, serde_with::SerializeDisplay)]
pub struct Rounded(String);

impl Rounded {
    fn new(text: String) -> Self {
        debug_assert!(ROUNDED_PATTERN.is_match(&text), "malformed rounded string {text:?}");
        Self(text)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns false for the `inf` and `NaN` tokens.
    pub fn is_finite(&self) -> bool {
        !self.0.ends_with("inf") && !self.0.ends_with("NaN")
    }

    #[inline]
    pub fn is_scientific(&self) -> bool {
        self.0.contains('e')
    }

    /// The rendering without a trailing decimal point, e.g. `15` for `15.`.
    pub fn without_trailing_point(&self) -> &str {
        self.0.strip_suffix('.').unwrap_or(&self.0)
    }

    /// Parses the rendering back into the nearest `f64`.
    ///
    /// The tokens map to the non-finite values with their sign.
    pub fn to_f64(&self) -> f64 {
        match self.0.as_str() {
            "inf" => f64::INFINITY,
            "-inf" => f64::NEG_INFINITY,
            "NaN" => f64::NAN,
            "-NaN" => f64::NAN.copysign(-1.0),
            text => f64::from_str(text)
                .unwrap_or_else(|_| panic!("rounded string {text:?} is not a number")),
        }
    }
}

impl From<NonFinite> for Rounded {
    fn from(special: NonFinite) -> Self {
        Self(special.token().to_string())
    }
}

impl fmt::Display for Rounded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Rounded {
    type Err = RoundingError;

    /// Accepts only strings this crate could have produced.
    fn from_str(s: &str) -> Result<Self> {
        if ROUNDED_PATTERN.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(RoundingError::Parse(s.into()))
        }
    }
}

impl TryFrom<&Rounded> for Decimal {
    type Error = rust_decimal::Error;

    /// Attempts to convert a rounded string into an exact `Decimal`.
    ///
    /// Fails for the non-finite tokens and for values outside the range of
    /// `Decimal`.
    fn try_from(rounded: &Rounded) -> std::result::Result<Decimal, rust_decimal::Error> {
        if !rounded.is_finite() {
            return Err(rust_decimal::Error::ConversionTo("Decimal".to_string()));
        }
        let text = rounded.as_str().replace(".e", "e");
        if text.contains('e') {
            Decimal::from_scientific(&text)
        } else {
            Decimal::from_str(text.strip_suffix('.').unwrap_or(&text))
        }
    }
}

impl TryFrom<Rounded> for Decimal {
    type Error = rust_decimal::Error;

    #[inline]
    fn try_from(rounded: Rounded) -> std::result::Result<Decimal, rust_decimal::Error> {
        Decimal::try_from(&rounded)
    }
}

/// Rounds `value` to `n` significant digits.
///
/// The value is first rendered with all 15 guaranteed digits and the digit
/// string is then rounded half-up, rather than scaling by a power of ten,
/// which goes wrong near exponent boundaries. Requests above 15 digits are
/// capped. Infinite and NaN values are returned as they are.
///
/// # Example
///
/// ```
/// # use sciround::round_to_significant_digits;
/// #
/// assert_eq!(round_to_significant_digits(127.835, 2).unwrap(), 130.0);
/// assert!(round_to_significant_digits(127.835, 0).is_err());
/// ```
pub fn round_to_significant_digits(value: f64, n: u32) -> Result<f64> {
    let n = clamp_precision(n)?;
    match Rendered::full(value) {
        Rendered::NonFinite(_) => Ok(value),
        Rendered::Digits(digits) => {
            let sci = digits.round_at(n)?.to_scientific();
            Ok(Rounded::new(sci).to_f64())
        }
    }
}

/// Rounds `value` so that the digit at power of ten `m + 1` is the last one
/// kept, i.e. the digit at power of ten `m` is the one rounded away.
///
/// `m = -1` rounds to the units, `m = -2` to tenths, `m = 0` to tens.
/// When no digit survives the result is `0.`. Positions finer than
/// [`MIN_POSITION`] are raised to it.
///
/// # Example
///
/// ```
/// # use sciround::round_at_position;
/// #
/// assert_eq!(round_at_position(127.835, -1).as_str(), "128.");
/// assert_eq!(round_at_position(0.155, -3).as_str(), "0.16");
/// assert_eq!(round_at_position(9999.9999, -1).as_str(), "10000.");
/// ```
pub fn round_at_position(value: f64, m: i32) -> Rounded {
    let m = if m < MIN_POSITION {
        warn!(requested = m, used = MIN_POSITION, "rounding position below every f64 digit");
        MIN_POSITION
    } else {
        m
    };
    match Rendered::full(value) {
        Rendered::NonFinite(special) => special.into(),
        Rendered::Digits(digits) => {
            let last = m.saturating_add(1);
            Rounded::new(digits.round_to_position(last).to_fixed(last))
        }
    }
}

/// Rounds `value` to `n` significant digits in scientific notation.
///
/// # Example
///
/// ```
/// # use sciround::round_scientific;
/// #
/// assert_eq!(round_scientific(127.835, 3).unwrap().as_str(), "1.28e2");
/// assert_eq!(round_scientific(0.00152, 2).unwrap().as_str(), "1.5e-3");
/// ```
pub fn round_scientific(value: f64, n: u32) -> Result<Rounded> {
    let n = clamp_precision(n)?;
    Ok(match Rendered::full(value) {
        Rendered::NonFinite(special) => special.into(),
        Rendered::Digits(digits) => Rounded::new(digits.round_at(n)?.to_scientific()),
    })
}

/// Rounds `value` to `n` significant digits in fixed notation.
pub fn round_to_significant_fixed(value: f64, n: u32) -> Result<Rounded> {
    let n = clamp_precision(n)?;
    Ok(match Rendered::full(value) {
        Rendered::NonFinite(special) => special.into(),
        Rendered::Digits(digits) => fixed(digits.round_at(n)?),
    })
}

/// Renders `value` with all 15 guaranteed digits, less any trailing zeros.
///
/// Used for exact values, which have no uncertainty to round against.
pub fn render_exact(value: f64) -> Rounded {
    match Rendered::full(value) {
        Rendered::NonFinite(special) => special.into(),
        Rendered::Digits(digits) => fixed(digits.trim_trailing_zeros()),
    }
}

fn fixed(digits: DecimalDigits) -> Rounded {
    let last = digits.last_position();
    Rounded::new(digits.to_fixed(last))
}

/// Returns the position `m` at which rounding `value` keeps `n` significant
/// digits, or `None` for non-finite values.
///
/// The exponent is taken after rounding, so a carry into a new leading digit
/// (9.996 to 10.0) does not add a digit.
pub(crate) fn position_for_significant_digits(value: f64, n: u32) -> Result<Option<i32>> {
    let n = clamp_precision(n)?;
    Ok(match Rendered::full(value) {
        Rendered::NonFinite(_) => None,
        Rendered::Digits(digits) => Some(digits.round_at(n)?.exponent() - n as i32),
    })
}

/// Convenience for callers that want [`round_at_position`] as an `f64`.
#[inline]
pub fn round_to_position(value: f64, m: i32) -> f64 {
    round_at_position(value, m).to_f64()
}
