// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use std::fmt;

use tracing::{trace, warn};

use crate::error::{Result, RoundingError};

/// The number of significant decimal digits an `f64` is guaranteed to
/// round-trip through.
pub const MAX_DIGITS: u32 = f64::DIGITS;

/// An infinite or NaN value, kept apart from the digit logic entirely.
///
/// The sign is taken from the sign bit, so `-NaN` survives even though it
/// compares unequal to everything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NonFinite {
    Infinity { negative: bool },
    NaN { negative: bool },
}

impl NonFinite {
    /// Returns `None` for finite values.
    pub fn classify(value: f64) -> Option<Self> {
        let negative = value.is_sign_negative();
        if value.is_nan() {
            Some(NonFinite::NaN { negative })
        } else if value.is_infinite() {
            Some(NonFinite::Infinity { negative })
        } else {
            None
        }
    }

    /// The literal token: `inf`, `-inf`, `NaN`, or `-NaN`.
    pub fn token(&self) -> &'static str {
        match self {
            NonFinite::Infinity { negative: false } => "inf",
            NonFinite::Infinity { negative: true } => "-inf",
            NonFinite::NaN { negative: false } => "NaN",
            NonFinite::NaN { negative: true } => "-NaN",
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            NonFinite::Infinity { negative: false } => f64::INFINITY,
            NonFinite::Infinity { negative: true } => f64::NEG_INFINITY,
            NonFinite::NaN { negative: false } => f64::NAN,
            NonFinite::NaN { negative: true } => f64::NAN.copysign(-1.0),
        }
    }
}

impl fmt::Display for NonFinite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The result of rendering an `f64`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    Digits(DecimalDigits),
    NonFinite(NonFinite),
}

impl Rendered {
    /// Renders with every guaranteed digit of an `f64`.
    pub(crate) fn full(value: f64) -> Self {
        match NonFinite::classify(value) {
            Some(special) => Rendered::NonFinite(special),
            None => Rendered::Digits(DecimalDigits::from_f64(value, MAX_DIGITS)),
        }
    }
}

/// Renders `value` in scientific form with exactly `precision` significant
/// digits.
///
/// The digits are those of Rust's correctly rounded `{:e}` formatting at that
/// precision. Requests above [`MAX_DIGITS`] are capped, as further digits of
/// an `f64` carry no meaning.
///
/// # Example
///
/// ```
/// # use sciround::{render, Rendered};
/// #
/// let Rendered::Digits(digits) = render(127.835, 4).unwrap() else { panic!() };
/// assert_eq!(digits.to_scientific(), "1.278e2");
/// ```
pub fn render(value: f64, precision: u32) -> Result<Rendered> {
    let precision = clamp_precision(precision)?;
    Ok(match NonFinite::classify(value) {
        Some(special) => Rendered::NonFinite(special),
        None => Rendered::Digits(DecimalDigits::from_f64(value, precision)),
    })
}

/// Rejects a digit count of zero and caps counts above [`MAX_DIGITS`].
pub(crate) fn clamp_precision(precision: u32) -> Result<u32> {
    match precision {
        0 => Err(RoundingError::InvalidDigitCount(0)),
        p if p > MAX_DIGITS => {
            warn!(
                requested = p,
                max = MAX_DIGITS,
                "significant digits capped at the guaranteed precision of f64"
            );
            Ok(MAX_DIGITS)
        }
        p => Ok(p),
    }
}

/// A finite decimal number held as a sign, its significant digits, and the
/// power of ten of the first digit.
///
/// Represents a number of the form ±_d₀_._d₁d₂…_ × 10<sup><i>e</i></sup>.
/// The digits are ASCII and the first is never `'0'` unless every digit is,
/// in which case the exponent is 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecimalDigits {
    negative: bool,
    digits: Vec<u8>,
    exponent: i32,
}

impl DecimalDigits {
    fn from_f64(value: f64, precision: u32) -> Self {
        debug_assert!(value.is_finite());
        let places = precision.max(1) as usize - 1;
        let formatted = format!("{:.*e}", places, value.abs());
        Self::parse_scientific(value.is_sign_negative(), &formatted)
    }

    /// Parses the output of `{:e}` formatting, e.g. `1.27835e2`.
    fn parse_scientific(negative: bool, formatted: &str) -> Self {
        let (mantissa, exponent) = formatted
            .split_once('e')
            .unwrap_or_else(|| panic!("scientific rendering {formatted:?} has no exponent"));
        let exponent = exponent
            .parse::<i32>()
            .unwrap_or_else(|_| panic!("scientific rendering {formatted:?} has a malformed exponent"));
        let digits: Vec<u8> = mantissa.bytes().filter(|b| *b != b'.').collect();
        let parsed = Self {
            negative,
            digits,
            exponent,
        };
        parsed.assert_well_formed();
        parsed
    }

    /// An unsigned zero.
    pub fn zero() -> Self {
        Self {
            negative: false,
            digits: vec![b'0'],
            exponent: 0,
        }
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// The significant digits as ASCII, most significant first.
    #[inline]
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// Returns the power of ten of the first digit.
    #[inline]
    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Returns the power of ten of the last digit held.
    ///
    /// For example:
    /// - 1.278e2 returns -1
    /// - 1.3e2 returns 1
    #[inline]
    pub fn last_position(&self) -> i32 {
        self.exponent - (self.digits.len() as i32 - 1)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.digits.iter().all(|d| *d == b'0')
    }

    fn assert_well_formed(&self) {
        assert!(!self.digits.is_empty(), "digit string is empty");
        assert!(
            self.digits.iter().all(u8::is_ascii_digit),
            "digit string {:?} holds a non-digit",
            String::from_utf8_lossy(&self.digits)
        );
        assert!(
            self.digits[0] != b'0' || (self.is_zero() && self.exponent == 0),
            "digit string {:?} has a leading zero",
            String::from_utf8_lossy(&self.digits)
        );
    }

    /// Rounds to `keep` significant digits, half-up.
    ///
    /// The first discarded digit alone decides: 5 or more rounds up, whatever
    /// the parity of the last kept digit. A carry out of the first digit
    /// prepends a new `1` and raises the exponent, so the result still holds
    /// `keep` digits.
    ///
    /// Asking to keep more digits than are held leaves the number unchanged.
    pub fn round_at(self, keep: u32) -> Result<Self> {
        if keep == 0 {
            return Err(RoundingError::InvalidDigitCount(0));
        }
        Ok(self.round_kept(keep as usize))
    }

    fn round_kept(mut self, keep: usize) -> Self {
        debug_assert!(keep > 0);
        if keep >= self.digits.len() {
            return self;
        }
        let round_up = self.digits[keep] >= b'5';
        self.digits.truncate(keep);
        if round_up {
            self.carry();
        }
        self.assert_well_formed();
        self
    }

    /// Adds one unit in the last kept place.
    fn carry(&mut self) {
        let mut index = self.digits.len();
        while index > 0 {
            index -= 1;
            if self.digits[index] == b'9' {
                self.digits[index] = b'0';
            } else {
                self.digits[index] += 1;
                return;
            }
        }
        // Every kept digit was a 9 and is now a 0
        trace!(exponent = self.exponent, "carry past the leading digit");
        self.digits.insert(0, b'1');
        self.digits.pop();
        self.exponent += 1;
    }

    /// Rounds so that the digit at power of ten `last` is the last one kept.
    ///
    /// Returns [`DecimalDigits::zero`] when no digit survives.
    pub fn round_to_position(self, last: i32) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let keep = i64::from(self.exponent) - i64::from(last) + 1;
        if keep > 0 {
            let keep = usize::try_from(keep).unwrap_or(usize::MAX);
            self.round_kept(keep)
        } else if keep == 0 && self.digits[0] >= b'5' {
            // The leading digit is itself the rounding digit
            Self {
                negative: self.negative,
                digits: vec![b'1'],
                exponent: last,
            }
        } else {
            Self::zero()
        }
    }

    /// Drops trailing zeros, keeping at least one digit.
    pub fn trim_trailing_zeros(mut self) -> Self {
        while self.digits.len() > 1 && self.digits.last() == Some(&b'0') {
            self.digits.pop();
        }
        self
    }

    fn digit_at(&self, position: i32, last: i32) -> char {
        if position < last {
            return '0';
        }
        let index = i64::from(self.exponent) - i64::from(position);
        usize::try_from(index)
            .ok()
            .and_then(|i| self.digits.get(i))
            .map_or('0', |d| char::from(*d))
    }

    /// Writes the number in fixed notation down to the power of ten `last`.
    ///
    /// Zeros are padded between the decimal point and the first digit, and
    /// between the last digit held and the decimal point. The decimal point
    /// is always written, so a number kept to the units (or coarser) ends in
    /// `.`, and zero is always `0.`.
    ///
    /// Every held digit below `last` must already be rounded away, as by
    /// [`DecimalDigits::round_to_position`]; a nonzero one panics.
    pub(crate) fn to_fixed(&self, last: i32) -> String {
        if self.is_zero() {
            return "0.".to_string();
        }
        let held_above = (i64::from(self.exponent) - i64::from(last) + 1)
            .clamp(0, self.digits.len() as i64) as usize;
        assert!(
            self.digits[held_above..].iter().all(|d| *d == b'0'),
            "digit string {:?} holds digits below 10^{last}",
            String::from_utf8_lossy(&self.digits)
        );
        let top = self.exponent.max(0);
        let bottom = last.min(0);
        let mut fixed = String::with_capacity((i64::from(top) - i64::from(bottom) + 3) as usize);
        if self.negative {
            fixed.push('-');
        }
        for position in (bottom..=top).rev() {
            fixed.push(self.digit_at(position, last));
            if position == 0 {
                fixed.push('.');
            }
        }
        fixed
    }

    /// Writes the number as `d.ddde±n`, with a lower case `e` and no `+`.
    pub fn to_scientific(&self) -> String {
        let mut sci = String::with_capacity(self.digits.len() + 8);
        if self.negative && !self.is_zero() {
            sci.push('-');
        }
        sci.push(char::from(self.digits[0]));
        sci.push('.');
        sci.extend(self.digits[1..].iter().map(|d| char::from(*d)));
        sci.push('e');
        sci.push_str(&self.exponent.to_string());
        sci
    }
}
