mod digits;
mod distribution;
mod error;
mod interval;
mod measurement;
mod options;
mod round;
mod selector;
mod uncertain;

pub use digits::{DecimalDigits, MAX_DIGITS, NonFinite, Rendered, render};
pub use distribution::Distribution;
pub use error::{Result, RoundingError};
pub use interval::{ConfidenceInterval, confidence_interval};
pub use measurement::{Correlation, Measurement, format_measurement};
pub use options::{DigitsMode, FormatOptions, MAX_FIXED_UNCERTAINTY_DIGITS};
pub use round::{
    MIN_POSITION, Rounded, render_exact, round_at_position, round_scientific, round_to_position,
    round_to_significant_digits, round_to_significant_fixed,
};
pub use selector::{
    GAUSSIAN_FIT_BAND, MAX_UNCERTAINTY_DIGITS, RoundingSelection, delta, gamma_threshold,
    rounded_ratio, rounding_selection, select_rounding_position,
};
pub use uncertain::{Uncertain, format_uncertain};
