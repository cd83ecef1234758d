// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use std::str::FromStr;

use sciround::{
    Distribution, FormatOptions, Measurement, Rounded, RoundingError, confidence_interval,
    format_measurement, round_at_position, round_to_significant_digits, rounding_selection,
    select_rounding_position,
};

#[test]
fn carry_correctness() {
    assert_eq!(round_at_position(9999.9999, -1).as_str(), "10000.");
    assert_eq!(round_at_position(1.95, -2).as_str(), "2.0");
    assert_eq!(round_at_position(0.159, -2).as_str(), "0.2");
}

#[test]
fn half_up_ties() {
    assert_eq!(round_at_position(1.25, -2).as_str(), "1.3");
    assert_eq!(round_at_position(0.152, -3).as_str(), "0.15");
    assert_eq!(round_at_position(0.155, -3).as_str(), "0.16");
    assert_eq!(round_at_position(0.159, -3).as_str(), "0.16");
}

#[test]
fn non_finite_passthrough() {
    assert_eq!(round_at_position(f64::INFINITY, 2).as_str(), "inf");
    assert_eq!(round_at_position(f64::NAN.copysign(-1.0), 1).as_str(), "-NaN");
}

#[test]
fn zero_digits_is_an_error() {
    assert_eq!(
        round_to_significant_digits(1.0, 0),
        Err(RoundingError::InvalidDigitCount(0))
    );
}

#[test]
fn statistical_selector_end_to_end() {
    let m = select_rounding_position(0.01, 15.287, 2, Distribution::Gaussian).unwrap();
    assert_eq!(m, -1);
    assert_eq!(round_at_position(127.835, m).as_str(), "128.");

    let ci = confidence_interval(127.835, 15.287, 1.0, 0.05, Distribution::Gaussian).unwrap();
    assert_eq!(round_at_position(ci.lower, m - 1).as_str(), "97.9");
    assert_eq!(round_at_position(ci.upper, m - 1).as_str(), "157.8");
}

#[test]
fn rounding_loss_too_tight() {
    let result = rounding_selection(0.05, 0.0232, 1, Distribution::Gaussian);
    assert!(matches!(result, Err(RoundingError::RoundingLossTooTight { .. })));
}

#[test]
fn composed_output() {
    let options = FormatOptions::default()
        .with_plus_minus(true)
        .with_confidence_interval(true);
    assert_eq!(
        format_measurement(127.835, 15.287, 1, &options).unwrap(),
        "128. +/-15 <97.9, 157.8>"
    );
}

#[test]
fn options_from_json() {
    let options: FormatOptions = serde_json::from_str(
        r#"{"show_confidence_interval": true, "show_degrees_of_freedom": true}"#,
    )
    .unwrap();
    let m = Measurement::new(127.835, 15.287);
    let printed = m.format(&options).unwrap();
    assert_eq!(printed, "128. +/-15 <97.9, 157.8> (1)");

    let parsed = Measurement::from_str(&printed).unwrap();
    assert_eq!(parsed.value(), 128.0);
    assert_eq!(parsed.uncertainty(), 15.0);
}

#[test]
fn rounded_strings_serialize_as_text() {
    let rounded = round_at_position(127.835, -1);
    assert_eq!(serde_json::to_string(&rounded).unwrap(), "\"128.\"");
    let back: Rounded = serde_json::from_str("\"-1.5e-3\"").unwrap();
    assert_eq!(back.to_f64(), -0.0015);
    assert!(serde_json::from_str::<Rounded>("\"1,5\"").is_err());
}
