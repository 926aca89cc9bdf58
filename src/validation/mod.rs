//! Field validation for inventory records.
//!
//! Every rule takes the raw text of a field, the way a form holds it, and
//! returns a [`ValidationError`] whose `message` is the text shown next to the
//! field. Rules are pure and synchronous; [`schema`] groups them per field.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::str::FromStr;
use validator::ValidationError;

use crate::models::UnitOfMeasurement;

pub mod schema;

pub use schema::{
    field_message, Field, FieldValues, InventorySchema, Rule, ValidationContext, ValidationPolicy,
};

pub const MSG_VALUE_REQUIRED: &str = "Value required";
pub const MSG_EMPTY_VALUE: &str = "Empty value";
pub const MSG_NOT_A_NUMBER: &str = "Value is not a number";
pub const MSG_NEGATIVE: &str = "Must be greater than or equal to zero";
pub const MSG_NOT_WHOLE: &str = "Must be a whole number";
pub const MSG_UNKNOWN_UNIT: &str = "Unknown unit of measurement";
pub const MSG_UNKNOWN_PRODUCT: &str = "Unknown product type";
pub const MSG_INVALID_DATE: &str = "Invalid date";
pub const MSG_DATE_IN_PAST: &str = "Date must not be in the past";

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// The message carried by a rule failure, falling back to its code.
pub fn error_message(err: &ValidationError) -> String {
    err.message
        .as_ref()
        .map(|message| message.to_string())
        .unwrap_or_else(|| err.code.to_string())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parses a numeric field into a [`Decimal`]. Accepts plain decimals and
/// scientific notation. Values beyond `Decimal`'s range give `None`; use
/// [`number_shape`] to decide whether text is numeric at all.
pub fn parse_number(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Sign and fractional part of a numeric field, read from its digits so that
/// no precision or range limit applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberShape {
    pub negative: bool,
    pub fractional: bool,
}

/// Reads the shape of a plain or scientific-notation number, or `None` when
/// `value` is not numeric. Negative zero is not negative.
pub fn number_shape(value: &str) -> Option<NumberShape> {
    let (minus, unsigned) = split_sign(value.trim());
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return None;
    }
    let exponent = match exponent {
        Some(text) => parse_exponent(text)?,
        None => 0,
    };

    // Index of the first digit after the decimal point once the exponent is applied.
    let point = i64::try_from(whole.len())
        .unwrap_or(i64::MAX)
        .saturating_add(exponent);
    let mut nonzero = false;
    let mut fractional = false;
    for (index, digit) in whole.bytes().chain(fraction.bytes()).enumerate() {
        if digit != b'0' {
            nonzero = true;
            fractional |= i64::try_from(index).unwrap_or(i64::MAX) >= point;
        }
    }

    Some(NumberShape {
        negative: minus && nonzero,
        fractional,
    })
}

fn split_sign(text: &str) -> (bool, &str) {
    match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    }
}

fn all_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

/// Exponents too large for `i64` saturate; only their sign matters then.
fn parse_exponent(text: &str) -> Option<i64> {
    let (minus, digits) = split_sign(text);
    if digits.is_empty() || !all_digits(digits) {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if minus { -magnitude } else { magnitude })
}

/// Parses a date field: either a date-only value (`2030-01-31`) or a full
/// RFC 3339 timestamp, of which only the date part is kept.
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|ts| ts.date_naive())
        })
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(failure("required", MSG_VALUE_REQUIRED));
    }
    Ok(())
}

pub fn validate_positive(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(failure("empty", MSG_EMPTY_VALUE));
    }
    match number_shape(value) {
        None => Err(failure("not_a_number", MSG_NOT_A_NUMBER)),
        Some(shape) if shape.negative => Err(failure("negative", MSG_NEGATIVE)),
        Some(_) => Ok(()),
    }
}

/// Whole-number check first, then [`validate_positive`].
pub fn validate_quantity(value: &str) -> Result<(), ValidationError> {
    if number_shape(value).map_or(false, |shape| shape.fractional) {
        return Err(failure("not_whole", MSG_NOT_WHOLE));
    }
    validate_positive(value)
}

pub fn validate_unit(value: &str) -> Result<(), ValidationError> {
    validate_not_blank(value)?;
    if !UnitOfMeasurement::contains(value.trim()) {
        return Err(failure("unknown_unit", MSG_UNKNOWN_UNIT));
    }
    Ok(())
}

pub fn validate_product_type(value: &str, products: &[String]) -> Result<(), ValidationError> {
    validate_not_blank(value)?;
    let value = value.trim();
    if !products.iter().any(|name| name == value) {
        return Err(failure("unknown_product", MSG_UNKNOWN_PRODUCT));
    }
    Ok(())
}

/// Blank is accepted: a record need not carry a best-before date.
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    if !is_blank(value) && parse_date_input(value).is_none() {
        return Err(failure("invalid_date", MSG_INVALID_DATE));
    }
    Ok(())
}

/// Rejects dates before `today`. Unparsable input is left to [`validate_date`].
pub fn validate_not_past(value: &str, today: NaiveDate) -> Result<(), ValidationError> {
    match parse_date_input(value) {
        Some(date) if date < today => Err(failure("date_in_past", MSG_DATE_IN_PAST)),
        _ => Ok(()),
    }
}

/// [`validate_date`] followed by [`validate_not_past`].
pub fn validate_best_before(value: &str, today: NaiveDate) -> Result<(), ValidationError> {
    validate_date(value)?;
    validate_not_past(value, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn message(result: Result<(), ValidationError>) -> Option<String> {
        result.err().map(|err| error_message(&err))
    }

    #[rstest]
    #[case("", Some(MSG_VALUE_REQUIRED))]
    #[case("   ", Some(MSG_VALUE_REQUIRED))]
    #[case("Amber", None)]
    #[case(" x ", None)]
    fn not_blank(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(message(validate_not_blank(input)).as_deref(), expected);
    }

    #[rstest]
    #[case("", Some(MSG_EMPTY_VALUE))]
    #[case(" ", Some(MSG_EMPTY_VALUE))]
    #[case("abc", Some(MSG_NOT_A_NUMBER))]
    #[case("1.2.3", Some(MSG_NOT_A_NUMBER))]
    #[case("-1", Some(MSG_NEGATIVE))]
    #[case("-0.01", Some(MSG_NEGATIVE))]
    #[case("0", None)]
    #[case("-0", None)]
    #[case("12.75", None)]
    #[case("1e3", None)]
    #[case("+7", None)]
    #[case("-", Some(MSG_NOT_A_NUMBER))]
    #[case("1e", Some(MSG_NOT_A_NUMBER))]
    #[case("100000000000000000000000000000", None)]
    #[case("1e30", None)]
    #[case("1e99999999999999999999", None)]
    #[case("-1e30", Some(MSG_NEGATIVE))]
    #[case("-0.000000000000000000000000000001", Some(MSG_NEGATIVE))]
    #[case("-0e5", None)]
    fn positive(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(message(validate_positive(input)).as_deref(), expected);
    }

    #[rstest]
    #[case("1.5", Some(MSG_NOT_WHOLE))]
    #[case("-1.5", Some(MSG_NOT_WHOLE))]
    #[case("-3", Some(MSG_NEGATIVE))]
    #[case("", Some(MSG_EMPTY_VALUE))]
    #[case("lots", Some(MSG_NOT_A_NUMBER))]
    #[case("4.0", None)]
    #[case("24", None)]
    #[case("1.5e1", None)]
    #[case("15e-1", Some(MSG_NOT_WHOLE))]
    #[case("1.00000000000000000000000000001", Some(MSG_NOT_WHOLE))]
    #[case("0.000000000000000000000000000001", Some(MSG_NOT_WHOLE))]
    #[case("100000000000000000000000000000", None)]
    #[case("1e30", None)]
    #[case("1e-99999999999999999999", Some(MSG_NOT_WHOLE))]
    fn quantity(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(message(validate_quantity(input)).as_deref(), expected);
    }

    #[test]
    fn unit_must_be_catalog_key() {
        assert!(validate_unit("QUART").is_ok());
        assert_eq!(message(validate_unit("")).as_deref(), Some(MSG_VALUE_REQUIRED));
        assert_eq!(message(validate_unit("qt")).as_deref(), Some(MSG_UNKNOWN_UNIT));
    }

    #[test]
    fn product_type_must_be_in_catalog() {
        let products = vec!["Hops".to_string(), "Malt".to_string()];
        assert!(validate_product_type("Malt", &products).is_ok());
        assert_eq!(
            message(validate_product_type("Yeast", &products)).as_deref(),
            Some(MSG_UNKNOWN_PRODUCT)
        );
        assert_eq!(
            message(validate_product_type(" ", &products)).as_deref(),
            Some(MSG_VALUE_REQUIRED)
        );
    }

    #[test]
    fn dates_parse_from_date_or_timestamp() {
        let expected = NaiveDate::from_ymd_opt(2030, 1, 31).unwrap();
        assert_eq!(parse_date_input("2030-01-31"), Some(expected));
        assert_eq!(parse_date_input("2030-01-31T22:15:00Z"), Some(expected));
        assert_eq!(parse_date_input("31/01/2030"), None);
        assert_eq!(message(validate_date("soon")).as_deref(), Some(MSG_INVALID_DATE));
        assert!(validate_date("").is_ok());
        assert!(validate_date("  ").is_ok());
    }

    #[test]
    fn past_dates_are_rejected() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert!(validate_not_past("2026-10-18", today).is_ok());
        assert!(validate_not_past("2027-01-01", today).is_ok());
        assert_eq!(
            message(validate_not_past("2026-10-17", today)).as_deref(),
            Some(MSG_DATE_IN_PAST)
        );
        assert!(validate_not_past("garbage", today).is_ok());
    }

    #[rstest]
    #[case("", None)]
    #[case("tomorrow", Some(MSG_INVALID_DATE))]
    #[case("2026-10-01", Some(MSG_DATE_IN_PAST))]
    #[case("2026-10-18", None)]
    fn best_before(#[case] input: &str, #[case] expected: Option<&str>) {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(message(validate_best_before(input, today)).as_deref(), expected);
    }
}
