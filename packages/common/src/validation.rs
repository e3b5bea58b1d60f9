//! Format and range checks applied to normalized input.

use std::fmt;
use thiserror::Error;

/// A value that failed one of the checks in this module.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("'{value}' is not an alpha-character string between {min} and {max} characters long")]
    NotAlpha { value: String, min: usize, max: usize },

    #[error("'{value}' is not a numeric string between {min} and {max} characters long")]
    NotNumeric { value: String, min: usize, max: usize },

    #[error("'{value}' is not an alphanumeric string between {min} and {max} characters long")]
    NotAlphanumeric { value: String, min: usize, max: usize },

    #[error("{value} is not a value between {min} and {max}{}", or_null(.nullable))]
    OutOfRange {
        value: Bound,
        min: Bound,
        max: Bound,
        nullable: bool,
    },
}

/// Numeric value carried by [`ValidationError::OutOfRange`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Integer(i64),
    Decimal(f64),
    Missing,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Missing => f.write_str("null"),
        }
    }
}

fn or_null(nullable: &bool) -> &'static str {
    if *nullable { " or null" } else { "" }
}

fn length_in_range(input: &str, min: usize, max: usize) -> bool {
    let length = input.chars().count();
    length >= min && length <= max
}

/// `input` must consist only of ASCII letters, with a length in `[min, max]`.
pub fn validate_alpha(input: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    if length_in_range(input, min, max) && input.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::NotAlpha {
            value: input.to_string(),
            min,
            max,
        })
    }
}

/// `input` must consist only of ASCII digits, with a length in `[min, max]`.
pub fn validate_numeric(input: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    if length_in_range(input, min, max) && input.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::NotNumeric {
            value: input.to_string(),
            min,
            max,
        })
    }
}

/// `input` must consist only of ASCII letters and digits, with a length in `[min, max]`.
pub fn validate_alphanumeric(input: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    if length_in_range(input, min, max) && input.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::NotAlphanumeric {
            value: input.to_string(),
            min,
            max,
        })
    }
}

/// An absent value passes only when `nullable`; a present one must lie in `[min, max]`.
pub fn validate_integer_range(
    value: Option<i32>,
    min: i32,
    max: i32,
    nullable: bool,
) -> Result<(), ValidationError> {
    let valid = match value {
        Some(v) => v >= min && v <= max,
        None => nullable,
    };
    if valid {
        return Ok(());
    }
    Err(ValidationError::OutOfRange {
        value: value.map_or(Bound::Missing, |v| Bound::Integer(v.into())),
        min: Bound::Integer(min.into()),
        max: Bound::Integer(max.into()),
        nullable,
    })
}

/// Decimal counterpart of [`validate_integer_range`]. `NaN` is always rejected.
pub fn validate_decimal_range(
    value: Option<f64>,
    min: f64,
    max: f64,
    nullable: bool,
) -> Result<(), ValidationError> {
    let valid = match value {
        Some(v) => v >= min && v <= max,
        None => nullable,
    };
    if valid {
        return Ok(());
    }
    Err(ValidationError::OutOfRange {
        value: value.map_or(Bound::Missing, Bound::Decimal),
        min: Bound::Decimal(min),
        max: Bound::Decimal(max),
        nullable,
    })
}
