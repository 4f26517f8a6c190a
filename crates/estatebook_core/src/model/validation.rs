//! Field-level validation shared by contact and property construction.
//!
//! # Responsibility
//! - Reject malformed field values before an entity can exist.
//! - Normalize numeric text input (whitespace, thousands separators).
//!
//! # Invariants
//! - Every constructor path for `Contact`/`Property` runs through these checks,
//!   so registry and filter code never see malformed values.

use crate::model::id::IdKind;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Alphabetic}\p{N}][\p{Alphabetic}\p{N} ]*$").expect("valid name regex")
});
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,}$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9](?:[A-Za-z0-9+_.-]*[A-Za-z0-9])?",
        r"@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$",
    ))
    .expect("valid email regex")
});
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{Alphabetic}\p{N}_-]+$").expect("valid tag regex"));
static POSTAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").expect("valid postal regex"));

/// Upper bound for bedroom/bathroom counts.
pub const MAX_ROOM_COUNT: u32 = 50;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Construction-time validation failure for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace only.
    Blank { field: &'static str },
    /// Value does not match the field's format.
    InvalidFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Numeric value lies outside the allowed range.
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    /// Minimum budget is larger than maximum budget.
    InvalidBudgetRange { min: u64, max: u64 },
    /// Identifiers start at 1.
    ZeroIdentifier,
    /// An identifier of the wrong kind was placed in a typed set.
    WrongIdentifierKind {
        field: &'static str,
        expected: IdKind,
        found: IdKind,
    },
    /// The allocator cannot hand out another identifier.
    IdentifierExhausted(IdKind),
    /// A filter keyword list was empty after trimming.
    EmptyKeywords { field: &'static str },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} must not be blank"),
            Self::InvalidFormat {
                field,
                value,
                expected,
            } => write!(f, "invalid {field} `{value}`: expected {expected}"),
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} {value} is out of range [{min}, {max}]"),
            Self::InvalidBudgetRange { min, max } => {
                write!(f, "budget minimum ({min}) must be <= budget maximum ({max})")
            }
            Self::ZeroIdentifier => write!(f, "identifier value must be positive"),
            Self::WrongIdentifierKind {
                field,
                expected,
                found,
            } => write!(
                f,
                "{field} expects {expected} identifiers, got a {found} identifier"
            ),
            Self::IdentifierExhausted(kind) => {
                write!(f, "no more {kind} identifiers can be allocated")
            }
            Self::EmptyKeywords { field } => {
                write!(f, "{field} filter needs at least one non-blank keyword")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when nothing remains.
pub fn require_text(field: &'static str, value: &str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(trimmed.to_string())
}

pub fn validate_name(value: &str) -> ValidationResult<String> {
    let name = require_text("name", value)?;
    check_format("name", name, &NAME_RE, "letters, digits and spaces")
}

pub fn validate_phone(value: &str) -> ValidationResult<String> {
    let phone = require_text("phone", value)?;
    check_format("phone", phone, &PHONE_RE, "at least 3 digits")
}

/// Empty input means "no email".
pub fn validate_email(value: &str) -> ValidationResult<String> {
    let email = value.trim();
    if email.is_empty() {
        return Ok(String::new());
    }
    check_format("email", email.to_string(), &EMAIL_RE, "local-part@domain")
}

pub fn validate_tag(value: &str) -> ValidationResult<String> {
    let tag = require_text("tag", value)?;
    check_format("tag", tag, &TAG_RE, "letters, digits, `-` or `_`")
}

pub fn validate_postal(value: &str) -> ValidationResult<String> {
    let postal = normalize_numeric_text(value);
    if postal.is_empty() {
        return Err(ValidationError::Blank { field: "postal" });
    }
    check_format("postal", postal, &POSTAL_RE, "6 digits")
}

pub fn validate_room_count(field: &'static str, value: u32) -> ValidationResult<u32> {
    if value > MAX_ROOM_COUNT {
        return Err(ValidationError::OutOfRange {
            field,
            value: u64::from(value),
            min: 0,
            max: u64::from(MAX_ROOM_COUNT),
        });
    }
    Ok(value)
}

pub fn validate_positive(field: &'static str, value: u64) -> ValidationResult<u64> {
    if value == 0 {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min: 1,
            max: u64::MAX,
        });
    }
    Ok(value)
}

/// Strips surrounding whitespace and every thousands separator.
///
/// `" 1,200 "` becomes `"1200"`. Used both when parsing input and when
/// comparing numeric-looking filter values.
pub fn normalize_numeric_text(value: &str) -> String {
    value.trim().chars().filter(|ch| *ch != ',').collect()
}

/// Parses a room count such as `"3"` or `" 3 "`.
pub fn parse_count(field: &'static str, text: &str) -> ValidationResult<u32> {
    let normalized = normalize_numeric_text(text);
    let value = normalized
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidFormat {
            field,
            value: text.to_string(),
            expected: "a non-negative whole number",
        })?;
    validate_room_count(field, value)
}

/// Parses a money or area amount such as `"1,250,000"`.
pub fn parse_amount(field: &'static str, text: &str) -> ValidationResult<u64> {
    let normalized = normalize_numeric_text(text);
    normalized
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field,
            value: text.to_string(),
            expected: "a non-negative whole number",
        })
}

fn check_format(
    field: &'static str,
    value: String,
    pattern: &Regex,
    expected: &'static str,
) -> ValidationResult<String> {
    if pattern.is_match(&value) {
        Ok(value)
    } else {
        Err(ValidationError::InvalidFormat {
            field,
            value,
            expected,
        })
    }
}
