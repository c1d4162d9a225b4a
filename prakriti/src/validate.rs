//! Field validators for the personal info form.
//!
//! Every validator works on the trimmed value and reports the first rule
//! that fails. The same functions back live form feedback in front-ends and
//! the final check at the submission boundary.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Field, Gender, PersonalInfo};

/// Minimum length of a name or city, in characters.
pub const MIN_PLACE_NAME_CHARS: usize = 2;

/// Maximum length of a name or city, in characters.
pub const MAX_PLACE_NAME_CHARS: usize = 50;

/// Required number of digits in a phone number.
pub const PHONE_DIGITS: usize = 10;

/// Maximum length of an email address, in characters.
pub const MAX_EMAIL_CHARS: usize = 100;

static LETTERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z [\p{Gujarati}&&[\p{L}\p{M}]]]+$").expect("letters pattern is valid")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").expect("email pattern is valid")
});

/// Why a field value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0} is required.")]
    Required(Field),

    #[error("{field} must be at least {min} characters.")]
    TooShort { field: Field, min: usize },

    #[error("{field} must be at most {max} characters.")]
    TooLong { field: Field, max: usize },

    #[error("{0} may only contain letters and spaces.")]
    InvalidCharacters(Field),

    #[error("Phone number may only contain digits.")]
    PhoneNotDigits,

    #[error("Phone number must be exactly 10 digits.")]
    PhoneLength,

    #[error("Phone number must start with 6, 7, 8 or 9.")]
    PhoneLeadingDigit,

    #[error("Email must contain '@'.")]
    EmailMissingAt,

    #[error("Please enter a valid email address.")]
    EmailFormat,

    #[error("Please select Male, Female or Other.")]
    InvalidGender,
}

impl FieldError {
    /// The field this error belongs to.
    pub fn field(&self) -> Field {
        match self {
            Self::Required(field)
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::InvalidCharacters(field) => *field,
            Self::PhoneNotDigits | Self::PhoneLength | Self::PhoneLeadingDigit => Field::Phone,
            Self::EmailMissingAt | Self::EmailFormat => Field::Email,
            Self::InvalidGender => Field::Gender,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required(_))
    }
}

/// Outcome of a single validator, shaped for live form feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck {
    pub is_valid: bool,
    pub message: String,
}

impl FieldCheck {
    /// Build the feedback for `field` from a validator result.
    pub fn of(field: Field, result: Result<(), FieldError>) -> Self {
        match result {
            Ok(()) => Self {
                is_valid: true,
                message: success_message(field).to_string(),
            },
            Err(err) => Self {
                is_valid: false,
                message: err.to_string(),
            },
        }
    }
}

fn success_message(field: Field) -> &'static str {
    match field {
        Field::Name => "Name looks good.",
        Field::Gender => "Gender selected.",
        Field::Phone => "Phone number looks good.",
        Field::Email => "Email looks good.",
        Field::City => "City looks good.",
    }
}

pub fn validate_name(value: &str) -> Result<(), FieldError> {
    validate_place_name(Field::Name, value)
}

pub fn validate_city(value: &str) -> Result<(), FieldError> {
    validate_place_name(Field::City, value)
}

// Names and cities share one rule set: Latin or Gujarati letters (with vowel
// signs) and plain spaces. Gujarati digits and tabs are not letters.
fn validate_place_name(field: Field, value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Required(field));
    }
    let chars = value.chars().count();
    if chars < MIN_PLACE_NAME_CHARS {
        return Err(FieldError::TooShort {
            field,
            min: MIN_PLACE_NAME_CHARS,
        });
    }
    if chars > MAX_PLACE_NAME_CHARS {
        return Err(FieldError::TooLong {
            field,
            max: MAX_PLACE_NAME_CHARS,
        });
    }
    if !LETTERS.is_match(value) {
        return Err(FieldError::InvalidCharacters(field));
    }
    Ok(())
}

pub fn validate_phone(value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Required(Field::Phone));
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::PhoneNotDigits);
    }
    if value.len() != PHONE_DIGITS {
        return Err(FieldError::PhoneLength);
    }
    if !value.starts_with(['6', '7', '8', '9']) {
        return Err(FieldError::PhoneLeadingDigit);
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Required(Field::Email));
    }
    if value.chars().count() > MAX_EMAIL_CHARS {
        return Err(FieldError::TooLong {
            field: Field::Email,
            max: MAX_EMAIL_CHARS,
        });
    }
    if !value.contains('@') {
        return Err(FieldError::EmailMissingAt);
    }
    if !EMAIL.is_match(value) {
        return Err(FieldError::EmailFormat);
    }
    Ok(())
}

/// Gender is picked from a fixed list, so the value is compared as-is.
pub fn validate_gender(value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::Required(Field::Gender));
    }
    Gender::parse(value)
        .map(|_| ())
        .ok_or(FieldError::InvalidGender)
}

/// Run the validator belonging to `field`.
pub fn validate_field(field: Field, value: &str) -> Result<(), FieldError> {
    match field {
        Field::Name => validate_name(value),
        Field::Gender => validate_gender(value),
        Field::Phone => validate_phone(value),
        Field::Email => validate_email(value),
        Field::City => validate_city(value),
    }
}

/// Live feedback for one field.
pub fn check_field(field: Field, value: &str) -> FieldCheck {
    FieldCheck::of(field, validate_field(field, value))
}

/// Validate every field, collecting all failures in form order.
pub fn validate_all(info: &PersonalInfo) -> Vec<FieldError> {
    Field::ALL
        .into_iter()
        .filter_map(|field| validate_field(field, info.get(field)).err())
        .collect()
}
