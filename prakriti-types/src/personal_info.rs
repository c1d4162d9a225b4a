use std::fmt;

use serde::{Deserialize, Serialize};

/// Respondent details collected after the questionnaire.
///
/// Values are kept exactly as typed; validation and trimming happen when the
/// form is submitted, so the same struct backs both the editable draft and
/// the submitted payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub city: String,
}

impl PersonalInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the raw value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Gender => &self.gender,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::City => &self.city,
        }
    }

    /// Get a mutable reference to a field's value.
    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Gender => &mut self.gender,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::City => &mut self.city,
        }
    }

    /// Replace a field's value.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// A copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            gender: self.gender.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            city: self.city.trim().to_string(),
        }
    }
}

/// The personal info fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Gender,
    Phone,
    Email,
    City,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Gender,
        Field::Phone,
        Field::Email,
        Field::City,
    ];

    /// The field name used in submissions.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Gender => "gender",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::City => "city",
        }
    }

    /// The label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Gender => "Gender",
            Self::Phone => "Phone number",
            Self::Email => "Email",
            Self::City => "City",
        }
    }

    /// Look a field up by its submission key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepted gender values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Parse a submitted value. Only the exact spellings are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
