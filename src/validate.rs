use std::fmt;

use crate::record::FormBuffer;

pub const EMAIL_SUFFIX: &str = "@gmail.com";
pub const PHONE_DIGITS: usize = 10;
pub const PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingField,
    InvalidEmail,
    InvalidPhone,
    InvalidPasswordLength,
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField => "missing-field",
            Self::InvalidEmail => "invalid-email",
            Self::InvalidPhone => "invalid-phone",
            Self::InvalidPasswordLength => "invalid-password-length",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => write!(f, "Please fill in all fields."),
            Self::InvalidEmail => write!(f, "Email must end with {EMAIL_SUFFIX}"),
            Self::InvalidPhone => write!(f, "Phone number must be exactly {PHONE_DIGITS} digits."),
            Self::InvalidPasswordLength => {
                write!(f, "Password must be exactly {PASSWORD_CHARS} characters.")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check the form against the fixed rules. The first failing rule wins, in this order:
/// missing field, email suffix, phone digits, password length.
pub fn validate(form: &FormBuffer) -> Result<(), ValidationError> {
    let FormBuffer {
        name,
        email,
        password,
        phone,
        city,
    } = form;

    if [name, email, password, phone, city]
        .iter()
        .any(|value| value.is_empty())
    {
        return Err(ValidationError::MissingField);
    }

    // case-sensitive, so "a@Gmail.com" is rejected
    if !email.ends_with(EMAIL_SUFFIX) {
        return Err(ValidationError::InvalidEmail);
    }

    if phone.len() != PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone);
    }

    if password.chars().count() != PASSWORD_CHARS {
        return Err(ValidationError::InvalidPasswordLength);
    }

    Ok(())
}
