/// Input validators for the sign-up form
///
/// Every rule runs; failures are collected per field so the client sees
/// all invalid fields in one response.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::FieldErrors;

const MAX_USERNAME_LENGTH: usize = 64;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MAX_PASSWORD_BYTES: usize = 72; // bcrypt ignores anything longer

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("email regex is valid");
}

/// A sign-up form that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignUp {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Validates the sign-up fields.
///
/// Username and email are trimmed; the password is kept as typed.
pub fn validate_sign_up(
    username: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<ValidSignUp, FieldErrors> {
    let mut errors = FieldErrors::new();

    let username = required("username", username, &mut errors).map(str::trim);
    if let Some(username) = username {
        if username.chars().count() > MAX_USERNAME_LENGTH {
            errors.add(
                "username",
                format!("username is too long (maximum {} characters)", MAX_USERNAME_LENGTH),
            );
        }
    }

    let email = required("email", email, &mut errors).map(str::trim);
    if let Some(email) = email {
        if email.len() > MAX_EMAIL_LENGTH {
            errors.add(
                "email",
                format!("email is too long (maximum {} characters)", MAX_EMAIL_LENGTH),
            );
        } else if !EMAIL_REGEX.is_match(email) {
            errors.add("email", "email has invalid format");
        }
    }

    let password = required("password", password, &mut errors);
    if let Some(password) = password {
        if password.len() > MAX_PASSWORD_BYTES {
            errors.add(
                "password",
                format!("password is too long (maximum {} bytes)", MAX_PASSWORD_BYTES),
            );
        }
    }

    match (username, email, password) {
        (Some(username), Some(email), Some(password)) if errors.is_empty() => Ok(ValidSignUp {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }),
        _ => Err(errors),
    }
}

/// True when a credential field is missing or whitespace-only.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn required<'a>(
    field: &'static str,
    value: Option<&'a str>,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    if is_blank(value) {
        errors.add(field, format!("{} is required", field));
        None
    } else {
        value
    }
}
