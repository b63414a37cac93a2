//! Validation Utilities
//!
//! Conversion of `validator` failures into [`AppError`] and the custom field
//! rules that the derive attributes cannot express.

use std::borrow::Cow;

use chrono::{Months, NaiveDate, Utc};
use validator::{ValidationError, ValidationErrors};

use super::error::{AppError, FieldError};

/// Minimum age, in years, required to sign up.
pub const MINIMUM_AGE_YEARS: u32 = 16;

/// Symbols accepted (and one of which is required) in a password.
const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));

    let message = field_errors
        .first()
        .map(|e| format!("{}: {}", e.field, e.message))
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation {
        message,
        errors: field_errors,
    }
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// At least 8 characters drawn from letters, digits and `@$!%*?&`, with at
/// least one lowercase, one uppercase, one digit and one symbol.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c));
    let strong = password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    if allowed && strong {
        Ok(())
    } else {
        Err(error(
            "password_strength",
            "Password must have at least 8 characters, one uppercase, one lowercase, one number and one special character",
        ))
    }
}

/// Latest birth date that still satisfies the minimum age on `today`.
pub fn minimum_age_cutoff(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(MINIMUM_AGE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN)
}

/// True when someone born on `birthday` is at least the minimum age on `today`.
pub fn is_old_enough(birthday: NaiveDate, today: NaiveDate) -> bool {
    birthday <= minimum_age_cutoff(today)
}

pub fn validate_minimum_age(birthday: &NaiveDate) -> Result<(), ValidationError> {
    if is_old_enough(*birthday, Utc::now().date_naive()) {
        Ok(())
    } else {
        Err(error("minimum_age", "You must be at least 16 years old"))
    }
}

/// Every image path must be 5-100 characters long.
pub fn validate_image_paths(images: &[String]) -> Result<(), ValidationError> {
    if images
        .iter()
        .all(|path| (5..=100).contains(&path.chars().count()))
    {
        Ok(())
    } else {
        Err(error(
            "image_path",
            "Image paths must be between 5 and 100 characters",
        ))
    }
}
