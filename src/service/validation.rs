//! Field rules checked before a write reaches the store.

use crate::error::AppError;
use regex::Regex;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Request bodies that can be checked without touching the database.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
}

/// Rule for one text column: length limit, blank check, optional format.
#[derive(Clone, Copy, Debug)]
pub struct TextRule {
    pub max_length: usize,
    pub not_blank: bool,
    pub format: Option<Format>,
}

impl TextRule {
    pub const fn optional(max_length: usize) -> Self {
        TextRule {
            max_length,
            not_blank: false,
            format: None,
        }
    }

    pub const fn required(max_length: usize) -> Self {
        TextRule {
            max_length,
            not_blank: true,
            format: None,
        }
    }

    pub const fn email(self) -> Self {
        TextRule {
            format: Some(Format::Email),
            ..self
        }
    }
}

/// Contact columns: city, state, phone, social links.
pub const SHORT_TEXT: TextRule = TextRule::optional(120);
pub const LONG_TEXT: TextRule = TextRule::optional(500);
pub const IMAGE_LINK: TextRule = TextRule::optional(500);

/// Check one text value. `None` means the field is absent or null; presence is enforced by the body type.
pub fn check_text(col: &str, value: Option<&str>, rule: TextRule) -> Result<(), AppError> {
    let Some(s) = value else {
        return Ok(());
    };
    if rule.not_blank && s.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be blank", col)));
    }
    if s.chars().count() > rule.max_length {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            col, rule.max_length
        )));
    }
    if let Some(format) = rule.format {
        validate_format(col, s, format)?;
    }
    Ok(())
}

pub fn check_price(col: &str, price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation(format!(
            "{} must be a non-negative number",
            col
        )));
    }
    Ok(())
}

fn email_regex() -> Result<&'static Regex, AppError> {
    static EMAIL: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN))
        .as_ref()
        .map_err(pattern_error)
}

/// A pattern that does not compile is a server defect, not a client error.
fn pattern_error(e: &regex::Error) -> AppError {
    AppError::Internal(format!("email pattern does not compile: {}", e))
}

fn validate_format(col: &str, s: &str, format: Format) -> Result<(), AppError> {
    match format {
        Format::Email => {
            if !email_regex()?.is_match(s) {
                return Err(AppError::Validation(format!("{} must be a valid email", col)));
            }
        }
    }
    Ok(())
}
