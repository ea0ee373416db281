//! Input validation utilities.
//!
//! Every text column is required and bounded; email columns must look like an address.
//! These checks run before any database access so a rejected request never opens a write.

use crate::{StoreError, StoreResult};

/// Validates that `value` is non-blank and at most `max_len` characters.
///
/// # Errors
///
/// Returns `StoreError::InvalidInput` naming `field` if the value is empty, whitespace-only,
/// or too long.
pub fn require_text(field: &str, value: &str, max_len: usize) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidInput(format!("{} is required", field)));
    }

    if value.chars().count() > max_len {
        return Err(StoreError::InvalidInput(format!(
            "{} exceeds maximum length of {} characters",
            field, max_len
        )));
    }

    Ok(())
}

/// Validates an email address: bounded, no whitespace, exactly one `@`, and a dotted domain.
///
/// # Errors
///
/// Returns `StoreError::InvalidInput` if the address is malformed.
pub fn require_email(field: &str, value: &str, max_len: usize) -> StoreResult<()> {
    require_text(field, value, max_len)?;

    let invalid = || StoreError::InvalidInput(format!("{} is not a valid email address", field));

    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }

    Ok(())
}

/// Validates that a count or amount is not negative.
pub fn require_non_negative(field: &str, value: i64) -> StoreResult<()> {
    if value < 0 {
        return Err(StoreError::InvalidInput(format!(
            "{} cannot be negative",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_rejects_blank_and_long_values() {
        assert!(require_text("name", "Ada", 30).is_ok());
        assert!(matches!(
            require_text("name", "   ", 30),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            require_text("phone", &"9".repeat(21), 20),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_require_text_counts_characters_not_bytes() {
        assert!(require_text("cname", "Côte d'Ivoire", 13).is_ok());
    }

    #[test]
    fn test_require_email() {
        for ok in ["a@b.com", "first.last@health.gov.cy"] {
            assert!(require_email("email", ok, 60).is_ok(), "{ok} should pass");
        }

        for bad in ["plainaddress", "@b.com", "a@", "a@b", "a@@b.com", "a b@c.com", "a@b..com"] {
            assert!(
                matches!(require_email("email", bad, 60), Err(StoreError::InvalidInput(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("salary", 0).is_ok());
        assert!(require_non_negative("salary", -1).is_err());
    }
}
