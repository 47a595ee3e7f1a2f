//! Input validation for shipment creation.

use crate::error::AppError;

/// Minimum accepted tracking number length, after trimming.
pub const MIN_TRACKING_NUMBER_LEN: usize = 6;

/// Validate a tracking number from untrusted input and return the trimmed
/// value that should be stored. Runs before any network or database work.
pub fn validate_tracking_number(input: Option<&str>) -> Result<String, AppError> {
    let trimmed = input.unwrap_or_default().trim();
    if trimmed.len() < MIN_TRACKING_NUMBER_LEN {
        return Err(AppError::Validation(format!(
            "Tracking number must be at least {} characters",
            MIN_TRACKING_NUMBER_LEN
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tracking_number_rejected() {
        assert!(validate_tracking_number(None).is_err());
        assert!(validate_tracking_number(Some("")).is_err());
        assert!(validate_tracking_number(Some("   ")).is_err());
    }

    #[test]
    fn test_short_tracking_number_rejected() {
        assert!(validate_tracking_number(Some("12345")).is_err());
        // Whitespace does not count toward the minimum length
        assert!(validate_tracking_number(Some("  1234  ")).is_err());
    }

    #[test]
    fn test_tracking_number_trimmed() {
        let value = validate_tracking_number(Some("  794687123456  ")).unwrap();
        assert_eq!(value, "794687123456");
    }

    #[test]
    fn test_minimum_length_boundary() {
        // Exactly 6 characters is accepted
        assert_eq!(validate_tracking_number(Some("123456")).unwrap(), "123456");
    }
}
