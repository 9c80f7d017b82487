//! Result type alias for the FHML pipeline
//!
//! This module provides a convenient Result type alias that uses
//! [`FhmlError`] as the error type.

use super::errors::FhmlError;

/// Result type alias for pipeline operations
///
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use fhml_gate::domain::result::Result;
/// use fhml_gate::domain::errors::FhmlError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(FhmlError::Format("stray bytes".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, FhmlError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FhmlError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(FhmlError::Other("test error".to_string()));
        assert!(result.is_err());
    }
}
