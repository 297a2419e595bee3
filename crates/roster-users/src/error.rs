//! Error types for user store operations.

use thiserror::Error;

/// Errors that can occur during user store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    /// No record with the requested id.
    #[error("User with id {id} not found")]
    NotFound { id: String },
}

impl UserError {
    /// Builds a `NotFound` error for any displayable id.
    ///
    /// Takes the raw id rather than a `u64` so a path segment that fails to
    /// parse can be reported back verbatim.
    pub fn not_found(id: impl ToString) -> Self {
        UserError::NotFound { id: id.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_id() {
        assert_eq!(
            UserError::not_found(999).to_string(),
            "User with id 999 not found"
        );
        assert_eq!(
            UserError::not_found("abc").to_string(),
            "User with id abc not found"
        );
    }
}
