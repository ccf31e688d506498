use serde::Serialize;

/// Errors surfaced by the storefront services.
///
/// Validation failures are reported verbatim and never coerced into a
/// valid value; callers decide whether to retry.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        sea_orm::error::DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Concurrent modification of {entity} {id}")]
    ConcurrentModification { entity: &'static str, id: i32 },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::StorageError(err.to_string())
    }
}

impl ServiceError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", entity, id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Both explicit conflicts and lost optimistic-lock races count.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::ConcurrentModification { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn validation_errors_keep_field_names() {
        let mut errors = ValidationErrors::new();
        errors.add("price", ValidationError::new("non_negative"));

        let err: ServiceError = errors.into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = ServiceError::not_found("Product", 42);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: Product 42 not found");
    }

    #[test]
    fn concurrent_modification_is_a_conflict() {
        let err = ServiceError::ConcurrentModification { entity: "Cart", id: 7 };
        assert!(err.is_conflict());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Concurrent modification of Cart 7");
    }
}
