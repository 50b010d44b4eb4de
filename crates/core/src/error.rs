use crate::types::BookId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Could not find a {entity} with an id of {id}")]
    NotFound { entity: &'static str, id: BookId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// A required request field was missing or falsy.
    pub fn missing_field(field: &str, operation: &str) -> Self {
        CoreError::Validation(format!(
            "'{field}' is required in the request body when calling '{operation}'."
        ))
    }

    /// A required URL path parameter was missing or blank.
    pub fn missing_path_param(param: &str, operation: &str) -> Self {
        CoreError::Validation(format!(
            "'{param}' is required in the URL path when calling '{operation}'."
        ))
    }
}
