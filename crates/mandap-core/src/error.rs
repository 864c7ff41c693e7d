//! Domain error types.
//!
//! This module defines all error types that the Mandap services surface to
//! callers. Subsystem-local errors (JWT decoding, geocoding transport) are
//! converted into these variants at service boundaries.

/// Errors that can occur during Mandap domain operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request is malformed or violates an input policy.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what is invalid.
        message: String,
        /// The offending field, when attributable to a single one.
        field: Option<String>,
    },

    /// The request lacks valid credentials (missing, invalid, expired, or
    /// revoked).
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// The authenticated partner does not have permission for the action.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of why access is forbidden.
        message: String,
    },

    /// A referenced entity does not exist.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        resource: String,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// A uniqueness constraint was violated.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflicting state.
        message: String,
        /// The field carrying the duplicate value, when known.
        field: Option<String>,
    },

    /// An external dependency (database, object store) failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AppError {
    /// Creates a new `Validation` error without a field attribution.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a new `Validation` error attributed to a field.
    #[must_use]
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Forbidden` error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Creates a new `Conflict` error without a field attribution.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a new `Conflict` error attributed to a field.
    #[must_use]
    pub fn conflict_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code this error maps to at the boundary.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Storage { .. } | Self::Internal { .. } => 500,
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::Unauthorized { .. }
                | Self::Forbidden { .. }
                | Self::NotFound { .. }
                | Self::Conflict { .. }
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Internal { .. })
    }

    /// Returns the JSON body the HTTP boundary renders for this error.
    ///
    /// Server errors are reported without detail to avoid leaking
    /// internals; client errors carry their message and, when present, the
    /// offending field.
    #[must_use]
    pub fn error_body(&self) -> serde_json::Value {
        let message = if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.public_message()
        };

        let mut error = serde_json::json!({ "message": message });
        if let Self::Validation {
            field: Some(field), ..
        }
        | Self::Conflict {
            field: Some(field), ..
        } = self
        {
            error["field"] = serde_json::Value::String(field.clone());
        }

        serde_json::json!({
            "success": false,
            "error": error,
        })
    }

    /// Returns the caller-facing message without the variant prefix.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation { message, .. }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::Conflict { message, .. }
            | Self::Storage { message }
            | Self::Internal { message } => message.clone(),
            Self::NotFound { resource, id } => format!("{resource} not found: {id}"),
        }
    }
}

/// Type alias for results of Mandap domain operations.
pub type AppResult<T> = Result<T, AppError>;
