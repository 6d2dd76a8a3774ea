//! Error types for repository operations.
//!
//! Every store failure carries an [`ErrorContext`] describing the operation,
//! the entity kind and, where known, the identifier involved.

use std::fmt;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context for repository errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "get", "list_by")
    pub operation: Option<String>,
    /// The entity kind involved (e.g., "campaign", "shop")
    pub entity: Option<String>,
    /// The entity ID if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
    /// Whether this error is retryable
    pub retryable: bool,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Mark this error as retryable.
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    fn is_empty(&self) -> bool {
        self.operation.is_none()
            && self.entity.is_none()
            && self.entity_id.is_none()
            && self.details.is_none()
            && !self.retryable
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, " [{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The store could not be reached. Typically transient.
    #[error("Connection error: {message}{context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// The store rejected or failed to execute the command.
    #[error("Query error: {message}{context}")]
    QueryError {
        message: String,
        context: ErrorContext,
    },

    /// Requested entity was not found.
    #[error("Not found: {message}{context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// A record with the same identifier already exists.
    #[error("Duplicate key: {message}{context}")]
    DuplicateKey {
        message: String,
        context: ErrorContext,
    },

    /// A stored record could not be decoded into its entity type.
    #[error("Malformed record: {message}{context}")]
    DecodeError {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message}{context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message}{context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },

    /// The per-call deadline elapsed before the store answered.
    #[error("Timeout error: {message}{context}")]
    TimeoutError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::DuplicateKey {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::DecodeError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::TimeoutError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Check if this error is retryable.
    ///
    /// Nothing in this crate retries; the flag is informational for callers.
    pub fn is_retryable(&self) -> bool {
        self.context().retryable
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::DuplicateKey { context, .. }
            | Self::DecodeError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. }
            | Self::TimeoutError { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::DuplicateKey { context, .. }
            | Self::DecodeError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. }
            | Self::TimeoutError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.context_mut().entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.context_mut().entity_id = Some(id.to_string());
        self
    }
}

impl From<bson::ser::Error> for RepositoryError {
    fn from(err: bson::ser::Error) -> Self {
        RepositoryError::internal(format!("Serialization error: {}", err))
    }
}

impl From<bson::de::Error> for RepositoryError {
    fn from(err: bson::de::Error) -> Self {
        RepositoryError::decode(err.to_string())
    }
}

#[cfg(feature = "mongo-repo")]
impl From<mongodb::error::Error> for RepositoryError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        const DUPLICATE_KEY_CODE: i32 = 11000;

        let message = err.to_string();
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write))
                if write.code == DUPLICATE_KEY_CODE =>
            {
                RepositoryError::duplicate_key(message)
            }
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. } => RepositoryError::connection(message),
            ErrorKind::BsonDeserialization(_) => RepositoryError::decode(message),
            ErrorKind::InvalidArgument { .. } => RepositoryError::configuration(message),
            _ => RepositoryError::query(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = RepositoryError::not_found("shop does not exist")
            .with_operation("get")
            .with_entity("shop")
            .with_entity_id("65a1f0c2b3d4e5f601234567");
        assert_eq!(
            err.to_string(),
            "Not found: shop does not exist [operation=get, entity=shop, id=65a1f0c2b3d4e5f601234567]"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_display_without_context() {
        let err = RepositoryError::query("bad filter");
        assert_eq!(err.to_string(), "Query error: bad filter");
    }

    #[test]
    fn test_retryable_flags() {
        assert!(RepositoryError::connection("down").is_retryable());
        assert!(RepositoryError::timeout("slow").is_retryable());
        assert!(!RepositoryError::duplicate_key("dup").is_retryable());
        assert!(!RepositoryError::not_found("gone").is_retryable());
    }
}
