//! Error taxonomy shared across the workspace.
//!
//! Usage errors are client or caller misuse of the dispatch contract and
//! carry their own messages. Storage failures are delegated: adapters keep
//! their typed errors and box them into [`CrudError::Storage`] at the
//! boundary.

/// Top-level error produced by CRUD dispatch.
#[derive(Debug, thiserror::Error)]
pub enum CrudError {
    /// Misuse of the dispatch contract (bad verb, missing identifier).
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// An identified lookup matched nothing.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Failed to render a model into a response document.
    #[error("serialization error")]
    Serialization(#[from] serde_json::Error),

    /// Failure propagated from the storage layer.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CrudError {
    /// Box an adapter error into the storage variant.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Client or caller misuse of the CRUD contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    /// The operation requires an identifier the request did not carry.
    #[error("id not passed to controller")]
    MissingId,

    /// Verb outside the POST/GET/PUT/DELETE mapping.
    #[error("invalid CRUD controller usage: {method}")]
    UnsupportedMethod {
        /// Raw method token as received.
        method: String,
    },
}

/// A model lookup that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no {model} with id {id}")]
pub struct NotFoundError {
    /// Collection or table the lookup ran against.
    pub model: String,
    /// Identifier that failed to resolve.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::{CrudError, NotFoundError, UsageError};

    #[test]
    fn should_render_usage_messages() {
        assert_eq!(
            UsageError::MissingId.to_string(),
            "id not passed to controller"
        );
        assert_eq!(
            UsageError::UnsupportedMethod {
                method: "PATCH".to_string()
            }
            .to_string(),
            "invalid CRUD controller usage: PATCH"
        );
    }

    #[test]
    fn should_render_not_found_messages() {
        let err = NotFoundError {
            model: "tasks".to_string(),
            id: "7".to_string(),
        };
        assert_eq!(err.to_string(), "no tasks with id 7");
    }

    #[test]
    fn should_forward_messages_through_transparent_variants() {
        let err = CrudError::from(UsageError::MissingId);
        assert_eq!(err.to_string(), "id not passed to controller");
    }

    #[test]
    fn should_box_storage_errors() {
        let err = CrudError::storage(std::io::Error::other("disk gone"));
        assert!(matches!(err, CrudError::Storage(_)));
        assert_eq!(err.to_string(), "storage error");
    }
}
