use thiserror::Error;

use portal_auth::{AuthError, AuthzError};
use portal_core::{DomainError, RepositoryError};

pub type PortalResult<T> = Result<T, PortalError>;

/// Workflow error surfaced to the presentation layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortalError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// An administrator tried to delete their own account.
    #[error("you cannot delete your own account")]
    SelfDeletion,
}

impl PortalError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
