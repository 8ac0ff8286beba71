//! Authorization errors.

use http::StatusCode;
use thiserror::Error;

use crate::auth::ContextError;

/// The request is authenticated but the action is not permitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
#[error("ForbiddenError: Operation not permitted.")]
pub struct ForbiddenError;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error(transparent)]
    Forbidden(#[from] ForbiddenError),

    /// A collaborator rejected the caller's credentials. The original error
    /// is kept so the transport layer can tell it apart from a denial.
    #[error(transparent)]
    Upstream(Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    MissingContext(#[from] ContextError),
}

impl AuthzError {
    pub fn forbidden() -> Self {
        Self::Forbidden(ForbiddenError)
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }
}

/// Errors from collaborators that can report a structured HTTP status.
pub trait HasStatusCode {
    fn status_code(&self) -> Option<StatusCode>;
}

/// Collapse a collaborator failure into a denial.
///
/// Only an explicit `401 Unauthorized` is propagated unchanged; every other
/// failure becomes [`ForbiddenError`] so internal details never reach the caller.
pub fn suggest_forbidden<E>(err: E) -> AuthzError
where
    E: HasStatusCode + std::error::Error + Send + Sync + 'static,
{
    if err.status_code() == Some(StatusCode::UNAUTHORIZED) {
        return AuthzError::Upstream(Box::new(err));
    }
    tracing::debug!(error = %err, "Collaborator failure reported as forbidden");
    AuthzError::forbidden()
}
