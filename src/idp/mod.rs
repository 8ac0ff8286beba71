//! Identity provider collaborators.
//!
//! The engine resolves target users' groups and roles, and group names from
//! group IDs, through these traits. The HTTP client that talks to the
//! identity provider implements them and maps its failures onto [`IdpError`].

use async_trait::async_trait;
use http::StatusCode;
use thiserror::Error;

use crate::authz::HasStatusCode;

#[derive(Debug, Error)]
pub enum IdpError {
    /// The identity provider answered with a non-success status.
    #[error("Identity provider returned {status}: {message}")]
    Http { status: StatusCode, message: String },

    #[error("Identity provider unreachable: {0}")]
    Transport(String),

    #[error("Unexpected identity provider response: {0}")]
    InvalidResponse(String),
}

impl IdpError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Http {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl HasStatusCode for IdpError {
    fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(_) | Self::InvalidResponse(_) => None,
        }
    }
}

pub type IdpResult<T> = Result<T, IdpError>;

/// Group lookups used by the matrix-based checks.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Names of the groups `user_id` belongs to in `realm`.
    async fn get_group_names_of_user(
        &self,
        access_token: &str,
        realm: &str,
        user_id: &str,
    ) -> IdpResult<Vec<String>>;

    /// Name of the group with `group_id`, empty when no such group exists.
    async fn get_group_name(
        &self,
        access_token: &str,
        realm: &str,
        group_id: &str,
    ) -> IdpResult<String>;
}

/// Role lookups used by the role-based checks.
#[async_trait]
pub trait RoleClient: Send + Sync {
    async fn get_role_names_of_user(
        &self,
        access_token: &str,
        realm: &str,
        user_id: &str,
    ) -> IdpResult<Vec<String>>;
}
