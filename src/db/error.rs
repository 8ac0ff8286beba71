use http::StatusCode;
use thiserror::Error;

use crate::authz::HasStatusCode;

#[derive(Debug, Error)]
pub enum DbError {
    /// The backing store failed to answer.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HasStatusCode for DbError {
    fn status_code(&self) -> Option<StatusCode> {
        None
    }
}

pub type DbResult<T> = Result<T, DbError>;
