use async_trait::async_trait;

use crate::{db::error::DbResult, models::AuthorizationRule};

/// Source of authorization rules for the matrix.
///
/// There is no incremental query: every call returns the complete current
/// rule set, which the manager turns into a fresh matrix.
#[async_trait]
pub trait AuthorizationRepo: Send + Sync {
    async fn get_authorizations(&self) -> DbResult<Vec<AuthorizationRule>>;
}
