use async_trait::async_trait;

use crate::{db::error::DbResult, models::RealmAdminConfiguration};

/// Per-realm admin configuration used by role-based authorization.
#[async_trait]
pub trait AdminConfigurationRepo: Send + Sync {
    async fn get_admin_configuration(&self, realm_id: &str) -> DbResult<RealmAdminConfiguration>;
}
