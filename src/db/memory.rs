use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AdminConfigurationRepo, AuthorizationRepo, DbResult};
use crate::{
    config::AuthorizationConfig,
    models::{AuthorizationRule, RealmAdminConfiguration},
};

/// Authorization rules held in memory.
///
/// Used when rules come from the configuration file instead of a database.
#[derive(Debug, Default)]
pub struct MemoryAuthorizationRepo {
    rules: RwLock<Vec<AuthorizationRule>>,
}

impl MemoryAuthorizationRepo {
    pub fn new(rules: Vec<AuthorizationRule>) -> Self {
        Self {
            rules: RwLock::new(rules),
        }
    }

    pub fn from_config(config: &AuthorizationConfig) -> Self {
        Self::new(config.rules.clone())
    }

    /// Replace the whole rule set. Takes effect on the manager's next reload.
    pub async fn replace_rules(&self, rules: Vec<AuthorizationRule>) {
        *self.rules.write().await = rules;
    }
}

#[async_trait]
impl AuthorizationRepo for MemoryAuthorizationRepo {
    async fn get_authorizations(&self) -> DbResult<Vec<AuthorizationRule>> {
        Ok(self.rules.read().await.clone())
    }
}

/// Admin configurations held in memory, keyed by realm.
///
/// A realm without an entry reads as the default configuration, which
/// restricts nothing.
#[derive(Debug, Default)]
pub struct MemoryAdminConfigurationRepo {
    configurations: RwLock<HashMap<String, RealmAdminConfiguration>>,
}

impl MemoryAdminConfigurationRepo {
    pub fn new(configurations: HashMap<String, RealmAdminConfiguration>) -> Self {
        Self {
            configurations: RwLock::new(configurations),
        }
    }

    pub fn from_config(config: &AuthorizationConfig) -> Self {
        Self::new(config.admin_configurations.clone())
    }

    pub async fn set_configuration(
        &self,
        realm_id: impl Into<String>,
        config: RealmAdminConfiguration,
    ) {
        self.configurations
            .write()
            .await
            .insert(realm_id.into(), config);
    }
}

#[async_trait]
impl AdminConfigurationRepo for MemoryAdminConfigurationRepo {
    async fn get_admin_configuration(&self, realm_id: &str) -> DbResult<RealmAdminConfiguration> {
        Ok(self
            .configurations
            .read()
            .await
            .get(realm_id)
            .cloned()
            .unwrap_or_default())
    }
}
