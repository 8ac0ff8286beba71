use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::{
    authz::{Action, ActionRegistry, MASTER_REALM, validate_rules},
    models::{AuthorizationRule, RealmAdminConfiguration},
};

/// Authorization engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorizationConfig {
    /// Realm excluded by the `/` target realm token.
    #[serde(default = "default_primary_realm")]
    pub primary_realm: String,

    /// Periodic matrix reload.
    #[serde(default)]
    pub reload: ReloadConfig,

    /// Reject static rules naming undeclared actions or mismatched targets.
    #[serde(default)]
    pub strict_rules: bool,

    /// Actions known to the embedding service.
    #[serde(default)]
    pub actions: Vec<Action>,

    /// Static authorization rules, served by the in-memory repository.
    #[serde(default)]
    pub rules: Vec<AuthorizationRule>,

    /// Static admin configuration per realm.
    #[serde(default)]
    pub admin_configurations: HashMap<String, RealmAdminConfiguration>,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            primary_realm: default_primary_realm(),
            reload: ReloadConfig::default(),
            strict_rules: false,
            actions: Vec::new(),
            rules: Vec::new(),
            admin_configurations: HashMap::new(),
        }
    }
}

impl AuthorizationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary_realm.trim().is_empty() {
            return Err(ConfigError::Validation(
                "authorization.primary_realm must not be empty".into(),
            ));
        }
        if self.reload.enabled && self.reload.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "authorization.reload.interval_secs must be greater than 0".into(),
            ));
        }
        if self.strict_rules {
            self.validate_static_rules()?;
        }
        Ok(())
    }

    /// Registry of the declared actions.
    pub fn action_registry(&self) -> Result<ActionRegistry, ConfigError> {
        let mut registry = ActionRegistry::new();
        for action in &self.actions {
            registry
                .register(action.clone())
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
        }
        Ok(registry)
    }

    fn validate_static_rules(&self) -> Result<(), ConfigError> {
        let registry = self.action_registry()?;
        let violations = validate_rules(&self.rules, &registry);
        if violations.is_empty() {
            return Ok(());
        }

        let details = violations
            .iter()
            .map(|(index, violation)| format!("rule #{index}: {violation}"))
            .collect::<Vec<_>>()
            .join("\n  - ");
        Err(ConfigError::Validation(format!(
            "Invalid authorization rules:\n  - {details}"
        )))
    }
}

fn default_primary_realm() -> String {
    MASTER_REALM.to_string()
}

/// Periodic reload of the authorization matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReloadConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between reloads.
    #[serde(default = "default_reload_interval_secs")]
    pub interval_secs: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_reload_interval_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_reload_interval_secs() -> u64 {
    300
}
