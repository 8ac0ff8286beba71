use serde::{Deserialize, Serialize};

/// A single authorization row as stored in the configuration database.
///
/// Members of `user_group` in `user_realm` may perform `action` on
/// `target_realm` / `target_group`. The target fields may hold the reserved
/// tokens `*` (any) and `/` (any realm except the primary one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRule {
    pub user_realm: String,
    pub user_group: String,
    pub action: String,
    /// Rows without a target realm grant nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_realm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_group: Option<String>,
}

impl AuthorizationRule {
    pub fn new(
        user_realm: impl Into<String>,
        user_group: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            user_realm: user_realm.into(),
            user_group: user_group.into(),
            action: action.into(),
            target_realm: None,
            target_group: None,
        }
    }

    pub fn with_target_realm(mut self, target_realm: impl Into<String>) -> Self {
        self.target_realm = Some(target_realm.into());
        self
    }

    pub fn with_target_group(mut self, target_group: impl Into<String>) -> Self {
        self.target_group = Some(target_group.into());
        self
    }
}
