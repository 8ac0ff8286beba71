//! Role-based authorization for identification actions.
//!
//! Unlike [`super::AuthorizationManager`] this holds no state: every check
//! reads the target realm's admin configuration and the actor's roles afresh.

use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;

use super::{AuthzError, RoleAuthorizationChecker, suggest_forbidden};
use crate::{
    auth::RequestContext, db::AdminConfigurationRepo, idp::RoleClient,
    models::RealmAdminConfiguration,
};

/// Identification actions restricted by role in the admin configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleAction {
    VideoIdentification,
    AuxiliaryVideoIdentification,
    AutoIdentification,
    PhysicalIdentification,
    AuxiliaryPhysicalIdentification,
}

impl RoleAction {
    pub const ALL: [RoleAction; 5] = [
        Self::VideoIdentification,
        Self::AuxiliaryVideoIdentification,
        Self::AutoIdentification,
        Self::PhysicalIdentification,
        Self::AuxiliaryPhysicalIdentification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VideoIdentification => "VideoIdentification",
            Self::AuxiliaryVideoIdentification => "AuxiliaryVideoIdentification",
            Self::AutoIdentification => "AutoIdentification",
            Self::PhysicalIdentification => "PhysicalIdentification",
            Self::AuxiliaryPhysicalIdentification => "AuxiliaryPhysicalIdentification",
        }
    }

    /// Roles the realm allows to perform this action. Empty means unrestricted.
    pub fn allowed_roles<'a>(&self, config: &'a RealmAdminConfiguration) -> &'a [String] {
        let roles = match self {
            Self::VideoIdentification => &config.video_identification_allowed_roles,
            Self::AuxiliaryVideoIdentification => {
                &config.auxiliary_video_identification_allowed_roles
            }
            Self::AutoIdentification => &config.auto_identification_allowed_roles,
            Self::PhysicalIdentification => &config.physical_identification_allowed_roles,
            Self::AuxiliaryPhysicalIdentification => {
                &config.auxiliary_physical_identification_allowed_roles
            }
        };
        roles.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for RoleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("Unknown role-restricted action: {s}"))
    }
}

/// Whether `user_roles` may perform `action` under `config`.
///
/// An unconfigured action allows every role. Otherwise at least one of the
/// user's roles must be listed.
pub fn check_role_authorization(
    action: RoleAction,
    user_roles: &[String],
    config: &RealmAdminConfiguration,
) -> bool {
    let allowed_roles = action.allowed_roles(config);
    allowed_roles.is_empty() || user_roles.iter().any(|role| allowed_roles.contains(role))
}

pub struct RoleBasedAuthorizationManager {
    admin_configurations: Arc<dyn AdminConfigurationRepo>,
    roles: Arc<dyn RoleClient>,
}

impl RoleBasedAuthorizationManager {
    pub fn new(
        admin_configurations: Arc<dyn AdminConfigurationRepo>,
        roles: Arc<dyn RoleClient>,
    ) -> Self {
        Self {
            admin_configurations,
            roles,
        }
    }

    async fn admin_configuration(&self, realm: &str) -> Result<RealmAdminConfiguration, AuthzError> {
        self.admin_configurations
            .get_admin_configuration(realm)
            .await
            .map_err(suggest_forbidden)
    }

    fn decide(
        ctx: &RequestContext,
        action: RoleAction,
        target_realm: &str,
        user_roles: &[String],
        config: &RealmAdminConfiguration,
    ) -> Result<(), AuthzError> {
        if check_role_authorization(action, user_roles, config) {
            return Ok(());
        }

        tracing::info!(
            action = %action,
            target_realm,
            user_roles = ?user_roles,
            allowed_roles = ?action.allowed_roles(config),
            correlation_id = ctx.correlation_id(),
            "Forbidden: no role permits the operation"
        );
        Err(AuthzError::forbidden())
    }
}

#[async_trait]
impl RoleAuthorizationChecker for RoleBasedAuthorizationManager {
    async fn check_role_authorization_on_target_user(
        &self,
        ctx: &RequestContext,
        action: RoleAction,
        target_realm: &str,
        user_id: &str,
    ) -> Result<(), AuthzError> {
        let access_token = ctx.access_token()?;
        let config = self.admin_configuration(target_realm).await?;
        let user_roles = self
            .roles
            .get_role_names_of_user(access_token, target_realm, user_id)
            .await
            .map_err(suggest_forbidden)?;

        Self::decide(ctx, action, target_realm, &user_roles, &config)
    }

    async fn check_role_authorization_on_self_user(
        &self,
        ctx: &RequestContext,
        action: RoleAction,
    ) -> Result<(), AuthzError> {
        let realm = ctx.realm()?;
        let config = self.admin_configuration(realm).await?;

        Self::decide(ctx, action, realm, ctx.roles(), &config)
    }
}
