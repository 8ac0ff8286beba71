//! Authorization decision engine.
//!
//! Two independent engines share the request context and error policy:
//!
//! - [`AuthorizationManager`] decides from the authorization matrix built
//!   from `(user realm, user group, action, target realm, target group)`
//!   rules, with `*` meaning any and `/` meaning any realm but the primary one.
//! - [`RoleBasedAuthorizationManager`] decides identification actions from the
//!   target realm's admin configuration and the actor's roles.
//!
//! Checks return `Ok(())` to allow and [`AuthzError::Forbidden`] to deny.
//! Collaborator failures are passed through [`suggest_forbidden`].

mod actions;
mod error;
mod manager;
mod matrix;
mod role_based;

use async_trait::async_trait;

use crate::auth::RequestContext;

pub use actions::{
    Action, ActionRegistry, ActionScope, RuleViolation, validate_rule, validate_rules,
};
pub use error::{AuthzError, ForbiddenError, HasStatusCode, suggest_forbidden};
pub use manager::{AuthorizationManager, Rights};
pub use matrix::{
    ActionGrants, AuthorizationsMatrix, GroupRights, MASTER_REALM, MatrixKey, NON_PRIMARY,
    TargetGroups, WILDCARD,
};
pub use role_based::{RoleAction, RoleBasedAuthorizationManager, check_role_authorization};

/// Matrix-based checks driven by the request context.
#[async_trait]
pub trait AuthorizationChecker: Send + Sync {
    async fn check_authorization_on_target_realm(
        &self,
        ctx: &RequestContext,
        action: &str,
        target_realm: &str,
    ) -> Result<(), AuthzError>;

    async fn check_authorization_on_target_group(
        &self,
        ctx: &RequestContext,
        action: &str,
        target_realm: &str,
        target_group: &str,
    ) -> Result<(), AuthzError>;

    /// Resolve the group name from its ID, then check as
    /// [`AuthorizationChecker::check_authorization_on_target_group`].
    async fn check_authorization_on_target_group_id(
        &self,
        ctx: &RequestContext,
        action: &str,
        target_realm: &str,
        target_group_id: &str,
    ) -> Result<(), AuthzError>;

    /// Allowed when the actor may act on any group the target user belongs to.
    async fn check_authorization_on_target_user(
        &self,
        ctx: &RequestContext,
        action: &str,
        target_realm: &str,
        user_id: &str,
    ) -> Result<(), AuthzError>;

    async fn check_authorization_on_self_user(
        &self,
        ctx: &RequestContext,
        action: &str,
    ) -> Result<(), AuthzError>;
}

/// Role-based checks driven by the request context.
#[async_trait]
pub trait RoleAuthorizationChecker: Send + Sync {
    async fn check_role_authorization_on_target_user(
        &self,
        ctx: &RequestContext,
        action: RoleAction,
        target_realm: &str,
        user_id: &str,
    ) -> Result<(), AuthzError>;

    async fn check_role_authorization_on_self_user(
        &self,
        ctx: &RequestContext,
        action: RoleAction,
    ) -> Result<(), AuthzError>;
}
