//! Group-based authorization over the authorization matrix.
//!
//! # Reload
//!
//! The manager owns a single [`ArcSwap`] cell holding the current matrix.
//! Checks load the cell once and evaluate against that snapshot; a reload
//! builds a complete new matrix and stores it in one pointer swap. Readers
//! never wait on a reload and never observe a partially built matrix. A
//! failed reload leaves the previous matrix in place.
//!
//! Reloads are serialized: fetch, build and swap run under one lock, so a
//! reload that read older rows can never store its matrix over a newer one.
//!
//! # Precedence
//!
//! For target-group checks the wildcard realm (`*`) is tried first, then the
//! non-primary realm (`/`, skipped when the target is the primary realm),
//! then the exact target realm. Within a realm entry the wildcard group is
//! tried before the exact group. Any match allows; there is no explicit deny.

use std::{collections::HashMap, sync::Arc};

use arc_swap::ArcSwap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{
    AuthorizationChecker, AuthzError, suggest_forbidden,
    matrix::{ActionGrants, AuthorizationsMatrix, GroupRights, MASTER_REALM, MatrixKey},
};
use crate::{
    auth::RequestContext,
    db::{AuthorizationRepo, DbError},
    idp::IdentityClient,
};

/// Rights of the current actor, keyed by the actor's group names.
pub type Rights = HashMap<String, GroupRights>;

#[derive(Debug)]
struct LoadedMatrix {
    matrix: AuthorizationsMatrix,
    loaded_at: DateTime<Utc>,
}

pub struct AuthorizationManager {
    repo: Arc<dyn AuthorizationRepo>,
    identity: Arc<dyn IdentityClient>,
    primary_realm: String,
    current: ArcSwap<LoadedMatrix>,
    reload_lock: Mutex<()>,
}

impl AuthorizationManager {
    /// Create a manager and load the initial matrix.
    ///
    /// Fails with the repository's error if the initial load fails.
    pub async fn new(
        repo: Arc<dyn AuthorizationRepo>,
        identity: Arc<dyn IdentityClient>,
    ) -> Result<Self, DbError> {
        Self::with_primary_realm(repo, identity, MASTER_REALM).await
    }

    /// Like [`AuthorizationManager::new`] with a primary realm other than `master`.
    pub async fn with_primary_realm(
        repo: Arc<dyn AuthorizationRepo>,
        identity: Arc<dyn IdentityClient>,
        primary_realm: impl Into<String>,
    ) -> Result<Self, DbError> {
        let manager = Self {
            repo,
            identity,
            primary_realm: primary_realm.into(),
            current: ArcSwap::from_pointee(LoadedMatrix {
                matrix: AuthorizationsMatrix::default(),
                loaded_at: Utc::now(),
            }),
            reload_lock: Mutex::new(()),
        };
        manager.reload_authorizations().await?;
        Ok(manager)
    }

    /// Fetch the full rule set and swap in a freshly built matrix.
    pub async fn reload_authorizations(&self) -> Result<(), DbError> {
        let _reload = self.reload_lock.lock().await;
        tracing::info!("Authorizations reload triggered");

        let rules = match self.repo.get_authorizations().await {
            Ok(rules) => rules,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to reload authorizations, keeping previous matrix");
                return Err(e);
            }
        };

        let matrix = AuthorizationsMatrix::load(&rules);
        let realm_count = matrix.realm_count();
        let rule_count = matrix.rule_count();
        self.current.store(Arc::new(LoadedMatrix {
            matrix,
            loaded_at: Utc::now(),
        }));

        tracing::info!(realm_count, rule_count, "Authorizations reloaded");
        Ok(())
    }

    /// When the current matrix was loaded.
    pub fn last_reload(&self) -> DateTime<Utc> {
        self.current.load().loaded_at
    }

    /// Number of rules in the current matrix.
    pub fn rule_count(&self) -> usize {
        self.current.load().matrix.rule_count()
    }

    pub fn primary_realm(&self) -> &str {
        &self.primary_realm
    }

    /// Allow if any of `groups` in `realm` may perform `action` on `target_realm`.
    pub fn check_authorization_for_groups_on_target_realm(
        &self,
        realm: &str,
        groups: &[String],
        action: &str,
        target_realm: &str,
    ) -> Result<(), AuthzError> {
        let current = self.current.load();
        let target = MatrixKey::parse(target_realm);
        let non_primary = target_realm != self.primary_realm;

        let allowed = groups.iter().any(|group| {
            current
                .matrix
                .grants(realm, group, action)
                .is_some_and(|grants| {
                    grants.contains_key(&MatrixKey::Wildcard)
                        || grants.contains_key(&target)
                        || (non_primary && grants.contains_key(&MatrixKey::NonPrimary))
                })
        });

        if allowed {
            Ok(())
        } else {
            Err(AuthzError::forbidden())
        }
    }

    /// Allow if any of `groups` in `realm` may perform `action` on
    /// `target_group` of `target_realm`.
    pub fn check_authorization_for_groups_on_target_group(
        &self,
        realm: &str,
        groups: &[String],
        action: &str,
        target_realm: &str,
        target_group: &str,
    ) -> Result<(), AuthzError> {
        let current = self.current.load();

        if self.groups_grant_target_group(
            &current.matrix,
            realm,
            groups,
            action,
            target_realm,
            target_group,
        ) {
            Ok(())
        } else {
            Err(AuthzError::forbidden())
        }
    }

    fn groups_grant_target_group(
        &self,
        matrix: &AuthorizationsMatrix,
        realm: &str,
        groups: &[String],
        action: &str,
        target_realm: &str,
        target_group: &str,
    ) -> bool {
        groups.iter().any(|group| {
            matrix
                .grants(realm, group, action)
                .is_some_and(|grants| self.grants_target_group(grants, target_realm, target_group))
        })
    }

    fn grants_target_group(
        &self,
        grants: &ActionGrants,
        target_realm: &str,
        target_group: &str,
    ) -> bool {
        let group = MatrixKey::parse(target_group);
        let realm_grants_group = |realm: &MatrixKey| {
            grants.get(realm).is_some_and(|groups| {
                groups.contains(&MatrixKey::Wildcard) || groups.contains(&group)
            })
        };

        realm_grants_group(&MatrixKey::Wildcard)
            || (target_realm != self.primary_realm && realm_grants_group(&MatrixKey::NonPrimary))
            || realm_grants_group(&MatrixKey::parse(target_realm))
    }

    /// Allow if the actor may act on at least one of `target_groups`.
    /// An empty list denies.
    fn check_any_target_group(
        &self,
        ctx: &RequestContext,
        action: &str,
        target_realm: &str,
        target_groups: &[String],
    ) -> Result<(), AuthzError> {
        let realm = ctx.realm()?;
        let groups = ctx.groups()?;
        // One snapshot for every target group
        let current = self.current.load();

        let allowed = target_groups.iter().any(|target_group| {
            self.groups_grant_target_group(
                &current.matrix,
                realm,
                groups,
                action,
                target_realm,
                target_group,
            )
        });

        if allowed {
            return Ok(());
        }

        tracing::info!(
            action,
            target_realm,
            target_groups = ?target_groups,
            current_realm = realm,
            current_groups = ?groups,
            correlation_id = ctx.correlation_id(),
            "Forbidden: no target group permits the operation"
        );
        Err(AuthzError::forbidden())
    }

    /// Rights of the actor's groups in the actor's realm.
    ///
    /// Unlike a plain `group → matrix[realm][group]` projection, this does
    /// not keep one key per context group: groups with no matrix entry are
    /// omitted rather than mapped to empty rights. Missing realm or groups in
    /// the context yield an empty map.
    pub fn get_rights_of_current_user(&self, ctx: &RequestContext) -> Rights {
        let (Ok(realm), Ok(groups)) = (ctx.realm(), ctx.groups()) else {
            return Rights::new();
        };

        let current = self.current.load();
        groups
            .iter()
            .filter_map(|group| {
                current
                    .matrix
                    .group_rights(realm, group)
                    .map(|rights| (group.clone(), rights.clone()))
            })
            .collect()
    }
}

#[async_trait]
impl AuthorizationChecker for AuthorizationManager {
    async fn check_authorization_on_target_realm(
        &self,
        ctx: &RequestContext,
        action: &str,
        target_realm: &str,
    ) -> Result<(), AuthzError> {
        let realm = ctx.realm()?;
        let groups = ctx.groups()?;

        self.check_authorization_for_groups_on_target_realm(realm, groups, action, target_realm)
            .inspect_err(|_| {
                tracing::info!(
                    action,
                    target_realm,
                    current_realm = realm,
                    current_groups = ?groups,
                    correlation_id = ctx.correlation_id(),
                    "Forbidden: operation not permitted on target realm"
                );
            })
    }

    async fn check_authorization_on_target_group(
        &self,
        ctx: &RequestContext,
        action: &str,
        target_realm: &str,
        target_group: &str,
    ) -> Result<(), AuthzError> {
        let realm = ctx.realm()?;
        let groups = ctx.groups()?;

        self.check_authorization_for_groups_on_target_group(
            realm,
            groups,
            action,
            target_realm,
            target_group,
        )
        .inspect_err(|_| {
            tracing::info!(
                action,
                target_realm,
                target_group,
                current_realm = realm,
                current_groups = ?groups,
                correlation_id = ctx.correlation_id(),
                "Forbidden: operation not permitted on target group"
            );
        })
    }

    async fn check_authorization_on_target_group_id(
        &self,
        ctx: &RequestContext,
        action: &str,
        target_realm: &str,
        target_group_id: &str,
    ) -> Result<(), AuthzError> {
        let access_token = ctx.access_token()?;
        let group_name = self
            .identity
            .get_group_name(access_token, target_realm, target_group_id)
            .await
            .map_err(suggest_forbidden)?;

        if group_name.is_empty() {
            tracing::info!(
                action,
                target_realm,
                target_group_id,
                correlation_id = ctx.correlation_id(),
                "Forbidden: target group not found"
            );
            return Err(AuthzError::forbidden());
        }

        self.check_authorization_on_target_group(ctx, action, target_realm, &group_name)
            .await
    }

    async fn check_authorization_on_target_user(
        &self,
        ctx: &RequestContext,
        action: &str,
        target_realm: &str,
        user_id: &str,
    ) -> Result<(), AuthzError> {
        let access_token = ctx.access_token()?;
        let target_groups = self
            .identity
            .get_group_names_of_user(access_token, target_realm, user_id)
            .await
            .map_err(suggest_forbidden)?;

        self.check_any_target_group(ctx, action, target_realm, &target_groups)
    }

    async fn check_authorization_on_self_user(
        &self,
        ctx: &RequestContext,
        action: &str,
    ) -> Result<(), AuthzError> {
        let realm = ctx.realm()?;
        let groups = ctx.groups()?;

        self.check_any_target_group(ctx, action, realm, groups)
    }
}
