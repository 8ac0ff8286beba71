//! Decision scenarios run through the public check API with the in-memory
//! repositories used by configuration-driven deployments.

use std::sync::Arc;

use crate::{
    auth::RequestContext,
    authz::{
        AuthorizationChecker, AuthorizationManager, AuthzError, ForbiddenError, MatrixKey,
        RoleAction, RoleAuthorizationChecker, RoleBasedAuthorizationManager,
    },
    config::AuthzServiceConfig,
    db::{MemoryAdminConfigurationRepo, MemoryAuthorizationRepo},
    models::{AuthorizationRule, RealmAdminConfiguration},
    tests::fakes::{FakeIdentityClient, FakeRoleClient},
};

fn master_toe() -> RequestContext {
    RequestContext::new()
        .with_access_token("TOKEN")
        .with_realm("master")
        .with_groups(["toe"])
}

async fn manager(
    rules: Vec<AuthorizationRule>,
    identity: FakeIdentityClient,
) -> (Arc<MemoryAuthorizationRepo>, AuthorizationManager) {
    let repo = Arc::new(MemoryAuthorizationRepo::new(rules));
    let manager = AuthorizationManager::new(repo.clone(), Arc::new(identity))
        .await
        .unwrap();
    (repo, manager)
}

#[tokio::test]
async fn test_wildcard_target_realm_allows_master() {
    let (_, manager) = manager(
        vec![AuthorizationRule::new("master", "toe", "GetRealm").with_target_realm("*")],
        FakeIdentityClient::default(),
    )
    .await;

    assert!(
        manager
            .check_authorization_on_target_realm(&master_toe(), "GetRealm", "master")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_non_primary_target_realm_excludes_master() {
    let (_, manager) = manager(
        vec![AuthorizationRule::new("master", "toe", "GetRealm").with_target_realm("/")],
        FakeIdentityClient::default(),
    )
    .await;

    let err = manager
        .check_authorization_on_target_realm(&master_toe(), "GetRealm", "master")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthzError::Forbidden(ForbiddenError)));
    assert!(
        manager
            .check_authorization_on_target_realm(&master_toe(), "GetRealm", "toto")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_any_group_of_target_user_in_master() {
    let (_, manager) = manager(
        vec![
            AuthorizationRule::new("master", "toe", "DeleteUser")
                .with_target_realm("master")
                .with_target_group("*"),
        ],
        FakeIdentityClient::default().with_user_groups("u-1", &["customer"]),
    )
    .await;

    assert!(
        manager
            .check_authorization_on_target_user(&master_toe(), "DeleteUser", "master", "u-1")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_unmatched_action_is_forbidden_everywhere() {
    let (_, manager) = manager(
        vec![
            AuthorizationRule::new("master", "toe", "DeleteUser")
                .with_target_realm("*")
                .with_target_group("*"),
        ],
        FakeIdentityClient::default()
            .with_user_groups("u-1", &["customer"])
            .with_group_name("gid", "customer"),
    )
    .await;
    let ctx = master_toe();

    let results = [
        manager
            .check_authorization_on_target_realm(&ctx, "CreateUser", "master")
            .await,
        manager
            .check_authorization_on_target_group(&ctx, "CreateUser", "master", "customer")
            .await,
        manager
            .check_authorization_on_target_group_id(&ctx, "CreateUser", "master", "gid")
            .await,
        manager
            .check_authorization_on_target_user(&ctx, "CreateUser", "master", "u-1")
            .await,
        manager
            .check_authorization_on_self_user(&ctx, "CreateUser")
            .await,
    ];
    for result in results {
        assert!(matches!(result, Err(AuthzError::Forbidden(ForbiddenError))));
    }
}

#[tokio::test]
async fn test_rights_listing() {
    let (_, manager) = manager(
        vec![
            AuthorizationRule::new("master", "toe", "GetUsers")
                .with_target_realm("master")
                .with_target_group("*"),
        ],
        FakeIdentityClient::default(),
    )
    .await;

    let rights = manager.get_rights_of_current_user(&master_toe());
    assert!(rights["toe"]["GetUsers"][&MatrixKey::parse("master")].contains(&MatrixKey::Wildcard));

    let json = serde_json::to_value(&rights).unwrap();
    assert_eq!(json["toe"]["GetUsers"]["master"], serde_json::json!(["*"]));
}

#[tokio::test]
async fn test_successful_reload_drops_old_rules() {
    let (repo, manager) = manager(
        vec![AuthorizationRule::new("master", "toe", "GetRealm").with_target_realm("*")],
        FakeIdentityClient::default(),
    )
    .await;

    repo.replace_rules(vec![
        AuthorizationRule::new("master", "toe", "GetUsers").with_target_realm("*"),
    ])
    .await;
    manager.reload_authorizations().await.unwrap();

    assert!(
        manager
            .check_authorization_on_target_realm(&master_toe(), "GetRealm", "master")
            .await
            .unwrap_err()
            .is_forbidden()
    );
    assert!(
        manager
            .check_authorization_on_target_realm(&master_toe(), "GetUsers", "master")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_role_based_physical_identification() {
    let admin_configurations = Arc::new(MemoryAdminConfigurationRepo::default());
    admin_configurations
        .set_configuration(
            "dep",
            RealmAdminConfiguration {
                physical_identification_allowed_roles: Some(vec![
                    "kyc_officer".into(),
                    "kyc_admin".into(),
                ]),
                ..Default::default()
            },
        )
        .await;
    let manager = RoleBasedAuthorizationManager::new(
        admin_configurations,
        Arc::new(
            FakeRoleClient::default()
                .with_user_roles("officer", &["kyc_officer"])
                .with_user_roles("user", &["standard_user"]),
        ),
    );
    let ctx = master_toe();

    assert!(
        manager
            .check_role_authorization_on_target_user(
                &ctx,
                RoleAction::PhysicalIdentification,
                "dep",
                "officer"
            )
            .await
            .is_ok()
    );
    assert!(
        manager
            .check_role_authorization_on_target_user(
                &ctx,
                RoleAction::PhysicalIdentification,
                "dep",
                "user"
            )
            .await
            .unwrap_err()
            .is_forbidden()
    );
    // Realm without configuration restricts nothing
    assert!(
        manager
            .check_role_authorization_on_target_user(
                &ctx,
                RoleAction::PhysicalIdentification,
                "other",
                "user"
            )
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_engine_from_configuration_file() {
    let config = AuthzServiceConfig::from_str(
        r#"
        [authorization]
        primary_realm = "master"

        [[authorization.rules]]
        user_realm = "master"
        user_group = "toe"
        action = "GetUsers"
        target_realm = "/"
        target_group = "*"

        [authorization.admin_configurations.dep]
        auto_identification_allowed_roles = ["kyc_officer"]
    "#,
    )
    .unwrap();

    let manager = AuthorizationManager::with_primary_realm(
        Arc::new(MemoryAuthorizationRepo::from_config(&config.authorization)),
        Arc::new(FakeIdentityClient::default()),
        config.authorization.primary_realm.clone(),
    )
    .await
    .unwrap();
    let ctx = master_toe().with_roles(["standard_user"]);

    assert!(
        manager
            .check_authorization_on_target_group(&ctx, "GetUsers", "dep", "any")
            .await
            .is_ok()
    );
    assert!(
        manager
            .check_authorization_on_target_group(&ctx, "GetUsers", "master", "any")
            .await
            .is_err()
    );

    let role_manager = RoleBasedAuthorizationManager::new(
        Arc::new(MemoryAdminConfigurationRepo::from_config(
            &config.authorization,
        )),
        Arc::new(FakeRoleClient::default().with_user_roles("u-1", &["kyc_officer"])),
    );
    assert!(
        role_manager
            .check_role_authorization_on_target_user(
                &ctx,
                RoleAction::AutoIdentification,
                "dep",
                "u-1"
            )
            .await
            .is_ok()
    );
    assert!(
        role_manager
            .check_role_authorization_on_self_user(
                &ctx.clone().with_realm("dep"),
                RoleAction::AutoIdentification
            )
            .await
            .is_err()
    );
}
