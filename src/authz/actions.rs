//! Known actions and validation of authorization rules against them.
//!
//! The matrix loader accepts any row. Services that let administrators edit
//! rules validate them here first, so a row can only name a registered action
//! with targets that fit the action's scope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::matrix::WILDCARD;
use crate::models::AuthorizationRule;

/// What an action operates on, which decides the targets a rule must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionScope {
    /// Not tied to a realm. Rules target realm `*` and no group.
    Global,
    /// Operates on a realm. Rules need a target realm and no group.
    Realm,
    /// Operates on groups or users of a realm. Rules need both targets.
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Action {
    pub name: String,
    pub scope: ActionScope,
}

impl Action {
    pub fn new(name: impl Into<String>, scope: ActionScope) -> Self {
        Self {
            name: name.into(),
            scope,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("Rule field '{0}' is empty")]
    EmptyField(&'static str),

    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Global action '{0}' must target realm '*' without a target group")]
    InvalidGlobalTarget(String),

    #[error("Action '{0}' requires a target realm")]
    MissingTargetRealm(String),

    #[error("Realm action '{0}' does not accept a target group")]
    UnexpectedTargetGroup(String),

    #[error("Group action '{0}' requires a target group")]
    MissingTargetGroup(String),

    #[error("Action '{0}' is already registered")]
    DuplicateAction(String),
}

/// Registry of the actions a service authorizes.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: BTreeMap<String, Action>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, action: Action) -> Result<(), RuleViolation> {
        if self.actions.contains_key(&action.name) {
            return Err(RuleViolation::DuplicateAction(action.name));
        }
        self.actions.insert(action.name.clone(), action);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// Registered action names in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

pub fn validate_rule(
    rule: &AuthorizationRule,
    registry: &ActionRegistry,
) -> Result<(), RuleViolation> {
    if rule.user_realm.is_empty() {
        return Err(RuleViolation::EmptyField("user_realm"));
    }
    if rule.user_group.is_empty() {
        return Err(RuleViolation::EmptyField("user_group"));
    }
    let action = registry
        .get(&rule.action)
        .ok_or_else(|| RuleViolation::UnknownAction(rule.action.clone()))?;

    let target_realm = rule.target_realm.as_deref();
    let has_group = rule.target_group.is_some();
    match action.scope {
        ActionScope::Global => {
            if target_realm != Some(WILDCARD) || has_group {
                return Err(RuleViolation::InvalidGlobalTarget(action.name.clone()));
            }
        }
        ActionScope::Realm => {
            if target_realm.is_none() {
                return Err(RuleViolation::MissingTargetRealm(action.name.clone()));
            }
            if has_group {
                return Err(RuleViolation::UnexpectedTargetGroup(action.name.clone()));
            }
        }
        ActionScope::Group => {
            if target_realm.is_none() {
                return Err(RuleViolation::MissingTargetRealm(action.name.clone()));
            }
            if !has_group {
                return Err(RuleViolation::MissingTargetGroup(action.name.clone()));
            }
        }
    }
    Ok(())
}

/// Validate every rule, returning each violation with the row index.
pub fn validate_rules(
    rules: &[AuthorizationRule],
    registry: &ActionRegistry,
) -> Vec<(usize, RuleViolation)> {
    rules
        .iter()
        .enumerate()
        .filter_map(|(index, rule)| validate_rule(rule, registry).err().map(|v| (index, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        registry
            .register(Action::new("GetActions", ActionScope::Global))
            .unwrap();
        registry
            .register(Action::new("GetRealm", ActionScope::Realm))
            .unwrap();
        registry
            .register(Action::new("DeleteUser", ActionScope::Group))
            .unwrap();
        registry
    }

    fn rule(
        action: &str,
        target_realm: Option<&str>,
        target_group: Option<&str>,
    ) -> AuthorizationRule {
        AuthorizationRule {
            user_realm: "master".into(),
            user_group: "toe".into(),
            action: action.into(),
            target_realm: target_realm.map(Into::into),
            target_group: target_group.map(Into::into),
        }
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        let err = registry
            .register(Action::new("GetRealm", ActionScope::Group))
            .unwrap_err();
        assert_eq!(err, RuleViolation::DuplicateAction("GetRealm".into()));
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            ["DeleteUser", "GetActions", "GetRealm"]
        );
    }

    #[rstest]
    #[case(rule("GetActions", Some("*"), None))]
    #[case(rule("GetRealm", Some("dep"), None))]
    #[case(rule("GetRealm", Some("/"), None))]
    #[case(rule("DeleteUser", Some("dep"), Some("grp")))]
    #[case(rule("DeleteUser", Some("*"), Some("*")))]
    fn test_valid_rules(#[case] candidate: AuthorizationRule) {
        assert_eq!(validate_rule(&candidate, &registry()), Ok(()));
    }

    #[rstest]
    #[case(rule("CreateUser", Some("*"), None), RuleViolation::UnknownAction("CreateUser".into()))]
    #[case(rule("GetActions", Some("dep"), None), RuleViolation::InvalidGlobalTarget("GetActions".into()))]
    #[case(rule("GetActions", Some("*"), Some("*")), RuleViolation::InvalidGlobalTarget("GetActions".into()))]
    #[case(rule("GetRealm", None, None), RuleViolation::MissingTargetRealm("GetRealm".into()))]
    #[case(rule("GetRealm", Some("dep"), Some("grp")), RuleViolation::UnexpectedTargetGroup("GetRealm".into()))]
    #[case(rule("DeleteUser", None, None), RuleViolation::MissingTargetRealm("DeleteUser".into()))]
    #[case(rule("DeleteUser", Some("dep"), None), RuleViolation::MissingTargetGroup("DeleteUser".into()))]
    fn test_invalid_rules(#[case] candidate: AuthorizationRule, #[case] expected: RuleViolation) {
        assert_eq!(validate_rule(&candidate, &registry()), Err(expected));
    }

    #[test]
    fn test_empty_identity_fields() {
        let mut empty_realm = rule("GetRealm", Some("dep"), None);
        empty_realm.user_realm.clear();
        assert_eq!(
            validate_rule(&empty_realm, &registry()),
            Err(RuleViolation::EmptyField("user_realm"))
        );

        let mut empty_group = rule("GetRealm", Some("dep"), None);
        empty_group.user_group.clear();
        assert_eq!(
            validate_rule(&empty_group, &registry()),
            Err(RuleViolation::EmptyField("user_group"))
        );
    }

    #[test]
    fn test_validate_rules_reports_indexes() {
        let violations = validate_rules(
            &[
                rule("GetRealm", Some("dep"), None),
                rule("Unknown", Some("dep"), None),
                rule("DeleteUser", Some("dep"), Some("grp")),
                rule("DeleteUser", Some("dep"), None),
            ],
            &registry(),
        );

        assert_eq!(
            violations,
            vec![
                (1, RuleViolation::UnknownAction("Unknown".into())),
                (3, RuleViolation::MissingTargetGroup("DeleteUser".into())),
            ]
        );
    }
}
