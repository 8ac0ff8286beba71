//! Sparse authorization matrix.
//!
//! The matrix is keyed `user realm → user group → action → target realm` and
//! holds the set of target groups granted at the leaf. Target realm and target
//! group keys are [`MatrixKey`]s so the two reserved tokens cannot be confused
//! with plain names once loaded.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use serde::{Serialize, Serializer};

use crate::models::AuthorizationRule;

/// Reserved token matching any target realm or target group.
pub const WILDCARD: &str = "*";
/// Reserved token matching any target realm except the primary one.
pub const NON_PRIMARY: &str = "/";
/// Name of the primary realm.
pub const MASTER_REALM: &str = "master";

/// Key at the target realm and target group levels of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatrixKey {
    /// `*`
    Wildcard,
    /// `/`
    NonPrimary,
    Exact(String),
}

impl MatrixKey {
    /// Interpret a raw storage value. The reserved tokens map to their
    /// variants, anything else is an exact name.
    pub fn parse(raw: &str) -> Self {
        match raw {
            WILDCARD => Self::Wildcard,
            NON_PRIMARY => Self::NonPrimary,
            name => Self::Exact(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Wildcard => WILDCARD,
            Self::NonPrimary => NON_PRIMARY,
            Self::Exact(name) => name,
        }
    }
}

impl fmt::Display for MatrixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MatrixKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Target groups granted for one target realm.
pub type TargetGroups = HashSet<MatrixKey>;
/// Target realm → target groups, for one action.
pub type ActionGrants = HashMap<MatrixKey, TargetGroups>;
/// Action → grants, for one user group.
pub type GroupRights = HashMap<String, ActionGrants>;

/// Immutable authorization matrix built from a full rule set.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationsMatrix {
    realms: HashMap<String, HashMap<String, GroupRights>>,
    rule_count: usize,
}

impl AuthorizationsMatrix {
    /// Build a matrix from storage rows.
    ///
    /// Realm, group and action levels are created on first sight even when
    /// the row carries no target, so such rows grant nothing but still show
    /// up in rights listings. A row with a target realm but no target group
    /// only materializes the realm level.
    pub fn load(rules: &[AuthorizationRule]) -> Self {
        let mut realms: HashMap<String, HashMap<String, GroupRights>> = HashMap::new();

        for rule in rules {
            let grants = realms
                .entry(rule.user_realm.clone())
                .or_default()
                .entry(rule.user_group.clone())
                .or_default()
                .entry(rule.action.clone())
                .or_default();

            let Some(target_realm) = rule.target_realm.as_deref() else {
                continue;
            };
            let groups = grants.entry(MatrixKey::parse(target_realm)).or_default();

            let Some(target_group) = rule.target_group.as_deref() else {
                continue;
            };
            groups.insert(MatrixKey::parse(target_group));
        }

        Self {
            realms,
            rule_count: rules.len(),
        }
    }

    /// Grants of `action` for members of `group` in `realm`.
    pub fn grants(&self, realm: &str, group: &str, action: &str) -> Option<&ActionGrants> {
        self.group_rights(realm, group)?.get(action)
    }

    /// Every action granted to members of `group` in `realm`.
    pub fn group_rights(&self, realm: &str, group: &str) -> Option<&GroupRights> {
        self.realms.get(realm)?.get(group)
    }

    pub fn realm_count(&self) -> usize {
        self.realms.len()
    }

    /// Number of rows the matrix was built from.
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    pub fn is_empty(&self) -> bool {
        self.realms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reserved_tokens() {
        assert_eq!(MatrixKey::parse("*"), MatrixKey::Wildcard);
        assert_eq!(MatrixKey::parse("/"), MatrixKey::NonPrimary);
        assert_eq!(MatrixKey::parse("master"), MatrixKey::Exact("master".into()));
        // Case sensitive, no trimming
        assert_eq!(MatrixKey::parse(" * "), MatrixKey::Exact(" * ".into()));
        assert_eq!(MatrixKey::NonPrimary.to_string(), "/");
    }

    #[test]
    fn test_load_full_rule() {
        let matrix = AuthorizationsMatrix::load(&[AuthorizationRule::new(
            "master", "toe", "GetUsers",
        )
        .with_target_realm("master")
        .with_target_group("*")]);

        let grants = matrix.grants("master", "toe", "GetUsers").unwrap();
        let groups = grants.get(&MatrixKey::parse("master")).unwrap();
        assert!(groups.contains(&MatrixKey::Wildcard));
        assert_eq!(matrix.rule_count(), 1);
        assert_eq!(matrix.realm_count(), 1);
    }

    #[test]
    fn test_rule_without_target_realm_grants_nothing() {
        let matrix = AuthorizationsMatrix::load(&[AuthorizationRule::new(
            "master", "toe", "GetRealm",
        )]);

        let grants = matrix.grants("master", "toe", "GetRealm").unwrap();
        assert!(grants.is_empty());
    }

    #[test]
    fn test_rule_without_target_group_keeps_realm_level_only() {
        let matrix = AuthorizationsMatrix::load(&[
            AuthorizationRule::new("master", "toe", "GetRealm").with_target_realm("/")
        ]);

        let grants = matrix.grants("master", "toe", "GetRealm").unwrap();
        assert!(grants.get(&MatrixKey::NonPrimary).unwrap().is_empty());
    }

    #[test]
    fn test_target_groups_accumulate_as_set() {
        let rule = |group: &str| {
            AuthorizationRule::new("master", "toe", "GetUser")
                .with_target_realm("dep")
                .with_target_group(group)
        };
        let matrix = AuthorizationsMatrix::load(&[rule("a"), rule("b"), rule("a")]);

        let groups = matrix
            .grants("master", "toe", "GetUser")
            .and_then(|g| g.get(&MatrixKey::parse("dep")))
            .unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups.contains(&MatrixKey::parse("a")));
        assert!(groups.contains(&MatrixKey::parse("b")));
    }

    #[test]
    fn test_missing_keys_are_absent() {
        let matrix = AuthorizationsMatrix::load(&[]);
        assert!(matrix.is_empty());
        assert!(matrix.grants("master", "toe", "GetRealm").is_none());
        assert!(matrix.group_rights("master", "toe").is_none());
    }

    #[test]
    fn test_keys_serialize_as_raw_tokens() {
        let value = serde_json::to_value([
            MatrixKey::Wildcard,
            MatrixKey::NonPrimary,
            MatrixKey::Exact("dep".into()),
        ])
        .unwrap();
        assert_eq!(value, serde_json::json!(["*", "/", "dep"]));
    }
}
