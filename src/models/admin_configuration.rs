use serde::{Deserialize, Serialize};

/// Per-realm admin settings consulted by role-based authorization.
///
/// Each `*_allowed_roles` list restricts one identification family to the
/// listed roles. An absent or empty list leaves the family unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RealmAdminConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_identification_allowed_roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_video_identification_allowed_roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_identification_allowed_roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_identification_allowed_roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_physical_identification_allowed_roles: Option<Vec<String>>,
}
