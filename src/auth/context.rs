use thiserror::Error;
use uuid::Uuid;

/// A request-scoped value the authentication layer did not populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Missing request context value: {0}")]
pub struct ContextError(pub &'static str);

/// Identity of the actor performing the current request.
///
/// Populated once by the authentication middleware and read-only afterwards.
/// Accessors for the values every context-driven check needs return
/// [`ContextError`] when the value is absent.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    access_token: Option<String>,
    realm: Option<String>,
    user_id: Option<String>,
    username: Option<String>,
    groups: Option<Vec<String>>,
    roles: Option<Vec<String>>,
    correlation_id: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Assign a fresh correlation ID unless one was propagated by the caller.
    pub fn ensure_correlation_id(mut self) -> Self {
        if self.correlation_id.is_none() {
            self.correlation_id = Some(Uuid::new_v4().to_string());
        }
        self
    }

    pub fn access_token(&self) -> Result<&str, ContextError> {
        self.access_token
            .as_deref()
            .ok_or(ContextError("access_token"))
    }

    pub fn realm(&self) -> Result<&str, ContextError> {
        self.realm.as_deref().ok_or(ContextError("realm"))
    }

    pub fn groups(&self) -> Result<&[String], ContextError> {
        self.groups.as_deref().ok_or(ContextError("groups"))
    }

    /// Roles are optional; an absent list reads as empty.
    pub fn roles(&self) -> &[String] {
        self.roles.as_deref().unwrap_or_default()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}
