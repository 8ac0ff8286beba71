//! Realm based authorization engine.
//!
//! - [`authz::AuthorizationManager`] answers "may this actor perform this
//!   action on this realm, group or user" from a wildcard authorization
//!   matrix that can be reloaded atomically.
//! - [`authz::RoleBasedAuthorizationManager`] restricts identification
//!   actions to the roles listed in a realm's admin configuration.
//!
//! Storage and the identity provider are reached through the traits in
//! [`db`] and [`idp`]; [`db::MemoryAuthorizationRepo`] and
//! [`db::MemoryAdminConfigurationRepo`] serve rules straight from
//! [`config::AuthzServiceConfig`].

pub mod auth;
pub mod authz;
pub mod config;
pub mod db;
pub mod idp;
pub mod jobs;
pub mod models;
pub mod observability;

#[cfg(test)]
mod tests;
