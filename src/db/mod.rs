//! Storage collaborators of the authorization engine.
//!
//! The engine only reads: the full authorization rule set for the matrix and
//! per-realm admin configuration for role-based checks. Concrete SQL backends
//! live with the services that own the schema; this module defines the traits
//! they implement plus in-memory implementations backed by configuration.

mod error;
mod memory;
pub mod repos;

pub use error::{DbError, DbResult};
pub use memory::{MemoryAdminConfigurationRepo, MemoryAuthorizationRepo};
pub use repos::*;
