//! Background jobs.
//!
//! - **Authorization reload**: periodically rebuilds the authorization matrix
//!   so rule edits take effect without a restart.
//!
//! # Example
//!
//! ```toml
//! [authorization.reload]
//! enabled = true
//! interval_secs = 300
//! ```

mod authorization_reload;

pub use authorization_reload::start_authorization_reload_worker;
