mod admin_configuration;
mod authorization;

pub use admin_configuration::*;
pub use authorization::*;
