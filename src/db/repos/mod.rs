mod admin_configurations;
mod authorizations;

pub use admin_configurations::*;
pub use authorizations::*;
