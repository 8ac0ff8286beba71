//! Request-scoped identity produced by the authentication layer.

mod context;

pub use context::{ContextError, RequestContext};
