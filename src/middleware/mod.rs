pub mod bearer_auth;
pub mod timeout;

pub use bearer_auth::{AdminIdentity, BearerAuth, Identity};
pub use timeout::RequestTimeout;
