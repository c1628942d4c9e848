pub mod config;
pub mod errors;
pub mod hop;
pub mod message;

pub use config::{CliOverrides, Config};
pub use errors::ResolveError;
pub use hop::Hop;
pub use message::{Delegation, DelegationRole, Message, Query, Response, ResponseResult};
