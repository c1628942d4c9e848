mod cache_port;
mod query_channel;
mod query_handler;

pub use cache_port::{CacheStats, ResolutionCachePort};
pub use query_channel::QueryChannel;
pub use query_handler::QueryHandler;
