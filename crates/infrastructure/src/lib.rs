pub mod cache;
pub mod server;
pub mod transport;
pub mod zones;
