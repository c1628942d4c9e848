mod bench;
mod client;
mod serve;

pub use bench::run_bench;
pub use client::run_resolve;
pub use serve::{run_auth, run_local, run_root, run_tld};
