//! The three delegation-chain participants behind the shared handler
//! contract: root, TLD, and authoritative. Each owns a load-time-fixed
//! lookup table and answers one query at a time with no mutation beyond an
//! observability counter.

mod authoritative;
mod records;
mod root;
mod tld;

pub use authoritative::AuthoritativeZone;
pub use records::{load_records, parse_records};
pub use root::RootZone;
pub use tld::TldZone;
