//! Identity extractors

mod header;
mod session;

pub use header::HeaderIdentity;
pub use session::SessionIdentity;
