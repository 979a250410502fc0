//! Medgate caller resolution
//!
//! Turns an incoming request into a validated [`Caller`]:
//! - an [`IdentityExtractor`] finds the authenticated subject (trusted
//!   header or session)
//! - a [`UserDirectory`] supplies the subject's current role claim
//! - the claim is validated against the role table
//!
//! Failures map onto [`GuardError`], which the HTTP layer renders.

mod context;
mod directory;
mod error;
mod providers;
mod resolver;
mod traits;

pub use context::{Caller, Identity, UserRecord};
pub use directory::MemoryUserDirectory;
pub use error::GuardError;
pub use providers::{HeaderIdentity, SessionIdentity};
pub use resolver::{ResolutionPolicy, RoleResolver};
pub use traits::{IdentityExtractor, UserDirectory};

#[cfg(test)]
pub(crate) use resolver::tests::UnavailableDirectory;
