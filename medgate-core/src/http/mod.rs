//! Server enforcement layer
//!
//! Guards, a guarded router and a hyper serve loop. The permission decision
//! for a request is always taken before its handler runs.

pub mod error;
mod handlers;
mod response;
mod route_guard;
mod router;
mod server;

pub use error::{guard_error, json_error};
pub use response::{json_response, ok_json, query_param, Req, Resp};
pub use route_guard::{GuardChain, GuardResult, PermissionGuard, RouteMatcher};
pub use router::{ApiRouter, Handler, PublicHandler};
pub use server::serve;
