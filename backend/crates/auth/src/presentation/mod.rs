//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use dto::UserResponse;
pub use handlers::AuthAppState;
pub use middleware::{AuthLayerState, AuthUser, require_auth};
pub use router::{auth_router, auth_router_generic};
