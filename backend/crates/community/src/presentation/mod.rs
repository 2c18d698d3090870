//! Presentation Layer
//!
//! HTTP handlers, DTOs and the router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::CommunityAppState;
pub use router::{community_router, community_router_generic};
