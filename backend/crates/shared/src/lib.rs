//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary every backend crate speaks:
//! - Unified error type and the JSON failure envelope
//! - Typed entity ids
//! - Forward-only cursor pagination
//! - The `{ success, message, data }` success envelope
//!
//! Only things with the same meaning in every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod http;
pub mod id;
pub mod pagination;
pub mod response;
