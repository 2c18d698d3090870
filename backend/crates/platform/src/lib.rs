//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id) off the async runtime
//! - Digests and random secrets
//! - Cookie management
//! - Read-through cache over Redis or process memory

pub mod cache;
pub mod cookie;
pub mod crypto;
pub mod password;
