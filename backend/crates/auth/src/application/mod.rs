//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod ledger;
pub mod refresh;
pub mod session;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod token;

// Re-exports
pub use config::AuthConfig;
pub use ledger::RefreshTokenLedger;
pub use refresh::RefreshUseCase;
pub use session::SessionTokens;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use token::{Claims, IssuedToken, TokenIssuer};
