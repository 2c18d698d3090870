//! Value Object Module

pub mod email;
pub mod profile;
pub mod user_password;
pub mod username;

pub use email::Email;
pub use kernel::id::UserId;
pub use profile::{AcademicYear, Bio, PersonName};
pub use user_password::{RawPassword, UserPassword};
pub use username::Username;
