pub mod postgres;
pub mod resource;

pub use postgres::PgCommunityRepository;
pub use resource::{PgResourceRepository, Resource, Scope, SoftDelete};
