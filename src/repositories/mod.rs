//! Storage engines implementing the domain's repository traits.

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryTaskRepository, InMemoryUserRepository};
pub use postgres::{PgTaskRepository, PgUserRepository};
