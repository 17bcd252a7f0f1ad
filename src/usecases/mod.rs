//! Orchestration of the business operations. Use cases hold no state of their
//! own beyond handles to the injected repositories and services.

pub mod task;
pub mod user;

pub use task::TaskUseCase;
pub use user::UserUseCase;
