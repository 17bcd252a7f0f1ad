//! Entities, sentinel errors and the capability traits of the task manager.

pub mod error;
pub mod ports;
pub mod task;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use ports::{
    PasswordError, PasswordService, TaskRepository, TokenError, TokenService, UserRepository,
};
pub use task::{NewTask, Task, TaskChanges, TaskStatus};
pub use user::{Claims, Role, User};
