#![doc = "The `task_manager` library crate."]
#![doc = ""]
#![doc = "Layers, innermost first: `domain` (entities, rules and the storage/security"]
#![doc = "ports), `usecases` (business operations), `repositories` and `auth`"]
#![doc = "(implementations of the ports), and `routes` (the HTTP surface). The binary"]
#![doc = "in `main.rs` reads `config`, wires the layers together and serves them."]

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod usecases;

pub use error::AppError;
pub use routes::AppState;
