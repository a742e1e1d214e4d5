//! lifeos - Personal life dashboard in the terminal
//!
//! Keeps tasks, health, finance, family, relationships, reading, signals
//! and more as typed record stores persisted to JSON snapshots, with
//! derived views such as the upcoming agenda and stale contacts.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::LifeosError;
