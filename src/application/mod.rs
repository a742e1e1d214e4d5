//! Application layer - Use cases and orchestration

pub mod catalog;
pub mod init;
pub mod insights;
pub mod manage_config;
pub mod records;
pub mod seed;

pub use insights::{AgendaItem, InsightService, Overview};
pub use manage_config::ConfigService;
pub use records::{Deleted, ListOptions, RecordRow, RecordService};
pub use seed::{seed_workspace, SeedReport};
