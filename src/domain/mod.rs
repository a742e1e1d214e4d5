//! Domain layer - Records, stores and derived queries

pub mod calendar;
pub mod environment;
pub mod family;
pub mod files;
pub mod finance;
pub mod health;
pub mod intelligence;
pub mod kind;
pub mod knowledge;
pub mod legacy;
pub mod mind_guard;
pub mod network;
pub mod productivity;
pub mod record;
pub mod spirituality;
pub mod store;
pub mod system_logs;
pub mod tags;

pub use kind::StoreKind;
pub use record::{Completable, Record, RecordId, Timestamps};
pub use store::{Persisted, Store};
