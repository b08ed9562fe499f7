//! # studyhub-database
//!
//! Embedded SQLite connection management, schema upgrade, the four
//! record repositories, and the cascade delete engine.

pub mod cascade;
pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use cascade::{CascadeDeleter, CascadeReport, CascadeTarget};
pub use connection::DatabasePool;
pub use migration::UpgradeReport;
pub use store::StudyStore;
