//! # dryplug-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `EngineStateStore` port defined in `dryplug-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between [`EngineState`](dryplug_domain::engine_state::EngineState) and database rows
//!
//! ## Dependency rule
//! Depends on `dryplug-app` (for port traits) and `dryplug-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod engine_state_store;
pub mod error;
pub mod pool;

pub use engine_state_store::SqliteEngineStateStore;
pub use pool::{Config, Database};
