// ProcFlow Infrastructure - SQLite Adapter
// Implements: ProcessStore (writes), QueryGateway (reads)

mod connection;
mod migration;
mod queries;
mod rows;
mod store;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use store::SqliteProcessStore;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for
// EngineError here)
