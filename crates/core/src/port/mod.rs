// Port Layer - Interfaces for external dependencies

pub mod id_provider;
pub mod process_store;
pub mod query_gateway;
pub mod time_provider;

// Re-exports
pub use id_provider::{IdProvider, SequenceIdProvider, UuidProvider};
pub use process_store::ProcessStore;
pub use query_gateway::QueryGateway;
pub use time_provider::{FixedTimeProvider, SystemTimeProvider, TimeProvider};
