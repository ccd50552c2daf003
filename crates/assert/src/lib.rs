// ProcFlow Assert - Fluent Assertions over Engine State
// Test-side crate: wraps entity snapshots fetched through the query API in
// assert objects with chainable, Result-returning checks. Depends on core
// only; any QueryGateway implementation can sit underneath.

pub mod entry;
pub mod error;
pub mod job;
pub mod poll;
pub mod process_instance;
pub mod task;

mod describe;

pub use entry::ProcessAssertions;
pub use error::AssertionError;
pub use job::JobAssert;
pub use poll::{eventually, PollConfig};
pub use process_instance::ProcessInstanceAssert;
pub use task::TaskAssert;
