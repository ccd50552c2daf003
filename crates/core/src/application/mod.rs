// Application Layer - Engine-side use cases

pub mod runtime;

// Re-exports
pub use runtime::{CreateJobRequest, CreateTaskRequest, RuntimeService, StartInstanceRequest};
