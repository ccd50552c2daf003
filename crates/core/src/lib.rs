// ProcFlow Core - Domain Model, Query API & Ports
// NO infrastructure dependencies (hexagonal architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;
pub mod query;

pub use error::{EngineError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
