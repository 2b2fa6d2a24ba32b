//! Service infrastructure for the channel server.
//!
//! This crate wires the affiliation pipeline from `common` into a running process:
//! - Configuration (TOML with defaults and validation)
//! - State management (ServiceState owning the configured processor)
//! - Request worker (flume request queue processed one task per request)
//! - Store seeding from a JSON fixture
//! - Process utilities (tracing, panic logging, graceful shutdown)

pub mod config;
pub mod process;
pub mod seed;
pub mod state;
pub mod worker;

// Re-export key types for convenience
pub use config::{Config, ConfigError};
pub use seed::SeedError;
pub use state::{State as ServiceState, StateSetupError};
pub use worker::{run_worker, RequestQueue, RequestReceiver};
