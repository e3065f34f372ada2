//! Configuration loading and management for the seat allocation engine.
//!
//! This module provides functionality to load the scoring policy, global
//! WFH limits and runtime settings from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use seat_allocator::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Retry attempts: {}", config.runtime().retry.max_attempts);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DistancePolicy, EngineConfig, RetryPolicy, RuntimeConfig, SchedulerConfig, ScoringPolicy,
    ServerConfig, ThrottlePolicy, WfhLimitsConfig, WfhPolicy,
};
