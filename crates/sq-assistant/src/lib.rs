//! StockQuery assistant library: resolution pipeline, config and session loop.
//!
//! Exposes the pipeline, config and interactive loop so the binary and
//! `sq-e2e-tests` share the same wiring.

pub mod bootstrap;
pub mod breaker;
pub mod config;
pub mod intents;
pub mod messages;
pub mod pipeline;
pub mod repl;

pub use config::{AssistantConfig, ConfigError};
pub use pipeline::{Resolver, ResolverSettings};
