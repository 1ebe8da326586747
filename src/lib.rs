//! # Process Singleton
//!
//! A thread-safe registry guaranteeing at most one live instance of each logical type
//! per OS process, built exactly once no matter how many threads ask for it at the same time.
//!
//! Instances are keyed by `(process id, TypeId)`. The process id is re-read on every
//! lookup, so a forked child never sees its parent's instances.
//!
//! ## Quick Start
//!
//! ```rust
//! use process_singleton::get_or_create;
//! use std::sync::Arc;
//!
//! struct Config {
//!     verbose: bool,
//! }
//!
//! let config: Arc<Config> = get_or_create(|| Config { verbose: true }).unwrap();
//! assert!(config.verbose);
//! ```
//!
//! ## Features
//!
//! - **Exactly-once construction**: racing callers block on the winner and share its result
//! - **First writer wins**: arguments passed on a hit are ignored, not rejected
//! - **Failure propagation**: a failed construction reaches every waiting caller and leaves
//!   the key free for a retry
//! - **Re-entrancy detection**: a constructor asking for its own type gets an error, not a deadlock
//! - **Tracing support**: `tracing` logs plus an optional callback for registry events
//!
//! ## Main Functions
//!
//! - [`get_or_create`] - Get the process-wide instance, constructing it on first use
//! - [`get_or_try_create`] - Same, with a fallible constructor
//! - [`get`] - Retrieve an existing instance without constructing
//! - [`contains`] - Check if an instance exists
//! - [`reset`] / [`reset_type`] - Clear entries, usually between tests
//! - [`set_trace_callback`] - Set up tracing for registry operations
//!
//! Use [`Singleton`] to declare a type singleton-scoped, [`Registry`] for a local
//! registry, and [`define_registry!`] for a named static one.

mod config;
mod construction;
mod global;
mod macros;
mod registry;
mod registry_error;
mod registry_event;
mod registry_key;
mod registry_trait;
mod singleton;

pub use config::RegistryConfig;
pub use global::{
    clear_trace_callback, contains, get, get_or_create, get_or_try_create, global, reset,
    reset_type, set_trace_callback, Global,
};
pub use registry::{Registry, ResetScope, TraceCallback};
pub use registry_error::{RegistryError, SharedError};
pub use registry_event::RegistryEvent;
pub use registry_key::{ExecutionContextId, RegistryKey};
pub use registry_trait::RegistryApi;
pub use singleton::Singleton;
