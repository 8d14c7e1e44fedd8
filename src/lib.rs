//! # tokio-emitter
//!
//! A synchronous event emitter with MQTT-style topic patterns and
//! tokio-scheduled async listeners.
//!
//! ## Features
//!
//! - **Exact and pattern listeners**: `+` matches one level, `#` the rest
//! - **Synchronous dispatch** in registration order, patterns first
//! - **Async listeners** scheduled on tokio, failures re-emitted as `error`
//! - **Thread-safe** by default; the emitter is a cheap clonable handle
//!
//! ## Quick Example
//!
//! ```rust
//! use tokio_emitter::{Arg, EventEmitter, Listener};
//!
//! fn main() -> tokio_emitter::Result<()> {
//!     let emitter = EventEmitter::new();
//!
//!     // Exact listener
//!     let on_data = emitter.on("data", Listener::from_fn(|args| {
//!         println!("data: {}", args[0]);
//!     }))?;
//!
//!     // Pattern listener; the emitted name comes first
//!     emitter.on("sensors/+/temperature", Listener::from_fn(|args| {
//!         println!("{} reads {}", args[0], args[1]);
//!     }))?;
//!
//!     assert!(emitter.emit("data", &[Arg::from("00101001")])?);
//!     emitter.emit("sensors/kitchen/temperature", &[Arg::from("21.5")])?;
//!
//!     emitter.remove_listener("data", &on_data)?;
//!     assert!(!emitter.emit("data", &[])?);
//!
//!     Ok(())
//! }
//! ```

#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    unreachable_pub
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Error types and result aliases
pub mod error;

/// Event arguments and reserved event names
pub mod event;

/// Topic classification and pattern matching
pub mod topic;

/// Listener handles and their outcomes
pub mod listener;

/// Listener registries keyed by event name or pattern
pub mod registry;

/// Scheduling of pending computations
pub mod scheduler;

/// The main event emitter implementation
pub mod emitter;

pub use emitter::{EmitterBuilder, EmitterConfig, EmitterStats, EventEmitter, Registrar};
pub use error::{Error, Result};
pub use event::{Arg, ERROR, NEW_LISTENER};
pub use listener::{Listener, Outcome, PendingComputation};
pub use scheduler::{Scheduled, Scheduler, ThreadScheduler, TokioScheduler};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Arg, EmitterBuilder, EmitterConfig, Error, EventEmitter, Listener, Outcome, Result,
        ERROR, NEW_LISTENER,
    };
}
