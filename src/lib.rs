//! # Service Locator
//!
//! A thread-safe service locator mapping a requested type, optionally qualified by a
//! [`Context`] tag, to a single registered instance of that type.
//!
//! Values are stored as `Arc<T>` and keyed by `TypeId` first and context second.
//! Registering again under the same type and context replaces the earlier value.
//!
//! ## Quick Start
//!
//! ```rust
//! use service_locator::{Context, LocatorApi, ServiceLocator};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str) -> String;
//! }
//!
//! #[derive(Default)]
//! struct ConsoleLogger;
//!
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) -> String {
//!         format!("[console] {message}")
//!     }
//! }
//!
//! impl From<ConsoleLogger> for Arc<dyn Logger> {
//!     fn from(logger: ConsoleLogger) -> Self {
//!         Arc::new(logger)
//!     }
//! }
//!
//! let locator = ServiceLocator::new();
//! locator.register_default_in::<Arc<dyn Logger>, ConsoleLogger>("Debug");
//!
//! let logger = locator.resolve_in::<Arc<dyn Logger>>("Debug").unwrap();
//! assert_eq!(logger.log("ready"), "[console] ready");
//!
//! // Nothing was registered under the default context.
//! assert!(locator.resolve_in::<Arc<dyn Logger>>(Context::General).is_err());
//!
//! locator.unregister_in::<Arc<dyn Logger>>("Debug").unwrap();
//! assert!(locator.resolve_in::<Arc<dyn Logger>>("Debug").is_err());
//! ```
//!
//! ## Flavours
//!
//! - [`ServiceLocator`] - an explicit value built at the composition root
//! - [`global`] - one lazily created process-wide locator with free functions
//! - [`define_locator!`] - additional isolated static locators
//!
//! All three share the operations of [`LocatorApi`]. Every operation emits a
//! [`LocatorEvent`] to an optional per-locator callback and to `tracing`.

mod context;
pub mod global;
mod locator;
mod locator_error;
mod locator_event;
mod locator_trait;
mod macros;

pub use context::Context;
pub use locator::ServiceLocator;
pub use locator_error::LocatorError;
pub use locator_event::LocatorEvent;
pub use locator_trait::{Entries, LocatorApi, TraceCallback, TraceSlot};
