//! An explicitly constructed locator.
//!
//! Build one [`ServiceLocator`] at the composition root and hand it (by reference
//! or inside an `Arc`) to the parts of the application that need to resolve
//! services. Independent locators never share entries, which keeps tests isolated.
//!
//! # Examples
//!
//! ```
//! use service_locator::{LocatorApi, ServiceLocator};
//! use std::sync::Arc;
//!
//! let locator = ServiceLocator::new();
//! locator.register_in("Debug", "verbose".to_string());
//!
//! let level: Arc<String> = locator.resolve_in("Debug").unwrap();
//! assert_eq!(&*level, "verbose");
//! assert!(locator.resolve::<String>().is_err());
//! ```

use std::fmt;
use std::sync::Mutex;

use crate::locator_trait::{Entries, LocatorApi, TraceSlot};
use crate::LocatorEvent;

/// A self-contained locator owning its storage and trace callback.
#[derive(Default)]
pub struct ServiceLocator {
    entries: Mutex<Entries>,
    trace: TraceSlot,
}

impl ServiceLocator {
    /// Creates an empty locator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty locator that reports every operation to `callback`.
    pub fn with_trace_callback(callback: impl Fn(&LocatorEvent) + Send + Sync + 'static) -> Self {
        let locator = Self::new();
        locator.set_trace_callback(callback);
        locator
    }
}

impl LocatorApi for ServiceLocator {
    fn storage(&self) -> &Mutex<Entries> {
        &self.entries
    }

    fn trace(&self) -> &TraceSlot {
        &self.trace
    }
}

impl fmt::Debug for ServiceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceLocator")
            .field("types", &self.type_count())
            .finish_non_exhaustive()
    }
}
