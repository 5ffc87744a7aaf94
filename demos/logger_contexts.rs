//! Context-tagged logger example for service-locator.
//!
//! Demonstrates:
//! - Registering one interface with different implementations per context
//! - Wiring at a composition root and passing the locator by reference
//! - The not-found error when a context was never registered
//! - Unregistering a context
//!
//! Run with: `cargo run --example logger_contexts`

use service_locator::{LocatorApi, ServiceLocator};
use std::sync::Arc;

// =============================================================================
// Contract and implementations
// =============================================================================

trait Logger: Send + Sync {
    fn log(&self, message: &str);
    fn name(&self) -> &str;
}

#[derive(Default)]
struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("[CONSOLE] {message}");
    }

    fn name(&self) -> &str {
        "ConsoleLogger"
    }
}

struct FileLogger {
    path: String,
}

impl Logger for FileLogger {
    fn log(&self, message: &str) {
        println!("[FILE:{}] {message}", self.path);
    }

    fn name(&self) -> &str {
        "FileLogger"
    }
}

impl From<ConsoleLogger> for Arc<dyn Logger> {
    fn from(logger: ConsoleLogger) -> Self {
        Arc::new(logger)
    }
}

type SharedLogger = Arc<dyn Logger>;

// =============================================================================
// Application code
// =============================================================================

fn handle_request(locator: &ServiceLocator, id: u32) {
    let logger = locator
        .resolve::<SharedLogger>()
        .expect("general logger is wired at startup");
    logger.log(&format!("handling request {id}"));

    if let Ok(debug) = locator.resolve_in::<SharedLogger>("Debug") {
        debug.log(&format!("request {id} details"));
    }
}

fn main() {
    println!("=== Logger Contexts Example ===\n");

    // -------------------------------------------------------------------------
    // 1. Composition root
    // -------------------------------------------------------------------------
    let locator = ServiceLocator::with_trace_callback(|event| println!("   trace: {event}"));

    println!("1. Wiring services...");
    locator.register_factory(|| {
        Arc::new(FileLogger {
            path: "/var/log/app.log".to_string(),
        }) as SharedLogger
    });
    locator.register_default_in::<SharedLogger, ConsoleLogger>("Debug");

    // -------------------------------------------------------------------------
    // 2. Resolve per context
    // -------------------------------------------------------------------------
    println!("\n2. Handling a request with debug logging...");
    handle_request(&locator, 1);

    // -------------------------------------------------------------------------
    // 3. Missing context
    // -------------------------------------------------------------------------
    println!("\n3. Resolving a context that was never registered...");
    match locator.resolve_in::<SharedLogger>("Audit") {
        Ok(logger) => println!("   unexpected: {}", logger.name()),
        Err(err) => println!("   error: {err}"),
    }

    // -------------------------------------------------------------------------
    // 4. Unregister
    // -------------------------------------------------------------------------
    println!("\n4. Unregistering the debug logger...");
    if let Ok(removed) = locator.unregister_in::<SharedLogger>("Debug") {
        println!("   removed {}", removed.name());
    }
    handle_request(&locator, 2);

    println!("\n=== Example Complete ===");
}
