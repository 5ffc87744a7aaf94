//! Core trait defining locator behavior.
//!
//! This module provides the `LocatorApi` trait with default implementations for
//! type-safe registration, resolution, removal and tracing of service instances.
//!
//! The locator is keyed twice: first by the requested type (`TypeId`), then by a
//! [`Context`] tag. Each (type, context) pair holds at most one instance, and a
//! type whose last context entry is removed disappears from the storage entirely.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{Context, LocatorError, LocatorEvent};

/// Two-level storage: requested type -> context tag -> instance.
pub type Entries = HashMap<TypeId, HashMap<Context, Arc<dyn Any + Send + Sync>>>;

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `LocatorEvent` every time the locator is
/// interacted with. It must be thread-safe because locators are shared across threads.
pub type TraceCallback = dyn Fn(&LocatorEvent) + Send + Sync + 'static;

/// Holds an optional tracing callback.
pub type TraceSlot = Mutex<Option<Arc<TraceCallback>>>;

/// Core trait defining locator behavior.
///
/// Provides default implementations for all locator operations, requiring only
/// two accessor methods (`storage` and `trace`) to be implemented by the implementor.
/// [`ServiceLocator`](crate::ServiceLocator) owns both; the `define_locator!` macro and
/// hand-written implementations can point them at statics instead.
pub trait LocatorApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback slot.
    fn trace(&self) -> &TraceSlot;

    /// Set a tracing callback for locator operations.
    ///
    /// The callback will be invoked for every operation (register, resolve,
    /// unregister, contains, clear). Replaces any previous callback.
    ///
    /// # Lock Poisoning Recovery
    ///
    /// If the trace lock is poisoned (due to a panic while holding the lock),
    /// this method recovers by extracting the inner value.
    fn set_trace_callback(&self, callback: impl Fn(&LocatorEvent) + Send + Sync + 'static) {
        let mut guard = self.trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// After calling this, no callback events will be emitted.
    /// Registered values are not affected.
    fn clear_trace_callback(&self) {
        let mut guard = self.trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Emit an event to the `tracing` subscriber and to the current callback, if any.
    ///
    /// Neither the storage lock nor the trace lock is held while the callback runs,
    /// so the callback may use any locator, including this one.
    ///
    /// # Panics
    ///
    /// If the callback itself panics, the panic will propagate to the caller.
    fn emit_event(&self, event: &LocatorEvent) {
        tracing::trace!(%event, "locator event");

        let callback = self
            .trace()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------------------------------

    /// Access the entry storage.
    fn storage(&self) -> &Mutex<Entries>;

    /// Register a value under the `General` context.
    ///
    /// Takes ownership of the value and wraps it in an `Arc` automatically.
    /// If a value of the same type is already registered there, it is replaced.
    fn register<T: Send + Sync + 'static>(&self, value: T) {
        self.register_arc_in(Context::General, Arc::new(value));
    }

    /// Register a value under the given context.
    fn register_in<T: Send + Sync + 'static>(&self, context: impl Into<Context>, value: T) {
        self.register_arc_in(context, Arc::new(value));
    }

    /// Register an Arc-wrapped value under the `General` context.
    ///
    /// Avoids a second allocation when the caller already holds an `Arc`.
    fn register_arc<T: Send + Sync + 'static>(&self, value: Arc<T>) {
        self.register_arc_in(Context::General, value);
    }

    /// Register an Arc-wrapped value under the given context.
    ///
    /// This never fails: registration is meant for application wiring, and a
    /// poisoned storage lock is recovered since the insert is idempotent.
    fn register_arc_in<T: Send + Sync + 'static>(
        &self,
        context: impl Into<Context>,
        value: Arc<T>,
    ) {
        let context = context.into();

        // The replaced value may run arbitrary `Drop` code, so it is released
        // only after the storage lock.
        let previous = {
            let mut entries = self.storage().lock().unwrap_or_else(|p| p.into_inner());
            entries
                .entry(TypeId::of::<T>())
                .or_default()
                .insert(context.clone(), value)
        };
        let replaced = previous.is_some();
        drop(previous);

        self.emit_event(&LocatorEvent::Register {
            type_name: std::any::type_name::<T>(),
            context,
            replaced,
        });
    }

    /// Build an instance with `factory` and register it under `I` in the `General` context.
    fn register_factory<I, F>(&self, factory: F)
    where
        I: Send + Sync + 'static,
        F: FnOnce() -> I,
    {
        self.register_factory_in(Context::General, factory);
    }

    /// Build an instance with `factory` and register it under `I` in the given context.
    ///
    /// The factory runs exactly once, before the storage lock is taken, so it may
    /// resolve its own dependencies from this locator.
    fn register_factory_in<I, F>(&self, context: impl Into<Context>, factory: F)
    where
        I: Send + Sync + 'static,
        F: FnOnce() -> I,
    {
        let context = context.into();
        self.register_in(context, factory());
    }

    /// Register a default-constructed `Impl` under the interface type `I`
    /// in the `General` context.
    ///
    /// For trait objects, `I` is usually `Arc<dyn Trait>` and the implementation
    /// provides `impl From<Impl> for Arc<dyn Trait>`.
    fn register_default<I, Impl>(&self)
    where
        I: Send + Sync + 'static,
        Impl: Default + Into<I>,
    {
        self.register_default_in::<I, Impl>(Context::General);
    }

    /// Register a default-constructed `Impl` under the interface type `I`
    /// in the given context.
    fn register_default_in<I, Impl>(&self, context: impl Into<Context>)
    where
        I: Send + Sync + 'static,
        Impl: Default + Into<I>,
    {
        self.register_factory_in::<I, _>(context, || Impl::default().into());
    }

    // -------------------------------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------------------------------

    /// Resolve the instance registered for `T` under the `General` context.
    ///
    /// # Errors
    ///
    /// [`LocatorError::NotFound`] if nothing is registered there.
    fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, LocatorError> {
        self.resolve_in(Context::General)
    }

    /// Resolve the instance registered for `T` under the given context.
    ///
    /// # Errors
    ///
    /// [`LocatorError::NotFound`] naming both `T` and the context.
    fn resolve_in<T: Send + Sync + 'static>(
        &self,
        context: impl Into<Context>,
    ) -> Result<Arc<T>, LocatorError> {
        let context = context.into();

        let entry = self
            .storage()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&TypeId::of::<T>())
            .and_then(|by_context| by_context.get(&context))
            .cloned();

        let instance = entry.and_then(|any| any.downcast::<T>().ok());

        self.emit_event(&LocatorEvent::Resolve {
            type_name: std::any::type_name::<T>(),
            context: context.clone(),
            found: instance.is_some(),
        });

        instance.ok_or_else(|| not_found::<T>("resolve", context))
    }

    /// Resolve and clone out an owned value from the `General` context.
    fn resolve_cloned<T: Send + Sync + Clone + 'static>(&self) -> Result<T, LocatorError> {
        self.resolve_cloned_in(Context::General)
    }

    /// Resolve and clone out an owned value from the given context.
    fn resolve_cloned_in<T: Send + Sync + Clone + 'static>(
        &self,
        context: impl Into<Context>,
    ) -> Result<T, LocatorError> {
        let arc = self.resolve_in::<T>(context)?;
        Ok((*arc).clone())
    }

    /// Check if `T` is registered under the `General` context.
    fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.contains_in::<T>(Context::General)
    }

    /// Check if `T` is registered under the given context.
    fn contains_in<T: Send + Sync + 'static>(&self, context: impl Into<Context>) -> bool {
        let context = context.into();

        let found = self
            .storage()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&TypeId::of::<T>())
            .is_some_and(|by_context| by_context.contains_key(&context));

        self.emit_event(&LocatorEvent::Contains {
            type_name: std::any::type_name::<T>(),
            context,
            found,
        });

        found
    }

    /// Context tags currently holding an instance of `T`, in no particular order.
    fn contexts<T: Send + Sync + 'static>(&self) -> Vec<Context> {
        self.storage()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&TypeId::of::<T>())
            .map(|by_context| by_context.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of types with at least one registered instance.
    fn type_count(&self) -> usize {
        self.storage().lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    // -------------------------------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------------------------------

    /// Remove the instance registered for `T` under the `General` context.
    fn unregister<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, LocatorError> {
        self.unregister_in(Context::General)
    }

    /// Remove the instance registered for `T` under the given context and return it.
    ///
    /// When this removes the last context for `T`, the type itself is dropped from
    /// the storage.
    ///
    /// # Errors
    ///
    /// [`LocatorError::NotFound`] if nothing is registered there.
    fn unregister_in<T: Send + Sync + 'static>(
        &self,
        context: impl Into<Context>,
    ) -> Result<Arc<T>, LocatorError> {
        let context = context.into();
        let type_id = TypeId::of::<T>();

        let removed = {
            let mut entries = self.storage().lock().unwrap_or_else(|p| p.into_inner());
            let removed = entries
                .get_mut(&type_id)
                .and_then(|by_context| by_context.remove(&context));
            if entries.get(&type_id).is_some_and(|by_context| by_context.is_empty()) {
                entries.remove(&type_id);
            }
            removed
        };

        let instance = removed.and_then(|any| any.downcast::<T>().ok());

        self.emit_event(&LocatorEvent::Unregister {
            type_name: std::any::type_name::<T>(),
            context: context.clone(),
            found: instance.is_some(),
        });

        instance.ok_or_else(|| not_found::<T>("unregister", context))
    }

    /// Remove every registered instance.
    ///
    /// Primarily intended for tests. Already-resolved `Arc<T>` handles stay valid
    /// and the tracing callback is kept. Removed values are dropped after the
    /// storage lock is released.
    #[doc(hidden)]
    fn clear(&self) {
        self.emit_event(&LocatorEvent::Clear {});

        let removed = {
            let mut entries = self.storage().lock().unwrap_or_else(|p| p.into_inner());
            std::mem::take(&mut *entries)
        };
        drop(removed);
    }
}

fn not_found<T>(operation: &'static str, context: Context) -> LocatorError {
    let err = LocatorError::not_found::<T>(context);
    tracing::debug!(operation, error = %err, "locator lookup failed");
    err
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{Entries, LocatorApi, TraceSlot};
    use crate::{Context, LocatorError};

    use serial_test::serial;
    use std::collections::HashMap;
    use std::sync::{mpsc, Arc, LazyLock, Mutex};
    use std::thread;
    use std::time::Duration;

    static STORAGE: LazyLock<Mutex<Entries>> = LazyLock::new(|| Mutex::new(HashMap::new()));

    static TRACE: TraceSlot = Mutex::new(None);

    struct Api;

    impl LocatorApi for Api {
        fn storage(&self) -> &Mutex<Entries> {
            &STORAGE
        }

        fn trace(&self) -> &TraceSlot {
            &TRACE
        }
    }

    const API: Api = Api;

    fn capture_events() -> Arc<Mutex<Vec<String>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        API.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(e.to_string());
        });
        events
    }

    #[test]
    #[serial]
    fn test_register_and_resolve_general() -> Result<(), LocatorError> {
        API.clear();

        API.register(42i32);

        let num: Arc<i32> = API.resolve()?;
        assert_eq!(*num, 42);

        let num_2 = API.resolve_in::<i32>(Context::General)?;
        assert_eq!(*num_2, 42);

        Ok(())
    }

    #[test]
    #[serial]
    fn test_contexts_resolve_independently() -> Result<(), LocatorError> {
        API.clear();

        API.register_in("Primary", "postgres://primary".to_string());
        API.register_in("Replica", "postgres://replica".to_string());

        assert_eq!(&*API.resolve_in::<String>("Primary")?, "postgres://primary");
        assert_eq!(&*API.resolve_in::<String>("Replica")?, "postgres://replica");
        assert!(API.resolve::<String>().is_err());

        Ok(())
    }

    #[test]
    #[serial]
    fn test_overwrite_same_type_and_context() {
        API.clear();

        API.register_in("Slot", 10u16);
        API.register_in("Slot", 20u16);

        let value: Arc<u16> = API.resolve_in("Slot").unwrap();
        assert_eq!(*value, 20);
        assert_eq!(API.contexts::<u16>().len(), 1);
    }

    #[test]
    #[serial]
    fn test_resolve_missing_names_type_and_context() {
        API.clear();

        let result = API.resolve_in::<String>("Debug");
        assert_eq!(
            result.unwrap_err(),
            LocatorError::NotFound {
                type_name: "alloc::string::String",
                context: Context::named("Debug"),
            }
        );
    }

    #[test]
    #[serial]
    fn test_unregister_returns_value_and_removes_entry() {
        API.clear();

        API.register_in("Debug", 7u8);
        let removed = API.unregister_in::<u8>("Debug").unwrap();
        assert_eq!(*removed, 7);

        assert!(API.resolve_in::<u8>("Debug").is_err());
        assert_eq!(
            API.unregister_in::<u8>("Debug").unwrap_err(),
            LocatorError::NotFound {
                type_name: "u8",
                context: Context::named("Debug"),
            }
        );
    }

    #[test]
    #[serial]
    fn test_unregister_last_context_drops_type() {
        API.clear();

        API.register_in("A", 1u64);
        API.register_in("B", 2u64);
        assert_eq!(API.type_count(), 1);

        API.unregister_in::<u64>("A").unwrap();
        assert_eq!(API.type_count(), 1);
        assert_eq!(API.contexts::<u64>(), vec![Context::named("B")]);

        API.unregister_in::<u64>("B").unwrap();
        assert_eq!(API.type_count(), 0);
        assert!(API.contexts::<u64>().is_empty());

        API.register_in("A", 3u64);
        assert_eq!(*API.resolve_in::<u64>("A").unwrap(), 3);
    }

    #[test]
    #[serial]
    fn test_failed_unregister_leaves_no_empty_type() {
        API.clear();

        assert!(API.unregister::<i16>().is_err());
        assert_eq!(API.type_count(), 0);
    }

    #[test]
    #[serial]
    fn test_resolve_cloned() {
        API.clear();
        API.register_in("Greeting", "hello".to_string());
        let value: String = API.resolve_cloned_in("Greeting").unwrap();
        assert_eq!(value, "hello");
    }

    #[test]
    #[serial]
    fn test_contains() {
        API.clear();
        assert!(!API.contains::<u32>());
        API.register(1u32);
        assert!(API.contains::<u32>());
        assert!(!API.contains_in::<u32>("Other"));
    }

    #[test]
    #[serial]
    fn test_factory_runs_once_and_registers() {
        API.clear();

        let mut calls = 0;
        API.register_factory_in("Built", || {
            calls += 1;
            vec![1, 2, 3]
        });

        assert_eq!(calls, 1);
        let built: Arc<Vec<i32>> = API.resolve_in("Built").unwrap();
        assert_eq!(*built, vec![1, 2, 3]);
    }

    #[test]
    #[serial]
    fn test_register_default_converts_into_interface() {
        API.clear();

        #[derive(Default)]
        struct Port(u16);

        impl From<Port> for u32 {
            fn from(port: Port) -> u32 {
                u32::from(port.0) + 8080
            }
        }

        API.register_default::<u32, Port>();
        assert_eq!(*API.resolve::<u32>().unwrap(), 8080);
    }

    #[test]
    #[serial]
    fn test_thread_safety() {
        API.clear();

        use std::sync::Barrier;

        let barrier = Arc::new(Barrier::new(2));
        let barrier_clone = barrier.clone();

        let handle = thread::spawn(move || {
            API.register_in("Worker", 100u32);
            barrier_clone.wait();
            barrier_clone.wait();

            let s: Arc<u32> = API.resolve_in("Main").unwrap();
            assert_eq!(*s, 200);
        });

        barrier.wait();
        let worker: Arc<u32> = API.resolve_in("Worker").unwrap();
        assert_eq!(*worker, 100);
        API.register_in("Main", 200u32);
        barrier.wait();

        handle.join().unwrap();
        API.clear();
    }

    #[test]
    #[serial]
    fn test_trace_events_in_order() {
        API.clear();
        let events = capture_events();

        API.register_in("Debug", 5u8);
        API.register_in("Debug", 6u8);
        let _ = API.resolve_in::<u8>("Debug");
        let _ = API.contains::<u8>();
        let _ = API.unregister_in::<u8>("Debug");
        let _ = API.unregister_in::<u8>("Debug");

        API.clear_trace_callback();

        let captured = events.lock().unwrap();
        assert_eq!(
            *captured,
            vec![
                "register { type_name: u8, context: Debug, replaced: false }",
                "register { type_name: u8, context: Debug, replaced: true }",
                "resolve { type_name: u8, context: Debug, found: true }",
                "contains { type_name: u8, context: General, found: false }",
                "unregister { type_name: u8, context: Debug, found: true }",
                "unregister { type_name: u8, context: Debug, found: false }",
            ]
        );
    }

    #[test]
    #[serial]
    fn test_trace_callback_clear_event() {
        API.clear();
        let events = capture_events();

        API.clear();
        API.clear_trace_callback();

        let captured = events.lock().unwrap();
        assert_eq!(*captured, vec!["Clearing the Locator"]);
    }

    #[test]
    #[serial]
    fn test_clear_trace_callback_stops_events() {
        API.clear();
        let events = capture_events();

        API.register(10u16);
        API.clear_trace_callback();

        API.register(20u16);
        let _ = API.resolve::<u16>();
        let _ = API.contains::<u16>();

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1);
    }

    #[test]
    #[serial]
    fn test_callback_may_use_same_locator() {
        API.clear();

        API.set_trace_callback(|event| {
            if let crate::LocatorEvent::Register { type_name: "i8", .. } = event {
                let _ = API.contains::<i8>();
            }
        });

        API.register(1i8);
        API.clear_trace_callback();

        assert!(API.contains::<i8>());
    }

    #[test]
    #[serial]
    fn test_register_arc_directly() {
        API.clear();
        let value = Arc::new(42i32);
        let clone = value.clone();
        API.register_arc(value);

        let retrieved: Arc<i32> = API.resolve().unwrap();
        assert_eq!(*retrieved, 42);
        assert_eq!(Arc::strong_count(&clone), 3); // clone + locator + retrieved
    }

    /// Calls back into the locator when dropped.
    struct ReentrantDrop;

    impl Drop for ReentrantDrop {
        fn drop(&mut self) {
            let _ = API.contains::<u8>();
        }
    }

    fn completes_within(timeout: Duration, work: impl FnOnce() + Send + 'static) -> bool {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            work();
            let _ = tx.send(());
        });
        rx.recv_timeout(timeout).is_ok()
    }

    #[test]
    #[serial]
    fn test_replaced_value_dropped_after_lock_release() {
        API.clear();

        let finished = completes_within(Duration::from_secs(5), || {
            API.register(ReentrantDrop);
            API.register(ReentrantDrop);
            API.register_in("Other", ReentrantDrop);
            let _ = API.unregister_in::<ReentrantDrop>("Other");
        });
        assert!(finished, "re-registration blocked on the storage lock");

        assert!(completes_within(Duration::from_secs(5), || API.clear()));
    }

    #[test]
    #[serial]
    fn test_cleared_values_dropped_after_lock_release() {
        assert!(completes_within(Duration::from_secs(5), || API.clear()));

        API.register(ReentrantDrop);
        API.register_in("Other", ReentrantDrop);
        assert_eq!(API.contexts::<ReentrantDrop>().len(), 2);

        let finished = completes_within(Duration::from_secs(5), || API.clear());
        assert!(finished, "clear blocked on the storage lock");
        assert_eq!(API.type_count(), 0);
    }
}
