//! Macros for creating isolated static locators.

/// Creates a process-wide locator module with a single macro invocation.
///
/// The macro generates a module containing:
/// - A lazily created [`ServiceLocator`](crate::ServiceLocator) static (hidden)
/// - `locator()` returning it, for trait-based access through [`LocatorApi`](crate::LocatorApi)
/// - Free functions mirroring the locator operations
///
/// # Examples
///
/// ```rust
/// use service_locator::define_locator;
/// use std::sync::Arc;
///
/// define_locator!(services);
///
/// services::register(42i32);
/// services::register_in("Debug", "verbose".to_string());
///
/// let num: Arc<i32> = services::resolve().unwrap();
/// let level: Arc<String> = services::resolve_in("Debug").unwrap();
///
/// assert_eq!(*num, 42);
/// assert_eq!(&**level, "verbose");
/// ```
///
/// # Multiple Locators
///
/// Each invocation owns its own storage:
///
/// ```rust
/// use service_locator::define_locator;
///
/// define_locator!(database);
/// define_locator!(cache);
///
/// database::register("db_connection".to_string());
///
/// assert!(database::contains::<String>());
/// assert!(!cache::contains::<String>());
/// ```
#[macro_export]
macro_rules! define_locator {
    ($name:ident) => {
        pub mod $name {
            #![allow(dead_code)]

            use std::sync::{Arc, LazyLock};

            use $crate::{Context, LocatorApi, LocatorError, LocatorEvent, ServiceLocator};

            static LOCATOR: LazyLock<ServiceLocator> = LazyLock::new(ServiceLocator::new);

            /// The locator backing this module.
            pub fn locator() -> &'static ServiceLocator {
                &LOCATOR
            }

            /// Register a value under the `General` context.
            pub fn register<T: Send + Sync + 'static>(value: T) {
                locator().register(value)
            }

            /// Register a value under the given context.
            pub fn register_in<T: Send + Sync + 'static>(context: impl Into<Context>, value: T) {
                locator().register_in(context, value)
            }

            /// Register an Arc-wrapped value under the `General` context.
            pub fn register_arc<T: Send + Sync + 'static>(value: Arc<T>) {
                locator().register_arc(value)
            }

            /// Register an Arc-wrapped value under the given context.
            pub fn register_arc_in<T: Send + Sync + 'static>(
                context: impl Into<Context>,
                value: Arc<T>,
            ) {
                locator().register_arc_in(context, value)
            }

            /// Build an instance with `factory` and register it under `I` in the `General` context.
            pub fn register_factory<I, F>(factory: F)
            where
                I: Send + Sync + 'static,
                F: FnOnce() -> I,
            {
                locator().register_factory(factory)
            }

            /// Build an instance with `factory` and register it under `I` in the given context.
            pub fn register_factory_in<I, F>(context: impl Into<Context>, factory: F)
            where
                I: Send + Sync + 'static,
                F: FnOnce() -> I,
            {
                locator().register_factory_in(context, factory)
            }

            /// Register `Impl::default()` under `I` in the `General` context.
            pub fn register_default<I, Impl>()
            where
                I: Send + Sync + 'static,
                Impl: Default + Into<I>,
            {
                locator().register_default::<I, Impl>()
            }

            /// Register `Impl::default()` under `I` in the given context.
            pub fn register_default_in<I, Impl>(context: impl Into<Context>)
            where
                I: Send + Sync + 'static,
                Impl: Default + Into<I>,
            {
                locator().register_default_in::<I, Impl>(context)
            }

            /// Resolve `T` from the `General` context.
            pub fn resolve<T: Send + Sync + 'static>() -> Result<Arc<T>, LocatorError> {
                locator().resolve()
            }

            /// Resolve `T` from the given context.
            pub fn resolve_in<T: Send + Sync + 'static>(
                context: impl Into<Context>,
            ) -> Result<Arc<T>, LocatorError> {
                locator().resolve_in(context)
            }

            /// Resolve and clone `T` from the `General` context.
            pub fn resolve_cloned<T: Send + Sync + Clone + 'static>() -> Result<T, LocatorError> {
                locator().resolve_cloned()
            }

            /// Resolve and clone `T` from the given context.
            pub fn resolve_cloned_in<T: Send + Sync + Clone + 'static>(
                context: impl Into<Context>,
            ) -> Result<T, LocatorError> {
                locator().resolve_cloned_in(context)
            }

            /// Check if `T` is registered under the `General` context.
            pub fn contains<T: Send + Sync + 'static>() -> bool {
                locator().contains::<T>()
            }

            /// Check if `T` is registered under the given context.
            pub fn contains_in<T: Send + Sync + 'static>(context: impl Into<Context>) -> bool {
                locator().contains_in::<T>(context)
            }

            /// Context tags currently holding an instance of `T`.
            pub fn contexts<T: Send + Sync + 'static>() -> Vec<Context> {
                locator().contexts::<T>()
            }

            /// Remove `T` from the `General` context.
            pub fn unregister<T: Send + Sync + 'static>() -> Result<Arc<T>, LocatorError> {
                locator().unregister()
            }

            /// Remove `T` from the given context.
            pub fn unregister_in<T: Send + Sync + 'static>(
                context: impl Into<Context>,
            ) -> Result<Arc<T>, LocatorError> {
                locator().unregister_in(context)
            }

            /// Set a tracing callback for this locator.
            pub fn set_trace_callback(callback: impl Fn(&LocatorEvent) + Send + Sync + 'static) {
                locator().set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                locator().clear_trace_callback()
            }
        }
    };
}
