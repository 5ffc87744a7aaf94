//! The process-wide locator.
//!
//! A single [`ServiceLocator`] created lazily on first access and living for the rest
//! of the process. The free functions here mirror [`LocatorApi`] so call sites read
//! `global::resolve::<T>()` without passing a locator around.
//!
//! Prefer an explicit [`ServiceLocator`] where the locator can be threaded through;
//! this module exists for code that wants one well-known registry.
//!
//! # Examples
//!
//! ```
//! use service_locator::global;
//! use std::sync::Arc;
//!
//! global::register_in("Greeting", "Hello, World!".to_string());
//!
//! let message: Arc<String> = global::resolve_in("Greeting").unwrap();
//! assert_eq!(&*message, "Hello, World!");
//! ```

use std::sync::{Arc, LazyLock};

use crate::{Context, LocatorApi, LocatorError, LocatorEvent, ServiceLocator};

static GLOBAL_LOCATOR: LazyLock<ServiceLocator> = LazyLock::new(ServiceLocator::new);

/// Provides a reference to the process-wide locator.
pub fn locator() -> &'static ServiceLocator {
    &GLOBAL_LOCATOR
}

/// Sets a tracing callback on the process-wide locator.
pub fn set_trace_callback(callback: impl Fn(&LocatorEvent) + Send + Sync + 'static) {
    locator().set_trace_callback(callback)
}

/// Clears the tracing callback on the process-wide locator.
pub fn clear_trace_callback() {
    locator().clear_trace_callback()
}

/// Registers a value under the `General` context.
///
/// # Examples
///
/// ```
/// use service_locator::global;
///
/// global::register(42i32);
/// assert_eq!(*global::resolve::<i32>().unwrap(), 42);
/// ```
pub fn register<T: Send + Sync + 'static>(value: T) {
    locator().register(value)
}

/// Registers a value under the given context.
pub fn register_in<T: Send + Sync + 'static>(context: impl Into<Context>, value: T) {
    locator().register_in(context, value)
}

/// Registers an `Arc`-wrapped value under the `General` context.
pub fn register_arc<T: Send + Sync + 'static>(value: Arc<T>) {
    locator().register_arc(value)
}

/// Registers an `Arc`-wrapped value under the given context.
pub fn register_arc_in<T: Send + Sync + 'static>(context: impl Into<Context>, value: Arc<T>) {
    locator().register_arc_in(context, value)
}

/// Builds an instance with `factory` and registers it under `I` in the `General` context.
pub fn register_factory<I, F>(factory: F)
where
    I: Send + Sync + 'static,
    F: FnOnce() -> I,
{
    locator().register_factory(factory)
}

/// Builds an instance with `factory` and registers it under `I` in the given context.
pub fn register_factory_in<I, F>(context: impl Into<Context>, factory: F)
where
    I: Send + Sync + 'static,
    F: FnOnce() -> I,
{
    locator().register_factory_in(context, factory)
}

/// Registers `Impl::default()` under the interface type `I` in the `General` context.
pub fn register_default<I, Impl>()
where
    I: Send + Sync + 'static,
    Impl: Default + Into<I>,
{
    locator().register_default::<I, Impl>()
}

/// Registers `Impl::default()` under the interface type `I` in the given context.
pub fn register_default_in<I, Impl>(context: impl Into<Context>)
where
    I: Send + Sync + 'static,
    Impl: Default + Into<I>,
{
    locator().register_default_in::<I, Impl>(context)
}

/// Resolves `T` from the `General` context.
///
/// # Examples
///
/// ```
/// use service_locator::global;
///
/// let result = global::resolve::<std::collections::BTreeMap<u8, u8>>();
/// assert!(result.is_err());
/// ```
pub fn resolve<T: Send + Sync + 'static>() -> Result<Arc<T>, LocatorError> {
    locator().resolve()
}

/// Resolves `T` from the given context.
pub fn resolve_in<T: Send + Sync + 'static>(
    context: impl Into<Context>,
) -> Result<Arc<T>, LocatorError> {
    locator().resolve_in(context)
}

/// Resolves and clones `T` from the `General` context.
pub fn resolve_cloned<T: Send + Sync + Clone + 'static>() -> Result<T, LocatorError> {
    locator().resolve_cloned()
}

/// Resolves and clones `T` from the given context.
pub fn resolve_cloned_in<T: Send + Sync + Clone + 'static>(
    context: impl Into<Context>,
) -> Result<T, LocatorError> {
    locator().resolve_cloned_in(context)
}

/// Checks whether `T` is registered under the `General` context.
pub fn contains<T: Send + Sync + 'static>() -> bool {
    locator().contains::<T>()
}

/// Checks whether `T` is registered under the given context.
pub fn contains_in<T: Send + Sync + 'static>(context: impl Into<Context>) -> bool {
    locator().contains_in::<T>(context)
}

/// Context tags currently holding an instance of `T`.
pub fn contexts<T: Send + Sync + 'static>() -> Vec<Context> {
    locator().contexts::<T>()
}

/// Removes `T` from the `General` context.
pub fn unregister<T: Send + Sync + 'static>() -> Result<Arc<T>, LocatorError> {
    locator().unregister()
}

/// Removes `T` from the given context.
pub fn unregister_in<T: Send + Sync + 'static>(
    context: impl Into<Context>,
) -> Result<Arc<T>, LocatorError> {
    locator().unregister_in(context)
}

#[doc(hidden)]
pub fn clear() {
    locator().clear()
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
