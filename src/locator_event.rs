use crate::Context;

/// Events emitted by a locator during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use service_locator::{Context, LocatorEvent};
///
/// let event = LocatorEvent::Register {
///     type_name: "i32",
///     context: Context::General,
///     replaced: false,
/// };
/// assert_eq!(event.to_string(), "register { type_name: i32, context: General, replaced: false }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorEvent {
    /// A value was registered.
    Register {
        /// The type name of the registered value (e.g., "i32", "alloc::string::String")
        type_name: &'static str,
        context: Context,
        /// Whether an earlier value under the same type and context was overwritten
        replaced: bool,
    },

    /// A value was requested.
    Resolve {
        type_name: &'static str,
        context: Context,
        found: bool,
    },

    /// An entry removal was requested.
    Unregister {
        type_name: &'static str,
        context: Context,
        found: bool,
    },

    /// An existence check was performed.
    Contains {
        type_name: &'static str,
        context: Context,
        found: bool,
    },

    /// The locator was cleared.
    Clear {},
}

impl std::fmt::Display for LocatorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocatorEvent::Register {
                type_name,
                context,
                replaced,
            } => write!(
                f,
                "register {{ type_name: {type_name}, context: {context}, replaced: {replaced} }}"
            ),
            LocatorEvent::Resolve {
                type_name,
                context,
                found,
            } => write!(
                f,
                "resolve {{ type_name: {type_name}, context: {context}, found: {found} }}"
            ),
            LocatorEvent::Unregister {
                type_name,
                context,
                found,
            } => write!(
                f,
                "unregister {{ type_name: {type_name}, context: {context}, found: {found} }}"
            ),
            LocatorEvent::Contains {
                type_name,
                context,
                found,
            } => write!(
                f,
                "contains {{ type_name: {type_name}, context: {context}, found: {found} }}"
            ),
            LocatorEvent::Clear {} => write!(f, "Clearing the Locator"),
        }
    }
}
