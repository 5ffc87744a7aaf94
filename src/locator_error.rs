use thiserror::Error;

use crate::Context;

/// The one way a locator operation can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    /// Nothing is registered for the requested type under the requested context.
    #[error("no registered instance found for {type_name} with context '{context}'")]
    NotFound {
        type_name: &'static str,
        context: Context,
    },
}

impl LocatorError {
    pub(crate) fn not_found<T: ?Sized>(context: Context) -> Self {
        LocatorError::NotFound {
            type_name: std::any::type_name::<T>(),
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_names_type_and_context() {
        let err = LocatorError::not_found::<u32>(Context::named("Debug"));
        assert_eq!(
            err.to_string(),
            "no registered instance found for u32 with context 'Debug'"
        );
    }

    #[test]
    fn test_not_found_display_general() {
        let err = LocatorError::not_found::<String>(Context::General);
        assert_eq!(
            err.to_string(),
            "no registered instance found for alloc::string::String with context 'General'"
        );
    }

    #[test]
    fn test_equality() {
        assert_eq!(
            LocatorError::not_found::<u8>(Context::General),
            LocatorError::NotFound {
                type_name: "u8",
                context: Context::General,
            }
        );
        assert_ne!(
            LocatorError::not_found::<u8>(Context::General),
            LocatorError::not_found::<u8>(Context::named("Other"))
        );
    }

    #[test]
    fn test_error_trait() {
        let err: &dyn std::error::Error = &LocatorError::not_found::<i64>(Context::General);
        assert!(err.source().is_none());
        assert!(err.to_string().contains("i64"));
    }
}
