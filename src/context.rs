//! Context tags qualifying a registration.
//!
//! Several instances of the same type can live side by side in a locator as long
//! as each is registered under a different [`Context`]. Callers that do not care
//! use [`Context::General`], which is also the `Default`.

use std::borrow::Cow;
use std::fmt;

/// Secondary key distinguishing instances registered under the same type.
///
/// # Examples
///
/// ```rust
/// use service_locator::Context;
///
/// let debug: Context = "Debug".into();
/// assert_eq!(debug, Context::named("Debug"));
/// assert_ne!(debug, Context::General);
/// assert_eq!(Context::default(), Context::General);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Context {
    /// The tag used when the caller supplies none.
    #[default]
    General,
    /// A caller-chosen tag.
    Named(Cow<'static, str>),
}

impl Context {
    /// Builds a named context tag.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Context::Named(name.into())
    }

    /// Returns `true` for the default tag. A tag named "General" is not the default.
    pub fn is_general(&self) -> bool {
        matches!(self, Context::General)
    }
}

impl From<&'static str> for Context {
    fn from(name: &'static str) -> Self {
        Context::Named(Cow::Borrowed(name))
    }
}

impl From<String> for Context {
    fn from(name: String) -> Self {
        Context::Named(Cow::Owned(name))
    }
}

/// Renders the default tag as `General` and a named tag as its bare name.
///
/// `Context::named("General")` therefore displays exactly like `Context::General`
/// while being a different key. Error messages and events built from this output
/// cannot tell the two apart; use the `Debug` form (`General` vs
/// `Named("General")`) when the distinction matters, and avoid "General" as a name.
impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::General => write!(f, "General"),
            Context::Named(name) => write!(f, "{name}"),
        }
    }
}
