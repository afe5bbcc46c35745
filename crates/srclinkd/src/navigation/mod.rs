//! Hand-off from the listener to the editor.
//!
//! The listener never opens files itself. It turns a locator into a
//! [`NavigationTarget`] and submits it to a [`NavigationQueue`]; a dedicated
//! thread drains the queue and calls the configured [`Navigator`]. Whatever
//! the navigator does, and however long it takes, stays on that thread.

mod errors;
mod queue;
mod source_root;

use std::fmt;
use std::sync::Arc;

pub use self::errors::NavigationError;
pub use self::queue::{NavigationQueue, NavigationWorker};
pub use self::source_root::{EditorCommand, SourceRootNavigator};

use crate::locator::Locator;

const NAVIGATION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::navigation");

/// A request to reveal `line_number` of the type `fully_qualified_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    /// Dotted `package.Type` name.
    pub fully_qualified_name: String,
    /// One-based line number.
    pub line_number: u32,
}

impl NavigationTarget {
    /// Builds a target from its parts.
    #[must_use]
    pub fn new(fully_qualified_name: impl Into<String>, line_number: u32) -> Self {
        Self {
            fully_qualified_name: fully_qualified_name.into(),
            line_number,
        }
    }
}

impl From<&Locator> for NavigationTarget {
    fn from(locator: &Locator) -> Self {
        Self::new(locator.fully_qualified_name(), locator.line_number())
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.fully_qualified_name, self.line_number)
    }
}

/// The editor capability that opens a type at a line.
///
/// Implementations run on the navigation worker thread. Failures are logged
/// by the worker and never reach the listener.
pub trait Navigator: Send + Sync {
    /// Opens the source for `target` and reveals its line.
    fn navigate(&self, target: &NavigationTarget) -> Result<(), NavigationError>;
}

impl<T> Navigator for Arc<T>
where
    T: Navigator + ?Sized,
{
    fn navigate(&self, target: &NavigationTarget) -> Result<(), NavigationError> {
        (**self).navigate(target)
    }
}
