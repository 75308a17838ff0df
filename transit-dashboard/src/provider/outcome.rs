//! Three-way result of a provider-backed operation.

use super::error::ProviderError;

/// Result of fetching and shaping provider data.
///
/// Keeps "found", "nothing there" and "provider failed" apart for callers
/// that care (tests, logging), while [`Outcome::into_option`] and
/// [`Outcome::into_vec`] collapse the last two into "no data".
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Found(T),
    Empty,
    Failed(ProviderError),
}

impl<T> Outcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Collapse to `Some(data)` or `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Empty | Self::Failed(_) => None,
        }
    }
}

impl<T> Outcome<Vec<T>> {
    /// Wrap a list result, treating an empty list as `Empty`.
    pub fn from_list(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Found(items)
        }
    }

    /// Collapse to the list, empty when there is no data.
    pub fn into_vec(self) -> Vec<T> {
        self.into_option().unwrap_or_default()
    }
}
