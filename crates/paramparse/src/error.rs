//! The single failure of the library.
use thiserror::Error;

/// The expected grammar element could not be recognised.
///
/// Malformed and absent input are not distinguished. `at` is the byte offset of the failing
/// element, relative to the text given to the outermost call that returned it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("no match at byte {at}")]
pub struct NoMatch {
    pub at: usize,
}

impl NoMatch {
    /// A failure at the very start of the text given.
    pub const fn here() -> Self {
        Self { at: 0 }
    }

    pub const fn at(at: usize) -> Self {
        Self { at }
    }

    /// Rebase a failure from a sub-slice starting `by` bytes into the enclosing text.
    #[must_use]
    pub const fn offset(self, by: usize) -> Self {
        Self { at: self.at + by }
    }
}
