use thiserror::Error;

/// Failures surfaced by the fallible map and table operations. A failed
/// operation never modifies the structure it was called on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A strict map insert collided with an existing key. The caller
    /// decides whether to remove and reinsert or skip; nothing is retried.
    #[error("key already present")]
    DuplicateKey,
    /// A lookup or removal targeted a key that is not present.
    #[error("key not found")]
    KeyNotFound,
}

pub type Result<T> = std::result::Result<T, Error>;
