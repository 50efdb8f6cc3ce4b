use thiserror::Error;

use dropshop_store::StoreError;

/// Errors surfaced by the state containers.
///
/// Failed login is *not* an error: it is a plain negative result, and the
/// caller cannot tell an unknown identifier from a blocked account apart.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Username or e-mail already registered.
    #[error("Username or e-mail already registered")]
    DuplicateIdentity,

    /// An identity mutation was requested without an active session.
    #[error("No user is logged in")]
    NotLoggedIn,

    /// A chat message must carry text or an image.
    #[error("Message has neither text nor image")]
    EmptyMessage,

    /// Underlying storage failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
