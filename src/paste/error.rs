use thiserror::Error;

/// Error types that can occur while storing or retrieving pastes.
///
/// The store itself only ever produces `CapacityExceeded`, `NotFound` and
/// `TokenCollision`. The remaining variants come from the layers around it:
/// content validation, admin authentication and the clock.
///
/// # Error Categories
///
/// - **Store Errors**: `CapacityExceeded`, `NotFound`, `TokenCollision`
/// - **Request Errors**: `InvalidContent`, `ContentTooLong`, `Unauthorized`
/// - **System Errors**: `ClockError`, `StorageError`, `CryptoError`
///
/// # Example
///
/// ```rust
/// use burnbox::{PasteError, PasteServer};
///
/// # async fn example() -> Result<(), PasteError> {
/// let server = PasteServer::builder().build_and_init().await?;
/// let token = server.create("see you once").await?;
///
/// match server.consume(&token).await {
///     Ok(content) => println!("Got: {content}"),
///     Err(PasteError::NotFound) => println!("Gone forever"),
///     Err(e) => println!("Other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum PasteError {
    /// The creation quota has been used up since the last reset.
    ///
    /// The quota counts every successful create, so consuming or expiring
    /// existing pastes does not free it. Only an admin reset does.
    #[error("Paste limit of {limit} reached")]
    CapacityExceeded {
        /// The configured quota
        limit: u64,
    },

    /// The token does not resolve to a readable paste.
    ///
    /// Unknown, expired and already-read tokens all map to this variant so
    /// that callers cannot tell which of the three happened.
    #[error("Paste not found")]
    NotFound,

    /// The token generator produced a token that is already in use.
    ///
    /// Nothing is inserted and the quota is left untouched. The caller may
    /// simply try again.
    #[error("Token collision")]
    TokenCollision,

    /// The submitted content was rejected before reaching the store.
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// The submitted content exceeds the configured maximum length.
    #[error("Content longer than {max} characters")]
    ContentTooLong {
        /// The configured maximum, in characters
        max: usize,
    },

    /// The admin password did not match.
    #[error("Unauthorized")]
    Unauthorized,

    /// The system clock could not be read.
    #[error("Clock error: {0}")]
    ClockError(String),

    /// A storage backend operation failed.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A cryptographic operation failed.
    #[error("Crypto error: {0}")]
    CryptoError(String),
}

impl PasteError {
    /// Returns a stable, snake-case identifier for the error kind.
    ///
    /// Useful as a log field or as a machine-readable code in responses.
    pub fn code(&self) -> &'static str {
        match self {
            PasteError::CapacityExceeded { .. } => "capacity_exceeded",
            PasteError::NotFound => "not_found",
            PasteError::TokenCollision => "token_collision",
            PasteError::InvalidContent(_) => "invalid_content",
            PasteError::ContentTooLong { .. } => "content_too_long",
            PasteError::Unauthorized => "unauthorized",
            PasteError::ClockError(_) => "clock_error",
            PasteError::StorageError(_) => "storage_error",
            PasteError::CryptoError(_) => "crypto_error",
        }
    }
}
