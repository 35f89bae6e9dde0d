//! Token generation.
//!
//! Tokens are opaque map keys. The store never inspects their entropy; it
//! relies on the generator to produce values that are hard to guess and
//! that do not repeat while a previous paste with the same token is alive.
//! A repeat is detected and reported as [`PasteError::TokenCollision`].
//!
//! [`PasteError::TokenCollision`]: crate::PasteError::TokenCollision

/// A function that generates unique token values.
pub type TokenGeneratorFn = Box<dyn Fn() -> String + Send + Sync>;

/// Shortest token the server will look up. Anything shorter is rejected
/// as not found without touching the store.
pub const MIN_TOKEN_LENGTH: usize = 8;

/// Longest token the default generator can produce (a simple-form UUID).
pub const MAX_TOKEN_LENGTH: usize = 32;

/// Generates a random token of `length` lowercase hex characters.
///
/// The value is taken from a v4 UUID in simple form, so `length` is clamped
/// to `MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH`.
pub fn random_token(length: usize) -> String {
    let length = length.clamp(MIN_TOKEN_LENGTH, MAX_TOKEN_LENGTH);
    let mut token = uuid::Uuid::new_v4().simple().to_string();
    token.truncate(length);
    token
}

/// Returns the default generator producing tokens of `length` characters.
pub fn default_generator(length: usize) -> TokenGeneratorFn {
    Box::new(move || random_token(length))
}
