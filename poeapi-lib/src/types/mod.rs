mod error;
mod status;

pub use error::ErrorKind;
pub use status::check_status;

/// The poeapi `Result` type
pub type Result<T> = std::result::Result<T, crate::ErrorKind>;
