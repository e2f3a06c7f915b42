use http::StatusCode;

use crate::{ErrorKind, Result};

/// Map the status code of an API response onto the error taxonomy.
///
/// Only `200 OK` counts as success. The API does not use other 2xx codes,
/// so they end up as [`ErrorKind::UnknownFailure`] like every other code
/// without a dedicated variant.
///
/// # Errors
///
/// Returns the [`ErrorKind`] matching any status other than `200 OK`.
pub fn check_status(status: StatusCode) -> Result<()> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::BAD_REQUEST => Err(ErrorKind::BadRequest),
        StatusCode::NOT_FOUND => Err(ErrorKind::NotFound),
        StatusCode::TOO_MANY_REQUESTS => Err(ErrorKind::RateLimited),
        StatusCode::INTERNAL_SERVER_ERROR => Err(ErrorKind::ServerFailure),
        other => Err(ErrorKind::UnknownFailure(other)),
    }
}
