use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejection (malformed body, wrong field types) is reported
/// as an [`AppError::BadRequest`] in the usual response envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
