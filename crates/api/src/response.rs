//! Shared response envelope for API handlers.
//!
//! Successful responses use `{ "success": true, "data": ... }`; errors
//! use the matching `{ "success": false, "error": ... }` envelope built
//! by [`crate::error::AppError`].

use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
