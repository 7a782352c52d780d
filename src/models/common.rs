use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body shape produced by `AppError::error_response`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
