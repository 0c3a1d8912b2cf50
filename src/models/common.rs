use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error payload nested under `error` in every failure envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
