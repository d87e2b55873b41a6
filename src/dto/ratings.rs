use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Rating;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RateMenuRequest {
    /// 1 to 5.
    pub score: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RatingResult {
    pub rating: Rating,
    /// `false` when an earlier rating by the same user was overwritten.
    pub created: bool,
}
