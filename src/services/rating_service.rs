use chrono::{DateTime, Utc};
use sea_orm::EntityTrait;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::{AuditAction, record},
    dto::ratings::{RateMenuRequest, RatingResult},
    entity::menus::Entity as Menus,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_capability},
    models::{Capability, Rating},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;

#[derive(Debug, FromRow)]
struct UpsertedRating {
    id: Uuid,
    user_id: Uuid,
    menu_id: Uuid,
    score: i32,
    comment: Option<String>,
    rated_at: DateTime<Utc>,
    created: bool,
}

impl From<UpsertedRating> for Rating {
    fn from(row: UpsertedRating) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            menu_id: row.menu_id,
            score: row.score,
            comment: row.comment,
            rated_at: row.rated_at,
        }
    }
}

pub fn validate_score(score: i32) -> AppResult<()> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "score must be between {MIN_SCORE} and {MAX_SCORE}"
        )))
    }
}

/// Create or overwrite the caller's rating of a menu. One row per (user, menu).
pub async fn rate_menu(
    state: &AppState,
    user: &AuthUser,
    menu_id: Uuid,
    payload: RateMenuRequest,
) -> AppResult<ApiResponse<RatingResult>> {
    ensure_capability(user, Capability::Shop)?;
    validate_score(payload.score)?;

    if Menus::find_by_id(menu_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let comment = payload
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    // `xmax` is zero only on a freshly inserted tuple, so the same statement
    // that writes the rating also reports whether it already existed.
    let upserted: UpsertedRating = sqlx::query_as(
        r#"
        INSERT INTO ratings (id, user_id, menu_id, score, comment, rated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, menu_id) DO UPDATE
        SET score = EXCLUDED.score,
            comment = EXCLUDED.comment,
            rated_at = EXCLUDED.rated_at
        RETURNING id, user_id, menu_id, score, comment, rated_at, (xmax = 0) AS created
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(menu_id)
    .bind(payload.score)
    .bind(comment)
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await?;

    let created = upserted.created;
    let rating = Rating::from(upserted);

    tracing::info!(menu_id = %menu_id, score = rating.score, created, "menu rated");
    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::MenuRate,
        serde_json::json!({ "menu_id": menu_id, "score": rating.score }),
    )
    .await;

    let message = if created {
        "Thank you for your rating"
    } else {
        "Your rating has been updated"
    };
    Ok(ApiResponse::success(
        message,
        RatingResult { rating, created },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_within_one_to_five_are_accepted() {
        for score in MIN_SCORE..=MAX_SCORE {
            assert!(validate_score(score).is_ok());
        }
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        for score in [0, 6, -1, 100] {
            assert!(matches!(validate_score(score), Err(AppError::BadRequest(_))));
        }
    }
}
