use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::courses::{RateCourseRequest, RatingSummary},
    entity::ratings::{ActiveModel as RatingActive, Column as RatingCol, Entity as Ratings},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Rating,
    response::{ApiResponse, Meta},
    services::course_service,
    state::AppState,
};

pub async fn summary(state: &AppState, course_id: &str) -> AppResult<RatingSummary> {
    let (average, count): (Option<f64>, i64) = sqlx::query_as(
        "SELECT AVG(rating)::float8, COUNT(*) FROM ratings WHERE course_id = $1",
    )
    .bind(course_id)
    .fetch_one(&state.pool)
    .await?;

    let items = Ratings::find()
        .filter(RatingCol::CourseId.eq(course_id))
        .order_by_desc(RatingCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Rating::from)
        .collect();

    Ok(RatingSummary {
        average: average.map(round_two).unwrap_or(0.0),
        count,
        items,
    })
}

pub async fn list_ratings(
    state: &AppState,
    course_id: &str,
) -> AppResult<ApiResponse<RatingSummary>> {
    let course = course_service::find_course(&state.orm, course_id).await?;
    let summary = summary(state, &course.id).await?;
    let meta = Meta::total(summary.items.len());
    Ok(ApiResponse::success("Ratings", summary, Some(meta)))
}

/// Ratings are one per user and course, and cannot be changed once given.
pub async fn rate_course(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
    payload: RateCourseRequest,
) -> AppResult<ApiResponse<Rating>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".into(),
        ));
    }

    let course = course_service::find_course(&state.orm, course_id).await?;

    let existing = Ratings::find()
        .filter(
            Condition::all()
                .add(RatingCol::UserId.eq(user.user_id))
                .add(RatingCol::CourseId.eq(course.id.as_str())),
        )
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest(
            "You have already rated this course".into(),
        ));
    }

    let rating = RatingActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        course_id: Set(course.id),
        rating: Set(payload.rating),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "course_rated",
        "ratings",
        serde_json::json!({ "course_id": rating.course_id, "rating": rating.rating }),
    )
    .await;

    Ok(ApiResponse::ok("Rating saved", Rating::from(rating)))
}

fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round_two;

    #[test]
    fn averages_keep_two_decimals() {
        assert_eq!(round_two(4.0), 4.0);
        assert_eq!(round_two(13.0 / 3.0), 4.33);
        assert_eq!(round_two(3.666_666), 3.67);
    }
}
