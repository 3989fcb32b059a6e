use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    access::{self, CoursePricing, OrderSnapshot},
    audit,
    dto::courses::{Enrollment, Progress},
    entity::{
        course_videos::{Column as VideoCol, Entity as CourseVideos},
        enrollments::{ActiveModel as EnrollmentActive, Column as EnrollmentCol, Entity as Enrollments},
        payment_orders::PaymentType,
        video_completions::{
            ActiveModel as CompletionActive, Column as CompletionCol, Entity as VideoCompletions,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::{course_service, free_mode_service, payment_service},
    state::AppState,
};

/// Whole-percent progress, rounded half up and capped at 100.
pub fn progress_percent(completed: u64, total: u64) -> i32 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((completed * 100 + total / 2) / total) as i32
}

pub async fn enroll(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
) -> AppResult<ApiResponse<Enrollment>> {
    let course = course_service::find_course(&state.orm, course_id).await?;

    if let Some(existing) = find_enrollment(&state.orm, user.user_id, &course.id).await? {
        return Ok(ApiResponse::ok(
            "Already enrolled",
            Enrollment {
                course_id: existing.course_id,
                enrolled_at: existing.created_at.with_timezone(&Utc),
                already_enrolled: true,
            },
        ));
    }

    let window = free_mode_service::current_window(&state.orm).await?;
    let orders =
        payment_service::orders_for(&state.orm, user.user_id, &course.id, PaymentType::Course)
            .await?;
    let history: Vec<OrderSnapshot> = orders.iter().map(OrderSnapshot::from).collect();
    let decision =
        access::course_access(CoursePricing::from(&course), &window, &history, Utc::now());
    if decision.locked {
        tracing::debug!(
            user_id = %user.user_id,
            course_id = %course.id,
            status = ?decision.status_label,
            "enrollment blocked by payment gate"
        );
        return Err(AppError::PaymentRequired);
    }

    let inserted = Enrollments::insert(EnrollmentActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        course_id: Set(course.id.clone()),
        created_at: NotSet,
    })
    .on_conflict(
        OnConflict::columns([EnrollmentCol::UserId, EnrollmentCol::CourseId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&state.orm)
    .await?;

    let enrollment = find_enrollment(&state.orm, user.user_id, &course.id)
        .await?
        .ok_or(AppError::NotFound)?;
    if inserted == 0 {
        // A concurrent request enrolled first.
        return Ok(ApiResponse::ok(
            "Already enrolled",
            Enrollment {
                course_id: enrollment.course_id,
                enrolled_at: enrollment.created_at.with_timezone(&Utc),
                already_enrolled: true,
            },
        ));
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "course_enroll",
        "enrollments",
        serde_json::json!({
            "course_id": enrollment.course_id,
            "access": decision.status_label,
        }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Enrolled",
        Enrollment {
            course_id: enrollment.course_id,
            enrolled_at: enrollment.created_at.with_timezone(&Utc),
            already_enrolled: false,
        },
    ))
}

pub async fn progress(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
) -> AppResult<ApiResponse<Progress>> {
    let course = course_service::find_course(&state.orm, course_id).await?;
    let progress = compute_progress(&state.orm, user.user_id, &course.id).await?;
    Ok(ApiResponse::ok("Progress", progress))
}

pub async fn complete_video(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
    video_id: Uuid,
) -> AppResult<ApiResponse<Progress>> {
    let course = course_service::find_course(&state.orm, course_id).await?;
    if find_enrollment(&state.orm, user.user_id, &course.id)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest(
            "Enroll in the course before completing videos".into(),
        ));
    }

    let video = CourseVideos::find_by_id(video_id)
        .filter(VideoCol::CourseId.eq(course.id.as_str()))
        .one(&state.orm)
        .await?;
    if video.is_none() {
        return Err(AppError::NotFound);
    }

    let done = VideoCompletions::find()
        .filter(
            Condition::all()
                .add(CompletionCol::UserId.eq(user.user_id))
                .add(CompletionCol::VideoId.eq(video_id)),
        )
        .one(&state.orm)
        .await?;

    if done.is_none() {
        CompletionActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            course_id: Set(course.id.clone()),
            video_id: Set(video_id),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?;
    }

    let progress = compute_progress(&state.orm, user.user_id, &course.id).await?;
    if done.is_none() && progress.progress == 100 {
        tracing::info!(user_id = %user.user_id, course_id = %course.id, "course completed");
    }

    Ok(ApiResponse::ok("Video completed", progress))
}

pub async fn find_enrollment<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    course_id: &str,
) -> AppResult<Option<crate::entity::enrollments::Model>> {
    let enrollment = Enrollments::find()
        .filter(
            Condition::all()
                .add(EnrollmentCol::UserId.eq(user_id))
                .add(EnrollmentCol::CourseId.eq(course_id)),
        )
        .one(conn)
        .await?;
    Ok(enrollment)
}

pub async fn compute_progress<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    course_id: &str,
) -> AppResult<Progress> {
    let enrolled = find_enrollment(conn, user_id, course_id).await?.is_some();

    let total_videos = CourseVideos::find()
        .filter(VideoCol::CourseId.eq(course_id))
        .count(conn)
        .await?;

    let completed_video_ids: Vec<Uuid> = if enrolled {
        VideoCompletions::find()
            .filter(
                Condition::all()
                    .add(CompletionCol::UserId.eq(user_id))
                    .add(CompletionCol::CourseId.eq(course_id)),
            )
            .order_by_asc(CompletionCol::CreatedAt)
            .all(conn)
            .await?
            .into_iter()
            .map(|completion| completion.video_id)
            .collect()
    } else {
        Vec::new()
    };

    Ok(Progress {
        course_id: course_id.to_string(),
        enrolled,
        progress: progress_percent(completed_video_ids.len() as u64, total_videos),
        completed_video_ids,
        total_videos: total_videos as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::progress_percent;

    #[test]
    fn progress_rounds_to_whole_percent() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(0, 3), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(1, 8), 13);
        assert_eq!(progress_percent(3, 3), 100);
    }

    #[test]
    fn progress_never_exceeds_one_hundred() {
        assert_eq!(progress_percent(5, 3), 100);
    }
}
