use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        admin::{AddVideoRequest, CourseStats, StatsOverview, UpdateCourseRequest},
        payments::CoursePaymentSettingsRequest,
    },
    entity::{
        course_videos::{ActiveModel as VideoActive, Column as VideoCol, Entity as CourseVideos},
        courses::ActiveModel as CourseActive,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Course, CourseVideo},
    response::ApiResponse,
    services::course_service,
    state::AppState,
    video,
};

pub async fn update_payment_settings(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
    payload: CoursePaymentSettingsRequest,
) -> AppResult<ApiResponse<Course>> {
    ensure_admin(user)?;
    if payload.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }

    let existing = course_service::find_course(&state.orm, course_id).await?;
    let mut active: CourseActive = existing.into();
    active.payment_enabled = Set(payload.payment_enabled);
    active.price = Set(payload.price);
    active.updated_at = Set(Utc::now().into());
    let course = active.update(&state.orm).await?;

    tracing::info!(
        course_id = %course.id,
        payment_enabled = course.payment_enabled,
        price = course.price,
        "course payment settings updated"
    );
    audit::record(
        &state.pool,
        Some(user.user_id),
        "course_payment_update",
        "courses",
        serde_json::json!({
            "course_id": course.id,
            "payment_enabled": course.payment_enabled,
            "price": course.price,
        }),
    )
    .await;

    Ok(ApiResponse::ok("Payment settings updated", Course::from(course)))
}

pub async fn update_course(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
    payload: UpdateCourseRequest,
) -> AppResult<ApiResponse<Course>> {
    ensure_admin(user)?;
    let existing = course_service::find_course(&state.orm, course_id).await?;

    let mut active: CourseActive = existing.into();
    if let Some(title) = payload.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("title must not be empty".into()));
        }
        active.title = Set(title);
    }
    if let Some(subtitle) = payload.subtitle {
        active.subtitle = Set(Some(subtitle));
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(category) = payload.category {
        active.category = Set(Some(category));
    }
    if let Some(finished) = payload.finished {
        active.finished = Set(finished);
    }
    active.updated_at = Set(Utc::now().into());
    let course = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "course_update",
        "courses",
        serde_json::json!({ "course_id": course.id }),
    )
    .await;

    Ok(ApiResponse::ok("Course updated", Course::from(course)))
}

pub async fn add_video(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
    payload: AddVideoRequest,
) -> AppResult<ApiResponse<CourseVideo>> {
    ensure_admin(user)?;
    let title = payload.title.trim().to_string();
    let url = payload.url.trim().to_string();
    if title.is_empty() || url.is_empty() {
        return Err(AppError::BadRequest("title and url are required".into()));
    }
    if video::resolve(&url).is_none() {
        return Err(AppError::BadRequest(
            "url must be an http(s) link".into(),
        ));
    }

    let course = course_service::find_course(&state.orm, course_id).await?;
    let position = match payload.position {
        Some(position) => position,
        None => CourseVideos::find()
            .filter(VideoCol::CourseId.eq(course.id.as_str()))
            .count(&state.orm)
            .await? as i32,
    };

    let video = VideoActive {
        id: Set(Uuid::new_v4()),
        course_id: Set(course.id),
        title: Set(title),
        url: Set(url),
        position: Set(position),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "course_video_added",
        "course_videos",
        serde_json::json!({ "course_id": video.course_id, "video_id": video.id }),
    )
    .await;

    Ok(ApiResponse::ok("Video added", CourseVideo::from(video)))
}

pub async fn remove_video(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
    video_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = CourseVideos::delete_many()
        .filter(
            Condition::all()
                .add(VideoCol::Id.eq(video_id))
                .add(VideoCol::CourseId.eq(course_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "course_video_removed",
        "course_videos",
        serde_json::json!({ "course_id": course_id, "video_id": video_id }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Video removed",
        serde_json::json!({ "id": video_id }),
    ))
}

#[derive(sqlx::FromRow)]
struct CourseStatsRow {
    course_id: String,
    title: String,
    student_count: i64,
}

pub async fn stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<StatsOverview>> {
    ensure_admin(user)?;
    let rows = sqlx::query_as::<_, CourseStatsRow>(
        r#"
        SELECT c.id AS course_id, c.title, COUNT(e.id) AS student_count
        FROM courses c
        LEFT JOIN enrollments e ON e.course_id = c.id
        GROUP BY c.id, c.title
        ORDER BY student_count DESC, c.title ASC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let courses: Vec<CourseStats> = rows
        .into_iter()
        .map(|row| CourseStats {
            course_id: row.course_id,
            title: row.title,
            student_count: row.student_count,
        })
        .collect();
    let total_students = courses.iter().map(|c| c.student_count).sum();

    Ok(ApiResponse::ok(
        "Enrollment statistics",
        StatsOverview {
            courses,
            total_students,
            generated_at: Utc::now(),
        },
    ))
}
