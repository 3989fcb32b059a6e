use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        courses::{CourseDetail, CourseList, Enrollment, JourneyList, Progress, RateCourseRequest, RatingSummary},
        payments::PaymentStatusView,
    },
    entity::payment_orders::PaymentType,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Rating,
    response::ApiResponse,
    routes::params::CourseQuery,
    services::{course_service, enrollment_service, payment_service, rating_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/{id}", get(get_course))
        .route("/{id}/access", get(course_access))
        .route("/{id}/enroll", post(enroll))
        .route("/{id}/progress", get(progress))
        .route("/{id}/videos/{video_id}/complete", post(complete_video))
        .route("/{id}/ratings", get(list_ratings).post(rate_course))
}

#[utoipa::path(
    get,
    path = "/api/journeys",
    responses(
        (status = 200, description = "Journeys with their courses", body = ApiResponse<JourneyList>)
    ),
    tag = "Courses"
)]
pub async fn list_journeys(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<JourneyList>>> {
    let resp = course_service::list_journeys(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/courses",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search title, subtitle, description, category"),
        ("journey_id" = Option<String>, Query, description = "Only courses of this journey")
    ),
    responses(
        (status = 200, description = "List courses", body = ApiResponse<CourseList>)
    ),
    tag = "Courses"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> AppResult<Json<ApiResponse<CourseList>>> {
    let resp = course_service::list_courses(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course with videos and ratings", body = ApiResponse<CourseDetail>),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CourseDetail>>> {
    let resp = course_service::get_course(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/access",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Whether the course content is locked for the caller", body = ApiResponse<PaymentStatusView>),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn course_access(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<PaymentStatusView>>> {
    let resp = payment_service::payment_status(&state, &user, &id, PaymentType::Course).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/courses/{id}/enroll",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled", body = ApiResponse<Enrollment>),
        (status = 402, description = "Course requires an approved payment"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn enroll(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Enrollment>>> {
    let resp = enrollment_service::enroll(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/progress",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Caller's progress in the course", body = ApiResponse<Progress>)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Progress>>> {
    let resp = enrollment_service::progress(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/courses/{id}/videos/{video_id}/complete",
    params(
        ("id" = String, Path, description = "Course ID"),
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Updated progress", body = ApiResponse<Progress>),
        (status = 400, description = "Not enrolled"),
        (status = 404, description = "Video not found in course")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn complete_video(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, video_id)): Path<(String, Uuid)>,
) -> AppResult<Json<ApiResponse<Progress>>> {
    let resp = enrollment_service::complete_video(&state, &user, &id, video_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/ratings",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Rating summary", body = ApiResponse<RatingSummary>)
    ),
    tag = "Courses"
)]
pub async fn list_ratings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<RatingSummary>>> {
    let resp = rating_service::list_ratings(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/courses/{id}/ratings",
    params(("id" = String, Path, description = "Course ID")),
    request_body = RateCourseRequest,
    responses(
        (status = 200, description = "Rating saved", body = ApiResponse<Rating>),
        (status = 400, description = "Invalid rating or already rated")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn rate_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<RateCourseRequest>,
) -> AppResult<Json<ApiResponse<Rating>>> {
    let resp = rating_service::rate_course(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}
