use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{AddVideoRequest, StatsOverview, UpdateCourseRequest},
        certificates::{CertificateRequestList, UpdateCertificateStatusRequest},
        free_mode::{FreeModeSettingsView, UpdateFreeModeRequest},
        payments::{CoursePaymentSettingsRequest, PaymentOrderList, RejectOrderRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{CertificateRequest, Course, CourseVideo, PaymentOrder},
    response::ApiResponse,
    routes::params::{CertificateListQuery, OrderListQuery},
    services::{admin_service, certificate_service, free_mode_service, payment_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_orders))
        .route("/payments/pending", get(list_pending))
        .route("/payments/{id}", delete(delete_order))
        .route("/payments/{id}/approve", post(approve_order))
        .route("/payments/{id}/reject", post(reject_order))
        .route("/free-mode", get(get_free_mode).put(update_free_mode))
        .route("/courses/{id}", patch(update_course))
        .route("/courses/{id}/payment", put(update_payment_settings))
        .route("/courses/{id}/videos", post(add_video))
        .route("/courses/{id}/videos/{video_id}", delete(remove_video))
        .route("/certificates", get(list_certificate_requests))
        .route("/certificates/{id}", patch(update_certificate_status))
        .route("/stats", get(stats))
}

#[utoipa::path(
    get,
    path = "/api/admin/payments",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "pending, awaiting_verification, approved, rejected"),
        ("payment_type" = Option<String>, Query, description = "course or certificate"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "All payment orders (admin only)", body = ApiResponse<PaymentOrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<PaymentOrderList>>> {
    let resp = payment_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/payments/pending",
    responses(
        (status = 200, description = "Orders awaiting verification, newest first", body = ApiResponse<PaymentOrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_pending(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PaymentOrderList>>> {
    let resp = payment_service::list_pending(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/payments/{id}/approve",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order approved", body = ApiResponse<PaymentOrder>),
        (status = 400, description = "Order is not awaiting verification"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn approve_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PaymentOrder>>> {
    let resp = payment_service::approve_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/payments/{id}/reject",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = RejectOrderRequest,
    responses(
        (status = 200, description = "Order rejected", body = ApiResponse<PaymentOrder>),
        (status = 400, description = "Order is not awaiting verification"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn reject_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<RejectOrderRequest>>,
) -> AppResult<Json<ApiResponse<PaymentOrder>>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let resp = payment_service::reject_order(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/payments/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted; any access it granted is revoked"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = payment_service::delete_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/free-mode",
    responses(
        (status = 200, description = "Stored free mode window", body = ApiResponse<FreeModeSettingsView>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_free_mode(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<FreeModeSettingsView>>> {
    let resp = free_mode_service::get_settings(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/free-mode",
    request_body = UpdateFreeModeRequest,
    responses(
        (status = 200, description = "Free mode window saved", body = ApiResponse<FreeModeSettingsView>),
        (status = 400, description = "Missing dates or end not after start"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_free_mode(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateFreeModeRequest>,
) -> AppResult<Json<ApiResponse<FreeModeSettingsView>>> {
    let resp = free_mode_service::update_settings(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = ApiResponse<Course>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCourseRequest>,
) -> AppResult<Json<ApiResponse<Course>>> {
    let resp = admin_service::update_course(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/courses/{id}/payment",
    params(("id" = String, Path, description = "Course ID")),
    request_body = CoursePaymentSettingsRequest,
    responses(
        (status = 200, description = "Payment settings updated", body = ApiResponse<Course>),
        (status = 400, description = "Negative price"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_payment_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CoursePaymentSettingsRequest>,
) -> AppResult<Json<ApiResponse<Course>>> {
    let resp = admin_service::update_payment_settings(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/courses/{id}/videos",
    params(("id" = String, Path, description = "Course ID")),
    request_body = AddVideoRequest,
    responses(
        (status = 200, description = "Video added", body = ApiResponse<CourseVideo>),
        (status = 400, description = "Missing title or unsupported URL"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn add_video(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<AddVideoRequest>,
) -> AppResult<Json<ApiResponse<CourseVideo>>> {
    let resp = admin_service::add_video(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/courses/{id}/videos/{video_id}",
    params(
        ("id" = String, Path, description = "Course ID"),
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video removed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn remove_video(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, video_id)): Path<(String, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::remove_video(&state, &user, &id, video_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/certificates",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "sent, approved, rejected")
    ),
    responses(
        (status = 200, description = "Certificate requests", body = ApiResponse<CertificateRequestList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_certificate_requests(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CertificateListQuery>,
) -> AppResult<Json<ApiResponse<CertificateRequestList>>> {
    let resp = certificate_service::list_requests(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/certificates/{id}",
    params(("id" = Uuid, Path, description = "Certificate request ID")),
    request_body = UpdateCertificateStatusRequest,
    responses(
        (status = 200, description = "Request reviewed", body = ApiResponse<CertificateRequest>),
        (status = 400, description = "Invalid status or already reviewed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_certificate_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCertificateStatusRequest>,
) -> AppResult<Json<ApiResponse<CertificateRequest>>> {
    let resp = certificate_service::update_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Students per course", body = ApiResponse<StatsOverview>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<StatsOverview>>> {
    let resp = admin_service::stats(&state, &user).await?;
    Ok(Json(resp))
}
