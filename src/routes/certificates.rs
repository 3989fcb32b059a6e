use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::certificates::{CertificateRequestResult, RequestCertificateRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::CertificateRequest,
    response::ApiResponse,
    services::certificate_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{course_id}", get(get_my_request).post(request_certificate))
}

#[utoipa::path(
    post,
    path = "/api/certificates/{course_id}",
    params(("course_id" = String, Path, description = "Course ID")),
    request_body = RequestCertificateRequest,
    responses(
        (status = 200, description = "Certificate requested (or already requested)", body = ApiResponse<CertificateRequestResult>),
        (status = 400, description = "Course not completed"),
        (status = 402, description = "Certificate payment not approved")
    ),
    security(("bearer_auth" = [])),
    tag = "Certificates"
)]
pub async fn request_certificate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<String>,
    payload: Option<Json<RequestCertificateRequest>>,
) -> AppResult<Json<ApiResponse<CertificateRequestResult>>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let resp = certificate_service::request_certificate(&state, &user, &course_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/certificates/{course_id}",
    params(("course_id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Caller's certificate request", body = ApiResponse<CertificateRequest>),
        (status = 404, description = "No request for this course")
    ),
    security(("bearer_auth" = [])),
    tag = "Certificates"
)]
pub async fn get_my_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<String>,
) -> AppResult<Json<ApiResponse<CertificateRequest>>> {
    let resp = certificate_service::get_my_request(&state, &user, &course_id).await?;
    Ok(Json(resp))
}
