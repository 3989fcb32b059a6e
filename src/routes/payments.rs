use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::payments::{CreatePaymentOrderRequest, PaymentInstructions, PaymentOrderList, PaymentStatusView},
    error::AppResult,
    middleware::auth::AuthUser,
    models::PaymentOrder,
    response::ApiResponse,
    routes::params::{OrderListQuery, PaymentTypeQuery},
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_my_orders).post(create_order))
        .route("/status/{course_id}", get(payment_status))
        .route("/instructions", get(instructions))
}

#[utoipa::path(
    post,
    path = "/api/payments/orders",
    request_body = CreatePaymentOrderRequest,
    responses(
        (status = 201, description = "Payment claim recorded, awaiting verification", body = ApiResponse<PaymentOrder>),
        (status = 400, description = "Course not payable, already approved or already awaiting verification"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePaymentOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PaymentOrder>>)> {
    let resp = payment_service::create_order(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/payments/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("payment_type" = Option<String>, Query, description = "course or certificate"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Caller's payment orders", body = ApiResponse<PaymentOrderList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn list_my_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<PaymentOrderList>>> {
    let resp = payment_service::list_my_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/status/{course_id}",
    params(
        ("course_id" = String, Path, description = "Course ID"),
        ("payment_type" = Option<String>, Query, description = "course (default) or certificate")
    ),
    responses(
        (status = 200, description = "Access decision and latest order", body = ApiResponse<PaymentStatusView>),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn payment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<String>,
    Query(query): Query<PaymentTypeQuery>,
) -> AppResult<Json<ApiResponse<PaymentStatusView>>> {
    let resp =
        payment_service::payment_status(&state, &user, &course_id, query.payment_type).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/instructions",
    responses(
        (status = 200, description = "Bank transfer details", body = ApiResponse<PaymentInstructions>)
    ),
    tag = "Payments"
)]
pub async fn instructions(State(state): State<AppState>) -> Json<ApiResponse<PaymentInstructions>> {
    Json(payment_service::instructions(&state).await)
}
