use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::free_mode::FreeModeStatus, error::AppResult, response::ApiResponse,
    services::free_mode_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(free_mode_status))
}

#[utoipa::path(
    get,
    path = "/api/free-mode",
    responses(
        (status = 200, description = "Whether free mode is running and when it starts or ends", body = ApiResponse<FreeModeStatus>)
    ),
    tag = "Free mode"
)]
pub async fn free_mode_status(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<FreeModeStatus>>> {
    let resp = free_mode_service::get_status(&state).await?;
    Ok(Json(resp))
}
