use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

use crate::{
    access::FreeModeWindow,
    audit,
    dto::free_mode::{FreeModeSettingsView, FreeModeStatus, UpdateFreeModeRequest},
    entity::free_mode_settings::{
        ActiveModel as SettingsActive, Entity as FreeModeSettings, Model as SettingsModel,
        SINGLETON_ID,
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    response::ApiResponse,
    state::AppState,
};

/// Read the stored window. A missing row means free mode was never configured.
pub async fn current_window<C: ConnectionTrait>(conn: &C) -> AppResult<FreeModeWindow> {
    let settings = FreeModeSettings::find_by_id(SINGLETON_ID).one(conn).await?;
    Ok(settings
        .as_ref()
        .map(FreeModeWindow::from)
        .unwrap_or_default())
}

pub async fn get_status(state: &AppState) -> AppResult<ApiResponse<FreeModeStatus>> {
    let window = current_window(&state.orm).await?;
    let now = Utc::now();
    let status = FreeModeStatus {
        is_enabled: window.is_enabled,
        is_active: window.is_active(now),
        phase: window.phase(now),
        countdown_to: window.countdown_to(now),
        checked_at: now,
    };
    Ok(ApiResponse::ok("Free mode status", status))
}

pub async fn get_settings(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<FreeModeSettingsView>> {
    ensure_admin(user)?;
    let settings = FreeModeSettings::find_by_id(SINGLETON_ID)
        .one(&state.orm)
        .await?;
    let view = match settings {
        Some(model) => settings_view(model),
        None => FreeModeSettingsView {
            is_enabled: false,
            start_at: None,
            end_at: None,
            updated_at: None,
        },
    };
    Ok(ApiResponse::ok("Free mode settings", view))
}

pub async fn update_settings(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateFreeModeRequest,
) -> AppResult<ApiResponse<FreeModeSettingsView>> {
    ensure_admin(user)?;

    let window = FreeModeWindow {
        is_enabled: payload.is_enabled,
        start_at: payload.start_at,
        end_at: payload.end_at,
    };
    window.validate()?;

    let now = Utc::now();
    let existing = FreeModeSettings::find_by_id(SINGLETON_ID)
        .one(&state.orm)
        .await?;
    let (mut active, exists): (SettingsActive, bool) = match existing {
        Some(model) => (model.into(), true),
        None => (
            SettingsActive {
                id: Set(SINGLETON_ID),
                ..Default::default()
            },
            false,
        ),
    };
    active.is_enabled = Set(window.is_enabled);
    active.start_at = Set(window.start_at.map(Into::into));
    active.end_at = Set(window.end_at.map(Into::into));
    active.updated_by = Set(Some(user.user_id));
    active.updated_at = Set(now.into());

    let saved = if exists {
        active.update(&state.orm).await?
    } else {
        active.insert(&state.orm).await?
    };

    tracing::info!(
        admin = %user.user_id,
        enabled = saved.is_enabled,
        active = window.is_active(now),
        "free mode settings updated"
    );

    audit::record(
        &state.pool,
        Some(user.user_id),
        "free_mode_update",
        "free_mode_settings",
        serde_json::json!({
            "is_enabled": saved.is_enabled,
            "start_at": window.start_at,
            "end_at": window.end_at,
        }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Free mode settings updated",
        settings_view(saved),
    ))
}

fn settings_view(model: SettingsModel) -> FreeModeSettingsView {
    FreeModeSettingsView {
        is_enabled: model.is_enabled,
        start_at: model.start_at.map(|dt| dt.with_timezone(&Utc)),
        end_at: model.end_at.map(|dt| dt.with_timezone(&Utc)),
        updated_at: Some(model.updated_at.with_timezone(&Utc)),
    }
}
