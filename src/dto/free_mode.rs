use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::access::FreeModePhase;

#[derive(Debug, Serialize, ToSchema)]
pub struct FreeModeSettingsView {
    pub is_enabled: bool,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFreeModeRequest {
    pub is_enabled: bool,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FreeModeStatus {
    pub is_enabled: bool,
    pub is_active: bool,
    pub phase: FreeModePhase,
    pub countdown_to: Option<DateTime<Utc>>,
    pub checked_at: DateTime<Utc>,
}
