use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::entities::AlertLevel;

/// JSON body for alerts, used for create and full replacement
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AlertRequest {
    #[validate(length(min = 1, max = 2000, message = "message_en is required"))]
    pub message_en: String,
    pub message_am: Option<String>,
    pub message_or: Option<String>,
    #[serde(default = "default_level")]
    pub level: AlertLevel,
    #[validate(url(message = "link_url must be a URL"))]
    pub link_url: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_level() -> AlertLevel {
    AlertLevel::Info
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AlertQuery {
    pub admin: Option<bool>,
}
