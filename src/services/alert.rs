use chrono::Utc;
use sea_orm::*;

use super::{ensure_deleted, write_err};
use crate::{
    entities::{alert, prelude::Alert},
    errors::{ApiError, ApiResult},
    schemas::alerts::AlertRequest,
    services::database::DatabaseConnection,
};

const NOT_FOUND: &str = "Alert not found";

pub struct AlertService;

impl AlertService {
    /// The public list only carries active alerts inside their display window
    pub async fn list(db: &DatabaseConnection, include_hidden: bool) -> ApiResult<Vec<alert::Model>> {
        let mut select = Alert::find();
        if !include_hidden {
            select = select.filter(alert::Column::IsActive.eq(true));
        }

        let alerts = select
            .order_by_desc(alert::Column::CreatedAt)
            .order_by_desc(alert::Column::Id)
            .all(db.as_ref())
            .await?;

        if include_hidden {
            return Ok(alerts);
        }
        let now = Utc::now();
        Ok(alerts.into_iter().filter(|a| a.is_current(now)).collect())
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
        include_hidden: bool,
    ) -> ApiResult<alert::Model> {
        let alert = Self::find_any(db, id).await?;
        if !include_hidden && !(alert.is_active && alert.is_current(Utc::now())) {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(alert)
    }

    async fn find_any(db: &DatabaseConnection, id: i32) -> ApiResult<alert::Model> {
        Alert::find_by_id(id)
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(db: &DatabaseConnection, request: AlertRequest) -> ApiResult<alert::Model> {
        check_window(&request)?;

        let now = Utc::now();
        let mut alert = alert::ActiveModel {
            created_at: Set(now),
            ..Default::default()
        };
        assign(&mut alert, request);
        alert.updated_at = Set(now);

        Ok(alert.insert(db.as_ref()).await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        request: AlertRequest,
    ) -> ApiResult<alert::Model> {
        check_window(&request)?;
        let existing = Self::find_any(db, id).await?;

        let mut alert: alert::ActiveModel = existing.into();
        assign(&mut alert, request);
        alert.updated_at = Set(Utc::now());

        alert
            .update(db.as_ref())
            .await
            .map_err(|e| write_err(e, NOT_FOUND))
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> ApiResult<()> {
        let result = Alert::delete_by_id(id).exec(db.as_ref()).await?;
        ensure_deleted(result, NOT_FOUND)
    }
}

fn check_window(request: &AlertRequest) -> ApiResult<()> {
    if let (Some(start), Some(end)) = (request.starts_at, request.ends_at) {
        if end <= start {
            return Err(ApiError::Validation(
                "ends_at must be later than starts_at".to_string(),
            ));
        }
    }
    Ok(())
}

fn assign(alert: &mut alert::ActiveModel, request: AlertRequest) {
    alert.message_en = Set(request.message_en);
    alert.message_am = Set(request.message_am);
    alert.message_or = Set(request.message_or);
    alert.level = Set(request.level);
    alert.link_url = Set(request.link_url);
    alert.starts_at = Set(request.starts_at);
    alert.ends_at = Set(request.ends_at);
    alert.is_active = Set(request.is_active);
}
