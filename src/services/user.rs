use chrono::Utc;
use sea_orm::*;

use super::auth::AuthService;
use super::{ensure_deleted, patch, write_err};
use crate::{
    config::BootstrapAdmin,
    entities::{prelude::User, user, Role},
    errors::{ApiError, ApiResult},
    schemas::auth::{RegisterRequest, UpdateUserRequest},
    services::database::DatabaseConnection,
};

const NOT_FOUND: &str = "User not found";
const TAKEN: &str = "Username or email already in use";

pub struct UserService;

impl UserService {
    pub async fn list(db: &DatabaseConnection) -> ApiResult<Vec<user::Model>> {
        Ok(User::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .all(db.as_ref())
            .await?)
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> ApiResult<user::Model> {
        User::find_by_id(id)
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    /// Looks the user up by email when the login contains `@`, by username otherwise
    pub async fn find_by_login(
        db: &DatabaseConnection,
        login: &str,
    ) -> ApiResult<Option<user::Model>> {
        let column = if login.contains('@') {
            user::Column::Email
        } else {
            user::Column::Username
        };
        Ok(User::find()
            .filter(column.eq(login))
            .one(db.as_ref())
            .await?)
    }

    /// Password check for login. Unknown users and wrong passwords are indistinguishable.
    pub async fn authenticate(
        db: &DatabaseConnection,
        login: &str,
        password: &str,
    ) -> ApiResult<user::Model> {
        let rejected = || ApiError::Unauthorized("Invalid username or password".to_string());

        let user = Self::find_by_login(db, login).await?.ok_or_else(rejected)?;
        let valid =
            AuthService::verify_password(password.to_string(), user.password_hash.clone()).await?;
        if !valid {
            tracing::warn!("Failed login for {}", user.username);
            return Err(rejected());
        }
        Ok(user)
    }

    pub async fn create(
        db: &DatabaseConnection,
        request: RegisterRequest,
        bcrypt_cost: u32,
    ) -> ApiResult<user::Model> {
        let password_hash = AuthService::hash_password(request.password, bcrypt_cost).await?;

        let user = user::ActiveModel {
            username: Set(request.username.trim().to_string()),
            email: Set(request.email.trim().to_lowercase()),
            password_hash: Set(password_hash),
            role: Set(request.role),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await
        .map_err(|e| ApiError::conflict_or_db(e, TAKEN))?;

        tracing::info!("User {} created with role {:?}", user.username, user.role);
        Ok(user)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        request: UpdateUserRequest,
        bcrypt_cost: u32,
    ) -> ApiResult<user::Model> {
        let existing = Self::get(db, id).await?;

        let password_hash = match request.password {
            Some(password) => Some(AuthService::hash_password(password, bcrypt_cost).await?),
            None => None,
        };

        let mut user: user::ActiveModel = existing.into();
        patch(&mut user.username, request.username.map(|u| u.trim().to_string()));
        patch(&mut user.email, request.email.map(|e| e.trim().to_lowercase()));
        patch(&mut user.password_hash, password_hash);
        patch(&mut user.role, request.role);

        if !user.is_changed() {
            return Ok(user.try_into_model()?);
        }

        user.update(db.as_ref()).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => write_err(e, NOT_FOUND),
            other => ApiError::conflict_or_db(other, TAKEN),
        })
    }

    /// `acting_id` is the caller; removing one's own account is refused
    pub async fn delete(db: &DatabaseConnection, id: i32, acting_id: i32) -> ApiResult<()> {
        if id == acting_id {
            return Err(ApiError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }
        let result = User::delete_by_id(id).exec(db.as_ref()).await?;
        ensure_deleted(result, NOT_FOUND)
    }

    /// Creates the configured super admin while the users table is still empty
    pub async fn ensure_bootstrap_admin(
        db: &DatabaseConnection,
        admin: &BootstrapAdmin,
        bcrypt_cost: u32,
    ) -> ApiResult<()> {
        if User::find().count(db.as_ref()).await? > 0 {
            return Ok(());
        }

        let request = RegisterRequest {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password: admin.password.clone(),
            role: Role::SuperAdmin,
        };
        Self::create(db, request, bcrypt_cost).await?;
        tracing::info!("Bootstrap super admin {} created", admin.username);
        Ok(())
    }
}
