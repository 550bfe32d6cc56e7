use crate::config::JwtConfig;
use crate::entities::user::{self, Role};
use crate::errors::{ApiError, ApiResult};
use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::task;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify,
};

/// JWT claims carried by every admin request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// User id
    pub id: i32,
    pub role: Role,
    /// Expiry as a unix timestamp
    pub exp: usize,
}

impl Claims {
    pub fn for_user(user: &user::Model, ttl_secs: u64) -> Self {
        Self {
            sub: user.username.clone(),
            id: user.id,
            role: user.role.clone(),
            exp: (Utc::now().timestamp() as u64 + ttl_secs) as usize,
        }
    }

    /// 403 unless the caller holds one of `roles`
    pub fn require_role(&self, roles: &[Role]) -> ApiResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Insufficient role for this operation".to_string(),
            ))
        }
    }
}

/// Registers the bearer scheme in the OpenAPI document
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert(Default::default());
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub struct AuthService;

impl AuthService {
    pub fn create_access_token(claims: &Claims, config: &JwtConfig) -> Result<String> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(config.secret.as_ref()),
        )
        .map_err(Into::into)
    }

    /// Checks signature and expiry
    pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, String> {
        let claims = Self::decode_token(token, config)?;
        Self::check_token_expiry(&claims)?;
        Ok(claims)
    }

    /// bcrypt is slow on purpose, keep it off the async workers
    pub async fn hash_password(password: String, cost: u32) -> ApiResult<String> {
        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|_| ApiError::Internal("Password hashing task failed".to_string()))?
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {e}")))
    }

    pub async fn verify_password(password: String, hashed_password: String) -> ApiResult<bool> {
        task::spawn_blocking(move || bcrypt::verify(password, &hashed_password))
            .await
            .map_err(|_| ApiError::Internal("Password check task failed".to_string()))?
            .map_err(|e| ApiError::Internal(format!("Password check failed: {e}")))
    }

    fn decode_token(token: &str, config: &JwtConfig) -> Result<Claims, String> {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked by hand so the message is ours
        validation.validate_exp = false;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidToken => "Invalid token".to_string(),
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                "Invalid token signature".to_string()
            }
            _ => "Token verification failed".to_string(),
        })
    }

    fn check_token_expiry(claims: &Claims) -> Result<(), String> {
        let now = Utc::now().timestamp() as usize;
        if claims.exp < now {
            Err("Token expired".to_string())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
            bcrypt_cost: 4,
        }
    }

    fn claims(role: Role, exp: usize) -> Claims {
        Claims {
            sub: "editor".to_string(),
            id: 7,
            role,
            exp,
        }
    }

    #[test]
    fn token_round_trip_keeps_identity() {
        let config = jwt_config();
        let exp = Utc::now().timestamp() as usize + 60;
        let token = AuthService::create_access_token(&claims(Role::Editor, exp), &config).unwrap();

        let decoded = AuthService::verify_token(&token, &config).unwrap();
        assert_eq!(decoded.id, 7);
        assert_eq!(decoded.role, Role::Editor);
    }

    #[test]
    fn expired_and_foreign_tokens_are_rejected() {
        let config = jwt_config();
        let expired = AuthService::create_access_token(&claims(Role::Admin, 1), &config).unwrap();
        assert_eq!(
            AuthService::verify_token(&expired, &config).unwrap_err(),
            "Token expired"
        );

        let other = JwtConfig {
            secret: "other-secret".to_string(),
            ..jwt_config()
        };
        let exp = Utc::now().timestamp() as usize + 60;
        let foreign = AuthService::create_access_token(&claims(Role::Admin, exp), &other).unwrap();
        assert!(AuthService::verify_token(&foreign, &config).is_err());
    }

    #[test]
    fn role_check_distinguishes_forbidden() {
        let c = claims(Role::Editor, 0);
        assert!(c.require_role(&[Role::Editor, Role::Admin]).is_ok());
        assert!(matches!(
            c.require_role(&[Role::SuperAdmin]),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hash = AuthService::hash_password("s3cret!".to_string(), 4)
            .await
            .unwrap();
        assert!(AuthService::verify_password("s3cret!".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!AuthService::verify_password("wrong".to_string(), hash)
            .await
            .unwrap());
    }
}
