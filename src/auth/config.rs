use crate::auth::{AuthError, AuthResult};

/// Authentication configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub access_token_ttl_secs: i64,
    pub jwt_secret: String,
}

impl AuthConfig {
    pub fn from_env() -> AuthResult<Self> {
        let issuer =
            std::env::var("VEHICLE_API_JWT_ISSUER").unwrap_or_else(|_| "http://localhost".into());
        let audience =
            std::env::var("VEHICLE_API_JWT_AUDIENCE").unwrap_or_else(|_| "vehicle-explorer".into());
        let access_token_ttl_secs = std::env::var("VEHICLE_API_ACCESS_TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(3600);
        let jwt_secret = std::env::var("VEHICLE_API_JWT_SECRET")
            .map_err(|_| AuthError::Config("VEHICLE_API_JWT_SECRET is required".into()))?;

        Ok(Self {
            issuer,
            audience,
            access_token_ttl_secs,
            jwt_secret,
        })
    }
}
