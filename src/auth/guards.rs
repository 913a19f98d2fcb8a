use chrono::Utc;
use rocket::Request;
use rocket::State;
use rocket::request::{FromRequest, Outcome};
use rocket_db_pools::sqlx::{self, Row};
use rocket_okapi::request::OpenApiFromRequest;

use crate::auth::jwt::AccessTokenClaims;
use crate::auth::{AuthError, AuthResult, AuthState};

/// Request guard for routes that require a valid bearer token.
#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthUser {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match extract_user(request).await {
            Ok(user) => Outcome::Success(user),
            Err(err) => Outcome::Error((err.status(), err)),
        }
    }
}

async fn extract_user(request: &Request<'_>) -> AuthResult<AuthUser> {
    let token = bearer_token_from_request(request)?;

    let auth_state = request
        .guard::<&State<AuthState>>()
        .await
        .succeeded()
        .ok_or_else(|| AuthError::Config("AuthState missing from state".into()))?;

    let pool = request
        .guard::<&State<sqlx::PgPool>>()
        .await
        .succeeded()
        .ok_or_else(|| AuthError::Config("database pool missing from state".into()))?;

    let claims = auth_state.jwt_service.decode_access_token(token)?;
    validate_claims(&claims)?;

    let user_id: i32 = claims.sub.parse().map_err(|_| AuthError::Unauthorized)?;

    let row = sqlx::query("SELECT email FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool.inner())
        .await?;

    let row = row.ok_or(AuthError::Unauthorized)?;
    let email: String = row.try_get("email")?;

    Ok(AuthUser { id: user_id, email })
}

fn bearer_token_from_request<'s>(request: &'s Request<'_>) -> AuthResult<&'s str> {
    let header = request
        .headers()
        .get_one("Authorization")
        .ok_or(AuthError::Unauthorized)?;
    let mut parts = header.splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default();
    if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() {
        Ok(token)
    } else {
        Err(AuthError::Unauthorized)
    }
}

fn validate_claims(claims: &AccessTokenClaims) -> AuthResult<()> {
    if claims.exp < Utc::now().timestamp() {
        return Err(AuthError::TokenExpired);
    }
    Ok(())
}
