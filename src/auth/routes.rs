use rocket::http::Status;
use rocket::post;
use rocket::response::{self, Responder, status};
use rocket::serde::json::Json;
use rocket::{Request, State};
use rocket_db_pools::sqlx::{self, Row};
use rocket_okapi::openapi;

use crate::auth::responses::{AuthResponse, LoginRequest, RegisterRequest};
use crate::auth::{AuthError, AuthState};

/// Non-success outcome of an auth route: an HTTP status plus the same
/// payload shape the success path uses, with `success: false`.
#[derive(Debug)]
pub struct AuthFailure {
    status: Status,
    body: AuthResponse,
}

impl<'r> Responder<'r, 'static> for AuthFailure {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        status::Custom(self.status, Json(self.body)).respond_to(request)
    }
}

impl rocket_okapi::response::OpenApiResponderInner for AuthFailure {
    fn responses(
        _gen: &mut rocket_okapi::r#gen::OpenApiGenerator,
    ) -> rocket_okapi::Result<okapi::openapi3::Responses> {
        let mut responses = okapi::openapi3::Responses::default();
        rocket_okapi::util::ensure_status_code_exists(&mut responses, 400);
        rocket_okapi::util::ensure_status_code_exists(&mut responses, 401);
        rocket_okapi::util::ensure_status_code_exists(&mut responses, 500);
        Ok(responses)
    }
}

type AuthRouteResult = Result<Json<AuthResponse>, AuthFailure>;

/// Register a new account and return a signed access token.
#[openapi(tag = "Auth")]
#[post("/auth/register", data = "<payload>")]
pub async fn register(
    state: &State<AuthState>,
    pool: &State<sqlx::PgPool>,
    payload: Json<RegisterRequest>,
) -> AuthRouteResult {
    let email = payload.email.trim().to_lowercase();
    let password = payload.password.trim();

    if email.is_empty() || password.is_empty() {
        return Err(respond_message(
            Status::BadRequest,
            "Email and password are required",
        ));
    }

    let existing = sqlx::query("SELECT id FROM users WHERE lower(email) = $1")
        .bind(&email)
        .fetch_optional(pool.inner())
        .await
        .map_err(|err| respond_error(AuthError::from(err)))?;

    if existing.is_some() {
        return Err(respond_error(AuthError::EmailTaken));
    }

    let password_hash = state
        .password_service
        .hash_password(password)
        .map_err(respond_error)?;

    let row = sqlx::query(
        r#"INSERT INTO users (email, first_name, last_name, password_hash)
           VALUES ($1, $2, $3, $4)
           RETURNING id"#,
    )
    .bind(&email)
    .bind(payload.first_name.as_deref())
    .bind(payload.last_name.as_deref())
    .bind(&password_hash)
    .fetch_one(pool.inner())
    .await
    .map_err(|err| respond_error(AuthError::from(err)))?;

    let user_id: i32 = row
        .try_get("id")
        .map_err(|err| respond_error(AuthError::from(err)))?;

    let signed = state
        .jwt_service
        .issue_access_token(user_id, &email)
        .map_err(respond_error)?;

    log::info!("user registered: {}", email);

    Ok(Json(AuthResponse {
        success: true,
        message: Some("User registered successfully".into()),
        token: Some(signed.token),
        expiration: Some(signed.expires_at),
    }))
}

/// Verify credentials and return a signed access token.
#[openapi(tag = "Auth")]
#[post("/auth/login", data = "<payload>")]
pub async fn login(
    state: &State<AuthState>,
    pool: &State<sqlx::PgPool>,
    payload: Json<LoginRequest>,
) -> AuthRouteResult {
    let email = payload.email.trim().to_lowercase();
    let password = payload.password.trim();

    if email.is_empty() || password.is_empty() {
        return Err(respond_message(
            Status::BadRequest,
            "Email and password are required",
        ));
    }

    let row = sqlx::query("SELECT id, email, password_hash FROM users WHERE lower(email) = $1")
        .bind(&email)
        .fetch_optional(pool.inner())
        .await
        .map_err(|err| respond_error(AuthError::from(err)))?;

    let row = match row {
        Some(row) => row,
        None => return Err(invalid_credentials()),
    };

    let user_id: i32 = row
        .try_get("id")
        .map_err(|err| respond_error(AuthError::from(err)))?;
    let db_email: String = row
        .try_get("email")
        .map_err(|err| respond_error(AuthError::from(err)))?;
    let password_hash: String = row
        .try_get("password_hash")
        .map_err(|err| respond_error(AuthError::from(err)))?;

    let verified = state
        .password_service
        .verify_password(password, &password_hash)
        .map_err(respond_error)?;

    if !verified {
        return Err(invalid_credentials());
    }

    let signed = state
        .jwt_service
        .issue_access_token(user_id, &db_email)
        .map_err(respond_error)?;

    log::info!("user logged in: {}", db_email);

    Ok(Json(AuthResponse {
        success: true,
        message: Some("Login successful".into()),
        token: Some(signed.token),
        expiration: Some(signed.expires_at),
    }))
}

fn invalid_credentials() -> AuthFailure {
    respond_message(Status::Unauthorized, "Invalid username or password")
}

fn respond_message(code: Status, message: &str) -> AuthFailure {
    AuthFailure {
        status: code,
        body: AuthResponse::failure(message),
    }
}

fn respond_error(err: AuthError) -> AuthFailure {
    if err.status() == Status::InternalServerError {
        log::error!("auth failure: {}", err);
    }
    respond_message(err.status(), &err.to_string())
}
