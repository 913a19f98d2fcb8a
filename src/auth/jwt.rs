use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::auth::{AuthConfig, AuthResult};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct SignedAccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_token_ttl: Duration,
}

impl JwtService {
    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        let secret_bytes = config.jwt_secret.as_bytes();
        let encoding_key = EncodingKey::from_secret(secret_bytes);
        let decoding_key = DecodingKey::from_secret(secret_bytes);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[config.audience.clone()]);
        validation.set_issuer(&[config.issuer.clone()]);
        validation.leeway = 30;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_token_ttl: Duration::seconds(config.access_token_ttl_secs),
        })
    }

    pub fn issue_access_token(&self, user_id: i32, email: &str) -> AuthResult<SignedAccessToken> {
        let now = Utc::now();
        let expires_at = now + self.access_token_ttl;

        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            email: email.to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(SignedAccessToken { token, expires_at })
    }

    pub fn decode_access_token(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;

    const TEST_JWT_SECRET: &str = "super-secret-test-key";

    fn make_test_config() -> AuthConfig {
        AuthConfig {
            issuer: "https://vehicle-explorer.test".into(),
            audience: "vehicle-explorer".into(),
            access_token_ttl_secs: 3600,
            jwt_secret: TEST_JWT_SECRET.into(),
        }
    }

    #[test]
    fn issues_and_decodes_access_tokens() {
        let config = make_test_config();
        let service = JwtService::from_config(&config).expect("jwt service");

        let token = service
            .issue_access_token(42, "user@example.com")
            .expect("issue token");

        let claims = service
            .decode_access_token(&token.token)
            .expect("decode token");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "user@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_tokens_signed_with_a_different_secret() {
        let service = JwtService::from_config(&make_test_config()).expect("jwt service");

        let mut other_config = make_test_config();
        other_config.jwt_secret = "some-other-secret".into();
        let other = JwtService::from_config(&other_config).expect("jwt service");

        let token = other
            .issue_access_token(7, "user@example.com")
            .expect("issue token");

        assert!(service.decode_access_token(&token.token).is_err());
    }
}
