use std::time::Duration;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{config::JwtConfig, error::AppError, state::AppState};

use super::claims::Claims;

/// Signing and verification keys plus token parameters, built from config.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ttl_hours,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::from_secs((ttl_hours as u64) * 3600),
        }
    }
}

impl JwtKeys {
    /// Issue a bearer token embedding the user id and display name.
    pub fn sign(&self, user_id: Uuid, name: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            name: name.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Check signature, issuer/audience and expiry; return the embedded
    /// identity. Expiry is reported apart from the other failure modes.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(user_id = %data.claims.sub, "jwt verified");
                Ok(data.claims)
            }
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                Err(AppError::ExpiredToken)
            }
            Err(_) => Err(AppError::InvalidToken),
        }
    }
}

/// Verified identity extracted from the `Authorization: Bearer` header.
/// Handlers taking this never see an unauthenticated request.
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(AppError::MissingToken)?;

        let claims = keys.verify(token).map_err(|e| {
            warn!("token rejected");
            e
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            name: claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    fn keys_with_secret(secret: &str) -> JwtKeys {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl: Duration::from_secs(24 * 3600),
        }
    }

    #[tokio::test]
    async fn sign_then_verify_returns_the_identity() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "vasu").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.name, "vasu");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[tokio::test]
    async fn expiry_is_reported_distinctly() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc();
        // Well past the decoder's default leeway.
        let claims = Claims {
            sub: Uuid::new_v4(),
            name: "stale".into(),
            iat: (now - TimeDuration::hours(25)).unix_timestamp() as usize,
            exp: (now - TimeDuration::hours(1)).unix_timestamp() as usize,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(matches!(keys.verify(&token), Err(AppError::ExpiredToken)));
    }

    #[tokio::test]
    async fn tampered_token_is_invalid() {
        let keys = make_keys();
        let mut token = keys.sign(Uuid::new_v4(), "mallory").expect("sign");
        token.pop();
        assert!(matches!(keys.verify(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_invalid() {
        let ours = make_keys();
        let theirs = keys_with_secret("some-other-secret");
        let token = theirs.sign(Uuid::new_v4(), "stranger").expect("sign");
        assert!(matches!(ours.verify(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn wrong_audience_is_invalid() {
        let keys = make_keys();
        let mut other = keys_with_secret("test-secret");
        other.audience = "someone-else".into();
        let token = other.sign(Uuid::new_v4(), "guest").expect("sign");
        assert!(matches!(keys.verify(&token), Err(AppError::InvalidToken)));
    }
}
