use axum::extract::FromRef;
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::debug;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

/// Verification half of the provider's HS256 keys.
#[derive(Clone)]
pub struct JwtKeys {
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
}

impl JwtKeys {
    pub fn from_config(config: &JwtConfig) -> Self {
        Self {
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, role = ?data.claims.role, "jwt verified");
        Ok(data.claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

/// Signs tokens the way the identity provider does.
#[cfg(test)]
pub(crate) fn sign_for_tests(config: &JwtConfig, user_id: uuid::Uuid, ttl_secs: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::OffsetDateTime;

    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        sub: user_id,
        iat: now as usize,
        exp: (now + ttl_secs) as usize,
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        role: Some("authenticated".into()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .expect("sign test token")
}
