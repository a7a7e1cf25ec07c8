use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use corkboard_types::api::Claims;

/// Process-wide token configuration: loaded once at startup, immutable after.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub algorithm: Algorithm,
    pub token_ttl_days: i64,
}

/// Issue a signed bearer token for a user. Expiry is `token_ttl_days` from
/// now.
pub fn issue(cfg: &AuthConfig, user_id: Uuid, name: &str) -> Result<String> {
    let claims = Claims {
        sub: user_id,
        name: name.to_string(),
        exp: (Utc::now() + Duration::days(cfg.token_ttl_days)).timestamp() as usize,
    };

    let token = encode(
        &Header::new(cfg.algorithm),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify signature, shape, and expiry. Tokens missing `sub` or `name` fail
/// to decode into `Claims` and are rejected like any other invalid token.
/// No clock-skew leeway.
pub fn verify(cfg: &AuthConfig, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(cfg.algorithm);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(ttl_days: i64) -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            algorithm: Algorithm::HS256,
            token_ttl_days: ttl_days,
        }
    }

    #[test]
    fn issue_verify_roundtrip() {
        let cfg = test_config(7);
        let user_id = Uuid::new_v4();

        let token = issue(&cfg, user_id, "alice").unwrap();
        let claims = verify(&cfg, &token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.name, "alice");
        assert!(claims.exp > Utc::now().timestamp() as usize);
    }

    #[test]
    fn expired_token_rejected() {
        let cfg = test_config(-1);
        let token = issue(&cfg, Uuid::new_v4(), "alice").unwrap();
        assert!(verify(&cfg, &token).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let cfg = test_config(7);
        let token = issue(&cfg, Uuid::new_v4(), "alice").unwrap();

        let other = AuthConfig {
            jwt_secret: "other-secret".into(),
            ..test_config(7)
        };
        assert!(verify(&other, &token).is_err());
    }

    #[test]
    fn missing_name_claim_rejected() {
        let cfg = test_config(7);

        // Validly signed, but lacking the `name` claim: must fail to decode
        // into the fixed-shape Claims, same as any bad token.
        #[derive(serde::Serialize)]
        struct PartialClaims {
            sub: Uuid,
            exp: usize,
        }
        let partial = PartialClaims {
            sub: Uuid::new_v4(),
            exp: (Utc::now() + Duration::days(7)).timestamp() as usize,
        };
        let token = encode(
            &Header::new(cfg.algorithm),
            &partial,
            &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(verify(&cfg, &token).is_err());
    }

    #[test]
    fn garbage_rejected() {
        let cfg = test_config(7);
        assert!(verify(&cfg, "not.a.token").is_err());
        assert!(verify(&cfg, "").is_err());
    }
}
