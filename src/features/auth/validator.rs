use super::model::AuthenticatedUser;
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "exp")]
    _exp: u64,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.jwt_leeway.as_secs();
        validation.validate_nbf = true;

        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Token subject is not a user id".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            sub: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;
    use std::time::Duration;

    const SECRET: &str = "test-secret";

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        exp: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        iss: Option<&'a str>,
    }

    fn config(issuer: Option<&str>) -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            issuer: issuer.map(String::from),
            audience: None,
            jwt_leeway: Duration::from_secs(0),
        }
    }

    fn token(sub: &str, exp_offset: i64, iss: Option<&str>, secret: &str) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset) as u64;
        encode(
            &Header::new(Algorithm::HS256),
            &TestClaims { sub, exp, iss },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_yields_user() {
        let user_id = Uuid::new_v4();
        let validator = JwtValidator::new(&config(None));

        let user = validator
            .validate_token(&token(&user_id.to_string(), 3600, None, SECRET))
            .unwrap();
        assert_eq!(user.user_id, user_id);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let validator = JwtValidator::new(&config(None));
        let result = validator.validate_token(&token(
            &Uuid::new_v4().to_string(),
            3600,
            None,
            "other-secret",
        ));
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let validator = JwtValidator::new(&config(None));
        let result =
            validator.validate_token(&token(&Uuid::new_v4().to_string(), -600, None, SECRET));
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn test_subject_must_be_uuid() {
        let validator = JwtValidator::new(&config(None));
        let result = validator.validate_token(&token("lisa", 3600, None, SECRET));
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn test_issuer_is_checked_when_configured() {
        let validator = JwtValidator::new(&config(Some("https://id.example")));
        let sub = Uuid::new_v4().to_string();

        assert!(validator
            .validate_token(&token(&sub, 3600, Some("https://id.example"), SECRET))
            .is_ok());
        assert!(validator
            .validate_token(&token(&sub, 3600, Some("https://evil.example"), SECRET))
            .is_err());
    }
}
