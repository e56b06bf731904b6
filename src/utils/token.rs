use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorMessage, HttpError};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

pub fn create_token(
    admin_id: &str,
    secret: &[u8],
    expires_in_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if admin_id.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + Duration::minutes(expires_in_minutes)).timestamp() as usize;
    let claims = TokenClaims {
        sub: admin_id.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

/// Returns the token subject (the admin id) when the token is valid.
pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<String, HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    );

    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(_) => Err(HttpError::unauthorized(ErrorMessage::InvalidToken.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn round_trips_subject() {
        let token = create_token("42", SECRET, 60).unwrap();
        assert_eq!(decode_token(token, SECRET).unwrap(), "42");
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let token = create_token("42", SECRET, 60).unwrap();
        assert!(decode_token(token, b"other-secret").is_err());

        let expired = create_token("42", SECRET, -120).unwrap();
        assert!(decode_token(expired, SECRET).is_err());
    }

    #[test]
    fn empty_subject_is_refused() {
        assert!(create_token("", SECRET, 60).is_err());
    }
}
