//! JWT token utilities for authentication and authorization.
//!
//! Provides token creation, validation, and claims management for the
//! cookie-carried access and refresh tokens.

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::cookies::get_cookie;
use crate::auth::models::UserDetails;
use crate::errors::ServiceError;

/// The two tokens issued at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Short-lived token presented on every request.
    AuthToken,
    /// Long-lived token only accepted by the refresh endpoint.
    RefreshToken,
}

impl TokenType {
    pub fn duration(&self) -> Duration {
        match self {
            TokenType::AuthToken => Duration::minutes(15),
            TokenType::RefreshToken => Duration::days(30),
        }
    }

    /// Name of the cookie carrying the token, also used as the `type` claim.
    pub fn cookie_name(&self) -> &'static str {
        match self {
            TokenType::AuthToken => "auth_token",
            TokenType::RefreshToken => "refresh_token",
        }
    }
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Granted authorities, e.g. `ROLE_USER`
    pub roles: Vec<String>,
    /// Cookie name of the token type
    #[serde(rename = "type")]
    pub token_type: String,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    pub fn username(&self) -> &str {
        &self.sub
    }

    pub fn is_type(&self, token_type: TokenType) -> bool {
        self.token_type == token_type.cookie_name()
    }
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from the decoded HMAC key.
    ///
    /// The HMAC variant follows the key size: 64 bytes or more selects
    /// HS512, 48 or more HS384, anything shorter HS256.
    pub fn new(secret: &[u8]) -> Self {
        let algorithm = algorithm_for_key(secret);

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        JwtUtils {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Generate an access token for the given principal
    pub fn generate_auth_token(&self, user: &UserDetails) -> Result<String, ServiceError> {
        self.build_token(TokenType::AuthToken, user)
    }

    /// Generate a refresh token (longer expiration)
    pub fn generate_refresh_token(&self, user: &UserDetails) -> Result<String, ServiceError> {
        self.build_token(TokenType::RefreshToken, user)
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        if token.trim().is_empty() {
            return Err(ServiceError::invalid_token("Token is empty"));
        }

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::invalid_token(format!("Token validation failed: {}", e)))
    }

    /// Validate a token and require its `type` claim to match.
    pub fn validate_token_of_type(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<Claims, ServiceError> {
        let claims = self.validate_token(token)?;

        if !claims.is_type(expected) {
            return Err(ServiceError::invalid_token(format!(
                "Expected a {} but got a {}",
                expected.cookie_name(),
                claims.token_type
            )));
        }

        Ok(claims)
    }

    fn build_token(&self, token_type: TokenType, user: &UserDetails) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + token_type.duration();

        let claims = Claims {
            sub: user.username.clone(),
            roles: user.authorities.clone(),
            token_type: token_type.cookie_name().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::now_v7().to_string(),
        };

        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, ServiceError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }
}

fn algorithm_for_key(secret: &[u8]) -> Algorithm {
    match secret.len() {
        len if len >= 64 => Algorithm::HS512,
        len if len >= 48 => Algorithm::HS384,
        _ => Algorithm::HS256,
    }
}

/// Reads the cookie for `token_type` from request headers.
pub fn token_from_cookies(headers: &HeaderMap, token_type: TokenType) -> Option<String> {
    get_cookie(headers, token_type.cookie_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header::COOKIE};

    const USERNAME: &str = "testuser";

    fn jwt() -> JwtUtils {
        JwtUtils::new(b"test-secret-key-for-jwt-token-testing-purposes-only")
    }

    fn user() -> UserDetails {
        UserDetails {
            username: USERNAME.to_string(),
            hashed_password: "$2b$04$unused".to_string(),
            authorities: vec!["ROLE_USER".to_string()],
        }
    }

    fn assert_token_claims(jwt: &JwtUtils, token: &str, expected: TokenType) {
        assert_eq!(token.split('.').count(), 3, "Token should be header.payload.signature");

        let claims = jwt.validate_token(token).unwrap();
        assert_eq!(claims.sub, USERNAME);
        assert_eq!(claims.token_type, expected.cookie_name());
        assert_eq!(claims.roles, vec!["ROLE_USER".to_string()]);

        let now = Utc::now().timestamp();
        assert!(claims.exp > now, "Token expiration should be in the future");
        assert!(claims.iat <= now + 1, "Token issued at should not be in the future");
        assert_eq!(claims.exp - claims.iat, expected.duration().num_seconds());
    }

    #[test]
    fn test_auth_token_generation() {
        let jwt = jwt();
        let token = jwt.generate_auth_token(&user()).unwrap();
        assert_token_claims(&jwt, &token, TokenType::AuthToken);
    }

    #[test]
    fn test_refresh_token_generation() {
        let jwt = jwt();
        let token = jwt.generate_refresh_token(&user()).unwrap();
        assert_token_claims(&jwt, &token, TokenType::RefreshToken);
    }

    #[test]
    fn test_auth_token_expires_before_refresh_token() {
        let jwt = jwt();
        let auth = jwt.validate_token(&jwt.generate_auth_token(&user()).unwrap()).unwrap();
        let refresh = jwt
            .validate_token(&jwt.generate_refresh_token(&user()).unwrap())
            .unwrap();

        assert!(auth.exp < refresh.exp);
    }

    #[test]
    fn test_each_token_has_unique_id() {
        let jwt = jwt();
        let first = jwt.validate_token(&jwt.generate_auth_token(&user()).unwrap()).unwrap();
        let second = jwt.validate_token(&jwt.generate_auth_token(&user()).unwrap()).unwrap();
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_invalid_token_validation() {
        assert!(matches!(
            jwt().validate_token("invalid.token.here"),
            Err(ServiceError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_empty_token_validation() {
        assert!(matches!(
            jwt().validate_token(""),
            Err(ServiceError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_token_signed_with_other_key_is_rejected() {
        let other = JwtUtils::new(b"another-secret-key-that-is-long-enough-for-hmac");
        let token = other.generate_auth_token(&user()).unwrap();
        assert!(jwt().validate_token(&token).is_err());
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let jwt = jwt();
        let token = jwt.generate_auth_token(&user()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged = jwt.generate_auth_token(&UserDetails {
            username: "admin".to_string(),
            ..user()
        });
        let forged = forged.unwrap();
        let forged_payload = forged.split('.').nth(1).unwrap();

        let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
        assert!(jwt.validate_token(&tampered).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = jwt();
        let now = Utc::now();
        let claims = Claims {
            sub: USERNAME.to_string(),
            roles: vec!["ROLE_USER".to_string()],
            token_type: TokenType::AuthToken.cookie_name().to_string(),
            iat: (now - Duration::minutes(20)).timestamp(),
            exp: (now - Duration::minutes(5)).timestamp(),
            jti: Uuid::now_v7().to_string(),
        };

        let token = jwt.encode_claims(&claims).unwrap();
        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn test_validate_token_of_type() {
        let jwt = jwt();
        let auth = jwt.generate_auth_token(&user()).unwrap();
        let refresh = jwt.generate_refresh_token(&user()).unwrap();

        assert!(jwt.validate_token_of_type(&auth, TokenType::AuthToken).is_ok());
        assert!(jwt.validate_token_of_type(&refresh, TokenType::RefreshToken).is_ok());
        assert!(jwt.validate_token_of_type(&auth, TokenType::RefreshToken).is_err());
        assert!(jwt.validate_token_of_type(&refresh, TokenType::AuthToken).is_err());
    }

    #[test]
    fn test_algorithm_follows_key_length() {
        assert_eq!(algorithm_for_key(&[1u8; 32]), Algorithm::HS256);
        assert_eq!(algorithm_for_key(&[1u8; 48]), Algorithm::HS384);
        assert_eq!(algorithm_for_key(&[1u8; 64]), Algorithm::HS512);

        let token = JwtUtils::new(&[1u8; 64]).generate_auth_token(&user()).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS512);
    }

    #[test]
    fn test_token_from_cookies() {
        let jwt = jwt();
        let token = jwt.generate_auth_token(&user()).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; auth_token={}", token)).unwrap(),
        );

        assert_eq!(
            token_from_cookies(&headers, TokenType::AuthToken).as_deref(),
            Some(token.as_str())
        );
        assert!(token_from_cookies(&headers, TokenType::RefreshToken).is_none());
    }

    #[test]
    fn test_token_from_cookies_without_cookie_header() {
        assert!(token_from_cookies(&HeaderMap::new(), TokenType::AuthToken).is_none());
    }
}
