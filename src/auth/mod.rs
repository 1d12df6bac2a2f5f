use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::domain::Role;

/// Which login flow minted the token. Staff log in with email+password;
/// enquiry students log in by email while their candidate status is
/// "class" or "class qualified".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    #[serde(rename = "staff")]
    Staff,
    #[serde(rename = "enquiry_student")]
    EnquiryStudent,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id for staff tokens, enquiry id for student tokens.
    pub sub: i32,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn staff(user_id: i32, email: impl Into<String>, role: Role) -> Self {
        Self::new(user_id, email.into(), Some(role), TokenKind::Staff)
    }

    pub fn enquiry_student(enquiry_id: i32, email: impl Into<String>) -> Self {
        Self::new(enquiry_id, email.into(), None, TokenKind::EnquiryStudent)
    }

    fn new(sub: i32, email: String, role: Option<Role>, kind: TokenKind) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self { sub, email, role, kind, exp, iat: now.timestamp() }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_token_round_trips() {
        let claims = Claims::staff(42, "admin@example.com", Role::Admin);
        let token = generate_jwt(&claims).unwrap();

        let decoded = validate_jwt(&token).unwrap();
        assert_eq!(decoded.sub, 42);
        assert_eq!(decoded.email, "admin@example.com");
        assert_eq!(decoded.role, Some(Role::Admin));
        assert_eq!(decoded.kind, TokenKind::Staff);
    }

    #[test]
    fn student_token_carries_no_role() {
        let claims = Claims::enquiry_student(7, "student@example.com");
        let token = generate_jwt(&claims).unwrap();

        let decoded = validate_jwt(&token).unwrap();
        assert_eq!(decoded.kind, TokenKind::EnquiryStudent);
        assert_eq!(decoded.role, None);
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(validate_jwt("not-a-jwt").is_err());
    }
}
