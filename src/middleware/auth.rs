use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_jwt, TokenKind};
use crate::domain::Role;
use crate::error::ApiError;

/// Authenticated staff context extracted from a staff JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Per-endpoint role gate. Mirrors the per-route role lists in the
    /// routing table; transition-level authorization stays in the domain.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Access denied"))
        }
    }
}

/// Authenticated enquiry-student context extracted from a student JWT
#[derive(Clone, Debug)]
pub struct AuthStudent {
    pub enquiry_id: i32,
    pub email: String,
}

/// JWT middleware for staff routes: validates the bearer token and injects
/// an AuthUser extension.
pub async fn staff_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token).map_err(|e| ApiError::unauthorized(e.to_string()))?;

    if claims.kind != TokenKind::Staff {
        return Err(ApiError::unauthorized("Staff token required"));
    }
    let role = claims
        .role
        .ok_or_else(|| ApiError::unauthorized("Token is missing a role"))?;

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
        role,
    });

    Ok(next.run(request).await)
}

/// JWT middleware for enquiry-student routes.
pub async fn student_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token).map_err(|e| ApiError::unauthorized(e.to_string()))?;

    if claims.kind != TokenKind::EnquiryStudent {
        return Err(ApiError::unauthorized("Student token required"));
    }

    request.extensions_mut().insert(AuthStudent {
        enquiry_id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_header() {
        assert!(extract_jwt_from_headers(&HeaderMap::new()).is_err());
    }

    #[test]
    fn rejects_non_bearer_scheme() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert!(extract_jwt_from_headers(&headers).is_err());
    }

    #[test]
    fn rejects_empty_token() {
        let headers = headers_with("Bearer ");
        assert!(extract_jwt_from_headers(&headers).is_err());
    }

    #[test]
    fn role_gate_matches_allowed_list() {
        let user = AuthUser { id: 1, email: "x@example.com".into(), role: Role::Accounts };
        assert!(user.require_role(&[Role::Admin, Role::Accounts]).is_ok());
        assert!(user.require_role(&[Role::Admin, Role::Counsellor]).is_err());
    }
}
