//! Authentication middleware
//!
//! Guards the `/api/admin` routes with a bearer JWT.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Uri},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentAdmin, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// Require a signed-in admin
///
/// Reads `Authorization: Bearer <token>`, validates it and checks the
/// revocation list. On success [`CurrentAdmin`] is inserted into the
/// request extensions.
///
/// | Failure | Code |
/// |---------|------|
/// | no Authorization header | NotAuthenticated (401) |
/// | malformed / bad signature | TokenInvalid (401) |
/// | expired | TokenExpired (401) |
/// | signed out | TokenRevoked (401) |
pub async fn require_admin_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let admin = authenticate(&state, req.headers(), req.uri())?;
    req.extensions_mut().insert(admin);
    Ok(next.run(req).await)
}

/// Resolve the admin behind a request's bearer token
pub(crate) fn authenticate(
    state: &ServerState,
    headers: &HeaderMap,
    uri: &Uri,
) -> Result<CurrentAdmin, AppError> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", uri));
            return Err(AppError::not_authenticated());
        }
    };

    let claims = match state.get_jwt_service().validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", uri)
            );
            return Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    if state.revoked.is_revoked(&claims.jti)? {
        security_log!(
            "WARN",
            "token_revoked",
            email = claims.sub.clone(),
            uri = format!("{:?}", uri)
        );
        return Err(AppError::token_revoked());
    }

    Ok(CurrentAdmin::from(claims))
}
