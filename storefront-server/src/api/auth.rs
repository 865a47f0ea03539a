//! Admin sign-in
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/auth/login | POST | none, 5/min per IP |
//! | /api/auth/logout | POST | admin |
//! | /api/auth/me | GET | admin |

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, post},
};
use shared::client::{AdminInfo, LoginRequest, LoginResponse};

use crate::api::extract::AppJson;
use crate::auth::{CurrentAdmin, login_rate_limit, require_admin_auth};
use crate::core::ServerState;
use crate::security_log;
use crate::{ApiResponse, AppError, AppResult};

pub fn router(state: &ServerState) -> Router<ServerState> {
    let login = Router::new()
        .route("/api/auth/login", post(login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    let session = Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_auth,
        ));

    login.merge(session)
}

async fn login(
    State(state): State<ServerState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let admin = state.admin.clone();
    let LoginRequest { email, password } = req;

    // argon2 is CPU bound
    let (valid, email) = tokio::task::spawn_blocking(move || {
        let valid = admin.verify(&email, &password);
        (valid, email)
    })
    .await
    .map_err(|e| AppError::internal(format!("Password check failed: {e}")))?;

    if !valid {
        security_log!("WARN", "login_failed", email = email.clone());
        return Err(AppError::invalid_credentials());
    }

    let issued = state
        .get_jwt_service()
        .generate_token(state.admin.email())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    security_log!("INFO", "login_success", email = state.admin.email().to_string());

    Ok(ApiResponse::success(LoginResponse {
        expires_at: issued.expires_at(),
        email: issued.claims.sub,
        token: issued.token,
    }))
}

/// Revoke the presented token
async fn logout(
    State(state): State<ServerState>,
    admin: CurrentAdmin,
) -> AppResult<ApiResponse<()>> {
    state.revoked.revoke(&admin.token_id, admin.expires_at)?;
    security_log!("INFO", "logout", email = admin.email.clone());
    Ok(ApiResponse::ok())
}

async fn me(admin: CurrentAdmin) -> AppResult<ApiResponse<AdminInfo>> {
    Ok(ApiResponse::success(AdminInfo { email: admin.email }))
}
