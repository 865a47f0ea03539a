//! CurrentAdmin extractor
//!
//! Handlers behind [`super::require_admin_auth`] reuse the admin the
//! middleware stored; anywhere else the token is validated here.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::CurrentAdmin;
use crate::auth::middleware::authenticate;
use crate::core::ServerState;

impl FromRequestParts<ServerState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(admin) = parts.extensions.get::<CurrentAdmin>() {
            return Ok(admin.clone());
        }

        let admin = authenticate(state, &parts.headers, &parts.uri)?;
        parts.extensions.insert(admin.clone());
        Ok(admin)
    }
}
