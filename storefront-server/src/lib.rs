//! Storefront server
//!
//! Serves the product page data, accepts orders from the storefront form
//! and exposes the admin API for reviewing them.
//!
//! ```text
//! storefront-server/src/
//! ├── core/          # config, state, server, startup errors
//! ├── auth/          # admin account, JWT, revocation, rate limiting
//! ├── orders/        # redb order store
//! ├── services/      # router assembly, notification, analytics pixel
//! ├── api/           # HTTP routes and handlers
//! ├── utils/         # logging
//! └── catalog.rs     # product catalog
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod orders;
pub mod services;
pub mod utils;

pub use auth::{CurrentAdmin, JwtService};
pub use core::{Config, Server, ServerError, ServerState};
pub use orders::{OrderStorage, StorageError};
pub use services::build_app;
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env`, read configuration and start logging
pub fn setup_environment() -> Result<Config, ServerError> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    utils::logger::init_logger(&config.log);
    if config.jwt_secret_generated {
        tracing::warn!("JWT_SECRET not set, using a temporary development key");
    }

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   _____ __                  ____                 __
  / ___// /_____  ________  / __/________  ____  / /_
  \__ \/ __/ __ \/ ___/ _ \/ /_/ ___/ __ \/ __ \/ __/
 ___/ / /_/ /_/ / /  /  __/ __/ /  / /_/ / / / / /_
/____/\__/\____/_/   \___/_/ /_/   \____/_/ /_/\__/
    "#
    );
}
