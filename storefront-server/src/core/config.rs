use crate::auth::JwtConfig;
use crate::auth::jwt::generate_printable_secret;
use crate::core::{Result, ServerError};

/// Default notification path, resolved against `PUBLIC_BASE_URL`
pub const DEFAULT_NOTIFY_PATH: &str = "/api/notify";

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Minimum JWT secret length
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime (one year)
pub const MAX_JWT_EXPIRATION_MINUTES: i64 = 525_600;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | listen port |
/// | ENVIRONMENT | development | development / staging / production |
/// | STORE_PATH | data/orders.redb | redb file, `:memory:` for in-memory |
/// | PRODUCT_FILE | - | JSON product catalog |
/// | ADMIN_EMAIL | admin@example.com | admin login |
/// | ADMIN_PASSWORD_HASH | - | argon2 PHC string |
/// | ADMIN_PASSWORD | - | plain password, development only |
/// | JWT_SECRET | generated in development | at least 32 characters |
/// | JWT_EXPIRATION_MINUTES | 1440 | token lifetime, 1..=525600 |
/// | PUBLIC_BASE_URL | http://localhost:{HTTP_PORT} | base for relative URLs |
/// | NOTIFY_URL | /api/notify | empty string disables |
/// | PIXEL_ID / PIXEL_ENDPOINT / PIXEL_ACCESS_TOKEN / PIXEL_CURRENCY | - / - / - / BDT | analytics |
/// | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | graceful shutdown budget |
/// | LOG_LEVEL / LOG_JSON / LOG_DIR | info / false / - | logging |
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub store_path: String,
    pub product_file: Option<String>,
    pub admin: AdminConfig,
    pub jwt: JwtConfig,
    /// No `JWT_SECRET` was given and a throwaway key is in use
    pub jwt_secret_generated: bool,
    pub public_base_url: String,
    /// Fully resolved notification endpoint, `None` when disabled
    pub notify_url: Option<String>,
    pub pixel: PixelConfig,
    pub request_timeout_ms: u64,
    pub shutdown_timeout_ms: u64,
    pub log: LogConfig,
}

/// Admin account settings
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    pub email: String,
    pub password_hash: Option<String>,
    pub password: Option<String>,
}

/// Analytics pixel settings
#[derive(Debug, Clone)]
pub struct PixelConfig {
    pub pixel_id: Option<String>,
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub currency: String,
}

impl PixelConfig {
    pub fn disabled() -> Self {
        Self {
            pixel_id: None,
            endpoint: None,
            access_token: None,
            currency: "BDT".into(),
        }
    }

    /// Events endpoint for the configured pixel
    pub fn endpoint_url(&self) -> Option<String> {
        let id = self.pixel_id.as_deref()?;
        Some(match &self.endpoint {
            Some(url) => url.replace("{pixel_id}", id),
            None => format!("https://graph.facebook.com/v19.0/{id}/events"),
        })
    }
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
    pub dir: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string());
        let non_empty = |name: &str| var(name).filter(|v| !v.is_empty());

        let environment = non_empty("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let http_port: u16 = parse_var(non_empty("HTTP_PORT")).unwrap_or(3000);
        let public_base_url = non_empty("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{http_port}"));

        let jwt_secret_generated = non_empty("JWT_SECRET").is_none();
        let jwt_secret = Self::require_secret(non_empty("JWT_SECRET"), &environment)?;
        let mut jwt = JwtConfig::with_secret(jwt_secret);
        if let Some(raw) = non_empty("JWT_EXPIRATION_MINUTES") {
            jwt.expiration_minutes = parse_expiration(&raw)?;
        }
        if let Some(issuer) = non_empty("JWT_ISSUER") {
            jwt.issuer = issuer;
        }
        if let Some(audience) = non_empty("JWT_AUDIENCE") {
            jwt.audience = audience;
        }

        let notify_url = resolve_notify_url(var("NOTIFY_URL"), &public_base_url);

        Ok(Self {
            http_port,
            store_path: non_empty("STORE_PATH").unwrap_or_else(|| "data/orders.redb".into()),
            product_file: non_empty("PRODUCT_FILE"),
            admin: AdminConfig {
                email: non_empty("ADMIN_EMAIL").unwrap_or_else(|| "admin@example.com".into()),
                password_hash: non_empty("ADMIN_PASSWORD_HASH"),
                password: non_empty("ADMIN_PASSWORD"),
            },
            jwt,
            jwt_secret_generated,
            public_base_url,
            notify_url,
            pixel: PixelConfig {
                pixel_id: non_empty("PIXEL_ID"),
                endpoint: non_empty("PIXEL_ENDPOINT"),
                access_token: non_empty("PIXEL_ACCESS_TOKEN"),
                currency: non_empty("PIXEL_CURRENCY").unwrap_or_else(|| "BDT".into()),
            },
            request_timeout_ms: parse_var(non_empty("REQUEST_TIMEOUT_MS")).unwrap_or(30_000),
            shutdown_timeout_ms: parse_var(non_empty("SHUTDOWN_TIMEOUT_MS")).unwrap_or(10_000),
            log: LogConfig {
                level: non_empty("LOG_LEVEL").unwrap_or_else(|| "info".into()),
                json: parse_var(non_empty("LOG_JSON")).unwrap_or(false),
                dir: non_empty("LOG_DIR"),
            },
            environment,
        })
    }

    /// JWT secret: must be long enough; generated only in development
    fn require_secret(value: Option<String>, environment: &str) -> Result<String> {
        match value {
            Some(secret) if secret.len() >= MIN_JWT_SECRET_LEN => Ok(secret),
            Some(_) => Err(ServerError::config(format!(
                "JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters long"
            ))),
            None if environment == "development" => Ok(generate_printable_secret()),
            None => Err(ServerError::config(format!(
                "JWT_SECRET must be set in {environment} environment"
            ))),
        }
    }

    /// In-memory development configuration, used by tests and tooling
    pub fn in_memory() -> Self {
        Self {
            http_port: 0,
            environment: "development".into(),
            store_path: crate::orders::MEMORY_STORE.into(),
            product_file: None,
            admin: AdminConfig {
                email: "admin@example.com".into(),
                password_hash: None,
                password: None,
            },
            jwt: JwtConfig::with_secret(generate_printable_secret()),
            jwt_secret_generated: true,
            public_base_url: "http://localhost:3000".into(),
            notify_url: None,
            pixel: PixelConfig::disabled(),
            request_timeout_ms: 30_000,
            shutdown_timeout_ms: 10_000,
            log: LogConfig::default(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Whether order notifications are posted to this server's own
    /// `/api/notify`, which then has to be served
    pub fn notify_receiver_enabled(&self) -> bool {
        let own = format!(
            "{}{}",
            self.public_base_url.trim_end_matches('/'),
            DEFAULT_NOTIFY_PATH
        );
        self.notify_url.as_deref() == Some(own.as_str())
    }
}

fn parse_expiration(raw: &str) -> Result<i64> {
    match raw.parse::<i64>() {
        Ok(minutes) if (1..=MAX_JWT_EXPIRATION_MINUTES).contains(&minutes) => Ok(minutes),
        _ => Err(ServerError::config(format!(
            "JWT_EXPIRATION_MINUTES must be between 1 and {MAX_JWT_EXPIRATION_MINUTES}, got {raw:?}"
        ))),
    }
}

fn parse_var<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.parse().ok())
}

/// Unset means the default path, empty disables, relative paths are
/// joined onto the public base URL.
fn resolve_notify_url(raw: Option<String>, base: &str) -> Option<String> {
    let raw = raw.unwrap_or_else(|| DEFAULT_NOTIFY_PATH.to_string());
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }
    let path = raw.trim_start_matches('/');
    Some(format!("{}/{}", base.trim_end_matches('/'), path))
}
