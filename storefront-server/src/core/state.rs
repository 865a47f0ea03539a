use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AdminAccount, JwtService, RateLimiter, RevokedTokens};
use crate::catalog::ProductCatalog;
use crate::core::{Config, Result};
use crate::orders::OrderStorage;
use crate::services::{Notifier, PixelClient};

/// Timeout for outbound calls (notification, pixel)
const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state handed to every handler
///
/// Cheap to clone: every field is either `Arc`-backed or a handle.
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub orders: OrderStorage,
    pub catalog: Arc<ProductCatalog>,
    pub admin: Arc<AdminAccount>,
    pub jwt_service: Arc<JwtService>,
    pub revoked: RevokedTokens,
    pub rate_limiter: RateLimiter,
    pub notifier: Notifier,
    pub pixel: PixelClient,
}

impl ServerState {
    /// Open the store, load the catalog and admin account
    pub fn initialize(config: &Config) -> Result<Self> {
        let orders = OrderStorage::open_path(&config.store_path)?;
        let catalog = ProductCatalog::load(config.product_file.as_deref())?;
        let admin = AdminAccount::from_config(&config.admin, config.is_development())?;

        let http = reqwest::Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()?;

        if config.notify_url.is_none() {
            tracing::info!("Order notification disabled");
        }
        if config.pixel.pixel_id.is_none() {
            tracing::info!("Analytics pixel disabled");
        }

        Ok(Self::from_parts(
            config.clone(),
            orders,
            catalog,
            admin,
            Notifier::new(http.clone(), config.notify_url.clone()),
            PixelClient::new(http, &config.pixel),
        ))
    }

    pub fn from_parts(
        config: Config,
        orders: OrderStorage,
        catalog: ProductCatalog,
        admin: AdminAccount,
        notifier: Notifier,
        pixel: PixelClient,
    ) -> Self {
        let jwt_service = JwtService::with_config(config.jwt.clone());
        let revoked = RevokedTokens::new(&orders);
        Self {
            config: Arc::new(config),
            orders,
            catalog: Arc::new(catalog),
            admin: Arc::new(admin),
            jwt_service: Arc::new(jwt_service),
            revoked,
            rate_limiter: RateLimiter::new(),
            notifier,
            pixel,
        }
    }

    pub fn get_jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Periodic housekeeping: rate limiter entries and expired revocations
    pub fn start_background_tasks(&self) {
        let rate_limiter = self.rate_limiter.clone();
        let revoked = self.revoked.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                let idle = rate_limiter.cleanup();
                let pruned = match revoked.prune(chrono::Utc::now().timestamp()) {
                    Ok(pruned) => pruned,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to prune revoked tokens");
                        0
                    }
                };
                if idle + pruned > 0 {
                    tracing::debug!(idle, pruned, "Housekeeping done");
                }
            }
        });
    }
}
