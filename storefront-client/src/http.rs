//! HTTP client for the storefront server

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::client::{
    AdminInfo, BulkAction, BulkRequest, BulkResult, LoginRequest, LoginResponse,
    OrderListResponse, ProductView,
};
use shared::order::{OrderFilter, OrderStats, OrderSubmission};
use shared::{ApiResponse, Order};

use crate::api::{AdminApi, StorefrontApi};
use crate::auth::{AuthWatcher, Session};
use crate::{ClientConfig, ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    auth: AuthWatcher,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()?;

        let auth = match &config.token {
            Some(token) => AuthWatcher::with_token(token.clone()),
            None => AuthWatcher::new(),
        };

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Share sign-in state with other components
    pub fn with_auth(mut self, auth: AuthWatcher) -> Self {
        self.auth = auth;
        self
    }

    pub fn auth(&self) -> &AuthWatcher {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let request = self.client.request(method, url);
        match self.auth.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn admin_request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        if self.auth.token().is_none() {
            return Err(ClientError::NotSignedIn);
        }
        Ok(self.request(method, path))
    }

    /// Send and unwrap the `ApiResponse` envelope
    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<Option<T>> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let envelope: ApiResponse<T> = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                return Err(ClientError::InvalidResponse(format!(
                    "{status}: {}",
                    String::from_utf8_lossy(&bytes)
                )));
            }
        };

        if !envelope.is_success() {
            return Err(envelope.into_error().into());
        }
        Ok(envelope.data)
    }

    async fn send_data<T: DeserializeOwned>(
        request: RequestBuilder,
        what: &str,
    ) -> ClientResult<T> {
        Self::send(request)
            .await?
            .ok_or_else(|| ClientError::InvalidResponse(format!("Missing {what} data")))
    }

    // ========== Storefront API ==========

    pub async fn product(&self) -> ClientResult<ProductView> {
        Self::send_data(self.request(Method::GET, "/api/product"), "product").await
    }

    pub async fn submit_order(&self, submission: &OrderSubmission) -> ClientResult<Order> {
        let request = self.request(Method::POST, "/api/orders").json(submission);
        Self::send_data(request, "order").await
    }

    // ========== Auth API ==========

    /// Sign in and publish the session to [`AuthWatcher`] subscribers
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.request(Method::POST, "/api/auth/login").json(&body);
        let login: LoginResponse = Self::send_data(request, "login").await?;

        let session = Session::from(login);
        self.auth.sign_in(session.clone());
        Ok(session)
    }

    /// Revoke the token on the server, then clear the local session
    ///
    /// The local session is cleared even when the server call fails.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = match self.admin_request(Method::POST, "/api/auth/logout") {
            Ok(request) => Self::send::<()>(request).await.map(|_| ()),
            Err(ClientError::NotSignedIn) => Ok(()),
            Err(e) => Err(e),
        };
        self.auth.sign_out();
        result
    }

    pub async fn me(&self) -> ClientResult<AdminInfo> {
        Self::send_data(self.admin_request(Method::GET, "/api/auth/me")?, "admin").await
    }

    // ========== Admin order API ==========

    pub async fn list_orders(&self, filter: &OrderFilter) -> ClientResult<OrderListResponse> {
        let request = self
            .admin_request(Method::GET, "/api/admin/orders")?
            .query(filter);
        Self::send_data(request, "order list").await
    }

    pub async fn order(&self, id: &str) -> ClientResult<Order> {
        let path = format!("/api/admin/orders/{id}");
        Self::send_data(self.admin_request(Method::GET, &path)?, "order").await
    }

    pub async fn stats(&self) -> ClientResult<OrderStats> {
        Self::send_data(self.admin_request(Method::GET, "/api/admin/orders/stats")?, "stats").await
    }

    pub async fn confirm_order(&self, id: &str) -> ClientResult<Order> {
        let path = format!("/api/admin/orders/{id}/confirm");
        Self::send_data(self.admin_request(Method::POST, &path)?, "order").await
    }

    pub async fn delete_order(&self, id: &str) -> ClientResult<Order> {
        let path = format!("/api/admin/orders/{id}");
        Self::send_data(self.admin_request(Method::DELETE, &path)?, "order").await
    }

    pub async fn bulk(&self, action: BulkAction, ids: &[String]) -> ClientResult<BulkResult> {
        let body = BulkRequest {
            action,
            ids: ids.to_vec(),
        };
        let request = self
            .admin_request(Method::POST, "/api/admin/orders/bulk")?
            .json(&body);
        Self::send_data(request, "bulk").await
    }

    /// Server-side CSV of the filtered list
    pub async fn export_csv(&self, filter: &OrderFilter) -> ClientResult<String> {
        let response = self
            .admin_request(Method::GET, "/api/admin/orders/export.csv")?
            .query(filter)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let bytes = response.bytes().await?;
            return Err(match serde_json::from_slice::<ApiResponse<()>>(&bytes) {
                Ok(envelope) => envelope.into_error().into(),
                Err(_) => ClientError::InvalidResponse(format!(
                    "{status}: {}",
                    String::from_utf8_lossy(&bytes)
                )),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl StorefrontApi for HttpClient {
    async fn product(&self) -> ClientResult<ProductView> {
        HttpClient::product(self).await
    }

    async fn submit_order(&self, submission: &OrderSubmission) -> ClientResult<Order> {
        HttpClient::submit_order(self, submission).await
    }
}

#[async_trait]
impl AdminApi for HttpClient {
    async fn list_orders(&self, filter: &OrderFilter) -> ClientResult<OrderListResponse> {
        HttpClient::list_orders(self, filter).await
    }

    async fn confirm_order(&self, id: &str) -> ClientResult<Order> {
        HttpClient::confirm_order(self, id).await
    }

    async fn delete_order(&self, id: &str) -> ClientResult<Order> {
        HttpClient::delete_order(self, id).await
    }

    async fn bulk(&self, action: BulkAction, ids: &[String]) -> ClientResult<BulkResult> {
        HttpClient::bulk(self, action, ids).await
    }
}
