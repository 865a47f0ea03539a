//! Sign-in state
//!
//! [`AuthWatcher`] holds the current [`Session`] in a `watch` channel.
//! Anything interested in sign-in / sign-out subscribes and is woken on
//! every change.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::client::LoginResponse;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A signed-in admin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

impl From<LoginResponse> for Session {
    fn from(login: LoginResponse) -> Self {
        Self {
            token: login.token,
            email: login.email,
            expires_at: login.expires_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthWatcher {
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl Default for AuthWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthWatcher {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Start with a known token (e.g. from `STOREFRONT_TOKEN`)
    pub fn with_token(token: impl Into<String>) -> Self {
        let watcher = Self::new();
        watcher.sign_in(Session {
            token: token.into(),
            email: String::new(),
            expires_at: DateTime::<Utc>::MAX_UTC,
        });
        watcher
    }

    pub fn sign_in(&self, session: Session) {
        tracing::debug!(email = %session.email, "Signed in");
        self.tx.send_replace(Some(session));
    }

    pub fn sign_out(&self) {
        if self.tx.send_replace(None).is_some() {
            tracing::debug!("Signed out");
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().as_ref().is_some_and(|s| !s.is_expired())
    }

    /// Receiver that sees every later change
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    /// Run `callback` with the current state and after every change
    ///
    /// The task ends when every [`AuthWatcher`] clone is dropped.
    pub fn on_change<F>(&self, mut callback: F) -> JoinHandle<()>
    where
        F: FnMut(Option<&Session>) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            callback(rx.borrow_and_update().as_ref());
            while rx.changed().await.is_ok() {
                callback(rx.borrow_and_update().as_ref());
            }
        })
    }
}
