//! Core module - configuration, state, server and startup errors
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared state handed to every handler
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup and serve errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{AdminConfig, Config, LogConfig, PixelConfig};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
