//! HTTP routes
//!
//! - [`health`] - liveness
//! - [`product`] - storefront product
//! - [`orders`] - order submission and the default notification receiver
//! - [`auth`] - admin sign-in / sign-out
//! - [`admin`] - order management for the dashboard

pub mod extract;

pub mod admin;
pub mod auth;
pub mod health;
pub mod orders;
pub mod product;
