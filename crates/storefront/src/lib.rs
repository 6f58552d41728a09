//! Bazaar storefront library.
//!
//! Fixture-backed catalog services (products, categories, recipe bundles), a
//! client-session admin gate, and the JSON API that serves them. The binary in
//! `main.rs` and the CLI both build on this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod fixtures;
pub mod gate;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
