//! IceDelights Storefront library.
//!
//! This crate provides the storefront API as a library, allowing the router
//! to be driven from tests with a substitute message transport.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
