//! Moneta server library: routing, auth, configuration, and the
//! composition root. The binary in `main.rs` is a thin wrapper; integration
//! tests build the same router through this crate.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod mailer;
pub mod main_lib;
pub mod models;

pub use main_lib::{build_state, init_tracing, AppState};
