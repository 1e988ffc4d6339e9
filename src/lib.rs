//! Keyhub - a checkout tracker for physical keys.
//!
//! This crate provides a REST API for a key hub: users sign in, see which
//! keys are available and who holds the rest, check keys out and back in
//! (optionally by scanning a printed QR label), and export the movement
//! history as a report.
//!
//! The interesting part is the reservation flow: a key's availability is
//! changed only through conditional updates whose predicate carries the
//! whole concurrency story, and every transition commits together with its
//! audit record.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use config::Config;
use db::DbPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
}
