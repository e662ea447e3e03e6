pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod permissions;
pub mod routes;
pub mod stay;

use std::sync::Arc;

use config::Config;
use db::kv::KeyValueStore;
use db::store::PortalStore;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PortalStore>,
    pub kv: Arc<dyn KeyValueStore>,
    pub config: Arc<Config>,
}
