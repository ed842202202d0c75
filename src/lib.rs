//! Crate entrypoint wiring together configuration, the Hetzner client, the
//! synchronization engine and the webhook API.

pub mod api;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod filter;
pub mod hetzner;
pub mod provider;
pub mod records;
pub mod zones;

use provider::HetznerProvider;

use std::sync::Arc;

/// Dependencies shared across webhook handlers.
pub struct AppState {
    pub provider: HetznerProvider,
}

/// Arc-wrapped version of `AppState` passed into Axum extensions.
pub type SharedState = Arc<AppState>;
