//! # FireWall
//!
//! Client runtime for agents playing the FireWall turn-based game.
//!
//! Agent authors implement a single [`Agent`](prelude::Agent) trait; the
//! client handles the WebSocket connection, the link handshake, decoding
//! the game state every tick and cancelling decisions that overrun the
//! tick budget.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use firewall::prelude::*;
//!
//! struct Idle;
//!
//! impl Agent for Idle {
//!     async fn on_tick(
//!         &mut self,
//!         _ctx: &TickContext,
//!         _state: &GameState,
//!     ) -> Result<Option<Action>, AgentError> {
//!         Ok(Some(Action::skip()))
//!     }
//! }
//!
//! # async fn play() -> Result<(), FirewallError> {
//! firewall::init_logging();
//! let mut client = FirewallClientBuilder::new()
//!     .config(ClientConfig::from_env()?)
//!     .build(Idle)?;
//! client.run().await
//! # }
//! ```

mod client;
mod config;
mod error;
mod handler;

pub use client::{FirewallClient, FirewallClientBuilder};
pub use config::{ClientConfig, ConfigError, DEFAULT_HOST, DEFAULT_VARIANT, TOKEN_ENV, VARIANT_ENV};
pub use error::FirewallError;
pub use firewall_session::SessionError;

/// Installs a `tracing` subscriber printing to stderr.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Does nothing if a
/// global subscriber is already set.
pub fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if fmt().with_env_filter(filter).with_target(true).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Everything an agent implementation usually needs.
pub mod prelude {
    pub use crate::{ClientConfig, FirewallClient, FirewallClientBuilder, FirewallError};
    pub use firewall_protocol::{
        Action, CardinalDirection, Cell, Direction, GameObject, GameState, Ground,
        InventoryItem, Player, Vector,
    };
    pub use firewall_session::{Agent, AgentError};
    pub use firewall_tick::{DecisionMetrics, TickConfig, TickContext};
}
