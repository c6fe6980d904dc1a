//! `FirewallClient` builder and entry point.
//!
//! This is where an agent gets connected to the game. It ties together all
//! the layers: transport → protocol → session → deadline runner → agent.

use std::sync::Arc;

use firewall_protocol::{JsonCodec, protocol_registry};
use firewall_session::Agent;
use firewall_tick::{DeadlineRunner, DecisionMetrics, TickConfig};
use firewall_transport::{Connection, TransportError, WebSocketConnection};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::{ClientConfig, FirewallError};

/// Builder for configuring a FireWall client.
///
/// # Example
///
/// ```rust,ignore
/// use firewall::prelude::*;
///
/// let mut client = FirewallClientBuilder::new()
///     .config(ClientConfig::from_env()?)
///     .build(MyAgent::default())?;
/// client.run().await
/// ```
#[derive(Debug, Default)]
pub struct FirewallClientBuilder {
    config: Option<ClientConfig>,
    endpoint: Option<String>,
    tick_config: TickConfig,
}

impl FirewallClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a complete client configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses a hardcoded token with the default variant.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config = Some(ClientConfig::new(token));
        self
    }

    /// Connects to `url` instead of the configured endpoint.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Sets the decision timing.
    pub fn tick_config(mut self, config: TickConfig) -> Self {
        self.tick_config = config;
        self
    }

    /// Validates the configuration and the protocol schema.
    ///
    /// # Errors
    /// [`FirewallError::Config`] without a token, [`FirewallError::Registry`]
    /// if the protocol declarations are inconsistent.
    pub fn build<A: Agent>(self, agent: A) -> Result<FirewallClient<A>, FirewallError> {
        let mut config = self.config.ok_or(crate::ConfigError::MissingToken)?;
        if let Some(url) = self.endpoint {
            config.endpoint = Some(url);
        }
        config.validate()?;

        let registry = protocol_registry()?;
        tracing::debug!(types = registry.len(), "protocol schema validated");

        Ok(FirewallClient {
            config,
            runner: DeadlineRunner::new(self.tick_config),
            agent: Arc::new(Mutex::new(agent)),
            codec: JsonCodec,
        })
    }
}

/// A configured FireWall agent, ready to connect.
///
/// Built with [`FirewallClientBuilder`]. Call [`run()`](Self::run) to
/// play until the server disconnects.
pub struct FirewallClient<A: Agent> {
    config: ClientConfig,
    runner: DeadlineRunner,
    agent: Arc<Mutex<A>>,
    codec: JsonCodec,
}

impl<A: Agent> FirewallClient<A> {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Shared handle to the agent. Lock it only between ticks.
    pub fn agent(&self) -> Arc<Mutex<A>> {
        Arc::clone(&self.agent)
    }

    /// Decision metrics accumulated over every run of this client.
    pub fn metrics(&self) -> &DecisionMetrics {
        self.runner.metrics()
    }

    /// Connects to the configured endpoint and plays until the server
    /// closes the connection.
    ///
    /// # Errors
    /// Connection and transport failures, or
    /// `FirewallError::Session(SessionError::AuthFailed)` when the server
    /// rejects the token.
    pub async fn run(&mut self) -> Result<(), FirewallError> {
        let url = self.config.url();
        tracing::info!(%url, "connecting");
        let conn = WebSocketConnection::connect(&url).await?;
        self.run_on(conn).await
    }

    /// Plays over an already-open connection.
    ///
    /// # Errors
    /// See [`run`](Self::run).
    pub async fn run_on<C>(&mut self, conn: C) -> Result<(), FirewallError>
    where
        C: Connection<Error = TransportError>,
    {
        let result = handle_connection(
            &conn,
            &self.codec,
            &self.config.token,
            &self.agent,
            &mut self.runner,
        )
        .await;

        match serde_json::to_string(self.runner.metrics()) {
            Ok(json) => tracing::info!(metrics = %json, "session ended"),
            Err(e) => tracing::debug!(error = %e, "could not serialize metrics"),
        }
        result
    }
}
