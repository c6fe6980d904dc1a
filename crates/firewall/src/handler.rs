//! Per-connection loop: link, then read messages and carry out steps.
//!
//! The flow is:
//!   1. Send `link` with the team token before anything else
//!   2. Loop: receive a frame → decode → [`Session::handle`] → perform
//!      the resulting [`Step`]
//!
//! Only one message is processed at a time: a decision must finish or be
//! cancelled before the next frame is read.

use std::sync::Arc;

use firewall_protocol::{Action, ClientMessage, Codec, GameState, ServerMessage};
use firewall_session::{Agent, Session, Step};
use firewall_tick::{DeadlineRunner, TickContext, run_until};
use firewall_transport::{Connection, TransportError};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::FirewallError;

/// Runs a linked session on `conn` until the server closes it.
///
/// Returns `Ok(())` on a clean close.
pub(crate) async fn handle_connection<C, K, A>(
    conn: &C,
    codec: &K,
    token: &str,
    agent: &Arc<Mutex<A>>,
    runner: &mut DeadlineRunner,
) -> Result<(), FirewallError>
where
    C: Connection<Error = TransportError>,
    K: Codec,
    A: Agent,
{
    let conn_id = conn.id();
    let mut session = Session::new(token);

    // --- Step 1: Link ---
    send(conn, codec, &session.link_message()).await?;
    tracing::debug!(%conn_id, "link sent");

    // --- Step 2: Message loop ---
    loop {
        let Some(text) = conn.recv().await? else {
            tracing::info!(
                %conn_id,
                games = session.games(),
                ticks = session.ticks(),
                "connection closed by server"
            );
            return Ok(());
        };

        let message: ServerMessage = match codec.decode(&text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "dropping undecodable message");
                continue;
            }
        };
        tracing::trace!(%conn_id, kind = message.tag(), "message received");

        match session.handle(message) {
            Step::Idle => {}
            Step::Reply(reply) => send(conn, codec, &reply).await?,
            Step::StartGame => start_game(agent, runner).await,
            Step::Decide { start_game, state } => {
                if let Some(action) = decide(agent, runner, start_game, *state).await {
                    send(conn, codec, &ClientMessage::action(action)).await?;
                }
            }
            Step::Terminate(e) => {
                tracing::warn!(%conn_id, error = %e, "session terminated");
                if let Err(close_err) = conn.close().await {
                    tracing::debug!(%conn_id, error = %close_err, "close failed");
                }
                return Err(e.into());
            }
        }
    }
}

/// Encodes and sends one frame.
async fn send<C, K>(conn: &C, codec: &K, message: &ClientMessage) -> Result<(), FirewallError>
where
    C: Connection<Error = TransportError>,
    K: Codec,
{
    let text = codec.encode(message)?;
    conn.send(&text).await?;
    tracing::debug!(conn_id = %conn.id(), kind = message.tag(), "message sent");
    Ok(())
}

/// Runs the agent's game-start hook on its own, for a `gameStart` that
/// arrives before any tick.
async fn start_game<A: Agent>(agent: &Arc<Mutex<A>>, runner: &DeadlineRunner) {
    let budget = runner.config().compute_budget;
    let agent = Arc::clone(agent);
    let result = run_until(Instant::now() + budget, budget, async move {
        agent.lock().await.on_game_start().await;
    })
    .await;
    if let Err(e) = result {
        tracing::warn!(error = %e, "game-start hook failed");
    }
}

/// Runs one deadline-bounded decision. Any failure means no action.
///
/// With `start_game` set, the game-start hook runs first under the same
/// deadline, so the tick never gets more than one budget.
async fn decide<A: Agent>(
    agent: &Arc<Mutex<A>>,
    runner: &mut DeadlineRunner,
    start_game: bool,
    state: GameState,
) -> Option<Action> {
    let agent = Arc::clone(agent);
    let outcome = runner
        .run(move |ctx: TickContext| async move {
            let mut agent = agent.lock().await;
            if start_game {
                agent.on_game_start().await;
            }
            agent.on_tick(&ctx, &state).await
        })
        .await;

    match outcome {
        Ok(Ok(Some(action))) => Some(action),
        Ok(Ok(None)) => {
            tracing::trace!("agent skipped the tick");
            None
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "agent failed to decide");
            None
        }
        // Already logged and counted by the runner.
        Err(_) => None,
    }
}
