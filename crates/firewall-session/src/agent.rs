//! The decision-logic hook.
//!
//! The session doesn't know how to play. It knows when to ask: the
//! [`Agent`] trait is the contract between the session loop and your
//! strategy. The loop calls [`on_game_start`](Agent::on_game_start) once
//! per game and [`on_tick`](Agent::on_tick) once per live tick, each under
//! a hard deadline.

use std::future::Future;

use firewall_protocol::{Action, GameState};
use firewall_tick::TickContext;

use crate::AgentError;

/// Decision logic plugged into the session loop.
///
/// # Trait bounds
///
/// - `Send + 'static`: each call runs on its own spawned task, which
///   holds the agent's lock for the duration of the call.
///
/// # Cancellation
///
/// A call that overruns its budget is aborted at its next `.await`.
/// Code that computes without awaiting should check
/// [`TickContext::is_expired`] and return its best answer so far.
///
/// # Example
///
/// ```rust
/// use firewall_protocol::{Action, CardinalDirection, GameState};
/// use firewall_session::{Agent, AgentError};
/// use firewall_tick::TickContext;
///
/// /// Walks up forever.
/// struct Climber;
///
/// impl Agent for Climber {
///     async fn on_tick(
///         &mut self,
///         _ctx: &TickContext,
///         state: &GameState,
///     ) -> Result<Option<Action>, AgentError> {
///         Ok(Some(Action::step(state.player.position, CardinalDirection::Up)))
///     }
/// }
/// ```
pub trait Agent: Send + 'static {
    /// Called once per game, before the first decision.
    fn on_game_start(&mut self) -> impl Future<Output = ()> + Send {
        async {}
    }

    /// Decides this tick's action. `Ok(None)` sends nothing.
    fn on_tick(
        &mut self,
        ctx: &TickContext,
        state: &GameState,
    ) -> impl Future<Output = Result<Option<Action>, AgentError>> + Send;
}
