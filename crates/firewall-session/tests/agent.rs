//! Driving an agent through a session the way the client loop does.

use std::sync::Arc;
use std::time::Duration;

use firewall_protocol::{Action, CardinalDirection, GameState, ServerMessage, Vector, Wire};
use firewall_session::{Agent, AgentError, Session, Step};
use firewall_tick::{DeadlineRunner, TickConfig, TickContext};
use serde_json::json;
use tokio::sync::Mutex;

#[derive(Default)]
struct Stepper {
    games: u32,
    decisions: u32,
}

impl Agent for Stepper {
    async fn on_game_start(&mut self) {
        self.games += 1;
    }

    async fn on_tick(
        &mut self,
        _ctx: &TickContext,
        state: &GameState,
    ) -> Result<Option<Action>, AgentError> {
        self.decisions += 1;
        if state.player.hp <= 0 {
            return Err(AgentError::msg("no hit points left"));
        }
        Ok(Some(Action::step(state.player.position, CardinalDirection::Right)))
    }
}

fn tick(hp: i64) -> ServerMessage {
    ServerMessage::decode(&json!({
        "type": "tickInfo",
        "state": {
            "player": {
                "hp": hp,
                "position": {"x": 2, "y": 3},
                "lastPosition": {"x": 2, "y": 3},
            },
            "ground": {"offset": {"x": 0, "y": 0}},
        },
    }))
    .unwrap()
}

/// Carries out a `Decide` step: game start, when due, and the decision
/// share one deadline.
async fn decide<A: Agent>(
    runner: &mut DeadlineRunner,
    agent: &Arc<Mutex<A>>,
    start_game: bool,
    state: GameState,
) -> Option<Result<Option<Action>, AgentError>> {
    let agent = Arc::clone(agent);
    runner
        .run(move |ctx| async move {
            let mut agent = agent.lock().await;
            if start_game {
                agent.on_game_start().await;
            }
            agent.on_tick(&ctx, &state).await
        })
        .await
        .ok()
}

#[tokio::test(start_paused = true)]
async fn test_first_tick_starts_game_and_decides() {
    let mut session = Session::new("tok");
    let mut runner = DeadlineRunner::new(TickConfig::with_budget(Duration::from_millis(200)));
    let agent = Arc::new(Mutex::new(Stepper::default()));

    let Step::Decide { start_game, state } = session.handle(tick(100)) else {
        panic!("expected a decision");
    };
    let action = decide(&mut runner, &agent, start_game, *state).await;

    assert!(matches!(action, Some(Ok(Some(a))) if a == Action::move_to(Vector::new(3, 3))));
    let agent = agent.lock().await;
    assert_eq!((agent.games, agent.decisions), (1, 1));
}

#[tokio::test(start_paused = true)]
async fn test_agent_error_yields_no_action() {
    let mut session = Session::new("tok");
    let mut runner = DeadlineRunner::default();
    let agent = Arc::new(Mutex::new(Stepper::default()));

    let Step::Decide { start_game, state } = session.handle(tick(0)) else {
        panic!("expected a decision");
    };
    let outcome = decide(&mut runner, &agent, start_game, *state).await;

    assert!(matches!(outcome, Some(Err(AgentError::Message(_)))));
    // The runner itself completed; the failure is the agent's.
    assert_eq!(runner.metrics().completed, 1);
}
