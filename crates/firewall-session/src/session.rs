//! The per-connection session state machine.
//!
//! A [`Session`] decides what every inbound message means for the agent,
//! but performs no I/O itself: [`Session::handle`] returns a [`Step`] and
//! the client loop carries it out (sending a reply, starting a game,
//! running a deadline-bounded decision, or shutting down).

use std::fmt;

use firewall_protocol::{
    ClientMessage, GameStart, GameState, Info, LinkFailed, ServerMessage, TickInfo,
    TickInfoDead,
};
use tracing::{debug, info, trace, warn};

use crate::router::{self, MessageHandler};
use crate::SessionError;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where the agent is in the game lifecycle.
///
/// ```text
///                      gameStart / tickInfo
///   AwaitingFirstTick ─────────────────────→ Active
///           │                               │   ↑
///           │ tickInfoDead     tickInfoDead │   │ gameStart
///           ▼                               ▼   │
///          Dead ←───────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected and linked, no game seen yet.
    AwaitingFirstTick,
    /// The agent is alive and deciding every tick.
    Active,
    /// The agent died; ticks are ignored until the next game.
    Dead,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AwaitingFirstTick => "awaiting-first-tick",
            Self::Active => "active",
            Self::Dead => "dead",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// What the client loop must do after a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Nothing to do.
    Idle,
    /// Send this message.
    Reply(ClientMessage),
    /// Run the agent's game-start hook.
    StartGame,
    /// Run a deadline-bounded decision on `state` and send its action, if
    /// any. When `start_game` is set the game-start hook runs first.
    Decide {
        start_game: bool,
        state: Box<GameState>,
    },
    /// Stop the session with this error.
    Terminate(SessionError),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One connection's view of the game.
///
/// Owned by the client task; nothing else mutates it.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    state: SessionState,
    /// Whether the current game's start hook has fired. Checked and set in
    /// one step so the hook runs at most once per game.
    game_started: bool,
    games: u64,
    ticks: u64,
}

impl Session {
    /// A fresh session for a connection linked with `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            state: SessionState::AwaitingFirstTick,
            game_started: false,
            games: 0,
            ticks: 0,
        }
    }

    /// The first frame to send on the connection.
    pub fn link_message(&self) -> ClientMessage {
        ClientMessage::link(self.token.as_str())
    }

    /// Applies one inbound message.
    pub fn handle(&mut self, message: ServerMessage) -> Step {
        router::route(message, self)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Games started on this connection.
    pub fn games(&self) -> u64 {
        self.games
    }

    /// Decisions requested on this connection.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Sets the game-start flag, returning whether this call set it.
    fn claim_game_start(&mut self) -> bool {
        let first = !std::mem::replace(&mut self.game_started, true);
        if first {
            self.games += 1;
            info!(game = self.games, "game started");
        }
        first
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "session state changed");
            self.state = next;
        }
    }
}

impl MessageHandler for Session {
    type Output = Step;

    fn on_game_start(&mut self, _: GameStart) -> Step {
        match self.state {
            SessionState::AwaitingFirstTick => {
                self.claim_game_start();
                self.transition(SessionState::Active);
                Step::StartGame
            }
            SessionState::Active => {
                debug!("duplicate gameStart ignored");
                Step::Idle
            }
            SessionState::Dead => {
                // A new game: the previous game's flag no longer applies.
                self.game_started = false;
                self.claim_game_start();
                self.transition(SessionState::Active);
                Step::StartGame
            }
        }
    }

    fn on_tick_info(&mut self, message: TickInfo) -> Step {
        match self.state {
            SessionState::Dead => {
                trace!("tick ignored while dead");
                Step::Idle
            }
            SessionState::AwaitingFirstTick | SessionState::Active => {
                let start_game = self.claim_game_start();
                self.transition(SessionState::Active);
                self.ticks += 1;
                Step::Decide {
                    start_game,
                    state: Box::new(message.state),
                }
            }
        }
    }

    fn on_tick_dead(&mut self, _: TickInfoDead) -> Step {
        if self.state != SessionState::Dead {
            info!(game = self.games, "agent is dead");
            self.transition(SessionState::Dead);
        }
        Step::Idle
    }

    fn on_info(&mut self, _: Info) -> Step {
        debug!("confirming token");
        Step::Reply(ClientMessage::confirm(self.token.as_str()))
    }

    fn on_link_failed(&mut self, _: LinkFailed) -> Step {
        warn!("server rejected the token");
        Step::Terminate(SessionError::AuthFailed(
            "server rejected the team token".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firewall_protocol::Wire;
    use serde_json::json;

    fn message(tag: &str) -> ServerMessage {
        ServerMessage::decode(&json!({"type": tag})).unwrap()
    }

    fn tick() -> ServerMessage {
        ServerMessage::decode(&json!({
            "type": "tickInfo",
            "state": {
                "player": {"position": {"x": 1, "y": 1}, "lastPosition": {"x": 1, "y": 1}},
                "ground": {"offset": {"x": 0, "y": 0}},
            },
        }))
        .unwrap()
    }

    fn is_decision(step: &Step) -> bool {
        matches!(step, Step::Decide { .. })
    }

    #[test]
    fn test_new_session_awaits_first_tick() {
        let session = Session::new("tok");
        assert_eq!(session.state(), SessionState::AwaitingFirstTick);
        assert_eq!(session.link_message(), ClientMessage::link("tok"));
    }

    #[test]
    fn test_game_start_then_tick() {
        let mut session = Session::new("tok");

        assert_eq!(session.handle(message("gameStart")), Step::StartGame);
        assert_eq!(session.state(), SessionState::Active);

        let step = session.handle(tick());
        assert!(matches!(step, Step::Decide { start_game: false, .. }));
        assert_eq!(session.games(), 1);
    }

    #[test]
    fn test_first_tick_implies_game_start() {
        let mut session = Session::new("tok");

        let step = session.handle(tick());
        assert!(matches!(step, Step::Decide { start_game: true, .. }));
        assert_eq!(session.state(), SessionState::Active);

        let step = session.handle(tick());
        assert!(matches!(step, Step::Decide { start_game: false, .. }));
        assert_eq!(session.games(), 1);
    }

    #[test]
    fn test_duplicate_game_start_is_ignored() {
        let mut session = Session::new("tok");
        session.handle(tick());

        assert_eq!(session.handle(message("gameStart")), Step::Idle);
        assert_eq!(session.games(), 1);
    }

    #[test]
    fn test_no_decisions_after_death() {
        let mut session = Session::new("tok");
        let steps: Vec<Step> = [tick(), tick(), message("tickInfoDead"), tick(), tick()]
            .into_iter()
            .map(|m| session.handle(m))
            .collect();

        assert_eq!(steps.iter().filter(|s| is_decision(s)).count(), 2);
        assert!(!is_decision(&steps[3]));
        assert!(!is_decision(&steps[4]));
        assert_eq!(session.state(), SessionState::Dead);
        assert_eq!(session.ticks(), 2);
    }

    #[test]
    fn test_death_before_first_tick() {
        let mut session = Session::new("tok");
        assert_eq!(session.handle(message("tickInfoDead")), Step::Idle);
        assert_eq!(session.state(), SessionState::Dead);
        assert_eq!(session.handle(tick()), Step::Idle);
    }

    #[test]
    fn test_new_game_after_death_restarts() {
        let mut session = Session::new("tok");
        session.handle(tick());
        session.handle(message("tickInfoDead"));

        assert_eq!(session.handle(message("gameStart")), Step::StartGame);
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.games(), 2);
        assert!(matches!(
            session.handle(tick()),
            Step::Decide { start_game: false, .. }
        ));
    }

    #[test]
    fn test_info_confirms_in_every_state() {
        let confirm = Step::Reply(ClientMessage::confirm("tok"));
        let mut session = Session::new("tok");

        assert_eq!(session.handle(message("info")), confirm);
        assert_eq!(session.state(), SessionState::AwaitingFirstTick);

        session.handle(tick());
        assert_eq!(session.handle(message("info")), confirm);
        assert_eq!(session.state(), SessionState::Active);

        session.handle(message("tickInfoDead"));
        assert_eq!(session.handle(message("info")), confirm);
        assert_eq!(session.state(), SessionState::Dead);
    }

    #[test]
    fn test_link_failed_terminates() {
        let mut session = Session::new("bad");
        assert!(matches!(
            session.handle(message("linkFailed")),
            Step::Terminate(SessionError::AuthFailed(_))
        ));
    }
}
