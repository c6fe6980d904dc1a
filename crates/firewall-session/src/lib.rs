//! Session layer for FireWall agents.
//!
//! This crate decides what each server message means for the agent:
//!
//! 1. **Routing**: one handler method per message kind ([`MessageHandler`],
//!    [`route`])
//! 2. **Session state**: awaiting the first tick, active or dead
//!    ([`Session`], [`SessionState`]), with the resulting [`Step`] for the
//!    client loop to perform
//! 3. **Agent contract**: the hooks the loop calls ([`Agent`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Client loop (above)  ← performs Steps, runs the agent under a deadline
//!     ↕
//! Session Layer (this crate)  ← decides what each message means
//!     ↕
//! Protocol Layer (below)  ← provides ServerMessage, ClientMessage, GameState
//! ```

#![allow(async_fn_in_trait)]

mod agent;
mod error;
mod router;
mod session;

pub use agent::Agent;
pub use error::{AgentError, SessionError};
pub use router::{MessageHandler, route};
pub use session::{Session, SessionState, Step};
