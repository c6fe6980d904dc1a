//! Wire protocol for the FireWall game.
//!
//! This crate defines the "language" the agent and the game server speak:
//!
//! - **Schema** ([`schema`]): record, enum, list, nullable and tagged-union
//!   declarations, checked once at startup by a [`Registry`].
//! - **Wire** ([`Wire`]): typed values ↔ `serde_json::Value`, generated
//!   per type by [`wire_record!`], [`wire_enum!`] and [`wire_union!`].
//! - **Codec** ([`Codec`], [`JsonCodec`]): text frames ↔ typed values.
//! - **Types**: the game state, actions and messages.
//!
//! ```text
//! Transport (text) → Codec → ServerMessage → Session
//!                          ← ClientMessage ←
//! ```

mod codec;
mod error;
mod macros;
pub mod schema;
mod types;
pub mod wire;

pub use codec::{Codec, JsonCodec};
pub use error::{DecodeError, PathSegment, ProtocolError, RegistryError, WirePath, kind_of};
pub use schema::{Registry, RegistryBuilder, SchemaNode};
pub use types::*;
pub use wire::{Declared, Wire, WireRecord};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::{Map, Value};
}
