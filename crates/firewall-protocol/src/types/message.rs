//! Top-level frames exchanged with the game server.

use super::action::Action;
use super::state::GameState;

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

crate::wire_record! {
    /// A new game begins.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct GameStart ["type" = "gameStart"] {}
}

crate::wire_record! {
    /// A tick while the agent is alive.
    #[derive(Debug, Clone, PartialEq)]
    pub struct TickInfo ["type" = "tickInfo"] {
        pub state: GameState = "state",
    }
}

crate::wire_record! {
    /// A tick after the agent died.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct TickInfoDead ["type" = "tickInfoDead"] {}
}

crate::wire_record! {
    /// The server asks the client to confirm its token.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct Info ["type" = "info"] {}
}

crate::wire_record! {
    /// The token sent in `link` was rejected.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct LinkFailed ["type" = "linkFailed"] {}
}

crate::wire_union! {
    /// Every frame the server sends.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ServerMessage on "type" {
        GameStart(GameStart),
        TickInfo(TickInfo),
        TickInfoDead(TickInfoDead),
        Info(Info),
        LinkFailed(LinkFailed),
    }
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

crate::wire_record! {
    /// This tick's action.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SetAction ["type" = "action"] {
        pub action: Action = "action",
    }
}

crate::wire_record! {
    /// First frame on a new connection.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Link ["type" = "link", "clientType" = "agent"] {
        pub team_id: String = "teamId",
    }
}

crate::wire_record! {
    /// Reply to [`Info`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Confirm ["type" = "confirm"] {
        pub team_token: String = "teamToken",
    }
}

crate::wire_union! {
    /// Every frame the client sends.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ClientMessage on "type" {
        SetAction(SetAction),
        Link(Link),
        Confirm(Confirm),
    }
}

impl ClientMessage {
    pub fn link(token: impl Into<String>) -> Self {
        Link {
            team_id: token.into(),
        }
        .into()
    }

    pub fn confirm(token: impl Into<String>) -> Self {
        Confirm {
            team_token: token.into(),
        }
        .into()
    }

    pub fn action(action: Action) -> Self {
        SetAction { action }.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Wire;
    use serde_json::json;

    #[test]
    fn test_link_carries_fixed_client_type() {
        assert_eq!(
            ClientMessage::link("team-42").encode(),
            json!({"type": "link", "clientType": "agent", "teamId": "team-42"})
        );
    }

    #[test]
    fn test_action_frame_nests_action_union() {
        assert_eq!(
            ClientMessage::action(Action::skip()).encode(),
            json!({"type": "action", "action": {"action": "skip"}})
        );
    }

    #[test]
    fn test_tick_info_without_state_is_rejected() {
        let err = ServerMessage::decode(&json!({"type": "tickInfo"})).unwrap_err();
        assert_eq!(err.path().to_string(), "$.state");
    }

    #[test]
    fn test_dataless_server_messages_decode() {
        for (tag, expected) in [
            ("gameStart", ServerMessage::GameStart(GameStart {})),
            ("tickInfoDead", ServerMessage::TickInfoDead(TickInfoDead {})),
            ("info", ServerMessage::Info(Info {})),
            ("linkFailed", ServerMessage::LinkFailed(LinkFailed {})),
        ] {
            let decoded = ServerMessage::decode(&json!({"type": tag})).unwrap();
            assert_eq!(decoded, expected);
            assert_eq!(decoded.tag(), tag);
        }
    }
}
