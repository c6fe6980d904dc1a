//! Dispatch of inbound messages to per-kind handler methods.

use firewall_protocol::{GameStart, Info, LinkFailed, ServerMessage, TickInfo, TickInfoDead};

/// One method per kind of server message.
///
/// [`route`] calls exactly one of them for every message. Adding a kind to
/// [`ServerMessage`] without handling it here is a compile error.
pub trait MessageHandler {
    type Output;

    fn on_game_start(&mut self, message: GameStart) -> Self::Output;

    fn on_tick_info(&mut self, message: TickInfo) -> Self::Output;

    fn on_tick_dead(&mut self, message: TickInfoDead) -> Self::Output;

    fn on_info(&mut self, message: Info) -> Self::Output;

    fn on_link_failed(&mut self, message: LinkFailed) -> Self::Output;
}

/// Hands `message` to the matching method of `handler`.
pub fn route<H: MessageHandler>(message: ServerMessage, handler: &mut H) -> H::Output {
    match message {
        ServerMessage::GameStart(m) => handler.on_game_start(m),
        ServerMessage::TickInfo(m) => handler.on_tick_info(m),
        ServerMessage::TickInfoDead(m) => handler.on_tick_dead(m),
        ServerMessage::Info(m) => handler.on_info(m),
        ServerMessage::LinkFailed(m) => handler.on_link_failed(m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firewall_protocol::Wire;
    use serde_json::json;

    /// Records which method was called.
    #[derive(Default)]
    struct Recorder(Vec<&'static str>);

    impl MessageHandler for Recorder {
        type Output = ();

        fn on_game_start(&mut self, _: GameStart) {
            self.0.push("gameStart");
        }
        fn on_tick_info(&mut self, _: TickInfo) {
            self.0.push("tickInfo");
        }
        fn on_tick_dead(&mut self, _: TickInfoDead) {
            self.0.push("tickInfoDead");
        }
        fn on_info(&mut self, _: Info) {
            self.0.push("info");
        }
        fn on_link_failed(&mut self, _: LinkFailed) {
            self.0.push("linkFailed");
        }
    }

    #[test]
    fn test_each_message_reaches_exactly_one_method() {
        let mut recorder = Recorder::default();
        for tag in ["info", "gameStart", "tickInfoDead", "linkFailed"] {
            let message = ServerMessage::decode(&json!({"type": tag})).unwrap();
            route(message, &mut recorder);
        }
        let tick = ServerMessage::decode(&json!({
            "type": "tickInfo",
            "state": {
                "player": {"position": {"x": 0, "y": 0}, "lastPosition": {"x": 0, "y": 0}},
                "ground": {"offset": {"x": 0, "y": 0}},
            },
        }))
        .unwrap();
        route(tick, &mut recorder);

        assert_eq!(
            recorder.0,
            ["info", "gameStart", "tickInfoDead", "linkFailed", "tickInfo"]
        );
    }
}
