use firewall::prelude::*;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

const DIRECTIONS: [CardinalDirection; 4] = [
    CardinalDirection::Up,
    CardinalDirection::Down,
    CardinalDirection::Left,
    CardinalDirection::Right,
];

/// Wanders at random, opening any chest it bumps into.
struct Wanderer {
    rng: StdRng,
    games: u32,
}

impl Wanderer {
    fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            games: 0,
        }
    }

    fn choose(&mut self, state: &GameState) -> Option<Action> {
        let here = state.player.position;

        if let Some(chest) = DIRECTIONS
            .iter()
            .map(|d| here + d.offset())
            .find(|p| matches!(state.object_at(*p), Some(GameObject::Chest(_))))
        {
            return Some(Action::open_chest(chest));
        }

        // Burn a ready buff now and then.
        if let Some(item) = state
            .player
            .inventory
            .iter()
            .find(|i| matches!(i, InventoryItem::Buff(_)) && i.is_ready())
        {
            if self.rng.random_range(0..10) == 0 {
                return Some(Action::use_buff(item.name()));
            }
        }

        let open: Vec<CardinalDirection> = DIRECTIONS
            .into_iter()
            .filter(|d| {
                let next = here + d.offset();
                matches!(state.cell_at(next), Cell::GroundPlane | Cell::Via)
                    && !state.enemy_at(next)
            })
            .collect();
        open.choose(&mut self.rng)
            .map(|d| Action::step(here, *d))
    }
}

impl Agent for Wanderer {
    async fn on_game_start(&mut self) {
        self.games += 1;
        tracing::info!(game = self.games, "new game");
    }

    async fn on_tick(
        &mut self,
        ctx: &TickContext,
        state: &GameState,
    ) -> Result<Option<Action>, AgentError> {
        let action = self.choose(state);
        tracing::debug!(tick = ctx.tick(), hp = state.player.hp, ?action, "decided");
        Ok(action)
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), FirewallError> {
    firewall::init_logging();

    let mut client = FirewallClientBuilder::new()
        .config(ClientConfig::from_env()?)
        .build(Wanderer::new())?;
    client.run().await
}
