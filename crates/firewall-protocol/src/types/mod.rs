//! FireWall protocol declarations.

mod action;
mod geometry;
mod message;
mod state;

pub use action::{
    Action, MoveAction, OpenChestAction, PhaseAction, SegFaultAction, SkipAction,
    UseBuff, UseItemAction, UseItemData, UseNuke, UsePlaced, UseProjectile,
};
pub use geometry::{CardinalDirection, Direction, Vector};
pub use message::{
    ClientMessage, Confirm, GameStart, Info, Link, LinkFailed, ServerMessage,
    SetAction, TickInfo, TickInfoDead,
};
pub use state::{
    BoxPattern, Buff, BuffEffect, BuffItem, Cell, ChestObject, GameObject,
    GameState, Ground, InventoryItem, NukeItem, PlacedItem, PlacedObject,
    PlacedPattern, PlacedTrap, PlacedWall, Player, Projectile, ProjectileItem,
    ProjectilePattern, RectanglePattern, ResistanceObject, SinglePattern,
    TrapObject,
};

use crate::schema::{Registry, RegistryBuilder};
use crate::RegistryError;

/// Builds and validates the registry of every protocol type.
///
/// # Errors
/// Any [`RegistryError`] means the declarations are inconsistent; callers
/// should refuse to start.
pub fn protocol_registry() -> Result<Registry, RegistryError> {
    RegistryBuilder::new()
        // geometry
        .register::<Vector>()
        .register::<CardinalDirection>()
        .register::<Direction>()
        // state
        .register::<BuffEffect>()
        .register::<Cell>()
        .register::<ProjectilePattern>()
        .register::<PlacedWall>()
        .register::<PlacedTrap>()
        .register::<PlacedObject>()
        .register::<SinglePattern>()
        .register::<RectanglePattern>()
        .register::<BoxPattern>()
        .register::<PlacedPattern>()
        .register::<BuffItem>()
        .register::<ProjectileItem>()
        .register::<PlacedItem>()
        .register::<NukeItem>()
        .register::<InventoryItem>()
        .register::<ResistanceObject>()
        .register::<ChestObject>()
        .register::<TrapObject>()
        .register::<GameObject>()
        .register::<Projectile>()
        .register::<Buff>()
        .register::<Ground>()
        .register::<Player>()
        .register::<GameState>()
        // actions
        .register::<UseBuff>()
        .register::<UseNuke>()
        .register::<UseProjectile>()
        .register::<UsePlaced>()
        .register::<UseItemData>()
        .register::<MoveAction>()
        .register::<PhaseAction>()
        .register::<OpenChestAction>()
        .register::<UseItemAction>()
        .register::<SegFaultAction>()
        .register::<SkipAction>()
        .register::<Action>()
        // messages
        .register::<GameStart>()
        .register::<TickInfo>()
        .register::<TickInfoDead>()
        .register::<Info>()
        .register::<LinkFailed>()
        .register::<ServerMessage>()
        .register::<SetAction>()
        .register::<Link>()
        .register::<Confirm>()
        .register::<ClientMessage>()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaNode;

    #[test]
    fn test_protocol_registry_is_consistent() {
        let registry = protocol_registry().unwrap();
        assert_eq!(registry.len(), 49);
        assert!(matches!(
            registry.get("ServerMessage"),
            Some(SchemaNode::Union(u)) if u.discriminant == "type" && u.members.len() == 5
        ));
        assert!(matches!(
            registry.get("Action"),
            Some(SchemaNode::Union(u)) if u.discriminant == "action"
        ));
    }

    #[test]
    fn test_link_fixes_client_type() {
        let registry = protocol_registry().unwrap();
        let Some(SchemaNode::Record(link)) = registry.get("Link") else {
            panic!("Link should be a record");
        };
        assert_eq!(link.fixed_value("clientType"), Some("agent"));
        assert_eq!(link.fixed_value("type"), Some("link"));
    }
}
