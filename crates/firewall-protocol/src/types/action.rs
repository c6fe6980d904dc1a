//! Actions an agent can take on its turn.

use super::geometry::{CardinalDirection, Direction, Vector};

// ---------------------------------------------------------------------------
// Item use payloads
// ---------------------------------------------------------------------------

crate::wire_record! {
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct UseBuff ["type" = "buff"] {}
}

crate::wire_record! {
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct UseNuke ["type" = "nuke"] {}
}

crate::wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UseProjectile ["type" = "projectile"] {
        pub direction: Direction = "direction",
    }
}

crate::wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UsePlaced ["type" = "placed"] {
        pub position: Vector = "position",
        /// Rotates a rectangle pattern by a quarter turn.
        pub place_rectangle_vertical: bool = "placeRectangleVertical",
    }
}

crate::wire_union! {
    /// How an item is used; must match the item's own kind.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum UseItemData on "type" {
        Buff(UseBuff),
        Nuke(UseNuke),
        Projectile(UseProjectile),
        Placed(UsePlaced),
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

crate::wire_record! {
    /// Walk to a map position.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MoveAction ["action" = "move"] {
        pub position: Vector = "position",
    }
}

crate::wire_record! {
    /// Pass through walls in a cardinal direction.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PhaseAction ["action" = "phase"] {
        pub direction: CardinalDirection = "direction",
    }
}

crate::wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct OpenChestAction ["action" = "openChest"] {
        pub position: Vector = "position",
    }
}

crate::wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UseItemAction ["action" = "useItem"] {
        /// Name of the inventory item.
        pub name: String = "name",
        pub data: UseItemData = "data",
    }
}

crate::wire_record! {
    /// Abandon the current game.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct SegFaultAction ["action" = "segFault"] {}
}

crate::wire_record! {
    /// Do nothing this tick.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct SkipAction ["action" = "skip"] {}
}

crate::wire_union! {
    /// One turn's worth of intent, sent back to the server.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Action on "action" {
        Move(MoveAction),
        Phase(PhaseAction),
        OpenChest(OpenChestAction),
        UseItem(UseItemAction),
        SegFault(SegFaultAction),
        Skip(SkipAction),
    }
}

impl Action {
    pub fn move_to(position: Vector) -> Self {
        MoveAction { position }.into()
    }

    /// Moves one cell from `from` in `direction`.
    pub fn step(from: Vector, direction: CardinalDirection) -> Self {
        Self::move_to(from + direction.offset())
    }

    pub fn phase(direction: CardinalDirection) -> Self {
        PhaseAction { direction }.into()
    }

    pub fn open_chest(position: Vector) -> Self {
        OpenChestAction { position }.into()
    }

    pub fn use_buff(item: impl Into<String>) -> Self {
        Self::use_item(item, UseBuff {}.into())
    }

    pub fn use_nuke(item: impl Into<String>) -> Self {
        Self::use_item(item, UseNuke {}.into())
    }

    pub fn use_projectile(item: impl Into<String>, direction: Direction) -> Self {
        Self::use_item(item, UseProjectile { direction }.into())
    }

    pub fn use_placed(item: impl Into<String>, position: Vector, vertical: bool) -> Self {
        Self::use_item(
            item,
            UsePlaced {
                position,
                place_rectangle_vertical: vertical,
            }
            .into(),
        )
    }

    fn use_item(item: impl Into<String>, data: UseItemData) -> Self {
        UseItemAction {
            name: item.into(),
            data,
        }
        .into()
    }

    pub fn seg_fault() -> Self {
        SegFaultAction {}.into()
    }

    pub fn skip() -> Self {
        SkipAction {}.into()
    }
}
