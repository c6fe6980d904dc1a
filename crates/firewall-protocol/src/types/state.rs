//! The game state sent with every `tickInfo`.

use serde_json::{Map, Value};

use super::geometry::{Direction, Vector};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

crate::wire_enum! {
    /// What a buff does when used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum BuffEffect {
        Heal = "heal",
        /// Ignore every item cooldown.
        Haste = "haste",
        Score = "score",
        Shield = "shield",
        /// Multiply all damage dealt.
        Damage = "damage",
        HealAndShield = "healAndShield",
    }
}

crate::wire_enum! {
    /// Terrain of one grid cell.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub enum Cell {
        #[default]
        GroundPlane = "groundPlane",
        Firewall = "firewall",
        Via = "via",
        Chest = "chest",
        Resistance = "resistance",
        Pcb = "pcb",
    }
}

crate::wire_enum! {
    /// How many projectiles a projectile item fires, and where.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ProjectilePattern {
        /// One projectile in the chosen direction.
        Single = "single",
        /// Three side-by-side projectiles.
        Line = "line",
        /// One projectile per cardinal direction.
        Star = "star",
        /// One projectile per cell of the map.
        Global = "global",
    }
}

// ---------------------------------------------------------------------------
// Placed items
// ---------------------------------------------------------------------------

crate::wire_record! {
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct PlacedWall ["type" = "wall"] {}
}

crate::wire_record! {
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct PlacedTrap ["type" = "trap"] {
        /// Hit points lost by a player stepping on the trap.
        pub damage: i64 = "damage",
    }
}

crate::wire_union! {
    /// The object a placed item puts on the map.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PlacedObject on "type" {
        Wall(PlacedWall),
        Trap(PlacedTrap),
    }
}

crate::wire_record! {
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct SinglePattern ["type" = "single"] {}
}

crate::wire_record! {
    /// A filled rectangle at the target position.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct RectanglePattern ["type" = "rectangle"] {
        pub width: i64 = "width",
        pub height: i64 = "height",
    }
}

crate::wire_record! {
    /// A hollow square centred on the player.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct BoxPattern ["type" = "box"] {
        /// Distance between the objects and the player.
        pub radius: i64 = "radius",
    }
}

crate::wire_union! {
    /// The shape objects are placed in.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PlacedPattern on "type" {
        Single(SinglePattern),
        Rectangle(RectanglePattern),
        Box(BoxPattern),
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

crate::wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BuffItem ["type" = "buff"] {
        pub name: String = "name",
        pub remaining_ticks: i64 = "remainingTicks",
        pub quantity: Option<i64> = "quantity",
        pub effect: BuffEffect = "effect",
        pub power: i64 = "power",
        pub duration: i64 = "duration",
    }
}

crate::wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ProjectileItem ["type" = "projectile"] {
        pub name: String = "name",
        pub remaining_ticks: i64 = "remainingTicks",
        pub quantity: Option<i64> = "quantity",
        /// Total distance the projectile can travel.
        pub range: i64 = "range",
        /// Cells travelled per tick.
        pub speed: i64 = "speed",
        pub damage: i64 = "damage",
        pub pattern: ProjectilePattern = "pattern",
    }
}

crate::wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PlacedItem ["type" = "placed"] {
        pub name: String = "name",
        pub remaining_ticks: i64 = "remainingTicks",
        pub quantity: Option<i64> = "quantity",
        pub object: PlacedObject = "object",
        pub pattern: PlacedPattern = "pattern",
        /// Maximum placement distance from the player.
        pub range: i64 = "range",
    }
}

crate::wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NukeItem ["type" = "nuke"] {
        pub name: String = "name",
        pub remaining_ticks: i64 = "remainingTicks",
        pub quantity: Option<i64> = "quantity",
        /// Hit points removed from every player and wall.
        pub damage: i64 = "damage",
    }
}

crate::wire_union! {
    /// An item in a player's inventory.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum InventoryItem on "type" {
        Buff(BuffItem),
        Projectile(ProjectileItem),
        Placed(PlacedItem),
        Nuke(NukeItem),
    }
}

impl InventoryItem {
    pub fn name(&self) -> &str {
        match self {
            Self::Buff(item) => &item.name,
            Self::Projectile(item) => &item.name,
            Self::Placed(item) => &item.name,
            Self::Nuke(item) => &item.name,
        }
    }

    /// Ticks left before the item can be used again. `0` means ready.
    pub fn remaining_ticks(&self) -> i64 {
        match self {
            Self::Buff(item) => item.remaining_ticks,
            Self::Projectile(item) => item.remaining_ticks,
            Self::Placed(item) => item.remaining_ticks,
            Self::Nuke(item) => item.remaining_ticks,
        }
    }

    /// Uses left, or `None` when the item is unlimited.
    pub fn quantity(&self) -> Option<i64> {
        match self {
            Self::Buff(item) => item.quantity,
            Self::Projectile(item) => item.quantity,
            Self::Placed(item) => item.quantity,
            Self::Nuke(item) => item.quantity,
        }
    }

    /// Off cooldown with at least one use left.
    pub fn is_ready(&self) -> bool {
        self.remaining_ticks() == 0 && self.quantity().is_none_or(|q| q > 0)
    }
}

// ---------------------------------------------------------------------------
// Map objects
// ---------------------------------------------------------------------------

crate::wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ResistanceObject ["type" = "resistance"] {
        pub position: Vector = "position",
        pub hp: i64 = "hp",
    }
}

crate::wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ChestObject ["type" = "chest"] {
        pub position: Vector = "position",
    }
}

crate::wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TrapObject ["type" = "trap"] {
        pub position: Vector = "position",
        pub owner: String = "owner",
        pub name: String = "name",
        pub damage: i64 = "damage",
    }
}

crate::wire_union! {
    /// Something standing on the map near the player.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum GameObject on "type" {
        Resistance(ResistanceObject),
        Chest(ChestObject),
        Trap(TrapObject),
    }
}

impl GameObject {
    pub fn position(&self) -> Vector {
        match self {
            Self::Resistance(object) => object.position,
            Self::Chest(object) => object.position,
            Self::Trap(object) => object.position,
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

crate::wire_record! {
    /// An enemy projectile in flight.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Projectile {
        pub name: String = "name",
        pub position: Vector = "position",
        pub direction: Direction = "direction",
        /// Ticks before the projectile disappears.
        pub remaining_ticks: i64 = "remainingTicks",
        pub speed: i64 = "speed",
        pub damage: i64 = "damage",
    }
}

crate::wire_record! {
    /// A buff currently applied to a player.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Buff {
        pub name: String = "name",
        pub effect: BuffEffect = "effect",
        pub power: i64 = "power",
        pub duration: i64 = "duration",
    }
}

crate::wire_record! {
    /// The terrain in view, row-major, with `offset` the map position of
    /// its top-left cell.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Ground {
        pub width: i64 = "width",
        pub height: i64 = "height",
        pub data: Vec<Cell> = "data",
        pub offset: Vector = "offset",
    }
}

impl Ground {
    /// Terrain at a map position. Cells outside the view read as
    /// [`Cell::GroundPlane`].
    pub fn cell_at(&self, position: Vector) -> Cell {
        match (
            position.x.checked_sub(self.offset.x),
            position.y.checked_sub(self.offset.y),
        ) {
            (Some(x), Some(y)) => self.cell_in_view(Vector::new(x, y)),
            _ => Cell::GroundPlane,
        }
    }

    /// Terrain at a position relative to the top-left of the view.
    pub fn cell_in_view(&self, local: Vector) -> Cell {
        if local.x < 0 || local.y < 0 || local.x >= self.width || local.y >= self.height {
            return Cell::GroundPlane;
        }
        local
            .y
            .checked_mul(self.width)
            .and_then(|row| row.checked_add(local.x))
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.data.get(index))
            .copied()
            .unwrap_or_default()
    }
}

crate::wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Player {
        pub name: String = "name",
        pub score: i64 = "score",
        pub kills: i64 = "kills",
        pub hp: i64 = "hp",
        pub shield: i64 = "shield",
        pub position: Vector = "position",
        /// Position at the previous tick.
        pub last_position: Vector = "lastPosition",
        pub remaining_haste_ticks: i64 = "remainingHasteTicks",
        pub remaining_damage_ticks: i64 = "remainingDamageTicks",
        pub inventory: Vec<InventoryItem> = "inventory",
        pub effects: Vec<Buff> = "effects",
    }
}

impl Player {
    /// Looks up an inventory item by name.
    pub fn item(&self, name: &str) -> Option<&InventoryItem> {
        self.inventory.iter().find(|item| item.name() == name)
    }
}

crate::wire_record! {
    /// Everything the agent sees for one tick.
    #[derive(Debug, Clone, PartialEq)]
    pub struct GameState {
        pub player: Player = "player",
        /// Enemies within view.
        pub enemies: Vec<Player> = "enemies",
        /// Match statistics (`aliveCount`, `deadCount`, ...), passed through.
        pub stats: Map<String, Value> = "stats",
        pub ground: Ground = "ground",
        pub objects: Vec<GameObject> = "objects",
        pub projectiles: Vec<Projectile> = "projectiles",
    }
}

impl GameState {
    /// The terrain at a map position.
    pub fn cell_at(&self, position: Vector) -> Cell {
        self.ground.cell_at(position)
    }

    /// Whether an enemy stands at `position`.
    pub fn enemy_at(&self, position: Vector) -> bool {
        self.enemies.iter().any(|e| e.position == position)
    }

    /// The object standing at `position`, if any.
    pub fn object_at(&self, position: Vector) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.position() == position)
    }
}
