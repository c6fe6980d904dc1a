//! Positions and directions on the game grid.
//!
//! The grid's y axis grows downwards: `up` is `(0, -1)`.

use std::ops::{Add, Sub};

crate::wire_record! {
    /// A position, or an offset between two positions.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Vector {
        pub x: i64 = "x",
        pub y: i64 = "y",
    }
}

impl Vector {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Number of orthogonal steps between two positions.
    pub fn manhattan(self, other: Self) -> i64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

crate::wire_enum! {
    /// One of the four axis-aligned directions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum CardinalDirection {
        Up = "up",
        Down = "down",
        Left = "left",
        Right = "right",
    }
}

impl CardinalDirection {
    /// The unit step in this direction.
    pub const fn offset(self) -> Vector {
        match self {
            Self::Up => Vector::new(0, -1),
            Self::Down => Vector::new(0, 1),
            Self::Left => Vector::new(-1, 0),
            Self::Right => Vector::new(1, 0),
        }
    }
}

crate::wire_enum! {
    /// One of the eight directions, diagonals included.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Direction {
        Up = "up",
        Down = "down",
        Left = "left",
        Right = "right",
        UpLeft = "upLeft",
        UpRight = "upRight",
        DownLeft = "downLeft",
        DownRight = "downRight",
    }
}

impl Direction {
    /// The unit step in this direction. Diagonals move on both axes.
    pub fn offset(self) -> Vector {
        use CardinalDirection as C;
        match self {
            Self::Up => C::Up.offset(),
            Self::Down => C::Down.offset(),
            Self::Left => C::Left.offset(),
            Self::Right => C::Right.offset(),
            Self::UpLeft => C::Up.offset() + C::Left.offset(),
            Self::UpRight => C::Up.offset() + C::Right.offset(),
            Self::DownLeft => C::Down.offset() + C::Left.offset(),
            Self::DownRight => C::Down.offset() + C::Right.offset(),
        }
    }

    /// The direction whose offset is exactly `offset`.
    pub fn from_offset(offset: Vector) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.offset() == offset)
    }
}

impl From<CardinalDirection> for Direction {
    fn from(direction: CardinalDirection) -> Self {
        match direction {
            CardinalDirection::Up => Self::Up,
            CardinalDirection::Down => Self::Down,
            CardinalDirection::Left => Self::Left,
            CardinalDirection::Right => Self::Right,
        }
    }
}
