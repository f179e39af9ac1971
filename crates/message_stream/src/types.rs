//! # Core Type Definitions
//!
//! Identifier and coordinate types carried as message arguments.
//!
//! ## Key Types
//!
//! - [`PlayerIndex`] - Slot of the player that originated a message
//! - [`ObjectId`], [`DrawableId`], [`TeamId`] - Wrapper ids so the three
//!   reference kinds cannot be confused with each other or with plain integers
//! - [`Coord3D`] - World-space location
//! - [`ICoord2D`] / [`IRegion2D`] - Screen-space pixel point and rectangle
//! - [`Coord2D`] - Screen-space vector used for camera scroll offsets

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Index of the player slot a message originated from.
///
/// Messages built by a stream factory are stamped with the stream's local
/// player; the network layer re-stamps messages it receives from peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct PlayerIndex(pub i32);

impl fmt::Display for PlayerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Reference to a simulation object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Reference to a client-side drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DrawableId(pub u32);

/// Reference to a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TeamId(pub u32);

// ============================================================================
// Coordinates
// ============================================================================

/// World-space location.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Coord3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Screen-space vector in (fractional) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord2D {
    pub x: f32,
    pub y: f32,
}

impl Coord2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::default()
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Screen-space pixel point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ICoord2D {
    pub x: i32,
    pub y: i32,
}

impl ICoord2D {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for ICoord2D {
    type Output = ICoord2D;

    fn sub(self, rhs: Self) -> Self::Output {
        ICoord2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::AddAssign for ICoord2D {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Axis-aligned pixel rectangle; `lo` is the top-left corner, `hi` the
/// bottom-right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IRegion2D {
    pub lo: ICoord2D,
    pub hi: ICoord2D,
}

impl IRegion2D {
    /// Builds the normalized rectangle spanning two arbitrary corners.
    pub fn spanning(a: ICoord2D, b: ICoord2D) -> Self {
        Self {
            lo: ICoord2D::new(a.x.min(b.x), a.y.min(b.y)),
            hi: ICoord2D::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> i32 {
        self.hi.x - self.lo.x
    }

    pub fn height(&self) -> i32 {
        self.hi.y - self.lo.y
    }

    /// True when the rectangle has collapsed to a single point.
    pub fn is_point(&self) -> bool {
        self.lo == self.hi
    }
}
