//! Static world geometry
//!
//! All platform variants share the same box; they differ only in what
//! happens when the player overlaps them.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::player::Item;
use super::rect::Aabb;

/// Collision effect of a platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Blocks movement on all sides
    Solid,
    /// Can only be landed on from above
    OneWay,
    /// Solid, and damages the player on every frame of overlap
    Hazard { damage: i32 },
    /// Collectible; removed from the world when touched
    Artifact(Item),
    /// Touching it completes the level
    Exit,
}

/// A piece of world geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    pub rect: Aabb,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(id: EntityId, rect: Aabb, kind: PlatformKind) -> Self {
        Self { id, rect, kind }
    }

    /// Triggers never push bodies around
    pub fn is_trigger(&self) -> bool {
        matches!(self.kind, PlatformKind::Artifact(_) | PlatformKind::Exit)
    }

    /// Blocks bodies from every side
    pub fn is_solid(&self) -> bool {
        matches!(self.kind, PlatformKind::Solid | PlatformKind::Hazard { .. })
    }

    pub fn is_one_way(&self) -> bool {
        self.kind == PlatformKind::OneWay
    }

    /// Stops projectiles
    pub fn blocks_projectiles(&self) -> bool {
        self.is_solid()
    }
}
