//! Level population data
//!
//! Static, load-time description of a level: geometry, spawns, pickups,
//! exit and puzzle gates. Data is validated up front so a simulation never
//! starts from a partially valid layout.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Aabb, Item, ItemEffect};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("malformed level data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid level `{level}`: {reason}")]
    Invalid { level: String, reason: String },
    #[error("no built-in level {0}")]
    UnknownLevel(u32),
}

/// Collision category of a geometry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Solid,
    OneWay,
    Hazard,
}

/// `[x, y, tiles_x, tiles_y, kind]` in tile units of `TILE_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSpec(pub f32, pub f32, pub u32, pub u32, pub TileKind);

/// `[x, y, width, height, kind]` in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectSpec(pub f32, pub f32, pub f32, pub f32, pub TileKind);

/// Ground strip laid from the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundSpec {
    pub tiles_x: u32,
    pub tiles_y: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSpawn {
    pub x: f32,
    pub y: f32,
    pub name: String,
    pub effect: ItemEffect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    /// Defaults to the ground width, then `DEFAULT_WORLD_WIDTH`
    #[serde(default)]
    pub world_width: Option<f32>,
    pub spawn: [f32; 2],
    #[serde(default)]
    pub ground: Option<GroundSpec>,
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
    #[serde(default)]
    pub platforms: Vec<RectSpec>,
    #[serde(default)]
    pub enemies: Vec<[f32; 2]>,
    #[serde(default)]
    pub artifact: Option<ArtifactSpawn>,
    #[serde(default)]
    pub exit: Option<[f32; 2]>,
    /// One puzzle gate per entry; the question count equals the gate count
    #[serde(default)]
    pub puzzles: Vec<[f32; 2]>,
    /// Overrides the tuning value for this level's hazards
    #[serde(default)]
    pub hazard_damage: Option<i32>,
    #[serde(default)]
    pub starting_items: Vec<Item>,
}

impl LevelData {
    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelData = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// One of the shipped levels (1-3)
    pub fn builtin(number: u32) -> Result<Self, LevelError> {
        let json = match number {
            1 => include_str!("../assets/levels/level_1.json"),
            2 => include_str!("../assets/levels/level_2.json"),
            3 => include_str!("../assets/levels/level_3.json"),
            _ => return Err(LevelError::UnknownLevel(number)),
        };
        Self::from_json(json)
    }

    pub fn world_width(&self) -> f32 {
        self.world_width
            .or_else(|| self.ground.map(|g| g.tiles_x as f32 * TILE_SIZE))
            .unwrap_or(DEFAULT_WORLD_WIDTH)
    }

    pub fn spawn_point(&self) -> Vec2 {
        Vec2::from(self.spawn)
    }

    /// Every geometry box with its category, in population order:
    /// ground, tiles, then pixel platforms
    pub fn geometry(&self) -> Vec<(Aabb, TileKind)> {
        let mut out = Vec::with_capacity(1 + self.tiles.len() + self.platforms.len());
        if let Some(ground) = self.ground {
            out.push((
                Aabb::new(
                    0.0,
                    0.0,
                    ground.tiles_x as f32 * TILE_SIZE,
                    ground.tiles_y as f32 * TILE_SIZE,
                ),
                TileKind::Solid,
            ));
        }
        for &TileSpec(x, y, nx, ny, kind) in &self.tiles {
            out.push((
                Aabb::new(x, y, nx as f32 * TILE_SIZE, ny as f32 * TILE_SIZE),
                kind,
            ));
        }
        for &RectSpec(x, y, w, h, kind) in &self.platforms {
            out.push((Aabb::new(x, y, w, h), kind));
        }
        out
    }

    fn invalid(&self, reason: impl Into<String>) -> LevelError {
        LevelError::Invalid {
            level: self.name.clone(),
            reason: reason.into(),
        }
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        let point_ok = |p: [f32; 2]| p[0].is_finite() && p[1].is_finite() && p[0] >= 0.0 && p[1] >= 0.0;

        let width = self.world_width();
        if !width.is_finite() || width <= 0.0 {
            return Err(self.invalid(format!("world width must be positive, got {}", width)));
        }

        if !point_ok(self.spawn) || self.spawn[0] > width {
            return Err(self.invalid(format!("spawn {:?} lies outside the world", self.spawn)));
        }

        if let Some(ground) = self.ground {
            if ground.tiles_x == 0 || ground.tiles_y == 0 {
                return Err(self.invalid("ground needs at least one tile in each direction"));
            }
        }

        for (i, tile) in self.tiles.iter().enumerate() {
            if tile.2 == 0 || tile.3 == 0 {
                return Err(self.invalid(format!("tile {} has a zero tile count", i)));
            }
            if !point_ok([tile.0, tile.1]) {
                return Err(self.invalid(format!("tile {} has a bad position", i)));
            }
        }

        for (i, rect) in self.platforms.iter().enumerate() {
            if !point_ok([rect.0, rect.1]) {
                return Err(self.invalid(format!("platform {} has a bad position", i)));
            }
            if !Aabb::new(rect.0, rect.1, rect.2, rect.3).is_valid() {
                return Err(self.invalid(format!("platform {} must have a positive size", i)));
            }
        }

        if let Some(i) = self.enemies.iter().position(|p| !point_ok(*p)) {
            return Err(self.invalid(format!("enemy {} has a bad spawn point", i)));
        }
        if let Some(i) = self.puzzles.iter().position(|p| !point_ok(*p)) {
            return Err(self.invalid(format!("puzzle {} has a bad position", i)));
        }
        if let Some(artifact) = &self.artifact {
            if !point_ok([artifact.x, artifact.y]) {
                return Err(self.invalid("artifact has a bad position"));
            }
            if artifact.name.is_empty() {
                return Err(self.invalid("artifact needs a name"));
            }
        }
        if self.exit.is_some_and(|exit| !point_ok(exit)) {
            return Err(self.invalid("exit has a bad position"));
        }
        if let Some(damage) = self.hazard_damage.filter(|d| *d <= 0) {
            return Err(self.invalid(format!("hazard damage must be positive, got {}", damage)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_load() {
        for n in 1..=3 {
            let level = LevelData::builtin(n).unwrap();
            assert_eq!(level.puzzles.len(), n as usize);
            assert!(level.artifact.is_some());
            assert!(level.exit.is_some());
        }
        assert!(matches!(LevelData::builtin(4), Err(LevelError::UnknownLevel(4))));
    }

    #[test]
    fn test_world_width_fallbacks() {
        let level1 = LevelData::builtin(1).unwrap();
        assert_eq!(level1.world_width(), 800.0);

        let level2 = LevelData::builtin(2).unwrap();
        assert_eq!(level2.world_width(), 4000.0);

        let bare = LevelData::from_json(r#"{ "name": "bare", "spawn": [0, 0] }"#).unwrap();
        assert_eq!(bare.world_width(), DEFAULT_WORLD_WIDTH);
        assert!(bare.geometry().is_empty());
    }

    #[test]
    fn test_geometry_order_and_units() {
        let level = LevelData::from_json(
            r#"{
                "name": "order",
                "spawn": [0, 0],
                "ground": { "tiles_x": 2, "tiles_y": 1 },
                "tiles": [[40, 80, 3, 2, "hazard"]],
                "platforms": [[5, 6, 7, 8, "one_way"]]
            }"#,
        )
        .unwrap();
        let geometry = level.geometry();
        assert_eq!(geometry[0], (Aabb::new(0.0, 0.0, 80.0, 40.0), TileKind::Solid));
        assert_eq!(geometry[1], (Aabb::new(40.0, 80.0, 120.0, 80.0), TileKind::Hazard));
        assert_eq!(geometry[2], (Aabb::new(5.0, 6.0, 7.0, 8.0), TileKind::OneWay));
    }

    #[test]
    fn test_wrong_arity_fails() {
        let err = LevelData::from_json(r#"{ "name": "x", "spawn": [0, 0], "tiles": [[1, 2, 3]] }"#);
        assert!(matches!(err, Err(LevelError::Parse(_))));
    }

    #[test]
    fn test_unknown_category_fails() {
        let err = LevelData::from_json(r#"{ "name": "x", "spawn": [0, 0], "tiles": [[1, 2, 3, 4, "lava"]] }"#);
        assert!(matches!(err, Err(LevelError::Parse(_))));
    }

    #[test]
    fn test_validation_errors() {
        let zero_tiles = r#"{ "name": "x", "spawn": [0, 0], "tiles": [[1, 2, 0, 4, "solid"]] }"#;
        assert!(matches!(LevelData::from_json(zero_tiles), Err(LevelError::Invalid { .. })));

        let outside = r#"{ "name": "x", "world_width": 100, "spawn": [500, 0] }"#;
        assert!(matches!(LevelData::from_json(outside), Err(LevelError::Invalid { .. })));

        let bad_damage = r#"{ "name": "x", "spawn": [0, 0], "hazard_damage": 0 }"#;
        assert!(matches!(LevelData::from_json(bad_damage), Err(LevelError::Invalid { .. })));

        let flat_platform = r#"{ "name": "x", "spawn": [0, 0], "platforms": [[0, 0, 10, 0, "solid"]] }"#;
        let err = LevelData::from_json(flat_platform).unwrap_err();
        assert!(err.to_string().contains("positive size"));
    }
}
