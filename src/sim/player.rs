//! The player entity: input handling, inventory, health

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, BodyKind, Motion};
use super::projectile::Shot;
use super::tick::TickInput;
use crate::consts::*;
use crate::settings::Settings;

/// Stat modifier carried by an inventory item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemEffect {
    /// Purely cosmetic / quest item
    None,
    DoubleJump,
    /// Added to horizontal move speed
    SpeedBoost(f32),
    /// Added to jump speed
    JumpBoost(f32),
    /// Added to player projectile damage
    DamageBoost(i32),
    /// Extra bounces for player projectiles
    Ricochet(u32),
    /// Seconds of invincibility, granted once on pickup
    Invincibility(f32),
}

/// A named inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub effect: ItemEffect,
}

impl Item {
    pub fn new(name: impl Into<String>, effect: ItemEffect) -> Self {
        Self {
            name: name.into(),
            effect,
        }
    }
}

/// Ordered item list; duplicates allowed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove the first item with this name
    pub fn remove(&mut self, name: &str) -> Option<Item> {
        let index = self.items.iter().position(|i| i.name == name)?;
        Some(self.items.remove(index))
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What the player asked the simulation to do this frame
#[derive(Debug, Clone, Default)]
pub struct PlayerIntents {
    pub shot: Option<Shot>,
    pub exit_requested: bool,
    pub inventory_toggled: bool,
}

/// The player (one per level)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub inventory: Inventory,
    /// Seconds of invincibility left
    pub invincible_timer: f32,
    pub can_double_jump: bool,
    pub double_jump_used: bool,
    /// Last horizontal facing (unit vector)
    pub facing: Vec2,
    /// Seconds until the next shot is allowed
    pub shoot_cooldown: f32,
    pub projectile_damage: i32,
    pub max_bounces: u32,
    /// Seconds of grace after leaving the ground during which a ground jump still works
    pub coyote_timer: f32,
    pub dead: bool,
    /// Whether input is currently bound to this player
    pub input_bound: bool,

    base_motion: Motion,
    base_projectile_damage: i32,
    shoot_interval: f32,
    coyote_time: f32,
    jump_was_down: bool,
    exit_was_down: bool,
    inventory_was_down: bool,
}

impl Player {
    pub fn new(pos: Vec2, settings: &Settings) -> Self {
        let motion = settings.motion();
        Self {
            body: Body::new(
                BodyKind::Player,
                "Player",
                pos,
                Vec2::splat(PLAYER_SIZE),
                motion,
            )
            .with_health(settings.player_max_health),
            inventory: Inventory::default(),
            invincible_timer: 0.0,
            can_double_jump: false,
            double_jump_used: false,
            facing: Vec2::X,
            shoot_cooldown: 0.0,
            projectile_damage: settings.player_projectile_damage,
            max_bounces: 0,
            coyote_timer: 0.0,
            dead: false,
            input_bound: true,
            base_motion: motion,
            base_projectile_damage: settings.player_projectile_damage,
            shoot_interval: settings.shoot_cooldown,
            coyote_time: settings.coyote_time,
            jump_was_down: false,
            exit_was_down: false,
            inventory_was_down: false,
        }
    }

    /// Apply one frame of held keys
    pub fn process_input(&mut self, input: &TickInput) -> PlayerIntents {
        let mut intents = PlayerIntents::default();
        if !self.input_bound || self.dead {
            return intents;
        }

        intents.exit_requested = input.exit && !self.exit_was_down;
        intents.inventory_toggled = input.inventory && !self.inventory_was_down;
        self.exit_was_down = input.exit;
        self.inventory_was_down = input.inventory;

        let jump_pressed = input.jump && !self.jump_was_down;
        self.jump_was_down = input.jump;
        if input.jump {
            self.jump(jump_pressed);
        }

        if input.left {
            self.body.move_left();
            self.facing = Vec2::NEG_X;
        } else if input.right {
            self.body.move_right();
            self.facing = Vec2::X;
        } else {
            self.body.stop_horizontal();
        }

        if input.shoot && self.shoot_cooldown <= 0.0 {
            self.shoot_cooldown = self.shoot_interval;
            intents.shot = Some(Shot {
                origin: self.body.center(),
                direction: self.facing,
                damage: self.projectile_damage,
                max_bounces: self.max_bounces,
            });
        }

        intents
    }

    /// Ground jump, or the single mid-air jump when `fresh_press` and unlocked
    pub fn jump(&mut self, fresh_press: bool) {
        let grounded = self.body.on_ground || (self.coyote_timer > 0.0 && self.body.vel.y <= 0.0);
        if grounded {
            self.body.vel.y = self.body.motion.jump_speed;
            self.body.on_ground = false;
            self.coyote_timer = 0.0;
            self.double_jump_used = false;
        } else if fresh_press && self.can_double_jump && !self.double_jump_used {
            self.body.vel.y = self.body.motion.jump_speed;
            self.double_jump_used = true;
        }
    }

    /// Body integration plus countdown timers
    pub fn integrate(&mut self, dt: f32, world_width: f32) {
        self.body.integrate(dt, world_width);

        if self.body.on_ground {
            self.coyote_timer = self.coyote_time;
            self.double_jump_used = false;
        } else {
            self.coyote_timer = (self.coyote_timer - dt).max(0.0);
        }
        self.shoot_cooldown = (self.shoot_cooldown - dt).max(0.0);
        self.invincible_timer = (self.invincible_timer - dt).max(0.0);
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    /// Subtract health unless invincible. Returns whether damage landed.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.dead || self.is_invincible() {
            return false;
        }
        self.body.current_health -= amount;
        log::debug!(
            "Player took {} damage ({} left)",
            amount,
            self.body.current_health
        );
        true
    }

    /// Health has run out
    pub fn is_out_of_health(&self) -> bool {
        self.body.current_health <= 0
    }

    /// Freeze the player after death; returns false if already dead
    pub fn die(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.dead = true;
        self.body.vel = Vec2::ZERO;
        true
    }

    /// Add a picked-up item and re-derive stats
    pub fn collect(&mut self, item: Item) {
        if let ItemEffect::Invincibility(seconds) = item.effect {
            self.invincible_timer = self.invincible_timer.max(seconds);
        }
        self.inventory.add(item);
        self.recompute_effects();
    }

    /// Drop an item by name and re-derive stats
    pub fn discard(&mut self, name: &str) -> Option<Item> {
        let item = self.inventory.remove(name)?;
        self.recompute_effects();
        Some(item)
    }

    /// Reset stats to base and re-apply every item in insertion order
    pub fn recompute_effects(&mut self) {
        self.body.motion = self.base_motion;
        self.projectile_damage = self.base_projectile_damage;
        self.max_bounces = 0;
        self.can_double_jump = false;

        for item in self.inventory.items() {
            match item.effect {
                ItemEffect::None | ItemEffect::Invincibility(_) => {}
                ItemEffect::DoubleJump => self.can_double_jump = true,
                ItemEffect::SpeedBoost(v) => self.body.motion.move_speed += v,
                ItemEffect::JumpBoost(v) => self.body.motion.jump_speed += v,
                ItemEffect::DamageBoost(v) => self.projectile_damage += v,
                ItemEffect::Ricochet(n) => self.max_bounces += n,
            }
        }
    }

    /// Release the input binding. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.input_bound {
            log::debug!("Player input released");
        }
        self.input_bound = false;
        self.jump_was_down = false;
        self.exit_was_down = false;
        self.inventory_was_down = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Vec2::new(100.0, 0.0), &Settings::default())
    }

    fn held(f: impl FnOnce(&mut TickInput)) -> TickInput {
        let mut input = TickInput::default();
        f(&mut input);
        input
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut p = player();
        p.process_input(&held(|i| {
            i.left = true;
            i.right = true;
        }));
        assert_eq!(p.body.vel.x, -MOVE_SPEED);
        assert_eq!(p.facing, Vec2::NEG_X);

        p.process_input(&TickInput::default());
        assert_eq!(p.body.vel.x, 0.0);
        assert_eq!(p.facing, Vec2::NEG_X);
    }

    #[test]
    fn test_double_jump_needs_item_and_fresh_press() {
        let mut p = player();
        p.body.on_ground = true;
        let jump = held(|i| i.jump = true);

        p.process_input(&jump);
        assert_eq!(p.body.vel.y, JUMP_SPEED);
        p.body.vel.y = 100.0;

        // Still held in the air: nothing happens
        p.process_input(&jump);
        assert_eq!(p.body.vel.y, 100.0);

        // Fresh press without the item: nothing happens
        p.process_input(&TickInput::default());
        p.process_input(&jump);
        assert_eq!(p.body.vel.y, 100.0);

        p.collect(Item::new("Boots", ItemEffect::DoubleJump));
        p.process_input(&TickInput::default());
        p.process_input(&jump);
        assert_eq!(p.body.vel.y, JUMP_SPEED);
        assert!(p.double_jump_used);

        // Only one per airborne period
        p.body.vel.y = 50.0;
        p.process_input(&TickInput::default());
        p.process_input(&jump);
        assert_eq!(p.body.vel.y, 50.0);

        // Grounded jump re-arms it
        p.body.on_ground = true;
        p.process_input(&TickInput::default());
        p.process_input(&jump);
        assert!(!p.double_jump_used);
    }

    #[test]
    fn test_landing_rearms_double_jump() {
        let mut p = player();
        p.collect(Item::new("Boots", ItemEffect::DoubleJump));
        let jump = held(|i| i.jump = true);

        p.body.on_ground = true;
        p.process_input(&jump);
        p.body.vel.y = 10.0;
        p.process_input(&TickInput::default());
        p.process_input(&jump);
        assert!(p.double_jump_used);

        // Land without jumping
        p.process_input(&TickInput::default());
        p.body.on_ground = true;
        p.body.vel.y = 0.0;
        p.integrate(SIM_DT, DEFAULT_WORLD_WIDTH);
        assert!(!p.double_jump_used);

        // Walk off a ledge and fall past the coyote window
        p.body.on_ground = false;
        p.coyote_timer = 0.0;
        p.body.vel.y = -100.0;
        p.process_input(&jump);
        assert_eq!(p.body.vel.y, JUMP_SPEED);
        assert!(p.double_jump_used);
    }

    #[test]
    fn test_shoot_cooldown() {
        let mut p = player();
        let shoot = held(|i| i.shoot = true);

        let first = p.process_input(&shoot);
        let shot = first.shot.expect("first shot fires");
        assert_eq!(shot.direction, Vec2::X);
        assert_eq!(shot.damage, PLAYER_PROJECTILE_DAMAGE);

        assert!(p.process_input(&shoot).shot.is_none());

        for _ in 0..20 {
            p.integrate(SIM_DT, DEFAULT_WORLD_WIDTH);
        }
        assert!(p.process_input(&shoot).shot.is_some());
    }

    #[test]
    fn test_exit_and_inventory_are_edge_triggered() {
        let mut p = player();
        let keys = held(|i| {
            i.exit = true;
            i.inventory = true;
        });
        let first = p.process_input(&keys);
        assert!(first.exit_requested);
        assert!(first.inventory_toggled);

        let second = p.process_input(&keys);
        assert!(!second.exit_requested);
        assert!(!second.inventory_toggled);
    }

    #[test]
    fn test_item_effects_stack_and_recompute() {
        let mut p = player();
        p.collect(Item::new("Feather", ItemEffect::SpeedBoost(50.0)));
        p.collect(Item::new("Feather", ItemEffect::SpeedBoost(50.0)));
        p.collect(Item::new("Ancient Shotgun", ItemEffect::DamageBoost(15)));
        assert_eq!(p.body.motion.move_speed, MOVE_SPEED + 100.0);
        assert_eq!(p.projectile_damage, PLAYER_PROJECTILE_DAMAGE + 15);
        assert_eq!(p.inventory.names(), vec!["Feather", "Feather", "Ancient Shotgun"]);

        p.discard("Feather");
        assert_eq!(p.body.motion.move_speed, MOVE_SPEED + 50.0);
        assert_eq!(p.inventory.len(), 2);
    }

    #[test]
    fn test_invincibility_blocks_damage() {
        let mut p = player();
        p.collect(Item::new("Aegis", ItemEffect::Invincibility(1.0)));
        assert!(!p.take_damage(30));
        assert_eq!(p.body.current_health, MAX_HEALTH);

        for _ in 0..61 {
            p.integrate(SIM_DT, DEFAULT_WORLD_WIDTH);
        }
        assert!(p.take_damage(30));
        assert_eq!(p.body.current_health, MAX_HEALTH - 30);
    }

    #[test]
    fn test_dispose_is_idempotent_and_silences_input() {
        let mut p = player();
        p.dispose();
        p.dispose();
        assert!(!p.input_bound);

        let intents = p.process_input(&held(|i| {
            i.right = true;
            i.shoot = true;
        }));
        assert!(intents.shot.is_none());
        assert_eq!(p.body.vel.x, 0.0);
    }
}
