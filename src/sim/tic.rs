use super::components::{Body, Player, Velocity};
use super::movement::{Teleport, movement_system};
use crate::world::{Hitbox, Level};
use hecs::World;
use std::time::{Duration, Instant};

pub const SIM_FPS: u32 = 60;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Owns the ECS world and drives all game‑logic systems.
pub struct TicRunner {
    world: World,
    last: Instant,
}

impl Default for TicRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TicRunner {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            last: Instant::now(),
        }
    }

    #[inline]
    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    /// Spawn the keyboard-driven body and return its `Entity` handle.
    pub fn spawn_player(&mut self, hitbox: Hitbox) -> hecs::Entity {
        self.world
            .spawn((Body(hitbox), Velocity::default(), Player))
    }

    /// Current hitbox of every body, for the render pass.
    pub fn bodies(&self) -> Vec<Hitbox> {
        self.world
            .query::<&Body>()
            .iter()
            .map(|(_, b)| b.0)
            .collect()
    }

    /// Advance enough tics to synchronise simulation with real time.
    pub fn pump(&mut self, level: &Level) -> Vec<Teleport> {
        let mut teleports = Vec::new();
        while self.last.elapsed() >= TIC {
            teleports.extend(self.tick(level));
            self.last += TIC;
        }
        teleports
    }

    /// Run one fixed‑rate game tic.
    pub fn tick(&mut self, level: &Level) -> Vec<Teleport> {
        movement_system(&mut self.world, level, DT)
    }
}
