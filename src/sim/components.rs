use glam::Vec2;

use crate::world::Hitbox;

/// Level-space rectangle of a moving thing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body(pub Hitbox);

/// Level units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec2);

impl Velocity {
    #[inline]
    pub fn zero(&mut self) {
        self.0 = Vec2::ZERO;
    }
}

/// Marks the entity driven by keyboard input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub right: f32, // –1 … +1  (left / right)
    pub down: f32,  // –1 … +1  (up / down, screen space)
    pub run: bool,  // Shift
}
