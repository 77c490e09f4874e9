use hecs::World;

use super::components::{InputCmd, Velocity};

pub const MOVE_SPEED: f32 = 160.0; // level units / second
pub const RUN_FACTOR: f32 = 1.75;

/// Turn one tic of input into the player's velocity.
pub fn player_input(world: &mut World, player: hecs::Entity, cmd: InputCmd) {
    if let Ok(vel) = world.query_one_mut::<&mut Velocity>(player) {
        let wish = glam::Vec2::new(cmd.right, cmd.down).clamp_length_max(1.0);
        if wish == glam::Vec2::ZERO {
            vel.zero();
            return;
        }
        let speed = if cmd.run {
            MOVE_SPEED * RUN_FACTOR
        } else {
            MOVE_SPEED
        };
        vel.0 = wish * speed;
    }
}
