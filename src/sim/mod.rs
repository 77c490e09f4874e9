mod components;
mod movement;
mod systems;
mod tic;

pub use components::{Body, InputCmd, Player, Velocity};
pub use movement::{Teleport, movement_system};
pub use systems::{MOVE_SPEED, player_input};
pub use tic::{DT, SIM_FPS, TicRunner};
