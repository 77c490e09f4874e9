mod geometry;
mod level;
mod portal;
mod texture;
mod tile;

pub use geometry::{Axis, CELL_SIZE, Facing, GeometryError, HALF_CELL, Hitbox, Vector};

pub use level::{Layer, Level, PlaceError, PortalSlot};

pub use portal::{PORTAL_RADIUS, PORTAL_WIDTH, Portal};

pub use texture::{Texture, TextureBank, TextureError};

pub use tile::{Drawable, Edge, Tile, TileType};
