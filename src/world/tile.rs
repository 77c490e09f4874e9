use glam::Vec2;

use super::geometry::{Facing, Hitbox};

/// Visual type tag carried by every tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileType {
    /// Colour-coded tile; the value scales the blue channel.
    Color(i32),
    /// Textured tile, keyed by a lowercase ASCII letter.
    Letter(char),
}

impl TileType {
    /// Placeholder tag of an unlinked portal slot.
    pub const SENTINEL: TileType = TileType::Color(-1);

    #[inline]
    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }

    /// Texture key, if this tile is textured.
    pub fn letter(self) -> Option<char> {
        match self {
            TileType::Letter(c) => Some(c.to_ascii_lowercase()),
            TileType::Color(_) => None,
        }
    }
}

/// Read-only view the render pass gets of anything placed in a level.
pub trait Drawable {
    fn kind(&self) -> TileType;
    fn hitbox(&self) -> &Hitbox;
}

/// One rectangle of floor/background/block, immutable after load.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub kind: TileType,
    pub hitbox: Hitbox,
}

impl Tile {
    pub fn new(kind: TileType, position: Vec2, size: Vec2) -> Self {
        Self {
            kind,
            hitbox: Hitbox::new(position, size),
        }
    }
}

impl Drawable for Tile {
    fn kind(&self) -> TileType {
        self.kind
    }
    fn hitbox(&self) -> &Hitbox {
        &self.hitbox
    }
}

/// A wall segment bound to one side of a cell. Portals attach to these.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub tile: Tile,
    pub facing: Facing,
}

impl Edge {
    pub fn new(kind: TileType, position: Vec2, size: Vec2, facing: Facing) -> Self {
        Self {
            tile: Tile::new(kind, position, size),
            facing,
        }
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Extent of the wall along its own run.
    #[inline]
    pub fn length(&self) -> f32 {
        self.facing.axis().along(self.tile.hitbox.size)
    }
}

impl Drawable for Edge {
    fn kind(&self) -> TileType {
        self.tile.kind
    }
    fn hitbox(&self) -> &Hitbox {
        &self.tile.hitbox
    }
}
