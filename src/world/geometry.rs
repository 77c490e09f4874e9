use glam::{Vec2, vec2};

/// Points and extents are plain `glam` vectors; arithmetic returns new values.
pub type Vector = Vec2;

/// Tiling unit of plain tiles, in level units.
pub const CELL_SIZE: f32 = 40.0;
/// Edges tile at half the cell unit.
pub const HALF_CELL: f32 = CELL_SIZE / 2.0;

/*======================================================================*/
/*                               Hitbox                                 */
/*======================================================================*/

/// Axis-aligned rectangle, `position` is the top-left corner (y grows down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    pub position: Vec2,
    pub size: Vec2,
}

impl Hitbox {
    /// Panics on a negative extent: callers must hand in well-formed boxes.
    pub fn new(position: Vec2, size: Vec2) -> Self {
        assert!(
            size.x >= 0.0 && size.y >= 0.0,
            "hitbox size must be non-negative, got {size}"
        );
        Self { position, size }
    }

    #[inline]
    pub fn top_left(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn bottom_right(&self) -> Vec2 {
        self.position + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Inclusive on all four sides.
    pub fn contains(&self, p: Vec2) -> bool {
        let br = self.bottom_right();
        self.position.x <= p.x && p.x <= br.x && self.position.y <= p.y && p.y <= br.y
    }

    /// Projections on both axes intersect; touching boxes count.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        let (a0, a1) = (self.top_left(), self.bottom_right());
        let (b0, b1) = (other.top_left(), other.bottom_right());
        a0.x <= b1.x && b0.x <= a1.x && a0.y <= b1.y && b0.y <= a1.y
    }

    pub fn translated(&self, delta: Vec2) -> Hitbox {
        Hitbox {
            position: self.position + delta,
            size: self.size,
        }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Hitbox) -> Hitbox {
        let min = self.top_left().min(other.top_left());
        let max = self.bottom_right().max(other.bottom_right());
        Hitbox::new(min, max - min)
    }
}

/*======================================================================*/
/*                               Facing                                 */
/*======================================================================*/

/// Which wall of a cell an edge (or portal) sits on.
///
/// Discriminants are the level-file encoding and wrap circularly, so the
/// opposite facing is two steps away and bit 0 selects the axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Facing {
    Up = 0,
    Left = 1,
    Down = 2,
    Right = 3,
}

/// Orientation of the wall a facing belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Up/Down facings: the wall runs horizontally, containment is tested on x.
    Vertical = 0,
    /// Left/Right facings: the wall runs vertically, containment is tested on y.
    Horizontal = 1,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("facing {0} is not one of 0 (up), 1 (left), 2 (down), 3 (right)")]
    BadFacing(i64),
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Left, Facing::Down, Facing::Right];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn opposite(self) -> Facing {
        Self::ALL[(self.index() + 2) & 3]
    }

    #[inline]
    pub fn axis(self) -> Axis {
        match self.index() & 1 {
            0 => Axis::Vertical,
            _ => Axis::Horizontal,
        }
    }

    /// Outward unit vector in screen space.
    pub fn unit(self) -> Vec2 {
        match self {
            Facing::Up => vec2(0.0, -1.0),
            Facing::Left => vec2(-1.0, 0.0),
            Facing::Down => vec2(0.0, 1.0),
            Facing::Right => vec2(1.0, 0.0),
        }
    }
}

impl TryFrom<i64> for Facing {
    type Error = GeometryError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            0..=3 => Ok(Self::ALL[raw as usize]),
            _ => Err(GeometryError::BadFacing(raw)),
        }
    }
}

impl TryFrom<u8> for Facing {
    type Error = GeometryError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Facing::try_from(i64::from(raw))
    }
}

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Component of `v` that runs along this wall orientation.
    #[inline]
    pub fn along(self, v: Vec2) -> f32 {
        match self {
            Axis::Vertical => v.x,
            Axis::Horizontal => v.y,
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
