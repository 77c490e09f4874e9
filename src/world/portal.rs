//! Portal geometry: rectangle derivation, placement checks and traversal.
//!
//! A portal is described by an *anchor*, a single point on the wall the
//! player aimed at. The facing-indexed tables below turn that point into a
//! correctly oriented rectangle, so callers never branch on facing.
//!
//! ```text
//!   facing Up            facing Left
//!   anchor on top line   anchor on left line
//!   ┌──────A──────┐      A─┐ (centre of the left side)
//!   └─────────────┘      └─┘
//! ```

use glam::{Vec2, vec2};
use tracing::debug;

use super::geometry::{Axis, CELL_SIZE, Facing, Hitbox};
use super::tile::{Drawable, Edge, TileType};

/// Half the length of a portal along its wall.
pub const PORTAL_RADIUS: f32 = 1.5 * CELL_SIZE;
/// Thickness of a portal across its wall.
pub const PORTAL_WIDTH: f32 = 0.5 * CELL_SIZE;

const R: f32 = PORTAL_RADIUS;
const W: f32 = PORTAL_WIDTH;

/// Anchor → top-left corner, by facing.
const PORTAL_DIRECTION: [Vec2; 4] = [
    vec2(-R, 0.0), // Up
    vec2(0.0, -R), // Left
    vec2(-R, -W),  // Down
    vec2(-W, -R),  // Right
];

/// Rectangle extent, by axis.
const PORTAL_SIZE: [Vec2; 2] = [
    vec2(2.0 * R, W), // Vertical: wide and thin
    vec2(W, 2.0 * R), // Horizontal: tall and thin
];

/// Wall bottom-right → anchor that puts the portal's far end on the wall's far end.
const CORRECTION_DELTA: [Vec2; 4] = [
    vec2(-R, -W),  // Up
    vec2(-W, -R),  // Left
    vec2(-R, 0.0), // Down
    vec2(0.0, -R), // Right
];

#[inline]
fn direction(f: Facing) -> Vec2 {
    PORTAL_DIRECTION[f.index()]
}

#[inline]
fn size(axis: Axis) -> Vec2 {
    PORTAL_SIZE[axis.index()]
}

/// Candidate rectangle corners for `anchor` on a wall facing `f`.
#[inline]
fn corners(anchor: Vec2, f: Facing) -> (Vec2, Vec2) {
    let top_left = anchor + direction(f);
    (top_left, top_left + size(f.axis()))
}

/// One end of a portal pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Portal {
    edge: Edge,
    infacing: Facing,
}

impl Portal {
    pub fn new(kind: TileType, anchor: Vec2, facing: Facing) -> Self {
        let (top_left, _) = corners(anchor, facing);
        Self {
            edge: Edge::new(kind, top_left, size(facing.axis()), facing),
            infacing: facing.opposite(),
        }
    }

    /// Drawable but inert stand-in for a slot nobody has placed yet.
    pub fn sentinel() -> Self {
        Self::new(TileType::SENTINEL, Vec2::ZERO, Facing::Up)
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.edge.tile.kind.is_sentinel()
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.edge.facing
    }

    /// Side a body comes out on.
    #[inline]
    pub fn infacing(&self) -> Facing {
        self.infacing
    }

    /// Whether `host` is at least one portal long. `fix_position` only
    /// settles on walls that pass this.
    pub fn fits_on(host: &Edge) -> bool {
        let axis = host.facing().axis();
        host.length() >= axis.along(size(axis))
    }

    /// Whether a portal anchored at `anchor` on `host` may coexist with `paired`.
    ///
    /// Only the candidate's two diagonal corners are tested against the
    /// paired rectangle, so a pair crossing without sharing a corner passes.
    pub fn valid(anchor: Vec2, host: &Edge, paired: &Portal) -> bool {
        if paired.is_sentinel() {
            return true;
        }
        let f = host.facing();
        let edge_length = host.length();
        let portal_length = f.axis().along(size(f.axis()));

        let (top_left, bottom_right) = corners(anchor, f);
        let hits_paired =
            paired.hitbox().contains(top_left) || paired.hitbox().contains(bottom_right);

        edge_length >= portal_length && !hits_paired
    }

    /// Pull an anchor that runs off either end of `host` back onto it.
    ///
    /// Assumes the anchor was dragged along this wall, so at most one end
    /// overruns, and that the wall passes `fits_on`.
    pub fn fix_position(anchor: Vec2, host: &Edge) -> Vec2 {
        let f = host.facing();
        let wall = host.hitbox();
        let (top_left, bottom_right) = corners(anchor, f);

        debug!(
            ?top_left,
            ?bottom_right,
            wall = ?wall,
            "portal placement candidate"
        );

        match (wall.contains(top_left), wall.contains(bottom_right)) {
            (true, true) => anchor,
            (false, true) => wall.position - direction(f),
            _ => wall.bottom_right() + CORRECTION_DELTA[f.index()],
        }
    }

    /// Anchor on `host` closest to `point`: the along-wall coordinate comes
    /// from `point`, the across-wall one from the wall itself.
    pub fn anchor_on(host: &Edge, point: Vec2) -> Vec2 {
        let base = host.hitbox().position - direction(host.facing());
        match host.facing().axis() {
            Axis::Vertical => vec2(point.x, base.y),
            Axis::Horizontal => vec2(base.x, point.y),
        }
    }

    /// True once `moving` is both inside the portal across its wall run and
    /// touching it. Sentinels are evaluated like any other portal.
    pub fn is_entering(&self, moving: &Hitbox) -> bool {
        let (p0, p1) = (self.hitbox().top_left(), self.hitbox().bottom_right());
        let (m0, m1) = (moving.top_left(), moving.bottom_right());

        let contained = match self.facing().axis() {
            Axis::Vertical => p0.x <= m0.x && m1.x <= p1.x,
            Axis::Horizontal => p0.y <= m0.y && m1.y <= p1.y,
        };
        contained && self.hitbox().overlaps(moving)
    }

    /// Where a body of `body.size` emerges from this portal: centred on it
    /// along the wall, one unit clear of it on the `infacing` side.
    pub fn exit_hitbox(&self, body: &Hitbox) -> Hitbox {
        let portal = self.hitbox();
        let centre = portal.center() - body.size * 0.5;
        let position = match self.infacing {
            Facing::Up => vec2(centre.x, portal.position.y - body.size.y - 1.0),
            Facing::Down => vec2(centre.x, portal.bottom_right().y + 1.0),
            Facing::Left => vec2(portal.position.x - body.size.x - 1.0, centre.y),
            Facing::Right => vec2(portal.bottom_right().x + 1.0, centre.y),
        };
        Hitbox::new(position, body.size)
    }
}

impl Drawable for Portal {
    fn kind(&self) -> TileType {
        self.edge.tile.kind
    }
    fn hitbox(&self) -> &Hitbox {
        &self.edge.tile.hitbox
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
