use std::collections::BTreeSet;

use glam::Vec2;
use tracing::debug;

use super::geometry::Hitbox;
use super::portal::Portal;
use super::tile::{Drawable, Edge, Tile, TileType};

/// Background tiles painted together at one opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub opacity: f32,
    pub tiles: Vec<Tile>,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            tiles: Vec::new(),
        }
    }
}

/// Which end of the pair a portal occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortalSlot {
    Primary = 0,
    Secondary = 1,
}

impl PortalSlot {
    pub const BOTH: [PortalSlot; 2] = [PortalSlot::Primary, PortalSlot::Secondary];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn other(self) -> PortalSlot {
        match self {
            PortalSlot::Primary => PortalSlot::Secondary,
            PortalSlot::Secondary => PortalSlot::Primary,
        }
    }

    /// Tag a freshly placed portal carries in this slot.
    #[inline]
    pub fn kind(self) -> TileType {
        TileType::Color(self as i32)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PlaceError {
    #[error("edge index {0} out of range")]
    NoSuchEdge(usize),

    #[error("edge {0} is shorter than a portal")]
    WallTooShort(usize),

    #[error("{slot:?} portal does not fit at {anchor}")]
    DoesNotFit { slot: PortalSlot, anchor: Vec2 },
}

/// Runtime snapshot of one level. Geometry is immutable after load; only
/// the two portal slots change.
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub layers: Vec<Layer>,
    pub blocks: Vec<Tile>,
    pub edges: Vec<Edge>,
    portals: [Portal; 2],
}

impl Level {
    pub fn new(name: impl Into<String>, layers: Vec<Layer>, blocks: Vec<Tile>, edges: Vec<Edge>) -> Self {
        Self {
            name: name.into(),
            layers,
            blocks,
            edges,
            portals: [Portal::sentinel(), Portal::sentinel()],
        }
    }

    #[inline]
    pub fn portal(&self, slot: PortalSlot) -> &Portal {
        &self.portals[slot.index()]
    }

    #[inline]
    pub fn portals(&self) -> &[Portal; 2] {
        &self.portals
    }

    /// Both ends placed.
    pub fn is_linked(&self) -> bool {
        self.portals.iter().all(|p| !p.is_sentinel())
    }

    pub fn clear_portals(&mut self) {
        self.portals = [Portal::sentinel(), Portal::sentinel()];
    }

    /// First edge whose rectangle contains `point`.
    pub fn edge_at(&self, point: Vec2) -> Option<usize> {
        self.edges.iter().position(|e| e.hitbox().contains(point))
    }

    /// Handle one placement request: project `point` onto edge `edge_idx`,
    /// clamp it onto the wall and check it against the other slot.
    /// On success the slot is replaced and the final anchor returned.
    pub fn place_portal(
        &mut self,
        slot: PortalSlot,
        edge_idx: usize,
        point: Vec2,
    ) -> Result<Vec2, PlaceError> {
        let host = self
            .edges
            .get(edge_idx)
            .ok_or(PlaceError::NoSuchEdge(edge_idx))?;
        if !Portal::fits_on(host) {
            return Err(PlaceError::WallTooShort(edge_idx));
        }

        let anchor = Portal::fix_position(Portal::anchor_on(host, point), host);
        if !Portal::valid(anchor, host, self.portal(slot.other())) {
            return Err(PlaceError::DoesNotFit { slot, anchor });
        }

        debug!(?slot, edge_idx, %anchor, "portal placed");
        self.portals[slot.index()] = Portal::new(slot.kind(), anchor, host.facing());
        Ok(anchor)
    }

    /// Slot whose portal `body` has entered. Unlinked pairs never report,
    /// whatever the geometry says.
    pub fn entered_portal(&self, body: &Hitbox) -> Option<PortalSlot> {
        if !self.is_linked() {
            return None;
        }
        PortalSlot::BOTH
            .into_iter()
            .find(|&s| self.portal(s).is_entering(body))
    }

    /// Rectangles a moving body may not pass through.
    pub fn solids(&self) -> impl Iterator<Item = &Hitbox> {
        self.blocks
            .iter()
            .map(Drawable::hitbox)
            .chain(self.edges.iter().map(Drawable::hitbox))
    }

    /// Lowercase texture letters referenced anywhere in the level.
    pub fn used_letters(&self) -> BTreeSet<char> {
        let layer_tiles = self.layers.iter().flat_map(|l| l.tiles.iter());
        layer_tiles
            .chain(self.blocks.iter())
            .map(|t| t.kind)
            .chain(self.edges.iter().map(|e| e.tile.kind))
            .filter_map(TileType::letter)
            .collect()
    }

    /// Box around every tile, block and edge; `None` for an empty level.
    pub fn bounds(&self) -> Option<Hitbox> {
        let layer_tiles = self.layers.iter().flat_map(|l| l.tiles.iter());
        layer_tiles
            .chain(self.blocks.iter())
            .map(|t| t.hitbox)
            .chain(self.edges.iter().map(|e| e.tile.hitbox))
            .reduce(|acc, b| acc.union(&b))
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::geometry::Facing;
    use glam::vec2;

    /// 10 × 6 cell room: walls all round, one block in the middle.
    fn room() -> Level {
        let wall = TileType::Color(1);
        let edges = vec![
            Edge::new(wall, vec2(0.0, 0.0), vec2(400.0, 20.0), Facing::Up),
            Edge::new(wall, vec2(0.0, 220.0), vec2(400.0, 20.0), Facing::Down),
            Edge::new(TileType::Letter('W'), vec2(0.0, 20.0), vec2(20.0, 200.0), Facing::Left),
            Edge::new(wall, vec2(380.0, 20.0), vec2(20.0, 200.0), Facing::Right),
            Edge::new(wall, vec2(500.0, 0.0), vec2(80.0, 20.0), Facing::Up),
        ];
        let floor = Layer {
            opacity: 0.5,
            tiles: vec![
                Tile::new(TileType::Letter('g'), vec2(0.0, 0.0), vec2(400.0, 240.0)),
                Tile::new(TileType::Letter('G'), vec2(40.0, 40.0), vec2(40.0, 40.0)),
            ],
        };
        let blocks = vec![Tile::new(TileType::Color(2), vec2(160.0, 100.0), vec2(40.0, 40.0))];
        Level::new("room", vec![floor], blocks, edges)
    }

    #[test]
    fn starts_unlinked() {
        let level = room();
        assert!(!level.is_linked());
        assert!(level.portals().iter().all(Portal::is_sentinel));
    }

    #[test]
    fn place_snaps_onto_wall() {
        let mut level = room();
        let anchor = level.place_portal(PortalSlot::Primary, 0, vec2(395.0, 7.0)).unwrap();
        assert_eq!(anchor, vec2(340.0, 0.0));
        let p = level.portal(PortalSlot::Primary);
        assert_eq!(p.kind(), TileType::Color(0));
        assert_eq!(p.infacing(), Facing::Down);
        assert_eq!(p.hitbox().bottom_right(), vec2(400.0, 20.0));
    }

    #[test]
    fn second_portal_may_not_overlap_first() {
        let mut level = room();
        level.place_portal(PortalSlot::Primary, 0, vec2(100.0, 5.0)).unwrap();
        let err = level
            .place_portal(PortalSlot::Secondary, 0, vec2(150.0, 5.0))
            .unwrap_err();
        assert!(matches!(err, PlaceError::DoesNotFit { slot: PortalSlot::Secondary, .. }));
        assert!(level.portal(PortalSlot::Secondary).is_sentinel());

        level.place_portal(PortalSlot::Secondary, 3, vec2(390.0, 100.0)).unwrap();
        assert!(level.is_linked());
    }

    #[test]
    fn short_wall_rejects_linked_placement() {
        let mut level = room();
        level.place_portal(PortalSlot::Primary, 0, vec2(100.0, 5.0)).unwrap();
        let err = level.place_portal(PortalSlot::Secondary, 4, vec2(540.0, 5.0));
        assert_eq!(err, Err(PlaceError::WallTooShort(4)));
    }

    #[test]
    fn short_wall_rejects_first_placement() {
        let mut level = room();
        for x in [500.0, 520.0, 540.0, 580.0] {
            assert_eq!(
                level.place_portal(PortalSlot::Primary, 4, vec2(x, 5.0)),
                Err(PlaceError::WallTooShort(4))
            );
        }
        assert!(level.portals().iter().all(Portal::is_sentinel));
    }

    #[test]
    fn bad_edge_index() {
        let mut level = room();
        assert_eq!(
            level.place_portal(PortalSlot::Primary, 99, Vec2::ZERO),
            Err(PlaceError::NoSuchEdge(99))
        );
    }

    #[test]
    fn entering_requires_a_linked_pair() {
        let mut level = room();
        level.place_portal(PortalSlot::Primary, 0, vec2(100.0, 5.0)).unwrap();
        let body = Hitbox::new(vec2(80.0, 20.0), vec2(30.0, 30.0));
        assert!(level.portal(PortalSlot::Primary).is_entering(&body));
        assert_eq!(level.entered_portal(&body), None);

        level.place_portal(PortalSlot::Secondary, 3, vec2(390.0, 100.0)).unwrap();
        assert_eq!(level.entered_portal(&body), Some(PortalSlot::Primary));

        level.clear_portals();
        assert_eq!(level.entered_portal(&body), None);
    }

    #[test]
    fn edge_lookup() {
        let level = room();
        assert_eq!(level.edge_at(vec2(10.0, 100.0)), Some(2));
        assert_eq!(level.edge_at(vec2(200.0, 120.0)), None);
    }

    #[test]
    fn letters_are_collected_lowercase() {
        let letters: Vec<char> = room().used_letters().into_iter().collect();
        assert_eq!(letters, vec!['g', 'w']);
    }

    #[test]
    fn bounds_cover_everything() {
        let b = room().bounds().unwrap();
        assert_eq!(b.top_left(), vec2(0.0, 0.0));
        assert_eq!(b.bottom_right(), vec2(580.0, 240.0));
        assert!(Level::new("empty", vec![], vec![], vec![]).bounds().is_none());
    }
}
