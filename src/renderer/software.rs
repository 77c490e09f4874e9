//! ---------------------------------------------------------------------------
//! Software (CPU) tile painter
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Level units map to pixels through `origin` and `scale`; everything is
//!   clipped to the frame.
//! * Tiles are painted cell by cell: plain tiles at `CELL_SIZE`, edges at
//!   `HALF_CELL`. Textured cells stretch their image over one cell.
//! ---------------------------------------------------------------------------

use std::collections::HashSet;
use std::ops::Range;

use glam::{Vec2, vec2};
use tracing::warn;

use crate::{
    renderer::{Renderer, Rgba},
    world::{CELL_SIZE, Drawable, Edge, HALF_CELL, Hitbox, Portal, Texture, TextureBank, Tile, TileType},
};

const CLEAR: Rgba = 0xFF_202020;
const PRIMARY_PORTAL: Rgba = 0xFF_FF0000;
const SECONDARY_PORTAL: Rgba = 0xFF_FFA500;
const BODY: Rgba = 0xFF_F0F0F0;

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
    origin: Vec2,
    scale: f32,
    /// letters already reported missing, so each warns once
    missing: HashSet<char>,
}

impl Default for Software {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0)
    }
}

impl Software {
    /// `origin` is the level point drawn at pixel (0, 0); `scale` is pixels
    /// per level unit.
    pub fn new(origin: Vec2, scale: f32) -> Self {
        Self {
            scratch: Vec::new(),
            width: 0,
            height: 0,
            origin,
            scale,
            missing: HashSet::new(),
        }
    }

    /// Level-space point under a pixel (for mouse picking).
    pub fn to_level(&self, px: f32, py: f32) -> Vec2 {
        vec2(px, py) / self.scale + self.origin
    }

    /// Pixel span `[x0, x1) × [y0, y1)` covered by a level rectangle, clipped.
    fn pixel_rect(&self, pos: Vec2, size: Vec2) -> Option<(usize, usize, usize, usize)> {
        let p0 = ((pos - self.origin) * self.scale).round();
        let p1 = ((pos + size - self.origin) * self.scale).round();
        let x0 = p0.x.max(0.0) as usize;
        let y0 = p0.y.max(0.0) as usize;
        let x1 = (p1.x.max(0.0) as usize).min(self.width);
        let y1 = (p1.y.max(0.0) as usize).min(self.height);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Column and row ranges of the `unit` grid over `hitbox` that reach
    /// into the frame.
    fn visible_cells(&self, hitbox: &Hitbox, unit: f32) -> (Range<usize>, Range<usize>) {
        let view0 = self.origin;
        let view1 = self.origin + vec2(self.width as f32, self.height as f32) / self.scale;
        let count = (hitbox.size / unit).ceil();
        let first = ((view0 - hitbox.position) / unit).floor().max(Vec2::ZERO).min(count);
        let last = ((view1 - hitbox.position) / unit).ceil().max(Vec2::ZERO).min(count);
        (
            first.x as usize..last.x as usize,
            first.y as usize..last.y as usize,
        )
    }

    fn fill(&mut self, pos: Vec2, size: Vec2, colour: Rgba, opacity: f32) {
        let Some((x0, y0, x1, y1)) = self.pixel_rect(pos, size) else {
            return;
        };
        for y in y0..y1 {
            let row = &mut self.scratch[y * self.width..(y + 1) * self.width];
            for px in &mut row[x0..x1] {
                *px = blend(*px, colour, opacity);
            }
        }
    }

    fn blit(&mut self, pos: Vec2, size: Vec2, tex: &Texture, opacity: f32) {
        let Some((x0, y0, x1, y1)) = self.pixel_rect(pos, size) else {
            return;
        };
        // texture coordinates run over the unclipped cell
        let full0 = (pos - self.origin) * self.scale;
        let full = size * self.scale;
        for y in y0..y1 {
            let v = (y as f32 + 0.5 - full0.y) / full.y;
            for x in x0..x1 {
                let u = (x as f32 + 0.5 - full0.x) / full.x;
                let texel = tex.sample(u, v);
                let alpha = (texel >> 24) as f32 / 255.0 * opacity;
                let dst = &mut self.scratch[y * self.width + x];
                *dst = blend(*dst, texel, alpha);
            }
        }
    }

    /// Cover `hitbox` cell by cell, either with the letter's texture or a
    /// flat colour.
    fn paint_cells(
        &mut self,
        hitbox: &Hitbox,
        unit: f32,
        kind: TileType,
        colour: Rgba,
        opacity: f32,
        bank: &TextureBank,
    ) {
        let tex = kind.letter().and_then(|c| {
            let found = bank.get(c);
            if found.is_none() && self.missing.insert(c) {
                warn!(letter = %c, "no texture for tile letter, using flat colour");
            }
            found
        });

        let (cols, rows) = self.visible_cells(hitbox, unit);
        for r in rows {
            for c in cols.clone() {
                let offset = vec2(c as f32, r as f32) * unit;
                let cell = (hitbox.size - offset).min(Vec2::splat(unit));
                let at = hitbox.position + offset;
                match tex {
                    Some(t) => self.blit(at, cell, t, opacity),
                    None => self.fill(at, cell, colour, opacity),
                }
            }
        }
    }
}

/// Blue channel of a plain tile: `type × 100`, saturated.
fn type_channel(kind: TileType) -> u32 {
    match kind {
        TileType::Color(n) => (n.saturating_mul(100)).clamp(0, 255) as u32,
        TileType::Letter(_) => 0,
    }
}

fn tile_colour(kind: TileType) -> Rgba {
    0xFF_000000 | type_channel(kind)
}

fn edge_colour(edge: &Edge) -> Rgba {
    let green = ((edge.facing().index() as u32 + 3) * 50).min(255);
    0xFF_000000 | (green << 8) | type_channel(edge.kind())
}

/// Linear blend of `src` over `dst` by `alpha` ∈ [0, 1]; result is opaque.
fn blend(dst: Rgba, src: Rgba, alpha: f32) -> Rgba {
    if alpha >= 1.0 {
        return src | 0xFF_000000;
    }
    if alpha <= 0.0 {
        return dst;
    }
    let mix = |shift: u32| {
        let d = ((dst >> shift) & 0xFF) as f32;
        let s = ((src >> shift) & 0xFF) as f32;
        ((d + (s - d) * alpha).round() as u32) << shift
    };
    0xFF_000000 | mix(16) | mix(8) | mix(0)
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(CLEAR);
    }

    fn draw_tile(&mut self, tile: &Tile, opacity: f32, bank: &TextureBank) {
        let colour = tile_colour(tile.kind());
        self.paint_cells(tile.hitbox(), CELL_SIZE, tile.kind(), colour, opacity, bank);
    }

    fn draw_edge(&mut self, edge: &Edge, bank: &TextureBank) {
        let colour = edge_colour(edge);
        self.paint_cells(edge.hitbox(), HALF_CELL, edge.kind(), colour, 1.0, bank);
    }

    fn draw_portal(&mut self, portal: &Portal) {
        let colour = match portal.kind() {
            k if k.is_sentinel() => return,
            TileType::Color(0) => PRIMARY_PORTAL,
            _ => SECONDARY_PORTAL,
        };
        let hb = portal.hitbox();
        self.fill(hb.position, hb.size, colour, 1.0);
    }

    fn draw_body(&mut self, body: &Hitbox) {
        self.fill(body.position, body.size, BODY, 1.0);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RendererExt;
    use crate::world::{Facing, Level, PortalSlot};

    fn pixel(r: &mut Software, x: usize, y: usize) -> Rgba {
        let mut out = 0;
        r.end_frame(|fb, w, _| out = fb[y * w + x]);
        out
    }

    #[test]
    fn plain_tile_blue_scales_with_type() {
        let mut r = Software::default();
        let bank = TextureBank::new();
        r.begin_frame(100, 100);
        r.draw_tile(&Tile::new(TileType::Color(1), Vec2::ZERO, vec2(40.0, 40.0)), 1.0, &bank);
        r.draw_tile(&Tile::new(TileType::Color(7), vec2(40.0, 0.0), vec2(40.0, 40.0)), 1.0, &bank);
        assert_eq!(pixel(&mut r, 5, 5), 0xFF_000064);
        assert_eq!(pixel(&mut r, 45, 5), 0xFF_0000FF);
        assert_eq!(pixel(&mut r, 90, 90), CLEAR);
    }

    #[test]
    fn edge_green_encodes_facing() {
        let mut r = Software::default();
        let bank = TextureBank::new();
        r.begin_frame(64, 64);
        let e = Edge::new(TileType::Color(0), Vec2::ZERO, vec2(40.0, 20.0), Facing::Up);
        r.draw_edge(&e, &bank);
        assert_eq!(pixel(&mut r, 30, 10), 0xFF_009600);
    }

    #[test]
    fn texture_tiles_cells_and_missing_letter_falls_back() {
        let mut r = Software::default();
        let mut bank = TextureBank::new();
        bank.insert(
            't',
            Texture {
                w: 2,
                h: 1,
                pixels: vec![0xFF_FF0000, 0xFF_00FF00],
            },
        )
        .unwrap();
        r.begin_frame(80, 40);
        r.draw_tile(&Tile::new(TileType::Letter('T'), Vec2::ZERO, vec2(80.0, 40.0)), 1.0, &bank);
        // each 40-unit cell repeats the image
        assert_eq!(pixel(&mut r, 5, 5), 0xFF_FF0000);
        assert_eq!(pixel(&mut r, 35, 5), 0xFF_00FF00);
        assert_eq!(pixel(&mut r, 45, 5), 0xFF_FF0000);

        r.draw_tile(&Tile::new(TileType::Letter('q'), Vec2::ZERO, vec2(40.0, 40.0)), 1.0, &bank);
        assert_eq!(pixel(&mut r, 5, 5), 0xFF_000000);
        assert!(r.missing.contains(&'q'));
    }

    #[test]
    fn layer_opacity_blends() {
        let mut r = Software::default();
        let bank = TextureBank::new();
        r.begin_frame(40, 40);
        r.draw_tile(&Tile::new(TileType::Color(0), Vec2::ZERO, vec2(40.0, 40.0)), 1.0, &bank);
        r.draw_tile(&Tile::new(TileType::Color(2), Vec2::ZERO, vec2(40.0, 40.0)), 0.5, &bank);
        assert_eq!(pixel(&mut r, 1, 1), 0xFF_000064);
    }

    #[test]
    fn only_placed_portals_are_drawn() {
        let mut r = Software::default();
        let bank = TextureBank::new();
        let wall = Edge::new(TileType::Color(0), Vec2::ZERO, vec2(200.0, 20.0), Facing::Up);
        let mut level = Level::new("t", vec![], vec![], vec![wall]);

        r.begin_frame(200, 60);
        r.draw_level(&level, &[], &bank);
        assert_eq!(pixel(&mut r, 0, 0), 0xFF_009600); // sentinel at the origin stays hidden

        level.place_portal(PortalSlot::Primary, 0, vec2(100.0, 0.0)).unwrap();
        let body = Hitbox::new(vec2(90.0, 30.0), vec2(20.0, 20.0));
        r.begin_frame(200, 60);
        r.draw_level(&level, &[body], &bank);
        assert_eq!(pixel(&mut r, 100, 10), PRIMARY_PORTAL);
        assert_eq!(pixel(&mut r, 100, 40), BODY);
    }

    #[test]
    fn far_off_screen_tiles_are_skipped() {
        let mut r = Software::default();
        let bank = TextureBank::new();
        r.begin_frame(40, 40);
        let far = Tile::new(TileType::Color(1), vec2(3.0e9, 0.0), vec2(4.0e3, 40.0));
        r.draw_tile(&far, 1.0, &bank);
        let wide = Tile::new(TileType::Color(1), vec2(-3.0e9, 0.0), vec2(3.0e9, 40.0));
        r.draw_tile(&wide, 1.0, &bank);
        assert_eq!(pixel(&mut r, 5, 5), CLEAR);

        // only the one cell over the 40 × 40 frame is walked
        let strip = Hitbox::new(vec2(-400.0, 0.0), vec2(800.0, 80.0));
        assert_eq!(r.visible_cells(&strip, CELL_SIZE), (10..11, 0..1));
    }

    #[test]
    fn partial_last_cell_is_clipped_to_the_tile() {
        let mut r = Software::default();
        let bank = TextureBank::new();
        r.begin_frame(100, 40);
        r.draw_tile(&Tile::new(TileType::Color(1), Vec2::ZERO, vec2(50.0, 40.0)), 1.0, &bank);
        assert_eq!(pixel(&mut r, 45, 5), 0xFF_000064);
        assert_eq!(pixel(&mut r, 55, 5), CLEAR);
    }

    #[test]
    fn scale_and_origin_map_level_to_pixels() {
        let mut r = Software::new(vec2(100.0, 100.0), 2.0);
        let bank = TextureBank::new();
        r.begin_frame(100, 100);
        r.draw_tile(&Tile::new(TileType::Color(1), vec2(110.0, 100.0), vec2(10.0, 10.0)), 1.0, &bank);
        assert_eq!(pixel(&mut r, 19, 0), CLEAR);
        assert_eq!(pixel(&mut r, 20, 0), 0xFF_000064);
        assert_eq!(pixel(&mut r, 39, 19), 0xFF_000064);
        assert_eq!(r.to_level(20.0, 0.0), vec2(110.0, 100.0));
    }
}
