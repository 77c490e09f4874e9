// ──────────────────────────────────────────────────────────────────────────
// data/loader.rs
//
//  *   RawLevel   (data::raw)              ──╮
//  *   tiles/<letter>.png                    │   --->  world::Level
//  *   TextureBank (mut)                     │          + populated TextureBank
//                                            ╯
// ──────────────────────────────────────────────────────────────────────────

use std::path::Path;

use glam::vec2;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    data::raw::{self, LevelError, RawLevel, RawTile, RawType},
    world::{Edge, Facing, GeometryError, Layer, Level, Texture, TextureBank, TextureError, Tile, TileType},
};

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("cannot decode tile image: {0}")]
    Image(#[from] image::ImageError),

    #[error("{section}[{index}]: {source}")]
    Facing {
        section: &'static str,
        index: usize,
        source: GeometryError,
    },

    #[error("{section}[{index}]: edges need a facing")]
    MissingFacing { section: &'static str, index: usize },

    #[error("{section}[{index}]: negative size {x} × {y}")]
    NegativeSize {
        section: &'static str,
        index: usize,
        x: f32,
        y: f32,
    },

    #[error("{section}[{index}]: type {value} is neither a number nor a single letter")]
    BadType {
        section: &'static str,
        index: usize,
        value: String,
    },
}

static LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]$").unwrap());

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Read the level at `path`, convert it, and preload every texture letter
/// it references from `tiles_dir` into `bank`. Missing images are logged
/// and left to the colour fallback.
pub fn load_level<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    tiles_dir: Q,
    bank: &mut TextureBank,
) -> Result<Level, LoadError> {
    let path = path.as_ref();
    let raw = RawLevel::from_file(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let level = level_from_raw(name, raw)?;

    let letters = level.used_letters();
    if !letters.is_empty() {
        info!(?letters, "level uses textured tiles");
        preload_tile_textures(tiles_dir, letters, bank);
    }

    info!(
        name = %level.name,
        layers = level.layers.len(),
        blocks = level.blocks.len(),
        edges = level.edges.len(),
        "level loaded"
    );
    Ok(level)
}

/// Convert parsed records into world types.
pub fn level_from_raw(name: impl Into<String>, raw: RawLevel) -> Result<Level, LoadError> {
    let layers = raw
        .layers
        .into_iter()
        .map(|l| -> Result<Layer, LoadError> {
            let tiles = l
                .tiles
                .iter()
                .enumerate()
                .map(|(i, t)| raw_to_world::tile_from("layers.tiles", i, t))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Layer {
                opacity: l.opacity.clamp(0.0, 1.0),
                tiles,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    let blocks = raw
        .blocks
        .iter()
        .enumerate()
        .map(|(i, t)| raw_to_world::tile_from("blocks", i, t))
        .collect::<Result<Vec<_>, _>>()?;

    let edges = raw
        .edges
        .iter()
        .enumerate()
        .map(|(i, t)| raw_to_world::edge_from("edges", i, t))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Level::new(name, layers, blocks, edges))
}

/// Decode `<dir>/<letter>.png` into an ARGB texture.
pub fn load_tile_texture<P: AsRef<Path>>(dir: P, letter: char) -> Result<Texture, LoadError> {
    let path = dir
        .as_ref()
        .join(format!("{}.png", letter.to_ascii_lowercase()));
    let img = image::open(&path)?.to_rgba8();
    let (w, h) = img.dimensions();
    let pixels = img
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            u32::from_be_bytes([a, r, g, b])
        })
        .collect();
    Ok(Texture {
        w: w as usize,
        h: h as usize,
        pixels,
    })
}

/// Load each letter not already in `bank`; failures are logged and skipped.
/// Returns how many textures were added.
pub fn preload_tile_textures<P, I>(dir: P, letters: I, bank: &mut TextureBank) -> usize
where
    P: AsRef<Path>,
    I: IntoIterator<Item = char>,
{
    let mut loaded = 0;
    for letter in letters {
        if bank.contains(letter) {
            continue;
        }
        let added = load_tile_texture(&dir, letter)
            .and_then(|tex| bank.insert(letter, tex).map_err(LoadError::from));
        match added {
            Ok(()) => loaded += 1,
            Err(err) => warn!(%letter, %err, "tile texture unavailable"),
        }
    }
    loaded
}

/*====================================================================*/
/*                  Raw → World helpers (local)                       */
/*====================================================================*/
mod raw_to_world {
    use super::*;

    pub fn kind_from(section: &'static str, index: usize, r: &RawType) -> Result<TileType, LoadError> {
        let bad = |value: String| LoadError::BadType { section, index, value };
        match r {
            RawType::Number(n) => i32::try_from(*n)
                .map(TileType::Color)
                .map_err(|_| bad(n.to_string())),
            RawType::Text(s) if LETTER.is_match(s) => {
                s.chars().next().map(TileType::Letter).ok_or_else(|| bad(s.clone()))
            }
            RawType::Text(s) => Err(bad(format!("{s:?}"))),
        }
    }

    fn size_from(section: &'static str, index: usize, r: &RawTile) -> Result<glam::Vec2, LoadError> {
        let raw::RawVec { x, y } = r.size;
        if x < 0.0 || y < 0.0 {
            return Err(LoadError::NegativeSize { section, index, x, y });
        }
        Ok(vec2(x, y))
    }

    pub fn tile_from(section: &'static str, index: usize, r: &RawTile) -> Result<Tile, LoadError> {
        Ok(Tile::new(
            kind_from(section, index, &r.type_)?,
            vec2(r.position.x, r.position.y),
            size_from(section, index, r)?,
        ))
    }

    pub fn edge_from(section: &'static str, index: usize, r: &RawTile) -> Result<Edge, LoadError> {
        let facing = r
            .facing
            .ok_or(LoadError::MissingFacing { section, index })?;
        let facing = Facing::try_from(facing).map_err(|source| LoadError::Facing {
            section,
            index,
            source,
        })?;
        Ok(Edge::new(
            kind_from(section, index, &r.type_)?,
            vec2(r.position.x, r.position.y),
            size_from(section, index, r)?,
            facing,
        ))
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
