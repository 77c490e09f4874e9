mod loader;
mod raw;

pub use loader::{LoadError, level_from_raw, load_level, load_tile_texture, preload_tile_textures};
pub use raw::{LevelError, RawLayer, RawLevel, RawTile, RawType, RawVec};
