//! Level description as it sits on disk.
//!
//! ```json
//! {
//!   "layers": [{ "opacity": 1, "tiles": [ Record, .. ] }],
//!   "blocks": [ Record, .. ],
//!   "edges":  [ Record, .. ]
//! }
//! ```
//!
//! `Record = { "type": 2 | "w", "position": {"x","y"}, "size": {"x","y"}, "facing": 0..3 }`,
//! `facing` only on edges. Nothing here is validated beyond JSON shape;
//! `data::loader` turns these into `world` types.

use std::{fs, io, path::Path};

use serde::Deserialize;
use thiserror::Error;

/*=======================================================================*/
/*                           Raw records                                 */
/*=======================================================================*/

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct RawVec {
    pub x: f32,
    pub y: f32,
}

/// `type` is a number for colour tiles and a one-letter string for textures.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawType {
    Number(i64),
    Text(String),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawTile {
    #[serde(rename = "type")]
    pub type_: RawType,
    pub position: RawVec,
    pub size: RawVec,
    #[serde(default)]
    pub facing: Option<i64>,
}

fn full_opacity() -> f32 {
    1.0
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawLayer {
    #[serde(default = "full_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub tiles: Vec<RawTile>,
}

/*=======================================================================*/
/*                     Aggregate returned by `parse`                     */
/*=======================================================================*/
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawLevel {
    #[serde(default)]
    pub layers: Vec<RawLayer>,
    #[serde(default)]
    pub blocks: Vec<RawTile>,
    #[serde(default)]
    pub edges: Vec<RawTile>,
}

/*=======================================================================*/
/*                                Errors                                 */
/*=======================================================================*/

#[derive(Debug, Error)]
pub enum LevelError {
    /// Underlying I/O failure – propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed level description: {0}")]
    Json(#[from] serde_json::Error),
}

impl RawLevel {
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LevelError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

/*=======================================================================*/
/*                                Tests                                  */
/*=======================================================================*/
