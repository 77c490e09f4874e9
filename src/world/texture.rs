// Format-agnostic repository of tile textures decoded by the asset loader.
// The renderer and world logic interact through texture letters only.

use std::collections::HashMap;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u32>,
}

impl Texture {
    /// Nearest texel for normalised coordinates in `[0, 1)`. Empty or short
    /// buffers sample as transparent black.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        if self.w == 0 || self.h == 0 {
            return 0;
        }
        let x = ((u * self.w as f32) as usize).min(self.w - 1);
        let y = ((v * self.h as f32) as usize).min(self.h - 1);
        self.pixels.get(y * self.w + x).copied().unwrap_or(0)
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture under an existing letter.
    #[error("texture `{0}` already present in bank")]
    Duplicate(char),

    /// Keys are single ASCII letters.
    #[error("`{0}` is not a texture letter")]
    BadKey(char),

    /// Zero-sized or short pixel buffer.
    #[error("texture `{0}` has inconsistent dimensions")]
    BadShape(char),
}

/// Letter-keyed cache of tile textures.
///
/// * Does **not** know about PNG or files; that's the loader's job.
/// * Keys are case-insensitive: `'A'` and `'a'` name the same texture.
#[derive(Default)]
pub struct TextureBank {
    by_letter: HashMap<char, Texture>,
}

impl TextureBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_letter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_letter.is_empty()
    }

    /// Borrow the texture for `letter`, `None` if it was never loaded.
    pub fn get(&self, letter: char) -> Option<&Texture> {
        self.by_letter.get(&letter.to_ascii_lowercase())
    }

    pub fn contains(&self, letter: char) -> bool {
        self.get(letter).is_some()
    }

    /// Insert a texture under `letter`.
    ///
    /// Fails on a non-letter key, a malformed texture, or a letter that is
    /// already present.
    pub fn insert(&mut self, letter: char, tex: Texture) -> Result<(), TextureError> {
        if !letter.is_ascii_alphabetic() {
            return Err(TextureError::BadKey(letter));
        }
        let key = letter.to_ascii_lowercase();
        if tex.w == 0 || tex.h == 0 || tex.pixels.len() != tex.w * tex.h {
            return Err(TextureError::BadShape(key));
        }
        if self.by_letter.contains_key(&key) {
            return Err(TextureError::Duplicate(key));
        }
        self.by_letter.insert(key, tex);
        Ok(())
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tex(color: u32) -> Texture {
        Texture {
            w: 2,
            h: 2,
            pixels: vec![color; 4],
        }
    }

    #[test]
    fn insert_and_lookup_ignore_case() {
        let mut bank = TextureBank::new();
        bank.insert('R', dummy_tex(0xFF_FF0000)).unwrap();
        bank.insert('b', dummy_tex(0xFF_0000FF)).unwrap();

        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get('r').unwrap().pixels[0], 0xFF_FF0000);
        assert_eq!(bank.get('B').unwrap().pixels[0], 0xFF_0000FF);
        assert!(bank.get('z').is_none());
    }

    #[test]
    fn duplicate_letter_rejected() {
        let mut bank = TextureBank::new();
        bank.insert('w', dummy_tex(1)).unwrap();
        let err = bank.insert('W', dummy_tex(2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate('w'));
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn malformed_inputs_rejected() {
        let mut bank = TextureBank::new();
        assert_eq!(bank.insert('7', dummy_tex(0)), Err(TextureError::BadKey('7')));
        let short = Texture { w: 4, h: 4, pixels: vec![0; 3] };
        assert_eq!(bank.insert('q', short), Err(TextureError::BadShape('q')));
        assert!(bank.is_empty());
    }

    #[test]
    fn sample_picks_nearest_texel() {
        let tex = Texture {
            w: 2,
            h: 2,
            pixels: vec![1, 2, 3, 4],
        };
        assert_eq!(tex.sample(0.0, 0.0), 1);
        assert_eq!(tex.sample(0.75, 0.0), 2);
        assert_eq!(tex.sample(0.25, 0.9), 3);
        assert_eq!(tex.sample(1.0, 1.0), 4);
    }

    #[test]
    fn sample_of_empty_texture_is_transparent() {
        let empty = Texture { w: 0, h: 3, pixels: vec![] };
        assert_eq!(empty.sample(0.5, 0.5), 0);
        let short = Texture { w: 2, h: 2, pixels: vec![7] };
        assert_eq!(short.sample(0.0, 0.0), 7);
        assert_eq!(short.sample(0.9, 0.9), 0);
    }
}
