// Square wall textures addressed by the same id the grid map stores.
// The renderer and the loaders interact through `TextureId` only.

use crate::renderer::Rgba;

/// Runtime handle for a texture in the atlas (= grid cell code).
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Also used for the implicit wall around the map.
pub const NO_TEXTURE: TextureId = 0;

/// CPU-side storage: `size × size` texels of 0x00RRGGBB in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub size: usize,
    pub pixels: Vec<Rgba>,
}

impl Texture {
    /// Build a texture from a generator `f(x, y) -> colour`.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                pixels.push(f(x, y));
            }
        }
        Self { size, pixels }
    }

    /// Light/dark grey checkerboard, 8 texels per square.
    pub fn checker(size: usize) -> Self {
        Self::from_fn(size, |x, y| {
            if ((x / 8) ^ (y / 8)) & 1 == 0 {
                0x00_A0A0A0
            } else {
                0x00_505050
            }
        })
    }

    /// Bounds-checked texel fetch; out-of-range coordinates are clamped.
    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> Rgba {
        let last = self.size.saturating_sub(1);
        let (x, y) = (x.min(last), y.min(last));
        self.pixels.get(y * self.size + x).copied().unwrap_or(0)
    }
}

/// Things that can go wrong when building or loading the atlas.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// No texture file for the requested id.
    #[error("texture {id} not found at `{path}`")]
    NotFound { id: TextureId, path: String },

    /// Texture is not `size × size` like the rest of the atlas.
    #[error("texture {id} has {got} texels, expected {expected}")]
    BadSize {
        id: TextureId,
        got: usize,
        expected: usize,
    },

    /// Requested id is outside `0 .. atlas.len()` or was never loaded.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Underlying read failure other than a missing file.
    #[error("reading texture {id}: {reason}")]
    Io { id: TextureId, reason: String },

    /// File exists but is not a usable image.
    #[error("decoding texture {id}: {reason}")]
    Decode { id: TextureId, reason: String },
}

/// Fixed-size texture collection indexed by wall code.
///
/// * Every texture has the same square `size`.
/// * Slot **0** is always the checkerboard; ids that were never inserted
///   also resolve to it through [`TextureAtlas::texture_or_missing`].
#[derive(Clone, Debug)]
pub struct TextureAtlas {
    size: usize,
    slots: Vec<Option<Texture>>,
    missing: Texture,
}

impl TextureAtlas {
    /// Empty atlas (checkerboard only) for textures of `size × size`.
    pub fn new(size: usize) -> Self {
        let missing = Texture::checker(size);
        Self {
            size,
            slots: vec![Some(missing.clone())],
            missing,
        }
    }

    /// Atlas with a generated pattern for every id in `ids`.
    pub fn procedural(ids: &[TextureId], size: usize) -> Self {
        let mut atlas = Self::new(size);
        for &id in ids.iter().filter(|&&id| id != NO_TEXTURE) {
            // generated textures always match the atlas size
            let _ = atlas.insert(id, pattern(id, size));
        }
        atlas
    }

    /// Edge length of every texture in texels.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of slots (including the checkerboard and empty slots).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().skip(1).all(Option::is_none)
    }

    /// Store `tex` under `id`, replacing any previous texture.
    pub fn insert(&mut self, id: TextureId, tex: Texture) -> Result<(), TextureError> {
        let expected = self.size * self.size;
        if tex.size != self.size || tex.pixels.len() != expected {
            return Err(TextureError::BadSize {
                id,
                got: tex.pixels.len(),
                expected,
            });
        }
        let idx = id as usize;
        if idx >= self.slots.len() {
            self.slots.resize(idx + 1, None);
        }
        self.slots[idx] = Some(tex);
        Ok(())
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.slots
            .get(id as usize)
            .and_then(Option::as_ref)
            .ok_or(TextureError::BadId(id))
    }

    /// Fallback-safe query: unknown ids resolve to the checkerboard.
    #[inline]
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.texture(id).unwrap_or(&self.missing)
    }

    /// Ids with a real texture (the checkerboard excluded).
    pub fn loaded_ids(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| i as TextureId)
    }
}

/// Classic generated wall patterns, cycled by id.
fn pattern(id: TextureId, size: usize) -> Texture {
    let s = size.max(1);
    let scale = |v: usize| (v * 256 / s) as u32;
    match (id - 1) % 8 {
        // red brick with a grey cross
        0 => Texture::from_fn(size, |x, y| {
            let cross = x == y || x + y + 1 == s;
            0x00_010000 * (254 * u32::from(!cross))
        }),
        // sloped greyscale
        1 => Texture::from_fn(size, |x, y| {
            let c = (scale(x) ^ scale(y)) & 0xFF;
            0x00_010101 * c
        }),
        // sloped yellow
        2 => Texture::from_fn(size, |x, y| {
            let c = scale(y) ^ scale(x);
            (c & 0xFF) << 16 | (c & 0xFF) << 8
        }),
        // xor greyscale
        3 => Texture::from_fn(size, |x, y| {
            let c = scale(x) ^ scale(y);
            0x00_010101 * (c & 0xFF)
        }),
        // xor green
        4 => Texture::from_fn(size, |x, y| (scale(x) ^ scale(y)) << 8 & 0x00_FF00),
        // red bricks
        5 => Texture::from_fn(size, |x, y| {
            let row = y * 8 / s;
            let shift = if row % 2 == 0 { 0 } else { s / 4 };
            let mortar = y % (s / 8).max(1) == 0 || (x + shift) % (s / 2).max(1) == 0;
            if mortar { 0x00_C0C0C0 } else { 0x00_A03020 }
        }),
        // red gradient
        6 => Texture::from_fn(size, |_, y| (scale(y) & 0xFF) << 16),
        // flat grey with a dark frame
        _ => Texture::from_fn(size, |x, y| {
            let edge = x == 0 || y == 0 || x + 1 == s || y + 1 == s;
            if edge { 0x00_303030 } else { 0x00_808080 }
        }),
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
