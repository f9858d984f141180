//! Wall and surface texture files.
//!
//! * `<dir>/<id>.png`: any 8/16-bit grey, grey+alpha, RGB, RGBA or
//!   palette PNG of exactly `size × size` pixels. Alpha is ignored.
//! * `<dir>/<id>.argb`: headerless raw dump, `size × size` little-endian
//!   `u32` texels (0xAARRGGBB, alpha ignored), row-major.
//! * The PNG wins when both exist. Export always writes PNG.

use byteorder::{LittleEndian as LE, ReadBytesExt};
use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read},
    path::{Path, PathBuf},
};

use crate::{
    renderer::Rgba,
    world::{NO_TEXTURE, Texture, TextureAtlas, TextureError, TextureId},
};

/// PNG file holding texture `id` inside `dir`.
pub fn texture_path(dir: &Path, id: TextureId) -> PathBuf {
    dir.join(format!("{id}.png"))
}

/// Raw `.argb` file holding texture `id` inside `dir`.
pub fn raw_texture_path(dir: &Path, id: TextureId) -> PathBuf {
    dir.join(format!("{id}.argb"))
}

/// Load one texture per id in `ids` from `dir`.
///
/// Id 0 is the built-in checkerboard and is never read from disk.
pub fn load_textures<P: AsRef<Path>>(
    dir: P,
    ids: &[TextureId],
    size: usize,
) -> Result<TextureAtlas, TextureError> {
    let dir = dir.as_ref();
    let mut atlas = TextureAtlas::new(size);

    for &id in ids {
        if id == NO_TEXTURE {
            continue;
        }
        let tex = read_texture(dir, id, size)?;
        atlas.insert(id, tex)?;
    }

    log::info!(
        "loaded {} textures ({s}×{s}, {} slots) from `{}`",
        atlas.loaded_ids().count(),
        atlas.len(),
        dir.display(),
        s = atlas.size(),
    );
    Ok(atlas)
}

fn read_texture(dir: &Path, id: TextureId, size: usize) -> Result<Texture, TextureError> {
    let png_path = texture_path(dir, id);
    match File::open(&png_path) {
        Ok(file) => return decode_png(BufReader::new(file), id, size),
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(io_error(id, e)),
        Err(_) => {}
    }

    match fs::read(raw_texture_path(dir, id)) {
        Ok(bytes) => decode_raw(&bytes, id, size),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(TextureError::NotFound {
            id,
            path: png_path.display().to_string(),
        }),
        Err(e) => Err(io_error(id, e)),
    }
}

fn decode_png<R: Read>(src: R, id: TextureId, size: usize) -> Result<Texture, TextureError> {
    let decode = |e: png::DecodingError| TextureError::Decode {
        id,
        reason: e.to_string(),
    };

    let mut decoder = png::Decoder::new(src);
    // palette → RGB(A), low bit depths → 8, 16-bit → 8
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(decode)?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).map_err(decode)?;

    let (w, h) = (info.width as usize, info.height as usize);
    if w != size || h != size {
        return Err(TextureError::BadSize {
            id,
            got: w * h,
            expected: size * size,
        });
    }

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(TextureError::Decode {
                id,
                reason: format!("unsupported colour type {other:?}"),
            });
        }
    };

    let pixels = buf[..info.buffer_size()]
        .chunks_exact(channels)
        .map(|px| match px {
            [g] | [g, _] => 0x00_010101 * u32::from(*g),
            [r, g, b, ..] => u32::from(*r) << 16 | u32::from(*g) << 8 | u32::from(*b),
            _ => 0,
        })
        .collect();
    Ok(Texture { size, pixels })
}

fn decode_raw(bytes: &[u8], id: TextureId, size: usize) -> Result<Texture, TextureError> {
    let expected = size * size;
    if bytes.len() != expected * 4 {
        return Err(TextureError::BadSize {
            id,
            got: bytes.len() / 4,
            expected,
        });
    }

    let mut cursor = bytes;
    let mut pixels = Vec::with_capacity(expected);
    for _ in 0..expected {
        let argb = cursor.read_u32::<LE>().map_err(|e| io_error(id, e))?;
        pixels.push(argb & 0x00_FF_FF_FF);
    }
    Ok(Texture { size, pixels })
}

fn io_error(id: TextureId, e: io::Error) -> TextureError {
    TextureError::Io {
        id,
        reason: e.to_string(),
    }
}

/// Write `tex` as an 8-bit RGB PNG.
pub fn write_texture(path: &Path, tex: &Texture) -> io::Result<()> {
    let side = u32::try_from(tex.size)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "texture too large"))?;
    let mut enc = png::Encoder::new(BufWriter::new(File::create(path)?), side, side);
    enc.set_color(png::ColorType::Rgb);
    enc.set_depth(png::BitDepth::Eight);

    let data: Vec<u8> = tex.pixels.iter().flat_map(|&px| rgb_bytes(px)).collect();
    let mut writer = enc.write_header()?;
    writer.write_image_data(&data)?;
    writer.finish()?;
    Ok(())
}

#[inline]
fn rgb_bytes(px: Rgba) -> [u8; 3] {
    [(px >> 16) as u8, (px >> 8) as u8, px as u8]
}

/// Dump every loaded texture of `atlas` into `dir` (created if needed).
pub fn export_textures(dir: &Path, atlas: &TextureAtlas) -> io::Result<usize> {
    fs::create_dir_all(dir)?;
    let mut written = 0;
    for id in atlas.loaded_ids() {
        write_texture(&texture_path(dir, id), atlas.texture_or_missing(id))?;
        written += 1;
    }
    Ok(written)
}
