use image::RgbaImage;

use crate::foundation::error::{FrameError, FrameResult};

/// Decode encoded image bytes into straight-alpha RGBA8.
///
/// `path` only labels the error; any format the `image` crate can sniff is accepted.
pub fn decode_image(path: &str, bytes: &[u8]) -> FrameResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).map_err(|e| FrameError::asset_load(path, e))?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(FrameError::asset_load(path, "image has zero size"));
    }
    Ok(rgba)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = (((*c as u16) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
