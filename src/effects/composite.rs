use crate::foundation::error::{FrameError, FrameResult};
use crate::foundation::math::{luminosity_u8, mul_div255_u8};

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> FrameResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(FrameError::validation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Multiply every premultiplied pixel by the matching stencil alpha.
pub fn stencil_in_place(dst: &mut [u8], stencil: &[u8]) -> FrameResult<()> {
    if dst.len() != stencil.len() * 4 {
        return Err(FrameError::validation(
            "stencil_in_place expects one stencil byte per rgba8 pixel",
        ));
    }
    for (px, &m) in dst.chunks_exact_mut(4).zip(stencil) {
        if m == 255 {
            continue;
        }
        for c in px.iter_mut() {
            *c = mul_div255(u16::from(*c), u16::from(m));
        }
    }
    Ok(())
}

/// Mask alpha for one straight-alpha pixel: `min(alpha, luminosity)`.
///
/// White opaque is fully visible and black is hidden, whether or not the mask carries alpha.
pub fn luminance_alpha(px: [u8; 4]) -> u8 {
    let [r, g, b, a] = px;
    a.min(luminosity_u8(r, g, b))
}

/// Convert a straight-alpha RGBA8 mask buffer into one stencil byte per pixel.
pub fn luminance_stencil(straight_rgba: &[u8]) -> Vec<u8> {
    straight_rgba
        .chunks_exact(4)
        .map(|px| luminance_alpha([px[0], px[1], px[2], px[3]]))
        .collect()
}

/// Anti-aliased circular stencil of `radius` centered at `(cx, cy)`.
pub fn circle_stencil(width: u32, height: u32, cx: f32, cy: f32, radius: f32) -> Vec<u8> {
    let mut out = Vec::with_capacity((width as usize) * (height as usize));
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
            out.push((coverage * 255.0).round() as u8);
        }
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
