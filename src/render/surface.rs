use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::assets::decode::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::effects::composite::{over, over_in_place, stencil_in_place};
use crate::foundation::core::{Placement, Rgba8Premul};
use crate::foundation::error::{FrameError, FrameResult};

/// Scaled layers above this multiple of the surface area are cropped before resizing.
const OVERSIZE_FACTOR: f64 = 16.0;

/// CPU raster target in premultiplied RGBA8.
#[derive(Clone, Debug)]
pub(crate) struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn fill(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Draw a straight-alpha image scaled into `rect`, clipped to the surface.
    ///
    /// Layers much larger than the surface are cropped to their visible part before resizing.
    pub(crate) fn draw_image(&mut self, img: &RgbaImage, rect: Placement) {
        let tw = f64::from(rect.width).round();
        let th = f64::from(rect.height).round();
        if !(tw >= 1.0 && th >= 1.0) {
            return;
        }
        let ox = f64::from(rect.x).round();
        let oy = f64::from(rect.y).round();

        let canvas_area = f64::from(self.width) * f64::from(self.height);
        if tw * th <= canvas_area * OVERSIZE_FACTOR {
            let (tw, th) = (tw as u32, th as u32);
            let scaled = if img.dimensions() == (tw, th) {
                img.clone()
            } else {
                imageops::resize(img, tw, th, FilterType::Triangle)
            };
            self.blit(scaled, ox as i64, oy as i64);
            return;
        }

        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let (vx0, vx1) = (ox.max(0.0), (ox + tw).min(w));
        let (vy0, vy1) = (oy.max(0.0), (oy + th).min(h));
        if vx1 <= vx0 || vy1 <= vy0 {
            return;
        }
        let (iw, ih) = (f64::from(img.width()), f64::from(img.height()));
        let sx0 = ((vx0 - ox) * iw / tw).floor().clamp(0.0, iw - 1.0);
        let sx1 = ((vx1 - ox) * iw / tw).ceil().clamp(sx0 + 1.0, iw);
        let sy0 = ((vy0 - oy) * ih / th).floor().clamp(0.0, ih - 1.0);
        let sy1 = ((vy1 - oy) * ih / th).ceil().clamp(sy0 + 1.0, ih);

        let visible = imageops::crop_imm(
            img,
            sx0 as u32,
            sy0 as u32,
            (sx1 - sx0) as u32,
            (sy1 - sy0) as u32,
        )
        .to_image();
        let scaled = imageops::resize(
            &visible,
            (vx1 - vx0) as u32,
            (vy1 - vy0) as u32,
            FilterType::Triangle,
        );
        self.blit(scaled, vx0 as i64, vy0 as i64);
    }

    /// Composite a straight-alpha image with its top-left corner at `(ox, oy)`.
    fn blit(&mut self, mut img: RgbaImage, ox: i64, oy: i64) {
        premultiply_rgba8_in_place(&mut img);
        let (tw, th) = (i64::from(img.width()), i64::from(img.height()));
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        let src = img.as_raw();

        for sy in 0..th {
            let dy = oy + sy;
            if dy < 0 || dy >= h {
                continue;
            }
            for sx in 0..tw {
                let dx = ox + sx;
                if dx < 0 || dx >= w {
                    continue;
                }
                let si = ((sy * tw + sx) * 4) as usize;
                let di = ((dy * w + dx) * 4) as usize;
                let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
                let d = [
                    self.data[di],
                    self.data[di + 1],
                    self.data[di + 2],
                    self.data[di + 3],
                ];
                self.data[di..di + 4].copy_from_slice(&over(d, s, 1.0));
            }
        }
    }

    pub(crate) fn draw_surface(&mut self, other: &Surface) -> FrameResult<()> {
        over_in_place(&mut self.data, &other.data, 1.0)
    }

    pub(crate) fn apply_stencil(&mut self, stencil: &[u8]) -> FrameResult<()> {
        stencil_in_place(&mut self.data, stencil)
    }

    /// Straight-alpha copy of the pixels.
    pub(crate) fn to_rgba_image(&self) -> FrameResult<RgbaImage> {
        let mut data = self.data.clone();
        unpremultiply_rgba8_in_place(&mut data);
        RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| FrameError::validation("surface buffer does not match its size"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
