use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context as _;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat, RgbaImage};

use crate::assets::decode::decode_image;
use crate::assets::store::AssetSource;
use crate::effects::composite::{circle_stencil, luminance_stencil};
use crate::foundation::core::Placement;
use crate::foundation::error::{FrameError, FrameResult};
use crate::render::surface::Surface;
use crate::scene::model::FrameConfig;
use crate::scene::settings::ArtifactFormat;

/// Decoded inputs of one composite.
#[derive(Clone, Copy, Debug)]
pub struct Layers<'a> {
    /// Base art.
    pub base: &'a RgbaImage,
    /// Frame overlay.
    pub frame: &'a RgbaImage,
    /// Optional mask; a circle is used when absent.
    pub mask: Option<&'a RgbaImage>,
}

/// Center of the visibility mask on a `size`-pixel canvas.
pub fn mask_center(config: &FrameConfig, size: u32) -> (f32, f32) {
    let s = size as f32;
    (
        s * 0.5 + config.mask_offset_x * s,
        s * 0.5 + config.mask_offset_y * s,
    )
}

/// Where the base image lands on a `size`-pixel canvas.
///
/// Landscape and square art is fitted to `size * baseScale` height and centered. Portrait art is
/// fitted to `size * baseScale` width and its top edge is pinned to half that extent above the
/// mask center, so faces near the top stay inside the mask.
pub fn base_placement(width: u32, height: u32, config: &FrameConfig, size: u32) -> Placement {
    let s = size as f32;
    let extent = s * config.base_scale;
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    let dx = config.base_offset_x * s;
    let dy = config.base_offset_y * s;

    if w >= h {
        let height = extent;
        let width = extent * w / h;
        Placement {
            x: (s - width) * 0.5 + dx,
            y: (s - height) * 0.5 + dy,
            width,
            height,
        }
    } else {
        let width = extent;
        let height = extent * h / w;
        let (_, cy) = mask_center(config, size);
        Placement {
            x: (s - width) * 0.5 + dx,
            y: cy - extent * 0.5 + dy,
            width,
            height,
        }
    }
}

/// Fit `(width, height)` inside a `size * scale` square centered on the canvas plus offset.
fn fit_centered(width: u32, height: u32, size: u32, scale: f32, off: (f32, f32)) -> Placement {
    let s = size as f32;
    let box_side = s * scale;
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    let k = (box_side / w).min(box_side / h);
    let (dw, dh) = (w * k, h * k);
    Placement {
        x: (s - dw) * 0.5 + off.0 * s,
        y: (s - dh) * 0.5 + off.1 * s,
        width: dw,
        height: dh,
    }
}

/// Build the visibility stencil, one byte per canvas pixel.
fn stencil(layers: &Layers<'_>, config: &FrameConfig, size: u32) -> FrameResult<Vec<u8>> {
    match layers.mask {
        None => {
            let (cx, cy) = mask_center(config, size);
            let radius = size as f32 * 0.5 * config.mask_radius;
            Ok(circle_stencil(size, size, cx, cy, radius))
        }
        Some(mask) => {
            let mut surface = Surface::new(size, size);
            let rect = fit_centered(
                mask.width(),
                mask.height(),
                size,
                config.mask_scale,
                (config.mask_offset_x, config.mask_offset_y),
            );
            surface.draw_image(mask, rect);
            let straight = surface.to_rgba_image()?;
            Ok(luminance_stencil(straight.as_raw()))
        }
    }
}

/// Composite decoded layers into a straight-alpha `size`×`size` image.
pub fn render_layers(
    layers: Layers<'_>,
    config: &FrameConfig,
    size: u32,
) -> FrameResult<RgbaImage> {
    if size == 0 {
        return Err(FrameError::validation("output size must be > 0"));
    }
    config.validate()?;

    let mut inner = Surface::new(size, size);
    if config.background_enabled {
        inner.fill(config.background_color.to_rgba8_premul());
    }
    let (bw, bh) = layers.base.dimensions();
    inner.draw_image(layers.base, base_placement(bw, bh, config, size));
    inner.apply_stencil(&stencil(&layers, config, size)?)?;

    let mut canvas = Surface::new(size, size);
    canvas.draw_surface(&inner)?;

    let (fw, fh) = layers.frame.dimensions();
    let frame_rect = fit_centered(
        fw,
        fh,
        size,
        config.frame_scale,
        (config.frame_offset_x, config.frame_offset_y),
    );
    canvas.draw_image(layers.frame, frame_rect);

    debug_assert_eq!((canvas.width(), canvas.height()), (size, size));
    canvas.to_rgba_image()
}

/// Encode a straight-alpha image as an artifact.
pub fn encode(img: &RgbaImage, format: ArtifactFormat, quality: f32) -> FrameResult<Vec<u8>> {
    let mut buf = Vec::new();
    let (w, h) = img.dimensions();
    match format {
        ArtifactFormat::Png => {
            DynamicImage::ImageRgba8(img.clone())
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                .context("encode png artifact")?;
        }
        ArtifactFormat::Webp => {
            WebPEncoder::new_lossless(&mut buf)
                .encode(img.as_raw(), w, h, ExtendedColorType::Rgba8)
                .context("encode webp artifact")?;
        }
        ArtifactFormat::Jpeg => {
            let q = (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8;
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut buf, q)
                .encode(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)
                .context("encode jpeg artifact")?;
        }
    }
    Ok(buf)
}

/// Loads layers from an [`AssetSource`] and composites them.
#[derive(Clone)]
pub struct Compositor {
    source: Arc<dyn AssetSource>,
}

impl Compositor {
    /// Compositor reading layers from `source`.
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self { source }
    }

    fn load(&self, path: &str) -> FrameResult<RgbaImage> {
        let bytes = self.source.read(path)?;
        decode_image(path, &bytes)
    }

    /// Decode base, frame, and mask, then composite at `size`.
    pub fn render(
        &self,
        base_image: &str,
        config: &FrameConfig,
        size: u32,
    ) -> FrameResult<RgbaImage> {
        let frame_path = config
            .frame_image_path()
            .ok_or_else(|| FrameError::config_invalid("frame image is not set"))?;

        let base = self.load(base_image)?;
        let frame = self.load(frame_path)?;
        let mask = config.mask_image_path().map(|p| self.load(p)).transpose()?;

        render_layers(
            Layers {
                base: &base,
                frame: &frame,
                mask: mask.as_ref(),
            },
            config,
            size,
        )
    }

    /// Render and encode an artifact.
    pub fn composite(
        &self,
        base_image: &str,
        config: &FrameConfig,
        size: u32,
        format: ArtifactFormat,
        quality: f32,
    ) -> FrameResult<Vec<u8>> {
        let img = self.render(base_image, config, size)?;
        encode(&img, format, quality)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
