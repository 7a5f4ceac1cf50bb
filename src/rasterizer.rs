use egui::{Pos2, Vec2, vec2};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::debug;

use crate::error::CanvasError;
use crate::geometry;
use crate::stroke::Stroke;
use crate::surface::{Background, Composition, DrawingSurface};

/// Largest accepted export edge, in pixels
pub const MAX_DIMENSION: u32 = 16_384;

/// Flatten the committed drawing into a `width` x `height` RGBA buffer.
///
/// The stroke currently being drawn is left out. Either dimension being
/// zero, negative or above [`MAX_DIMENSION`] is rejected before any work is
/// done.
pub fn flatten(surface: &DrawingSurface, width: i64, height: i64) -> Result<RgbaImage, CanvasError> {
    let (width, height) = validate_dimensions(width, height)?;
    let composition = surface.committed_composition();
    debug!(
        "Flattening {} stroke(s) into {}x{}",
        composition.strokes.len(),
        width,
        height
    );
    Ok(rasterize(&composition, width, height))
}

fn validate_dimensions(width: i64, height: i64) -> Result<(u32, u32), CanvasError> {
    let invalid = CanvasError::InvalidDimensions { width, height };
    let w = u32::try_from(width).map_err(|_| invalid.clone())?;
    let h = u32::try_from(height).map_err(|_| invalid.clone())?;
    if w == 0 || h == 0 || w > MAX_DIMENSION || h > MAX_DIMENSION {
        return Err(invalid);
    }
    Ok((w, h))
}

/// Paint a composition into a fresh buffer: background first, then every
/// layer in order.
pub fn rasterize(composition: &Composition<'_>, width: u32, height: u32) -> RgbaImage {
    let mut target = match &composition.background {
        Background::Solid(color) => {
            RgbaImage::from_pixel(width, height, Rgba(color.to_srgba_unmultiplied()))
        }
        Background::Image(image) => {
            let pixels = image.pixels();
            if pixels.dimensions() == (width, height) {
                pixels.clone()
            } else {
                imageops::resize(pixels, width, height, FilterType::Triangle)
            }
        }
    };

    let scale = canvas_scale(composition.canvas_size, width, height);
    for stroke in composition.layers() {
        paint_stroke(&mut target, stroke, scale);
    }
    target
}

/// Pixels per canvas-space unit on each axis
fn canvas_scale(canvas_size: Option<Vec2>, width: u32, height: u32) -> Vec2 {
    match canvas_size {
        Some(size) if size.x > 0.0 && size.y > 0.0 => {
            vec2(width as f32 / size.x, height as f32 / size.y)
        }
        _ => Vec2::splat(1.0),
    }
}

/// Rasterize one stroke as a chain of round-capped segments.
///
/// Coverage is accumulated per pixel with `max` before blending, so joints
/// where segments overlap are not painted twice.
fn paint_stroke(target: &mut RgbaImage, stroke: &Stroke, scale: Vec2) {
    let points: Vec<Pos2> = stroke
        .points()
        .iter()
        .map(|p| Pos2::new(p.x * scale.x, p.y * scale.y))
        .collect();
    let radius = stroke.size() * (scale.x + scale.y) / 4.0;

    let Some(region) = PixelRegion::around(&points, radius + 1.0, target.width(), target.height())
    else {
        return;
    };

    let mut coverage = vec![0.0f32; region.len()];
    let segments: Vec<(Pos2, Pos2)> = if stroke.is_dot() {
        vec![(points[0], points[0])]
    } else {
        points.windows(2).map(|w| (w[0], w[1])).collect()
    };

    for (start, end) in segments {
        let Some(seg) =
            PixelRegion::around(&[start, end], radius + 1.0, target.width(), target.height())
        else {
            continue;
        };
        for y in seg.y0..seg.y1 {
            for x in seg.x0..seg.x1 {
                let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = geometry::distance_to_line_segment(center, start, end);
                let c = (radius + 0.5 - d).clamp(0.0, 1.0);
                if c > 0.0 {
                    let slot = &mut coverage[region.index(x, y)];
                    *slot = slot.max(c);
                }
            }
        }
    }

    let color = stroke.color().to_srgba_unmultiplied();
    for y in region.y0..region.y1 {
        for x in region.x0..region.x1 {
            let c = coverage[region.index(x, y)];
            if c > 0.0 {
                let dst = target.get_pixel_mut(x, y);
                *dst = blend_over(*dst, color, c);
            }
        }
    }
}

/// Source-over compositing of an unmultiplied color at partial coverage
fn blend_over(dst: Rgba<u8>, src: [u8; 4], coverage: f32) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0 * coverage;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let value = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        out[i] = value.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    Rgba(out)
}

/// Pixel rectangle clipped to the target, `x1`/`y1` exclusive
struct PixelRegion {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl PixelRegion {
    fn around(points: &[Pos2], padding: f32, width: u32, height: u32) -> Option<Self> {
        let bounds = geometry::calculate_bounds(points, padding);
        if !bounds.is_positive() {
            return None;
        }
        let x0 = bounds.min.x.floor().max(0.0) as u32;
        let y0 = bounds.min.y.floor().max(0.0) as u32;
        let x1 = (bounds.max.x.ceil().max(0.0) as u32).min(width);
        let y1 = (bounds.max.y.ceil().max(0.0) as u32).min(height);
        (x0 < x1 && y0 < y1).then_some(Self { x0, y0, x1, y1 })
    }

    fn stride(&self) -> usize {
        (self.x1 - self.x0) as usize
    }

    fn len(&self) -> usize {
        self.stride() * (self.y1 - self.y0) as usize
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y - self.y0) as usize * self.stride() + (x - self.x0) as usize
    }
}
