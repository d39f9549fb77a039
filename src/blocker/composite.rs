use crate::blocker::model::Color;
use crate::blocker::render::DrawSurface;
use image::imageops::FilterType;
use image::RgbaImage;

/// CPU frame the render pipeline composites into. Pixels are straight
/// (non-premultiplied) RGBA and start fully transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaBuffer {
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let mut pixels = vec![0u8; (width as usize) * (height as usize) * 4];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[0] = fill.r;
            chunk[1] = fill.g;
            chunk[2] = fill.b;
            chunk[3] = fill.a;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn transparent(width: u32, height: u32) -> Self {
        Self::new(width, height, Color::default())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let idx = self.index(x, y);
        Color {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
            a: self.pixels[idx + 3],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    fn blend_at(&mut self, idx: usize, top: Color, opacity: f32) {
        let dst = &mut self.pixels[idx..idx + 4];
        let blended = blend_pixel(
            Color::rgba(dst[0], dst[1], dst[2], dst[3]),
            top,
            opacity,
        );
        dst[0] = blended.r;
        dst[1] = blended.g;
        dst[2] = blended.b;
        dst[3] = blended.a;
    }
}

impl DrawSurface for RgbaBuffer {
    fn draw_image(&mut self, image: &RgbaImage, opacity: f32) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let scaled;
        let source = if image.dimensions() == (self.width, self.height) {
            image
        } else {
            scaled = image::imageops::resize(image, self.width, self.height, FilterType::Triangle);
            &scaled
        };

        for (i, src) in source.pixels().enumerate() {
            self.blend_at(
                i * 4,
                Color::rgba(src[0], src[1], src[2], src[3]),
                opacity,
            );
        }
    }

    fn fill(&mut self, color: Color, opacity: f32) {
        for idx in (0..self.pixels.len()).step_by(4) {
            self.blend_at(idx, color, opacity);
        }
    }

    fn stroke_border(&mut self, color: Color, width: u32, opacity: f32) {
        for y in 0..self.height {
            for x in 0..self.width {
                let on_border = x < width
                    || y < width
                    || x >= self.width.saturating_sub(width)
                    || y >= self.height.saturating_sub(width);
                if on_border {
                    let idx = self.index(x, y);
                    self.blend_at(idx, color, opacity);
                }
            }
        }
    }
}

/// Source-over blend of `top`, scaled by `opacity`, onto `bottom`.
fn blend_pixel(bottom: Color, top: Color, opacity: f32) -> Color {
    let sa = (top.a as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let da = bottom.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= f32::EPSILON {
        return Color::default();
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Color {
        r: blend(top.r, bottom.r),
        g: blend(top.g, bottom.g),
        b: blend(top.b, bottom.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}
