//! Drawing surface abstraction and the offscreen bitmap implementation
//!
//! Widgets paint through `Surface`. `Bitmap` is a software surface backed by
//! an `image::RgbaImage`; it is what the window backends present and what
//! fade snapshots are captured into.

use image::{Rgba, RgbaImage};

use crate::theme::types::{Color, Point, Rect, Size};
use crate::theme::FontMetrics;

/// Something widgets can paint onto
pub trait Surface {
    /// Size of the drawable area
    fn size(&self) -> Size;

    /// Fill a rectangle (alpha blended)
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline a rectangle with a border of `thickness` pixels, drawn inside
    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: i32);

    /// Draw one line of text with its top-left corner at `at`
    fn draw_text(&mut self, text: &str, at: Point, color: Color, font: &FontMetrics);

    /// Composite `source` (a region of `bitmap`) at `at` with an extra opacity
    fn draw_bitmap(&mut self, bitmap: &Bitmap, source: Rect, at: Point, opacity: f32);
}

/// Software RGBA surface
#[derive(Clone, Debug)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    /// Create a transparent bitmap. Zero dimensions are bumped to 1.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            image: RgbaImage::new(width.max(1) as u32, height.max(1) as u32),
        }
    }

    pub fn width(&self) -> i32 {
        self.image.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.image.height() as i32
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }

    /// Fill the whole bitmap, replacing existing pixels
    pub fn clear(&mut self, color: Color) {
        let pixel = Rgba(color.to_rgba8());
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
    }

    /// Read one pixel; `None` outside the bitmap
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.image.get_pixel(x as u32, y as u32).0)
    }

    /// Resize, keeping the top-left content
    pub fn resize(&mut self, width: i32, height: i32) {
        if width.max(1) == self.width() && height.max(1) == self.height() {
            return;
        }
        let mut next = Bitmap::new(width, height);
        let bounds = self.bounds();
        next.draw_bitmap(self, bounds, Point::new(0, 0), 1.0);
        *self = next;
    }

    /// Pixels as top-down BGRA rows, the layout GDI expects for 32bpp DIBs
    pub fn to_bgra(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.image.as_raw().len());
        for p in self.image.pixels() {
            let [r, g, b, a] = p.0;
            out.extend_from_slice(&[b, g, r, a]);
        }
        out
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    fn blend(&mut self, x: i32, y: i32, src: [u8; 4], opacity: f32) {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return;
        }
        let alpha = src[3] as f32 / 255.0 * opacity.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
        let out_alpha = alpha + dst.0[3] as f32 / 255.0 * (1.0 - alpha);
        *dst = Rgba([
            mix(src[0], dst.0[0]),
            mix(src[1], dst.0[1]),
            mix(src[2], dst.0[2]),
            (out_alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]);
    }
}

impl Surface for Bitmap {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let area = rect.intersect(&self.bounds());
        if area.is_empty() {
            return;
        }
        let rgba = color.to_rgba8();
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.blend(x, y, rgba, 1.0);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: i32) {
        if thickness <= 0 || rect.is_empty() {
            return;
        }
        let t = thickness.min(rect.width).min(rect.height);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, t), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - t, rect.width, t), color);
        let inner = rect.height - 2 * t;
        if inner > 0 {
            self.fill_rect(Rect::new(rect.x, rect.y + t, t, inner), color);
            self.fill_rect(Rect::new(rect.right() - t, rect.y + t, t, inner), color);
        }
    }

    fn draw_text(&mut self, text: &str, at: Point, color: Color, font: &FontMetrics) {
        // Greeked glyphs: one block per visible character, x-height tall
        let glyph_height = (font.line_height * 3 / 5).max(1);
        let glyph_top = at.y + font.line_height - glyph_height - 2;
        let glyph_width = (font.char_width - 1).max(1);

        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let x = at.x + i as i32 * font.char_width;
            self.fill_rect(Rect::new(x, glyph_top, glyph_width, glyph_height), color);
        }
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, source: Rect, at: Point, opacity: f32) {
        let source = source.intersect(&bitmap.bounds());
        if source.is_empty() || opacity <= 0.0 {
            return;
        }
        for sy in source.y..source.bottom() {
            for sx in source.x..source.right() {
                let src = bitmap.image.get_pixel(sx as u32, sy as u32).0;
                self.blend(at.x + sx - source.x, at.y + sy - source.y, src, opacity);
            }
        }
    }
}
