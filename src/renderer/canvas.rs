use super::{Color, Font, Surface, WHITE};
use crate::core::EngineError;
use crate::math::Vec2;
use crate::ui::{BitmapFont, GLYPH_SIZE};
use image::RgbaImage;
use std::path::Path;

/// CPU-side [`Surface`] backed by an RGBA image.
///
/// Primitives with non-finite coordinates are dropped; lines are clipped to
/// the image before rasterising, so far off-screen geometry costs nothing.
pub struct Canvas {
    image: RgbaImage,
    background: Color,
}

impl Canvas {
    /// Creates a canvas cleared to opaque white.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, WHITE)
    }

    #[must_use]
    pub fn with_background(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background),
            background,
        }
    }

    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).copied()
    }

    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::from_pixel(width, height, self.background);
    }

    /// Writes the current contents to `path`; the format follows the file
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be encoded or written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        self.image.save(path.as_ref())?;
        log::info!("Saved frame to {}", path.as_ref().display());
        Ok(())
    }

    /// Packs the pixels as `0x00RRGGBB` words in row order, the layout
    /// window framebuffers expect. Copies at most `out.len()` pixels.
    pub fn copy_to_xrgb(&self, out: &mut [u32]) {
        for (dst, pixel) in out.iter_mut().zip(self.image.pixels()) {
            let [r, g, b, _] = pixel.0;
            *dst = (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b);
        }
    }

    fn put_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, color);
        }
    }

    fn fill_block(&mut self, x: i64, y: i64, width: i64, height: i64, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width).min(i64::from(self.image.width()));
        let y1 = (y + height).min(i64::from(self.image.height()));
        for py in y0..y1 {
            for px in x0..x1 {
                self.put_pixel(px, py, color);
            }
        }
    }

    fn bounds(&self, margin: f32) -> (Vec2, Vec2) {
        (
            Vec2::new(-margin, -margin),
            Vec2::new(
                self.image.width() as f32 + margin,
                self.image.height() as f32 + margin,
            ),
        )
    }
}

impl Surface for Canvas {
    fn width(&self) -> f32 {
        self.image.width() as f32
    }

    fn height(&self) -> f32 {
        self.image.height() as f32
    }

    fn clear(&mut self) {
        let background = self.background;
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32) {
        if !from.is_finite() || !to.is_finite() {
            return;
        }
        let (min, max) = self.bounds(line_width.max(1.0));
        let Some((a, b)) = clip_segment(from, to, min, max) else {
            return;
        };

        let brush = if line_width.is_finite() {
            line_width.round().max(1.0) as i64
        } else {
            1
        };
        let offset = -(brush / 2);

        let (mut x0, mut y0) = (a.x.round() as i64, a.y.round() as i64);
        let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.fill_block(x0 + offset, y0 + offset, brush, brush, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        if !origin.is_finite() || !size.is_finite() {
            return;
        }
        let (mut x, mut w) = (origin.x, size.x);
        let (mut y, mut h) = (origin.y, size.y);
        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }
        // Rects entirely off-canvas are skipped before the float -> int cast.
        let (min, max) = self.bounds(0.0);
        if x > max.x || y > max.y || x + w < min.x || y + h < min.y {
            return;
        }
        let x0 = x.max(min.x).round() as i64;
        let y0 = y.max(min.y).round() as i64;
        let x1 = (x + w).min(max.x).round() as i64;
        let y1 = (y + h).min(max.y).round() as i64;
        self.fill_block(x0, y0, x1 - x0, y1 - y0, color);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn fill_text(&mut self, text: &str, origin: Vec2, font: &Font, color: Color) {
        if !origin.is_finite() {
            return;
        }
        let scale = (font.size / GLYPH_SIZE as f32).round().clamp(1.0, 64.0) as i64;
        let (min, max) = self.bounds(0.0);
        if origin.x > max.x || origin.y < min.y || origin.y > max.y + (GLYPH_SIZE * 64) as f32 {
            return;
        }
        let glyph = i64::from(GLYPH_SIZE);
        let top = origin.y.round() as i64 - glyph * scale;
        let mut left = origin.x.round().max(-1.0e9) as i64;

        for ch in text.chars() {
            if let Some(bitmap) = BitmapFont::glyph(ch) {
                for row in 0..GLYPH_SIZE {
                    for col in 0..GLYPH_SIZE {
                        if BitmapFont::is_set(bitmap, col, row) {
                            self.fill_block(
                                left + i64::from(col) * scale,
                                top + i64::from(row) * scale,
                                scale,
                                scale,
                                color,
                            );
                        }
                    }
                }
            }
            left += glyph * scale;
        }
    }
}

/// Liang-Barsky clip of segment `a`-`b` against the rectangle `min`..`max`.
/// Runs in `f64` so that far off-screen endpoints keep pixel precision.
#[allow(clippy::cast_possible_truncation)]
fn clip_segment(a: Vec2, b: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let dx = f64::from(b.x) - ax;
    let dy = f64::from(b.y) - ay;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, ax - f64::from(min.x)),
        (dx, f64::from(max.x) - ax),
        (-dy, ay - f64::from(min.y)),
        (dy, f64::from(max.y) - ay),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        Vec2::new((ax + t0 * dx) as f32, (ay + t0 * dy) as f32),
        Vec2::new((ax + t1 * dx) as f32, (ay + t1 * dy) as f32),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::BLACK;
    use image::Rgba;

    const RED: Color = Rgba([255, 0, 0, 255]);

    fn count(canvas: &Canvas, color: Color) -> usize {
        canvas.image().pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn test_horizontal_line() {
        let mut canvas = Canvas::new(20, 10);
        canvas.stroke_line(Vec2::new(2.0, 5.0), Vec2::new(12.0, 5.0), BLACK, 1.0);
        assert_eq!(count(&canvas, BLACK), 11);
        assert_eq!(canvas.pixel(2, 5), Some(BLACK));
        assert_eq!(canvas.pixel(12, 5), Some(BLACK));
        assert_eq!(canvas.pixel(13, 5), Some(WHITE));
    }

    #[test]
    fn test_wide_line_is_thicker() {
        let mut thin = Canvas::new(20, 20);
        let mut wide = Canvas::new(20, 20);
        thin.stroke_line(Vec2::new(2.0, 2.0), Vec2::new(15.0, 15.0), BLACK, 1.0);
        wide.stroke_line(Vec2::new(2.0, 2.0), Vec2::new(15.0, 15.0), BLACK, 2.0);
        assert!(count(&wide, BLACK) > count(&thin, BLACK));
    }

    #[test]
    fn test_non_finite_line_is_dropped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.stroke_line(Vec2::new(f32::NAN, 0.0), Vec2::new(5.0, 5.0), BLACK, 2.0);
        canvas.stroke_line(Vec2::new(0.0, 0.0), Vec2::new(f32::INFINITY, 5.0), BLACK, 2.0);
        assert_eq!(count(&canvas, BLACK), 0);
    }

    #[test]
    fn test_far_off_canvas_line_is_clipped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.stroke_line(Vec2::new(-1.0e7, 5.0), Vec2::new(1.0e7, 5.0), BLACK, 1.0);
        assert_eq!(count(&canvas, BLACK), 10);
        canvas.clear();
        canvas.stroke_line(Vec2::new(-1.0e7, -50.0), Vec2::new(1.0e7, -50.0), BLACK, 1.0);
        assert_eq!(count(&canvas, BLACK), 0);
    }

    #[test]
    fn test_fill_rect_and_clear() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_rect(Vec2::new(3.0, 4.0), Vec2::new(2.0, 2.0), RED);
        assert_eq!(count(&canvas, RED), 4);
        assert_eq!(canvas.pixel(3, 4), Some(RED));
        assert_eq!(canvas.pixel(4, 5), Some(RED));

        canvas.fill_rect(Vec2::new(9.0, 9.0), Vec2::new(5.0, 5.0), RED);
        assert_eq!(count(&canvas, RED), 5);

        canvas.clear();
        assert_eq!(count(&canvas, RED), 0);
        assert_eq!(count(&canvas, WHITE), 100);
    }

    #[test]
    fn test_fill_text_draws_above_baseline() {
        let mut canvas = Canvas::new(64, 32);
        let font = Font {
            size: 8.0,
            family: "Arial".to_string(),
        };
        canvas.fill_text("T", Vec2::new(0.0, 8.0), &font, BLACK);
        // Top row of 'T' covers columns 1..=6 of row 0.
        assert_eq!(canvas.pixel(1, 0), Some(BLACK));
        assert_eq!(canvas.pixel(0, 0), Some(WHITE));
        assert!((0..64).all(|x| canvas.pixel(x, 8) == Some(WHITE)));
    }

    #[test]
    fn test_fill_text_scales_with_font_size() {
        let mut small = Canvas::new(64, 32);
        let mut large = Canvas::new(64, 32);
        small.fill_text("HI", Vec2::new(0.0, 16.0), &Font { size: 8.0, ..Font::default() }, BLACK);
        large.fill_text("HI", Vec2::new(0.0, 16.0), &Font::default(), BLACK);
        assert_eq!(count(&large, BLACK), count(&small, BLACK) * 4);
    }

    #[test]
    fn test_copy_to_xrgb_packs_rows_in_order() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill_rect(Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), RED);
        let mut buffer = [0u32; 4];
        canvas.copy_to_xrgb(&mut buffer);
        assert_eq!(buffer, [0x00ff_ffff, 0x00ff_0000, 0x00ff_ffff, 0x00ff_ffff]);

        let mut short = [0u32; 1];
        canvas.copy_to_xrgb(&mut short);
        assert_eq!(short, [0x00ff_ffff]);
    }

    #[test]
    fn test_clip_segment_inside_is_unchanged() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(4.0, 3.0);
        let clipped = clip_segment(a, b, Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert_eq!(clipped, Some((a, b)));
    }
}
