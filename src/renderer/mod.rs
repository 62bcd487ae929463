//! 2D immediate-mode drawing surface and a software implementation of it.

mod canvas;

pub use canvas::Canvas;

use crate::math::Vec2;
use image::Rgba;

pub type Color = Rgba<u8>;

pub const BLACK: Color = Rgba([0, 0, 0, 255]);
pub const WHITE: Color = Rgba([255, 255, 255, 255]);

/// Font request for [`Surface::fill_text`]. The family is advisory; surfaces
/// without font support may ignore it.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub size: f32,
    pub family: String,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            size: 16.0,
            family: "Arial".to_string(),
        }
    }
}

/// The primitives the engine draws with. Coordinates are in pixels with the
/// origin at the top-left corner.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn clear(&mut self);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);
    /// `origin.y` is the text baseline.
    fn fill_text(&mut self, text: &str, origin: Vec2, font: &Font, color: Color);
}

/// Parses a small set of CSS-style colour names and `#rrggbb` / `#rgb` hex.
#[must_use]
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    let rgb = match value.to_ascii_lowercase().as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "lime" => [0, 255, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "orange" => [255, 165, 0],
        "gray" | "grey" => [128, 128, 128],
        "cyan" => [0, 255, 255],
        "magenta" => [255, 0, 255],
        _ => return None,
    };
    Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ])),
        3 => {
            let mut out = [0u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            out[3] = 255;
            Some(Rgba(out))
        }
        _ => None,
    }
}
