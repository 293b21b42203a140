//! Core theme types: Color, Point, Size, Rect, Padding

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid hex color: {0}")]
    InvalidHexColor(String),
}

/// RGBA color (0.0-1.0 range)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Create color from RGB values (0-255)
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create color from RGBA values (0-255)
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Parse hex color string (#RGB, #RGBA, #RRGGBB, #RRGGBBAA)
    pub fn from_hex(hex: &str) -> Result<Self, ParseError> {
        let digits = hex.trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(ParseError::InvalidHexColor(hex.to_string()));
        }

        match digits.len() {
            3 | 4 => {
                let mut channels = [255u8; 4];
                for (i, c) in digits.chars().enumerate() {
                    channels[i] = parse_hex_digit(c)? * 17;
                }
                Ok(Self::rgba(channels[0], channels[1], channels[2], channels[3]))
            }
            6 | 8 => {
                let mut channels = [255u8; 4];
                for i in 0..digits.len() / 2 {
                    channels[i] = parse_hex_byte(&digits[i * 2..i * 2 + 2])?;
                }
                Ok(Self::rgba(channels[0], channels[1], channels[2], channels[3]))
            }
            _ => Err(ParseError::InvalidHexColor(hex.to_string())),
        }
    }

    /// Format as #RRGGBBAA
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }

    /// Convert to 8-bit channels
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Same color with its alpha scaled by `opacity`
    pub fn with_opacity(&self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..*self
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

fn parse_hex_digit(c: char) -> Result<u8, ParseError> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| ParseError::InvalidHexColor(c.to_string()))
}

fn parse_hex_byte(s: &str) -> Result<u8, ParseError> {
    u8::from_str_radix(s, 16).map_err(|_| ParseError::InvalidHexColor(s.to_string()))
}

/// A point in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A size in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0,
        height: 0,
    };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Rectangle for layout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized rect at origin
    pub const fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check whether a point lies inside (right/bottom edges exclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Shrink rect by padding amounts
    pub fn inset(&self, padding: &Padding) -> Self {
        Self {
            x: self.x + padding.left,
            y: self.y + padding.top,
            width: (self.width - padding.horizontal()).max(0),
            height: (self.height - padding.vertical()).max(0),
        }
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Overlapping area of two rects (empty if disjoint)
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            Rect::new(x, y, 0, 0)
        } else {
            Rect::new(x, y, right - x, bottom - y)
        }
    }

    /// Mirror horizontally inside a container of the given width
    pub fn mirror(&self, container_width: i32) -> Self {
        Self::new(
            container_width - self.right(),
            self.y,
            self.width,
            self.height,
        )
    }
}

/// Four-sided padding, border or margin in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Padding {
    pub const ZERO: Padding = Padding {
        top: 0,
        right: 0,
        bottom: 0,
        left: 0,
    };

    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create uniform padding on all sides
    pub const fn uniform(d: i32) -> Self {
        Self::new(d, d, d, d)
    }

    /// Create from vertical and horizontal values
    pub const fn symmetric(vertical: i32, horizontal: i32) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// Swap left and right (right-to-left layouts)
    pub fn mirrored(&self) -> Self {
        Self::new(self.top, self.left, self.bottom, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_parsing() {
        // 3-digit
        let c = Color::from_hex("#fff").unwrap();
        assert_eq!(c, Color::WHITE);

        // 6-digit
        let c = Color::from_hex("#ff0000").unwrap();
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert_eq!(c.b, 0.0);

        // 8-digit with alpha
        let c = Color::from_hex("#ff000080").unwrap();
        assert!((c.a - 0.5).abs() < 0.01);

        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
    }

    #[test]
    fn test_color_hex_roundtrip_through_serde() {
        let c = Color::rgb(0x3a, 0x6e, 0xa5);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#3a6ea5ff\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_rgba8(), c.to_rgba8());
    }

    #[test]
    fn test_rect_contains_excludes_far_edges() {
        let r = Rect::new(10, 10, 20, 5);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(29, 14)));
        assert!(!r.contains(Point::new(30, 14)));
        assert!(!r.contains(Point::new(29, 15)));
    }

    #[test]
    fn test_rect_inset_and_mirror() {
        let r = Rect::new(0, 0, 100, 50).inset(&Padding::new(5, 10, 5, 20));
        assert_eq!(r, Rect::new(20, 5, 70, 40));

        let icon = Rect::new(4, 0, 16, 16);
        assert_eq!(icon.mirror(100), Rect::new(80, 0, 16, 16));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0, 0, 50, 50);
        let b = Rect::new(25, 40, 50, 50);
        assert_eq!(a.intersect(&b), Rect::new(25, 40, 25, 10));
        assert!(a.intersect(&Rect::new(60, 60, 5, 5)).is_empty());
    }
}
