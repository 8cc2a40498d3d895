// SPDX-License-Identifier: MIT OR Apache-2.0
//! Small geometry and color value types shared by layout and export.

use serde::{Deserialize, Serialize};
use std::ops::Add;

/// 2D vector / point in graph space (y grows upward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component
    pub x: f32,
    /// Vertical component
    pub y: f32,
}

impl Vec2 {
    /// The origin
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Extend to 3D with `z = 0`
    pub fn extend(self) -> Vec3 {
        Vec3::new(self.x, self.y, 0.0)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// 3D vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Unit scale
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };

    /// Create a new vector
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// RGBA color with channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Create a color from float channels
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channels
    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::rgba(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0, 1.0)
    }

    /// Channels rounded to 4 decimal places, the precision the wire format carries
    pub fn rounded(self) -> Self {
        Self::rgba(round4(self.r), round4(self.g), round4(self.b), round4(self.a))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

/// Sample `segments + 1` points along a cubic bezier curve
pub fn bezier_points(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(1);
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x;
        let y = mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y;

        points.push(Vec2::new(x, y));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_rounding() {
        let color = Color::from_rgb8([80, 200, 80]).rounded();
        assert_eq!(color.r, 0.3137);
        assert_eq!(color.g, 0.7843);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_bezier_endpoints() {
        let from = Vec2::new(0.0, 0.0);
        let to = Vec2::new(100.0, -40.0);
        let points = bezier_points(from, Vec2::new(50.0, 0.0), Vec2::new(50.0, -40.0), to, 16);
        assert_eq!(points.len(), 17);
        assert_eq!(points[0], from);
        assert_eq!(points[16], to);
    }

    #[test]
    fn test_bezier_zero_segments_still_spans() {
        let points = bezier_points(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, Vec2::new(1.0, 1.0), 0);
        assert_eq!(points.len(), 2);
    }
}
