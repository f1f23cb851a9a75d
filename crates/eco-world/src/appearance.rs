//! Drawing hints handed to renderers.
//!
//! Nothing here touches simulation state; a renderer reads these alongside
//! a [`crate::WorldSnapshot`] and decides how to paint them.

use eco_core::TerrainKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const ORANGE: Rgb = Rgb::new(255, 200, 0);
    pub const PINK: Rgb = Rgb::new(255, 175, 175);
    pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend toward `other`; `p` is clamped to `[0, 1]`
    pub fn blend(self, other: Rgb, p: f32) -> Rgb {
        let p = p.clamp(0.0, 1.0);
        let inv = 1.0 - p;
        let channel = |a: u8, b: u8| (inv * a as f32 + p * b as f32) as u8;
        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    /// Two-leg blend: `start` to `mid` over the first half of `p`, then
    /// `mid` to `end`.
    pub fn blend3(start: Rgb, mid: Rgb, end: Rgb, p: f32) -> Rgb {
        if p > 0.5 {
            mid.blend(end, 2.0 * p - 1.0)
        } else {
            start.blend(mid, 2.0 * p)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// Fills the cell
    Round,
    /// Full cell width, half height
    Wide,
    /// Half cell width, full height
    Tall,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub color: Rgb,
    pub shape: Shape,
    /// Centered overlay color and its size as a fraction of the cell
    pub accent: Option<(Rgb, f32)>,
}

pub fn terrain_color(kind: TerrainKind) -> Rgb {
    match kind {
        TerrainKind::Water => Rgb::CYAN,
        TerrainKind::Ground => Rgb::WHITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(Rgb::WHITE.blend(Rgb::GREEN, 0.0), Rgb::WHITE);
        assert_eq!(Rgb::WHITE.blend(Rgb::GREEN, 1.0), Rgb::GREEN);
        assert_eq!(Rgb::BLACK.blend(Rgb::WHITE, 0.5), Rgb::new(127, 127, 127));
    }

    #[test]
    fn test_blend_clamps() {
        assert_eq!(Rgb::RED.blend(Rgb::GREEN, 3.0), Rgb::GREEN);
        assert_eq!(Rgb::RED.blend(Rgb::GREEN, -1.0), Rgb::RED);
    }

    #[test]
    fn test_blend3_passes_through_mid() {
        assert_eq!(Rgb::blend3(Rgb::GREEN, Rgb::YELLOW, Rgb::RED, 0.0), Rgb::GREEN);
        assert_eq!(Rgb::blend3(Rgb::GREEN, Rgb::YELLOW, Rgb::RED, 0.5), Rgb::YELLOW);
        assert_eq!(Rgb::blend3(Rgb::GREEN, Rgb::YELLOW, Rgb::RED, 1.0), Rgb::RED);
    }

    #[test]
    fn test_terrain_colors() {
        assert_eq!(terrain_color(TerrainKind::Water), Rgb::CYAN);
        assert_eq!(terrain_color(TerrainKind::Ground), Rgb::WHITE);
    }
}
