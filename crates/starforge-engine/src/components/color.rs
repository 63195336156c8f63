//! Color values for shading and surfaces.
//!
//! One linear-ish RGB float type is used everywhere in the pipeline.
//! Conversions to and from 8-bit and 256-color indexed forms are explicit.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// RGB color with components nominally in [0, 1]. Values may exceed 1.0
/// mid-pipeline (additive glows); they are saturated on output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Packed 8-bit RGBA pixel, layout-compatible with canvas `ImageData`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// The six intensity steps of the xterm 6×6×6 color cube.
const CUBE_STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// The 16 base ANSI colors (xterm defaults).
const BASE16: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (205, 0, 0),
    (0, 205, 0),
    (205, 205, 0),
    (0, 0, 238),
    (205, 0, 205),
    (0, 205, 205),
    (229, 229, 229),
    (127, 127, 127),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (92, 92, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From 8-bit channels.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Saturate and quantize to 8-bit channels.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        (to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }

    pub fn to_rgba8(self) -> Rgba8 {
        let (r, g, b) = self.to_rgb();
        Rgba8 { r, g, b, a: 255 }
    }

    pub fn from_rgba8(px: Rgba8) -> Self {
        Self::from_rgb(px.r, px.g, px.b)
    }

    /// Expand a 256-color palette index (xterm layout) to RGB.
    pub fn from_indexed(index: u8) -> Self {
        match index {
            0..=15 => {
                let (r, g, b) = BASE16[index as usize];
                Self::from_rgb(r, g, b)
            }
            16..=231 => {
                let i = index - 16;
                let r = CUBE_STEPS[(i / 36) as usize];
                let g = CUBE_STEPS[((i / 6) % 6) as usize];
                let b = CUBE_STEPS[(i % 6) as usize];
                Self::from_rgb(r, g, b)
            }
            232..=255 => {
                let level = 8 + (index - 232) * 10;
                Self::from_rgb(level, level, level)
            }
        }
    }

    /// Nearest 256-color palette index, choosing between the color cube and
    /// the grayscale ramp.
    pub fn to_indexed(self) -> u8 {
        let (r, g, b) = self.to_rgb();
        let ri = nearest_cube_step(r);
        let gi = nearest_cube_step(g);
        let bi = nearest_cube_step(b);
        let cube_index = 16 + 36 * ri + 6 * gi + bi;
        let cube = (CUBE_STEPS[ri as usize], CUBE_STEPS[gi as usize], CUBE_STEPS[bi as usize]);

        let avg = (r as u32 + g as u32 + b as u32) / 3;
        let gray_step = if avg < 8 { 0 } else { ((avg - 8) / 10).min(23) as u8 };
        let gray_level = 8 + gray_step * 10;
        let gray_index = 232 + gray_step;

        let d_cube = dist2((r, g, b), cube);
        let d_gray = dist2((r, g, b), (gray_level, gray_level, gray_level));
        if d_gray < d_cube {
            gray_index
        } else {
            cube_index
        }
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn scale(self, k: f32) -> Self {
        Self {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
        }
    }

    pub fn add(self, other: Self) -> Self {
        Self {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }

    pub fn mul(self, other: Self) -> Self {
        Self {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Perceptual luminance (Rec. 709 weights).
    pub fn luminance(self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

fn to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn nearest_cube_step(v: u8) -> u8 {
    let mut best = 0;
    let mut best_d = u16::MAX;
    for (i, step) in CUBE_STEPS.iter().enumerate() {
        let d = (*step as i16 - v as i16).unsigned_abs();
        if d < best_d {
            best_d = d;
            best = i as u8;
        }
    }
    best
}

fn dist2(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    (dr * dr + dg * dg + db * db) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_round_trip_is_exact_for_bytes() {
        let c = Color::from_rgb(12, 200, 255);
        assert_eq!(c.to_rgb(), (12, 200, 255));
    }

    #[test]
    fn to_rgb_saturates() {
        assert_eq!(Color::new(2.0, -1.0, f32::NAN).to_rgb(), (255, 0, 0));
    }

    #[test]
    fn indexed_cube_colors_map_back_to_themselves() {
        for index in 16u8..=231 {
            assert_eq!(Color::from_indexed(index).to_indexed(), index, "index {index}");
        }
    }

    #[test]
    fn indexed_gray_ramp() {
        let g = Color::from_indexed(244);
        let (r, gg, b) = g.to_rgb();
        assert_eq!(r, gg);
        assert_eq!(gg, b);
        assert_eq!(Color::from_rgb(128, 128, 128).to_indexed(), 244);
    }

    #[test]
    fn base16_expands() {
        assert_eq!(Color::from_indexed(0).to_rgb(), (0, 0, 0));
        assert_eq!(Color::from_indexed(15).to_rgb(), (255, 255, 255));
    }

    #[test]
    fn rgba8_is_four_bytes() {
        assert_eq!(std::mem::size_of::<Rgba8>(), 4);
        let px = Color::WHITE.to_rgba8();
        assert_eq!(bytemuck::bytes_of(&px), &[255, 255, 255, 255]);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Color::new(0.0, 0.2, 0.4);
        let b = Color::new(1.0, 0.6, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }
}
