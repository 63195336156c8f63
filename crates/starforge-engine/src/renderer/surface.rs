//! Pixel sink used by every shading pass.
//!
//! The engine only needs per-pixel writes and reads. Anything that can store
//! a color per pixel (a canvas buffer, a terminal grid, a test framebuffer)
//! implements [`RenderSurface`]; blending and primitive rasterization are
//! provided on top.

use crate::components::{Color, Rgba8};

pub trait RenderSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Write one pixel. Out-of-bounds writes are ignored.
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Read one pixel. Out-of-bounds reads return black.
    fn get_pixel(&self, x: i32, y: i32) -> Color;

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Alpha-blend `color` over the existing pixel.
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if !self.in_bounds(x, y) || alpha <= 0.0 {
            return;
        }
        let a = alpha.min(1.0);
        let dst = self.get_pixel(x, y);
        self.set_pixel(x, y, dst.lerp(color, a));
    }

    /// Additive blend, for glows.
    fn add_pixel(&mut self, x: i32, y: i32, color: Color) {
        if !self.in_bounds(x, y) {
            return;
        }
        let dst = self.get_pixel(x, y);
        self.set_pixel(x, y, dst.add(color).clamped());
    }

    fn clear(&mut self, color: Color) {
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                self.set_pixel(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let r = radius.max(0);
        let r2 = r * r + r;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r2 {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenham line, endpoints inclusive. Segments are clipped to the
    /// surface first, so off-screen endpoints cost nothing.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let Some((x0, y0, x1, y1)) = clip_segment(x0, y0, x1, y1, self.width(), self.height()) else {
            return;
        };
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        let max_steps = (dx - dy) as i64 + 1;
        for _ in 0..max_steps.min(1 << 16) {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

/// Liang-Barsky clip of a segment to `[0, w-1] x [0, h-1]`. Returns `None`
/// when nothing of the segment is visible.
fn clip_segment(x0: i32, y0: i32, x1: i32, y1: i32, w: u32, h: u32) -> Option<(i32, i32, i32, i32)> {
    if w == 0 || h == 0 {
        return None;
    }
    let (max_x, max_y) = (w as i32 - 1, h as i32 - 1);
    let inside = |x: i32, y: i32| (0..=max_x).contains(&x) && (0..=max_y).contains(&y);
    if inside(x0, y0) && inside(x1, y1) {
        return Some((x0, y0, x1, y1));
    }

    let (fx0, fy0) = (x0 as f64, y0 as f64);
    let (dx, dy) = (x1 as f64 - fx0, y1 as f64 - fy0);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let edges = [
        (-dx, fx0),
        (dx, max_x as f64 - fx0),
        (-dy, fy0),
        (dy, max_y as f64 - fy0),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    let at = |t: f64| {
        let x = (fx0 + dx * t).round().clamp(0.0, max_x as f64) as i32;
        let y = (fy0 + dy * t).round().clamp(0.0, max_y as f64) as i32;
        (x, y)
    };
    let (ax, ay) = at(t0);
    let (bx, by) = at(t1);
    Some((ax, ay, bx, by))
}

/// Owned RGBA8 framebuffer, row-major.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            pixels: vec![Color::BLACK.to_rgba8(); (width * height) as usize],
        }
    }

    /// Reallocate for a new size; contents are cleared to black.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Raw RGBA bytes, ready for a canvas `ImageData`.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl RenderSurface for Framebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.to_rgba8();
        }
    }

    fn get_pixel(&self, x: i32, y: i32) -> Color {
        self.index(x, y)
            .map(|i| Color::from_rgba8(self.pixels[i]))
            .unwrap_or(Color::BLACK)
    }
}
