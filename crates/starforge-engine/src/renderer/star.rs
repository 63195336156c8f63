//! Star discs, coronas and black holes.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::style::RenderStyle;
use super::surface::RenderSurface;
use super::texture::SurfaceTexture;
use crate::components::Color;
use crate::core::hash::fbm_wrapped;
use crate::extensions::easing::smoothstep;

/// Photon ring thickness as a fraction of the shadow radius.
const PHOTON_RING_WIDTH: f32 = 0.12;
/// Accretion disk inner edge in shadow radii.
const DISK_INNER: f32 = 1.6;
/// Exponent of the Doppler beaming term.
const BEAMING_POWER: i32 = 3;

#[derive(Debug, Clone, Copy)]
pub struct StarShade<'a> {
    pub center: Vec2,
    pub radius: f32,
    pub corona_radius: f32,
    pub color: Color,
    pub texture: &'a SurfaceTexture,
}

/// Limb-darkened disc sampled from the animated surface, plus an additive
/// corona.
pub fn shade_star<S: RenderSurface + ?Sized>(surface: &mut S, style: &RenderStyle, star: &StarShade<'_>) {
    let r = star.radius.max(0.5);
    let corona = star.corona_radius.max(r + 1.0);
    let extent = corona.ceil() as i32 + 1;
    let cx = star.center.x.floor() as i32;
    let cy = star.center.y.floor() as i32;
    let (w, h) = (surface.width() as i32, surface.height() as i32);

    for y in (cy - extent).max(0)..=(cy + extent).min(h - 1) {
        for x in (cx - extent).max(0)..=(cx + extent).min(w - 1) {
            let dx = x as f32 + 0.5 - star.center.x;
            let dy = y as f32 + 0.5 - star.center.y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= r {
                let nx = dx / r;
                let ny = -dy / r;
                let nz = (1.0 - nx * nx - ny * ny).max(0.0).sqrt();
                let u = nx.atan2(nz) / TAU + 0.5;
                let v = 0.5 - ny.clamp(-1.0, 1.0).asin() / PI;
                let limb = 0.45 + 0.55 * nz.powf(0.6);
                let c = star.texture.sample(u, v).scale(limb);
                surface.set_pixel(x, y, style.output(c));
            } else if dist < corona {
                let t = 1.0 - (dist - r) / (corona - r);
                let glow = t * t * 0.55;
                surface.add_pixel(x, y, style.output(star.color.scale(glow)));
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BlackHoleShade {
    pub center: Vec2,
    /// Shadow radius in pixels.
    pub radius: f32,
    /// Outer edge of the accretion disk in pixels.
    pub disk_radius: f32,
    /// Camera squash; flattens the disk.
    pub squash: f32,
    pub time: f64,
    pub seed: u32,
    pub color: Color,
}

/// Disk emission at a screen offset (y down). Zero outside the disk.
fn disk_emission(bh: &BlackHoleShade, dx: f32, dy: f32) -> (Color, f32) {
    let r = bh.radius.max(0.5);
    let flatten = (bh.squash * 0.45).clamp(0.12, 0.9);
    let ex = dx / r;
    let ey = dy / (r * flatten);
    let rd = (ex * ex + ey * ey).sqrt();
    let outer = (bh.disk_radius / r).max(DISK_INNER + 0.5);
    if rd < DISK_INNER || rd > outer {
        return (Color::BLACK, 0.0);
    }
    let norm = (rd - DISK_INNER) / (outer - DISK_INNER);
    let phi = ey.atan2(ex);

    // Inner disk spins faster.
    let rate = 0.35 / (rd / DISK_INNER).powf(1.5);
    let turn = (phi / TAU + (bh.time as f32 * rate)).rem_euclid(1.0);
    let streaks = fbm_wrapped(bh.seed, turn * 32.0, norm * 6.0, 32);

    // Approaching side (left of center) brightens.
    let beam = ((1.0 - phi.cos()) * 0.5).powi(BEAMING_POWER);
    let doppler = 0.3 + 1.6 * beam;

    let hot = Color::new(1.0, 0.95, 0.85);
    let cool = bh.color.lerp(Color::new(0.9, 0.3, 0.1), 0.5);
    let temp = hot.lerp(cool, norm);
    let edge = smoothstep(0.0, 0.08, norm) * (1.0 - smoothstep(0.75, 1.0, norm));
    let intensity = edge * (0.4 + 0.6 * streaks) * doppler * (1.0 - norm).powf(1.2);
    (temp, intensity.clamp(0.0, 1.5))
}

/// Shadow disc, beamed photon ring, and a tilted accretion disk whose back
/// half sits behind the shadow and front half over it.
pub fn shade_black_hole<S: RenderSurface + ?Sized>(surface: &mut S, style: &RenderStyle, bh: &BlackHoleShade) {
    let r = bh.radius.max(0.5);
    let extent = bh.disk_radius.max(r * 2.0).ceil() as i32 + 1;
    let cx = bh.center.x.floor() as i32;
    let cy = bh.center.y.floor() as i32;
    let (w, h) = (surface.width() as i32, surface.height() as i32);
    let y_range = (cy - extent).max(0)..=(cy + extent).min(h - 1);
    let x_range = (cx - extent).max(0)..=(cx + extent).min(w - 1);

    // Back half of the disk (screen-up of center).
    for y in y_range.clone() {
        for x in x_range.clone() {
            let dx = x as f32 + 0.5 - bh.center.x;
            let dy = y as f32 + 0.5 - bh.center.y;
            if dy >= 0.0 {
                continue;
            }
            let (c, k) = disk_emission(bh, dx, dy);
            if k > 0.0 {
                surface.add_pixel(x, y, style.output(c.scale(k)));
            }
        }
    }

    // Shadow and photon ring.
    let ring_outer = r * (1.0 + PHOTON_RING_WIDTH);
    for y in y_range.clone() {
        for x in x_range.clone() {
            let dx = x as f32 + 0.5 - bh.center.x;
            let dy = y as f32 + 0.5 - bh.center.y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= r {
                surface.set_pixel(x, y, Color::BLACK);
            } else if dist <= ring_outer + 1.0 {
                let t = 1.0 - ((dist - r) / (ring_outer + 1.0 - r)).clamp(0.0, 1.0);
                let phi = (-dy).atan2(dx);
                let beam = 0.5 + 0.5 * ((1.0 - phi.cos()) * 0.5).powi(BEAMING_POWER) * 2.0;
                let c = Color::new(1.0, 0.9, 0.75).scale(t * beam);
                surface.add_pixel(x, y, style.output(c));
            }
        }
    }

    // Front half over the shadow.
    for y in y_range.clone() {
        for x in x_range.clone() {
            let dx = x as f32 + 0.5 - bh.center.x;
            let dy = y as f32 + 0.5 - bh.center.y;
            if dy < 0.0 {
                continue;
            }
            let (c, k) = disk_emission(bh, dx, dy);
            if k > 0.0 {
                surface.add_pixel(x, y, style.output(c.scale(k)));
            }
        }
    }
}
