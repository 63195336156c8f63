//! Per-pixel sphere shading for planets and moons.

use std::f32::consts::{PI, TAU};

use glam::{DVec2, Vec2, Vec3};

use super::style::RenderStyle;
use super::surface::RenderSurface;
use super::texture::SurfaceTexture;
use crate::components::{BodyRef, Color, RingParams};
use crate::extensions::easing::{lerp, smoothstep};
use crate::systems::occlusion::OcclusionIndex;

/// Brightness floor under a ring's shadow.
pub const RING_SHADOW_FLOOR: f32 = 0.65;
/// Upper bound on the night-side emissive blend.
pub const EMISSIVE_CAP: f32 = 0.85;
/// Lambert term below which the night side starts to glow.
pub const NIGHT_THRESHOLD: f32 = 0.25;

/// View-space direction from a body toward its star.
///
/// World x maps to view x; world y runs down the screen and toward the
/// viewer as the plane tilts, so it splits between -y and +z by `squash`.
pub fn light_direction(body: DVec2, star: DVec2, squash: f64) -> Vec3 {
    let d = star - body;
    let squash = squash.clamp(0.0, 1.0);
    let tilt = (1.0 - squash * squash).max(0.0).sqrt();
    let l = Vec3::new(d.x as f32, (-d.y * squash) as f32, (d.y * tilt) as f32);
    l.try_normalize().unwrap_or(Vec3::Z)
}

/// Surface rotation in turns, wrapped to [0, 1).
pub fn spin_turns(time: f64, spin_speed: f64) -> f32 {
    (time * spin_speed / std::f64::consts::TAU).rem_euclid(1.0) as f32
}

#[derive(Debug, Clone, Copy)]
pub struct SphereShade<'a> {
    pub body: BodyRef,
    /// Center in screen pixels.
    pub center: Vec2,
    /// Radius in screen pixels.
    pub radius: f32,
    pub depth: f64,
    pub spin_turns: f32,
    pub axis_tilt: f32,
    /// Unit view-space direction toward the light.
    pub light: Vec3,
    pub light_color: Color,
    pub texture: &'a SurfaceTexture,
    pub emissive_strength: f32,
    /// The body's own ring, for ring shadows on the disc.
    pub ring: Option<&'a RingParams>,
}

/// Multiplier for the shadow a ring casts on the sphere point `normal`.
/// Uses band coverage only, so the clear middle of the band gives exactly
/// [`RING_SHADOW_FLOOR`].
pub fn ring_shadow(ring: &RingParams, normal: Vec3, light: Vec3) -> f32 {
    let (_, _, plane_normal) = ring.basis();
    let denom = light.dot(plane_normal);
    if denom.abs() < 1e-4 {
        return 1.0;
    }
    let t = -normal.dot(plane_normal) / denom;
    if t <= 0.0 {
        return 1.0;
    }
    let hit = normal + light * t;
    let coverage = ring.band_coverage(hit.length());
    lerp(1.0, RING_SHADOW_FLOOR, coverage.min(1.0))
}

/// Color of one sphere point. `nx, ny` are the disc coordinates (y up).
/// Returns `None` outside the disc.
pub fn sphere_sample(shade: &SphereShade<'_>, style: &RenderStyle, nx: f32, ny: f32) -> Option<Color> {
    let d2 = nx * nx + ny * ny;
    if d2 > 1.0 {
        return None;
    }
    let nz = (1.0 - d2).sqrt();
    let normal = Vec3::new(nx, ny, nz);

    // Texture lookup in the body's own frame: undo the axis tilt.
    let (st, ct) = shade.axis_tilt.sin_cos();
    let bx = nx * ct + ny * st;
    let by = -nx * st + ny * ct;
    let lat = by.clamp(-1.0, 1.0).asin();
    let lon = bx.atan2(nz);
    let u = lon / TAU + 0.5 + shade.spin_turns;
    let v = 0.5 - lat / PI;
    let albedo = shade.texture.sample(u, v);

    let ndl = normal.dot(shade.light).max(0.0);
    let limb = lerp(0.78, 1.0, nz);
    let ring = shade.ring.map(|r| ring_shadow(r, normal, shade.light)).unwrap_or(1.0);
    let light = style.light(ndl * limb * ring);
    let mut color = albedo.mul(shade.light_color).scale(light);

    if let Some(glow) = shade.texture.sample_emissive(u, v) {
        let night = 1.0 - smoothstep(0.0, NIGHT_THRESHOLD, ndl);
        let mask = (glow.luminance() * 2.0).min(1.0);
        let w = (night * shade.emissive_strength).min(EMISSIVE_CAP) * mask;
        color = color.lerp(glow, w);
    }
    Some(color)
}

/// Shade a sphere into `surface`. Occluded pixels are skipped before any
/// texture work.
pub fn shade_sphere<S: RenderSurface + ?Sized>(
    surface: &mut S,
    occlusion: &OcclusionIndex,
    style: &RenderStyle,
    shade: &SphereShade<'_>,
) {
    let r = shade.radius.max(0.5);
    let extent = r.ceil() as i32 + 1;
    let cx = shade.center.x.floor() as i32;
    let cy = shade.center.y.floor() as i32;
    let (w, h) = (surface.width() as i32, surface.height() as i32);

    for y in (cy - extent).max(0)..=(cy + extent).min(h - 1) {
        for x in (cx - extent).max(0)..=(cx + extent).min(w - 1) {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let nx = (px - shade.center.x) / r;
            let ny = -(py - shade.center.y) / r;
            if nx * nx + ny * ny > 1.0 {
                continue;
            }
            if occlusion.is_occluded(px, py, shade.depth, shade.body) {
                continue;
            }
            if let Some(color) = sphere_sample(shade, style, nx, ny) {
                surface.set_pixel(x, y, style.output(color));
            }
        }
    }
}
