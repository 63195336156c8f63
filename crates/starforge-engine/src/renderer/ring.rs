//! Planetary ring shading.
//!
//! Rings are drawn in two passes around the planet: the back layer (the half
//! of the annulus behind the planet's center plane) before the planet disc,
//! the front layer after it. Both passes consult the occlusion index with
//! the planet itself excluded.

use glam::{Vec2, Vec3};

use super::style::RenderStyle;
use super::surface::RenderSurface;
use crate::components::{BodyRef, Color, RingParams};
use crate::core::hash::{derive_seed, fbm, value_noise};
use crate::extensions::easing::{lerp, smoothstep};
use crate::systems::occlusion::OcclusionIndex;

/// Depth split between the ring layers and their planet.
pub const RING_DEPTH_OFFSET: f64 = 0.01;
/// Brightness floor where the planet shadows its own ring.
pub const RING_SELF_SHADOW_FLOOR: f32 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingLayer {
    Back,
    Front,
}

/// Opacity of the ring material at radius `rho` (planet radii). Radial only,
/// so the pattern reads as concentric striations.
pub fn ring_density(params: &RingParams, rho: f32) -> f32 {
    let coverage = params.band_coverage(rho);
    if coverage <= 0.0 {
        return 0.0;
    }
    let frac = params.band_fraction(rho);
    let fine = value_noise(params.seed, frac * 48.0, 0.5);
    let coarse = fbm(derive_seed(params.seed, 9), frac * 10.0, 0.25);
    let texture = (0.45 + 0.55 * fine) * (0.7 + 0.3 * coarse);
    (params.opacity * coverage * texture).clamp(0.0, 1.0)
}

/// Shadow cast by the unit planet on a ring point lit from direction `light`.
/// Returns a multiplier in [RING_SELF_SHADOW_FLOOR, 1].
pub fn self_shadow(point: Vec3, light: Vec3) -> f32 {
    let b = point.dot(light);
    if b >= 0.0 {
        // The planet center is behind the point relative to the light.
        return 1.0;
    }
    let closest = (point.length_squared() - b * b).max(0.0).sqrt();
    let covered = 1.0 - smoothstep(0.96, 1.04, closest);
    lerp(1.0, RING_SELF_SHADOW_FLOOR, covered)
}

/// Everything the ring passes need about one ringed planet.
#[derive(Debug, Clone, Copy)]
pub struct RingShade<'a> {
    pub body: BodyRef,
    pub params: &'a RingParams,
    /// Planet center in screen pixels.
    pub center: Vec2,
    /// Planet radius in screen pixels.
    pub radius: f32,
    pub depth: f64,
    /// Unit view-space direction toward the light.
    pub light: Vec3,
    pub light_color: Color,
}

/// Ring color and coverage for a screen offset `(sx, sy)` in planet radii
/// (y up). `None` if the point is off the ring or on the other layer.
pub fn ring_sample(
    params: &RingParams,
    sx: f32,
    sy: f32,
    light: Vec3,
    layer: RingLayer,
) -> Option<(Color, f32)> {
    let pt = params.lift(sx, sy);
    let point_layer = if pt.pos.z < 0.0 { RingLayer::Back } else { RingLayer::Front };
    if point_layer != layer {
        return None;
    }
    let density = ring_density(params, pt.rho);
    if density <= 1e-3 {
        return None;
    }
    let (_, _, normal) = params.basis();
    // Both faces scatter; grazing light dims the ring.
    let facing = light.dot(normal).abs();
    let brightness = (0.35 + 0.65 * facing) * self_shadow(pt.pos, light);
    Some((params.tint.scale(brightness), density))
}

/// Draw one layer of a planet's ring.
pub fn shade_ring<S: RenderSurface + ?Sized>(
    surface: &mut S,
    occlusion: &OcclusionIndex,
    style: &RenderStyle,
    ring: &RingShade<'_>,
    layer: RingLayer,
) {
    let r = ring.radius.max(0.5);
    let extent = (r * ring.params.outer_mul).ceil() as i32 + 1;
    let depth = match layer {
        RingLayer::Back => ring.depth + RING_DEPTH_OFFSET,
        RingLayer::Front => ring.depth - RING_DEPTH_OFFSET,
    };
    let cx = ring.center.x.floor() as i32;
    let cy = ring.center.y.floor() as i32;
    let (w, h) = (surface.width() as i32, surface.height() as i32);

    for y in (cy - extent).max(0)..=(cy + extent).min(h - 1) {
        for x in (cx - extent).max(0)..=(cx + extent).min(w - 1) {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let sx = (px - ring.center.x) / r;
            let sy = -(py - ring.center.y) / r;
            let Some((color, alpha)) = ring_sample(ring.params, sx, sy, ring.light, layer) else {
                continue;
            };
            if occlusion.is_occluded(px, py, depth, ring.body) {
                continue;
            }
            let lit = color.mul(ring.light_color).scale(style.light(1.0));
            surface.blend_pixel(x, y, style.output(lit), alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::RingGap;
    use crate::renderer::surface::Framebuffer;

    fn flat_ring() -> RingParams {
        RingParams {
            seed: 4,
            inner_mul: 1.4,
            outer_mul: 2.4,
            plane_angle: 0.0,
            tilt: 1.0,
            pattern_angle: 0.0,
            gaps: [RingGap { center: 0.95, half_width: 0.01, floor: 0.5 }; 3],
            edge_softness: 0.05,
            tint: Color::new(0.9, 0.85, 0.7),
            opacity: 0.9,
        }
    }

    #[test]
    fn sunward_side_is_brighter_than_shadowed_side() {
        let params = flat_ring();
        let light = Vec3::X;
        let rho = 1.9;
        let lit = ring_sample(&params, rho, 0.0, light, RingLayer::Front)
            .or_else(|| ring_sample(&params, rho, 0.0, light, RingLayer::Back));
        let dark = ring_sample(&params, -rho, 0.0, light, RingLayer::Front)
            .or_else(|| ring_sample(&params, -rho, 0.0, light, RingLayer::Back));
        let (lit, lit_a) = lit.expect("ring at +r");
        let (dark, dark_a) = dark.expect("ring at -r");
        assert!((lit_a - dark_a).abs() < 1e-6, "density must be radial");
        assert!(lit.luminance() > dark.luminance());
        let ratio = dark.luminance() / lit.luminance();
        assert!((ratio - RING_SELF_SHADOW_FLOOR).abs() < 0.02, "ratio {ratio}");
    }

    #[test]
    fn shadow_asymmetry_on_framebuffer() {
        let params = flat_ring();
        let mut fb = Framebuffer::new(96, 64);
        let occlusion = OcclusionIndex::new();
        let style = RenderStyle::default();
        let shade = RingShade {
            body: BodyRef::planet(0),
            params: &params,
            center: Vec2::new(48.0, 32.0),
            radius: 10.0,
            depth: 0.0,
            light: Vec3::X,
            light_color: Color::WHITE,
        };
        shade_ring(&mut fb, &occlusion, &style, &shade, RingLayer::Back);
        shade_ring(&mut fb, &occlusion, &style, &shade, RingLayer::Front);
        let right = fb.get_pixel(48 + 19, 31).luminance();
        let left = fb.get_pixel(48 - 20, 31).luminance();
        assert!(right > left, "right {right} left {left}");
    }

    #[test]
    fn nothing_inside_inner_edge() {
        let params = flat_ring();
        assert!(ring_sample(&params, 0.5, 0.0, Vec3::Z, RingLayer::Front).is_none());
        assert!(ring_sample(&params, 0.5, 0.0, Vec3::Z, RingLayer::Back).is_none());
        assert_eq!(ring_density(&params, 3.0), 0.0);
    }

    #[test]
    fn self_shadow_bounds() {
        assert_eq!(self_shadow(Vec3::new(2.0, 0.0, 0.0), Vec3::X), 1.0);
        let s = self_shadow(Vec3::new(-2.0, 0.0, 0.0), Vec3::X);
        assert!((s - RING_SELF_SHADOW_FLOOR).abs() < 1e-6);
    }
}
