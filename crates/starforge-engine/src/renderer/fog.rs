//! Soft and small things: nebula fog, the background starfield, asteroid
//! specks, station and ship markers, orbit paths.

use glam::{DVec2, Vec2};

use super::camera::Camera;
use super::style::RenderStyle;
use super::surface::RenderSurface;
use crate::components::{Asteroid, Color, NebulaCloud, Ship, Station};
use crate::core::hash::{fbm, hash01};
use crate::extensions::easing::smoothstep;

/// World-space noise frequency of nebula fog.
const FOG_FREQUENCY: f64 = 0.18;
/// Parallax factor of the starfield relative to the camera.
const STARFIELD_PARALLAX: f64 = 0.02;

/// Fog opacity at a world point inside `cloud`, in [0, density].
pub fn fog_density(cloud: &NebulaCloud, point: DVec2) -> f32 {
    let d = (point - cloud.position()).length() / cloud.radius.max(1e-6);
    if d >= 1.0 {
        return 0.0;
    }
    let falloff = (1.0 - d * d) as f32;
    let n = fbm(
        cloud.noise_seed,
        (point.x * FOG_FREQUENCY) as f32,
        (point.y * FOG_FREQUENCY) as f32,
    );
    cloud.density * falloff * falloff * smoothstep(0.3, 0.75, n)
}

/// Glowing clouds blend toward their color; dark clouds toward black.
pub fn shade_nebula<S: RenderSurface + ?Sized>(
    surface: &mut S,
    camera: &Camera,
    style: &RenderStyle,
    cloud: &NebulaCloud,
) {
    let center = camera.world_to_screen_f(cloud.wx, cloud.wy);
    let rx = camera.scale(cloud.radius);
    let ry = rx * camera.current.squash as f32;
    if !camera.is_disc_visible(center, rx) {
        return;
    }
    let (w, h) = (surface.width() as i32, surface.height() as i32);
    let x0 = ((center.x - rx).floor() as i32).max(0);
    let x1 = ((center.x + rx).ceil() as i32).min(w - 1);
    let y0 = ((center.y - ry).floor() as i32).max(0);
    let y1 = ((center.y + ry).ceil() as i32).min(h - 1);
    let target = if cloud.dark { Color::BLACK } else { style.output(cloud.color) };

    for y in y0..=y1 {
        for x in x0..=x1 {
            let world = camera.screen_to_world(x as f64 + 0.5, y as f64 + 0.5);
            let a = fog_density(cloud, world);
            if a > 1e-3 {
                surface.blend_pixel(x, y, target, a);
            }
        }
    }
}

/// Background stars at fixed hashed screen positions with slight parallax.
pub fn draw_starfield<S: RenderSurface + ?Sized>(
    surface: &mut S,
    camera: &Camera,
    style: &RenderStyle,
    seed: u32,
    count: u32,
) {
    let (w, h) = (surface.width() as f64, surface.height() as f64);
    let shift_x = camera.current.x * camera.current.zoom * STARFIELD_PARALLAX;
    let shift_y = camera.current.y * camera.current.zoom * STARFIELD_PARALLAX;
    for i in 0..count as i32 {
        let x = (hash01(seed, i, 0) as f64 * w - shift_x).rem_euclid(w);
        let y = (hash01(seed, i, 1) as f64 * h - shift_y).rem_euclid(h);
        let b = hash01(seed, i, 2);
        let k = 0.15 + 0.6 * b * b;
        let warm = hash01(seed, i, 3);
        let c = Color::new(0.85 + 0.15 * warm, 0.88, 1.0 - 0.2 * warm).scale(k);
        surface.set_pixel(x as i32, y as i32, style.output(c));
    }
}

pub fn draw_asteroid<S: RenderSurface + ?Sized>(
    surface: &mut S,
    camera: &Camera,
    style: &RenderStyle,
    asteroid: &Asteroid,
    light: f32,
) {
    let (x, y) = camera.world_to_screen(asteroid.wx, asteroid.wy);
    let r = camera.scale(asteroid.radius);
    let c = asteroid.color.scale(asteroid.shade * style.light(light));
    if r < 1.0 {
        surface.set_pixel(x, y, style.output(c));
    } else {
        surface.fill_circle(x, y, r.round() as i32, style.output(c));
    }
}

pub fn draw_station<S: RenderSurface + ?Sized>(
    surface: &mut S,
    camera: &Camera,
    style: &RenderStyle,
    station: &Station,
) {
    let (x, y) = camera.world_to_screen(station.wx, station.wy);
    let s = (camera.scale(0.08).round() as i32).clamp(1, 6);
    let c = style.output(Color::new(0.75, 0.85, 0.95));
    surface.draw_line(x - s, y, x + s, y, c);
    surface.draw_line(x, y - s, x, y + s, c);
    surface.set_pixel(x, y, style.output(Color::new(1.0, 0.4, 0.3)));
}

/// A small triangle pointing along the ship's heading.
pub fn draw_ship<S: RenderSurface + ?Sized>(
    surface: &mut S,
    camera: &Camera,
    style: &RenderStyle,
    ship: &Ship,
) {
    let p = camera.world_to_screen_f(ship.pos.x, ship.pos.y);
    let heading = ship.heading() as f32;
    let size = (camera.scale(0.1)).clamp(3.0, 9.0);
    let squash = camera.current.squash as f32;
    let point = |angle: f32, len: f32| {
        let v = Vec2::new(angle.cos() * len, angle.sin() * len * squash);
        let q = p + v;
        (q.x.round() as i32, q.y.round() as i32)
    };
    let nose = point(heading, size);
    let left = point(heading + 2.5, size * 0.6);
    let right = point(heading - 2.5, size * 0.6);
    let c = style.output(Color::new(0.95, 0.9, 0.55));
    surface.draw_line(nose.0, nose.1, left.0, left.1, c);
    surface.draw_line(left.0, left.1, right.0, right.1, c);
    surface.draw_line(right.0, right.1, nose.0, nose.1, c);
}

/// Closed polyline through world points.
pub fn draw_path<S: RenderSurface + ?Sized>(
    surface: &mut S,
    camera: &Camera,
    style: &RenderStyle,
    points: &[DVec2],
    color: Color,
) {
    let c = style.output(color);
    let screen: Vec<(i32, i32)> = points.iter().map(|p| camera.world_to_screen(p.x, p.y)).collect();
    for (a, b) in screen.iter().zip(screen.iter().cycle().skip(1)) {
        surface.draw_line(a.0, a.1, b.0, b.1, c);
    }
}

/// Thin circle outline, used for the selection marker.
pub fn draw_ring_outline<S: RenderSurface + ?Sized>(
    surface: &mut S,
    center: Vec2,
    radius: f32,
    color: Color,
) {
    let steps = ((radius * std::f32::consts::TAU) as i32).clamp(12, 720);
    for i in 0..steps {
        let a = i as f32 / steps as f32 * std::f32::consts::TAU;
        let x = center.x + radius * a.cos();
        let y = center.y + radius * a.sin();
        surface.set_pixel(x.round() as i32, y.round() as i32, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::camera::CameraState;
    use crate::renderer::surface::Framebuffer;

    fn cloud(dark: bool) -> NebulaCloud {
        NebulaCloud {
            wx: 0.0,
            wy: 0.0,
            radius: 10.0,
            density: 0.8,
            color: Color::new(0.8, 0.3, 0.6),
            noise_seed: 21,
            dark,
        }
    }

    #[test]
    fn fog_is_zero_outside_and_bounded_inside() {
        let c = cloud(false);
        assert_eq!(fog_density(&c, DVec2::new(20.0, 0.0)), 0.0);
        for i in 0..100 {
            let p = DVec2::new(i as f64 * 0.09, (i as f64 * 0.7).sin() * 3.0);
            let d = fog_density(&c, p);
            assert!((0.0..=c.density).contains(&d));
        }
    }

    #[test]
    fn dark_cloud_dims_background() {
        let camera = Camera::new(64, 64).with_state(CameraState { x: 0.0, y: 0.0, zoom: 3.0, squash: 1.0 });
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::WHITE);
        shade_nebula(&mut fb, &camera, &RenderStyle::default(), &cloud(true));
        let dimmed = (0..64).any(|x| fb.get_pixel(x, 32).luminance() < 0.99);
        assert!(dimmed);
        assert_eq!(fb.get_pixel(0, 0), Color::WHITE);
    }

    #[test]
    fn starfield_is_stable() {
        let camera = Camera::new(32, 32);
        let mut a = Framebuffer::new(32, 32);
        let mut b = Framebuffer::new(32, 32);
        draw_starfield(&mut a, &camera, &RenderStyle::default(), 9, 40);
        draw_starfield(&mut b, &camera, &RenderStyle::default(), 9, 40);
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert!(a.pixels().iter().any(|p| p.r > 0));
    }

    #[test]
    fn ship_marker_draws() {
        let camera = Camera::new(32, 32);
        let mut fb = Framebuffer::new(32, 32);
        let ship = Ship::new("s", DVec2::ZERO, 1.0, 1.0);
        draw_ship(&mut fb, &camera, &RenderStyle::default(), &ship);
        assert!(fb.pixels().iter().any(|p| p.r > 0));
    }
}
