//! Procedural equirectangular surface textures and their caches.
//!
//! Textures are generated once per `(seed, TextureKind)` at a fixed
//! resolution and sampled by the sphere shader with wrapped longitude.
//! Star surfaces animate, so they live in a separate cache that rebuilds
//! on a real-time interval.

use std::collections::HashMap;
use std::f32::consts::PI;

use crate::components::{Color, TextureKind};
use crate::core::hash::{derive_seed, fbm_wrapped, hash01};
use crate::extensions::easing::smoothstep;

pub const TEXTURE_WIDTH: usize = 128;
pub const TEXTURE_HEIGHT: usize = 64;
/// Base-octave lattice cells around the equator.
const NOISE_PERIOD: i32 = 8;
/// Real seconds between star surface rebuilds.
pub const STAR_REFRESH_INTERVAL: f64 = 0.18;

/// An equirectangular albedo map with an optional night-side emissive map.
#[derive(Debug, Clone)]
pub struct SurfaceTexture {
    width: usize,
    height: usize,
    albedo: Vec<Color>,
    emissive: Option<Vec<Color>>,
}

impl SurfaceTexture {
    /// Build a texture texel by texel from `f(u, v, lat) -> (albedo, emissive)`.
    fn build<F>(width: usize, height: usize, with_emissive: bool, mut f: F) -> Self
    where
        F: FnMut(usize, usize, f32, f32, f32) -> (Color, Color),
    {
        let (width, height) = (width.max(1), height.max(1));
        let mut albedo = Vec::with_capacity(width * height);
        let mut emissive = Vec::with_capacity(if with_emissive { width * height } else { 0 });
        for j in 0..height {
            let v = (j as f32 + 0.5) / height as f32;
            let lat = (v - 0.5) * PI;
            for i in 0..width {
                let u = (i as f32 + 0.5) / width as f32;
                let (a, e) = f(i, j, u, v, lat);
                albedo.push(a);
                if with_emissive {
                    emissive.push(e);
                }
            }
        }
        Self {
            width,
            height,
            albedo,
            emissive: with_emissive.then_some(emissive),
        }
    }

    /// Generate the surface for a body. Pure in `(seed, kind)`.
    pub fn generate(seed: u32, kind: TextureKind) -> Self {
        Self::generate_sized(seed, kind, TEXTURE_WIDTH, TEXTURE_HEIGHT)
    }

    pub fn generate_sized(seed: u32, kind: TextureKind, width: usize, height: usize) -> Self {
        let detail = derive_seed(seed, 1);
        let lights = derive_seed(seed, 2);
        let tint = (hash01(seed, 7, 7) - 0.5) * 0.12;
        let period = NOISE_PERIOD as f32;
        let noise = move |s: u32, u: f32, v: f32, scale: f32| {
            let p = (NOISE_PERIOD as f32 * scale) as i32;
            fbm_wrapped(s, u * p as f32, v * period * 0.5 * scale, p)
        };

        Self::build(width, height, kind.has_emissive(), |i, j, u, v, lat| {
            let h = noise(seed, u, v, 1.0);
            let black = Color::BLACK;
            match kind {
                TextureKind::Barren => {
                    let base = Color::new(0.34, 0.32, 0.31).lerp(Color::new(0.64, 0.61, 0.58), h);
                    let crater = noise(detail, u, v, 2.0);
                    let k = if crater > 0.66 { 0.7 } else { 1.0 };
                    (base.scale(k + tint), black)
                }
                TextureKind::Rocky => {
                    let base = Color::new(0.34, 0.24, 0.17).lerp(Color::new(0.66, 0.53, 0.4), h);
                    let grit = noise(detail, u, v, 4.0);
                    (base.scale(0.85 + 0.3 * grit + tint), black)
                }
                TextureKind::Desert => {
                    let dunes = ((lat * 14.0 + h * 9.0).sin() * 0.5 + 0.5) * 0.15;
                    let base = Color::new(0.74, 0.54, 0.31).lerp(Color::new(0.95, 0.82, 0.56), h);
                    (base.scale(0.9 + dunes + tint), black)
                }
                TextureKind::Ocean => {
                    let deep = Color::new(0.04, 0.14, 0.4).lerp(Color::new(0.14, 0.4, 0.7), h);
                    let c = if h > 0.68 { Color::new(0.42, 0.46, 0.28) } else { deep };
                    (c, black)
                }
                TextureKind::Terran => {
                    let land = h >= 0.52;
                    let polar = lat.abs() > 1.22 + 0.1 * h;
                    let albedo = if polar {
                        Color::new(0.92, 0.94, 0.97)
                    } else if land {
                        let t = smoothstep(0.52, 0.8, h);
                        Color::new(0.2, 0.44, 0.17).lerp(Color::new(0.52, 0.43, 0.3), t)
                    } else {
                        Color::new(0.05, 0.18, 0.48).lerp(Color::new(0.1, 0.32, 0.62), h / 0.52)
                    };
                    let city = land && !polar && hash01(lights, i as i32, j as i32) > 0.82;
                    let glow = if city { Color::new(1.0, 0.8, 0.45).scale(0.9) } else { black };
                    (albedo, glow)
                }
                TextureKind::Lava => {
                    let crack = 1.0 - smoothstep(0.0, 0.05, (h - 0.5).abs());
                    let crust = Color::new(0.12, 0.08, 0.07).lerp(Color::new(0.28, 0.16, 0.1), h);
                    let hot = Color::new(1.0, 0.42, 0.08);
                    (crust.lerp(hot, crack * 0.6), hot.scale(crack))
                }
                TextureKind::Ice => {
                    let base = Color::new(0.74, 0.84, 0.94).lerp(Color::new(0.95, 0.97, 1.0), h);
                    let crack = noise(detail, u, v, 4.0);
                    let k = if (crack - 0.5).abs() < 0.02 { 0.75 } else { 1.0 };
                    (base.scale(k), black)
                }
                TextureKind::Toxic => {
                    let swirl = noise(detail, u + h * 0.1, v, 2.0);
                    let base = Color::new(0.52, 0.58, 0.18).lerp(Color::new(0.78, 0.72, 0.3), swirl);
                    (base.scale(0.85 + 0.2 * h + tint), black)
                }
                TextureKind::GasBands | TextureKind::GasStorm => {
                    let bands = 6.0 + 6.0 * hash01(seed, 3, 3);
                    let b = (lat * bands + h * 3.2).sin() * 0.5 + 0.5;
                    let warm = Color::new(0.86 + tint, 0.7, 0.5);
                    let cool = Color::new(0.62, 0.48 + tint, 0.36);
                    let mut c = cool.lerp(warm, b);
                    if kind == TextureKind::GasStorm {
                        // One oval storm at a seeded spot.
                        let su = hash01(seed, 11, 0);
                        let sv = 0.35 + 0.3 * hash01(seed, 12, 0);
                        let du = {
                            let d = (u - su).abs();
                            d.min(1.0 - d) / 0.09
                        };
                        let dv = (v - sv) / 0.05;
                        let r = (du * du + dv * dv).sqrt();
                        let spot = 1.0 - smoothstep(0.6, 1.0, r);
                        c = c.lerp(Color::new(0.78, 0.32, 0.2), spot);
                    }
                    (c, black)
                }
                TextureKind::IceGiant => {
                    let b = (lat * 5.0 + h * 1.5).sin() * 0.5 + 0.5;
                    let c = Color::new(0.42, 0.68, 0.84).lerp(Color::new(0.6, 0.85, 0.95), b * 0.6 + h * 0.4);
                    (c.scale(1.0 + tint), black)
                }
            }
        })
    }

    /// Animated star surface: granulation drifting with `time`, tinted.
    pub fn star(seed: u32, color: Color, time: f64) -> Self {
        let drift = (time * 0.35).rem_euclid(1024.0) as f32;
        Self::build(TEXTURE_WIDTH, TEXTURE_HEIGHT, false, |_, _, u, v, _| {
            let p = NOISE_PERIOD * 2;
            let g = fbm_wrapped(seed, u * p as f32, v * p as f32 * 0.5 + drift, p);
            let k = 0.78 + 0.45 * g;
            (color.scale(k), Color::BLACK)
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn has_emissive(&self) -> bool {
        self.emissive.is_some()
    }

    fn texel_index(&self, u: f32, v: f32) -> usize {
        let u = if u.is_finite() { u.rem_euclid(1.0) } else { 0.0 };
        let v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.5 };
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * self.height as f32) as usize).min(self.height - 1);
        y * self.width + x
    }

    /// Nearest-texel albedo. `u` wraps, `v` clamps.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        self.albedo[self.texel_index(u, v)]
    }

    pub fn sample_emissive(&self, u: f32, v: f32) -> Option<Color> {
        let i = self.texel_index(u, v);
        self.emissive.as_ref().map(|e| e[i])
    }
}

/// Memoized planet and moon textures keyed by `(seed, kind)`.
#[derive(Debug)]
pub struct TextureCache {
    textures: HashMap<(u32, TextureKind), SurfaceTexture>,
    width: usize,
    height: usize,
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureCache {
    pub fn new() -> Self {
        Self::with_resolution(TEXTURE_WIDTH, TEXTURE_HEIGHT)
    }

    pub fn with_resolution(width: usize, height: usize) -> Self {
        Self {
            textures: HashMap::new(),
            width: width.clamp(8, 1024),
            height: height.clamp(4, 512),
        }
    }

    pub fn get(&mut self, seed: u32, kind: TextureKind) -> &SurfaceTexture {
        let (width, height) = (self.width, self.height);
        self.textures.entry((seed, kind)).or_insert_with(|| {
            log::debug!("building {kind:?} texture for seed {seed:#010x}");
            SurfaceTexture::generate_sized(seed, kind, width, height)
        })
    }

    pub fn contains(&self, seed: u32, kind: TextureKind) -> bool {
        self.textures.contains_key(&(seed, kind))
    }

    /// Drop every texture whose key is not in `keep`.
    pub fn retain_keys(&mut self, keep: &[(u32, TextureKind)]) {
        let before = self.textures.len();
        self.textures.retain(|key, _| keep.contains(key));
        log::debug!("texture cache: kept {} of {before}", self.textures.len());
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// The current star's animated surface. Rebuilt when the star changes or
/// when enough real time has passed.
#[derive(Debug, Default)]
pub struct StarTextureCache {
    key: Option<u32>,
    since_refresh: f64,
    interval: f64,
    texture: Option<SurfaceTexture>,
    rebuilds: u64,
}

impl StarTextureCache {
    pub fn new(interval: f64) -> Self {
        Self {
            interval: interval.max(0.0),
            ..Self::default()
        }
    }

    /// Star surface for `seed` at `sim_time`. `frame_dt` is real elapsed time
    /// since the previous call.
    pub fn get(&mut self, seed: u32, color: Color, sim_time: f64, frame_dt: f64) -> &SurfaceTexture {
        self.since_refresh += frame_dt.max(0.0);
        let stale = self.key != Some(seed) || self.since_refresh >= self.interval;
        if stale || self.texture.is_none() {
            self.key = Some(seed);
            self.since_refresh = 0.0;
            self.rebuilds += 1;
            log::debug!("star surface refresh #{} for seed {seed:#010x}", self.rebuilds);
            self.texture = Some(SurfaceTexture::star(seed, color, sim_time));
        }
        self.texture
            .get_or_insert_with(|| SurfaceTexture::star(seed, color, sim_time))
    }

    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}
