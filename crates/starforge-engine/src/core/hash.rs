//! Deterministic integer hashing and lattice noise.
//!
//! Every random decision in the engine bottoms out here. All functions are
//! pure: identical inputs produce identical outputs across runs and platforms.

/// Fixed octave count for all fractal noise.
pub const FBM_OCTAVES: u32 = 5;
/// Frequency multiplier between octaves.
pub const FBM_LACUNARITY: f32 = 2.0;
/// Amplitude multiplier between octaves.
pub const FBM_GAIN: f32 = 0.5;

/// Integer avalanche mix (lowbias32).
#[inline]
pub fn hash_u32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

/// Hash a seed and a 2D integer lattice coordinate into a u32.
#[inline]
pub fn hash2(seed: u32, x: i32, y: i32) -> u32 {
    let mut h = seed ^ 0x9e37_79b9;
    h ^= (x as u32).wrapping_mul(0x85eb_ca6b);
    h = hash_u32(h);
    h ^= (y as u32).wrapping_mul(0xc2b2_ae35);
    hash_u32(h)
}

/// Hash a seed and lattice coordinate to a float in [0, 1).
#[inline]
pub fn hash01(seed: u32, x: i32, y: i32) -> f32 {
    // Top 24 bits keep the result strictly below 1.0 in f32.
    (hash2(seed, x, y) >> 8) as f32 * (1.0 / 16_777_216.0)
}

/// Same as [`hash01`] but with 53 bits of resolution.
#[inline]
pub fn hash01_f64(seed: u32, x: i32, y: i32) -> f64 {
    let hi = hash2(seed, x, y) as u64;
    let lo = hash2(seed ^ 0x68e3_1da4, y, x) as u64;
    (((hi << 32) | lo) >> 11) as f64 * (1.0 / 9_007_199_254_740_992.0)
}

/// Derive a child seed from a parent seed and a salt.
#[inline]
pub fn derive_seed(seed: u32, salt: u32) -> u32 {
    hash_u32(seed.wrapping_add(hash_u32(salt.wrapping_add(0x632b_e5ab))))
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Bilinear value noise over the integer lattice, smoothstep-interpolated.
pub fn value_noise(seed: u32, x: f32, y: f32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let ix = x0 as i32;
    let iy = y0 as i32;
    let sx = fade(x - x0);
    let sy = fade(y - y0);

    let c00 = hash01(seed, ix, iy);
    let c10 = hash01(seed, ix.wrapping_add(1), iy);
    let c01 = hash01(seed, ix, iy.wrapping_add(1));
    let c11 = hash01(seed, ix.wrapping_add(1), iy.wrapping_add(1));

    let top = c00 + (c10 - c00) * sx;
    let bottom = c01 + (c11 - c01) * sx;
    top + (bottom - top) * sy
}

/// Value noise that tiles in x with the given integer period.
/// Used for equirectangular textures so longitude 0 and 1 meet without a seam.
pub fn value_noise_wrapped(seed: u32, x: f32, y: f32, period_x: i32) -> f32 {
    let period = period_x.max(1);
    let x0 = x.floor();
    let y0 = y.floor();
    let ix = (x0 as i32).rem_euclid(period);
    let ix1 = (ix + 1).rem_euclid(period);
    let iy = y0 as i32;
    let sx = fade(x - x0);
    let sy = fade(y - y0);

    let c00 = hash01(seed, ix, iy);
    let c10 = hash01(seed, ix1, iy);
    let c01 = hash01(seed, ix, iy.wrapping_add(1));
    let c11 = hash01(seed, ix1, iy.wrapping_add(1));

    let top = c00 + (c10 - c00) * sx;
    let bottom = c01 + (c11 - c01) * sx;
    top + (bottom - top) * sy
}

/// Fractal sum of [`value_noise`] octaves, normalized to [0, 1).
pub fn fbm(seed: u32, x: f32, y: f32) -> f32 {
    let mut sum = 0.0;
    let mut norm = 0.0;
    let mut amp = 1.0;
    let mut freq = 1.0;
    for octave in 0..FBM_OCTAVES {
        let s = derive_seed(seed, octave);
        sum += value_noise(s, x * freq, y * freq) * amp;
        norm += amp;
        amp *= FBM_GAIN;
        freq *= FBM_LACUNARITY;
    }
    (sum / norm).clamp(0.0, 0.999_999)
}

/// Fractal noise that tiles in x. `period_x` is the base-octave period;
/// each octave doubles it so every octave stays seamless.
pub fn fbm_wrapped(seed: u32, x: f32, y: f32, period_x: i32) -> f32 {
    let mut sum = 0.0;
    let mut norm = 0.0;
    let mut amp = 1.0;
    let mut freq = 1.0;
    let mut period = period_x.max(1);
    for octave in 0..FBM_OCTAVES {
        let s = derive_seed(seed, octave);
        sum += value_noise_wrapped(s, x * freq, y * freq, period) * amp;
        norm += amp;
        amp *= FBM_GAIN;
        freq *= FBM_LACUNARITY;
        period = period.saturating_mul(2);
    }
    (sum / norm).clamp(0.0, 0.999_999)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash01_is_stable_and_in_range() {
        for seed in [0u32, 1, 42, u32::MAX] {
            for x in -20..20 {
                for y in -3..3 {
                    let a = hash01(seed, x, y);
                    let b = hash01(seed, x, y);
                    assert_eq!(a.to_bits(), b.to_bits());
                    assert!((0.0..1.0).contains(&a), "out of range: {a}");
                }
            }
        }
    }

    #[test]
    fn hash01_f64_in_range() {
        for x in 0..500 {
            let v = hash01_f64(7, x, -x);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn hash01_varies_with_inputs() {
        assert_ne!(hash01(1, 0, 0), hash01(2, 0, 0));
        assert_ne!(hash01(1, 0, 0), hash01(1, 1, 0));
        assert_ne!(hash01(1, 0, 0), hash01(1, 0, 1));
    }

    #[test]
    fn hash01_roughly_uniform() {
        let mut buckets = [0u32; 10];
        for i in 0..10_000 {
            let v = hash01(99, i, 3);
            buckets[(v * 10.0) as usize] += 1;
        }
        for count in buckets {
            assert!((800..1200).contains(&count), "bucket count {count}");
        }
    }

    #[test]
    fn value_noise_matches_lattice_at_integers() {
        let v = value_noise(5, 3.0, -2.0);
        assert!((v - hash01(5, 3, -2)).abs() < 1e-6);
    }

    #[test]
    fn wrapped_noise_tiles() {
        let period = 8;
        for i in 0..20 {
            let y = i as f32 * 0.37;
            let a = value_noise_wrapped(11, 0.25, y, period);
            let b = value_noise_wrapped(11, 0.25 + period as f32, y, period);
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn fbm_in_unit_range() {
        for i in 0..200 {
            let x = i as f32 * 0.173 - 10.0;
            let v = fbm(3, x, x * 0.5);
            assert!((0.0..1.0).contains(&v));
            let w = fbm_wrapped(3, x.abs(), 1.5, 4);
            assert!((0.0..1.0).contains(&w));
        }
    }

    #[test]
    fn derive_seed_distinct_salts() {
        let a = derive_seed(10, 0);
        let b = derive_seed(10, 1);
        assert_ne!(a, b);
        assert_eq!(a, derive_seed(10, 0));
    }
}
