// extensions/easing.rs
//
// Scalar interpolation helpers shared by the shaders and the camera.
// Pure math, no engine types.

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`, clamped to [0, 1].
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    if span.abs() < 1e-9 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Frame-rate independent smoothing factor: `1 - exp(-rate * dt)`.
#[inline]
pub fn exp_alpha(rate: f64, dt: f64) -> f64 {
    1.0 - (-rate * dt.max(0.0)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
        // Reversed edges fall off instead of rising.
        assert!(smoothstep(1.0, 0.0, 0.9) < 0.1);
        assert_eq!(smoothstep(0.5, 0.5, 0.6), 1.0);
    }

    #[test]
    fn exp_alpha_bounds() {
        assert_eq!(exp_alpha(8.0, 0.0), 0.0);
        let a = exp_alpha(8.0, 1.0 / 60.0);
        assert!(a > 0.0 && a < 1.0);
        assert!(exp_alpha(8.0, 100.0) > 0.999);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    }
}
