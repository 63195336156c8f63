use serde::{Deserialize, Serialize};

use crate::components::Color;

/// How lighting intensity maps to output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadingMode {
    #[default]
    Smooth,
    /// Quantize light into `levels` flat bands.
    Banded,
}

/// Output color resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorDepth {
    #[default]
    TrueColor,
    /// Snap to the 256-color xterm palette.
    Indexed256,
}

/// Presentation parameters threaded through every shading call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub shading: ShadingMode,
    pub color_depth: ColorDepth,
    /// Minimum light on the unlit side of bodies.
    pub ambient: f32,
    /// Band count for [`ShadingMode::Banded`].
    pub levels: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            shading: ShadingMode::Smooth,
            color_depth: ColorDepth::TrueColor,
            ambient: 0.04,
            levels: 6,
        }
    }
}

impl RenderStyle {
    /// Apply ambient floor and banding to a raw light intensity.
    pub fn light(&self, intensity: f32) -> f32 {
        let ambient = self.ambient.clamp(0.0, 1.0);
        let lit = ambient + (1.0 - ambient) * intensity.clamp(0.0, 1.0);
        match self.shading {
            ShadingMode::Smooth => lit,
            ShadingMode::Banded => {
                let levels = self.levels.max(2) as f32;
                (lit * levels).floor().min(levels - 1.0) / (levels - 1.0)
            }
        }
    }

    /// Final output color for a shaded pixel.
    pub fn output(&self, color: Color) -> Color {
        match self.color_depth {
            ColorDepth::TrueColor => color.clamped(),
            ColorDepth::Indexed256 => Color::from_indexed(color.to_indexed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambient_floor() {
        let style = RenderStyle::default();
        assert!((style.light(0.0) - style.ambient).abs() < 1e-6);
        assert!((style.light(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn banded_has_few_values() {
        let style = RenderStyle { shading: ShadingMode::Banded, levels: 4, ambient: 0.0, ..Default::default() };
        let mut seen: Vec<u32> = (0..=100).map(|i| (style.light(i as f32 / 100.0) * 1000.0) as u32).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn indexed_output_is_palette_color() {
        let style = RenderStyle { color_depth: ColorDepth::Indexed256, ..Default::default() };
        let c = style.output(Color::new(0.3, 0.6, 0.9));
        assert_eq!(Color::from_indexed(c.to_indexed()), c);
    }

    #[test]
    fn parses_partial_json() {
        let style: RenderStyle = serde_json::from_str(r#"{"shading":"Banded"}"#).unwrap();
        assert_eq!(style.shading, ShadingMode::Banded);
        assert_eq!(style.levels, 6);
    }
}
