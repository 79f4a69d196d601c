//! Round-dot point material

use serde::{Deserialize, Serialize};

/// WGSL source of the dot shader
pub const DOT_SHADER: &str = include_str!("shaders/dot.wgsl");

/// Material that draws every point as a flat-shaded round dot
///
/// `size` is the sprite edge length in pixels at every depth. `scale` is
/// uploaded with the uniforms but the shader does not read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotMaterial {
    pub size: f32,
    pub scale: f32,
    pub transparent: bool,
    pub depth_write: bool,
}

impl Default for DotMaterial {
    fn default() -> Self {
        Self {
            size: 15.0,
            scale: 1.0,
            transparent: true,
            depth_write: false,
        }
    }
}

impl DotMaterial {
    /// Alpha of the sprite at local coordinate `(u, v)` in `[0, 1]²`
    ///
    /// Mirrors the fragment stage: opaque inside the circle of radius 0.5
    /// around the sprite center (boundary included), transparent outside.
    pub fn coverage(u: f32, v: f32) -> f32 {
        let (du, dv) = (u - 0.5, v - 0.5);
        if (du * du + dv * dv).sqrt() <= 0.5 {
            1.0
        } else {
            0.0
        }
    }

    /// Blend state implied by `transparent`
    pub fn blend_state(&self) -> wgpu::BlendState {
        if self.transparent {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let material = DotMaterial::default();
        assert_eq!(material.size, 15.0);
        assert_eq!(material.scale, 1.0);
        assert!(material.transparent);
        assert!(!material.depth_write);
        assert_eq!(material.blend_state(), wgpu::BlendState::ALPHA_BLENDING);
    }

    #[test]
    fn test_coverage_is_round() {
        assert_eq!(DotMaterial::coverage(0.5, 0.5), 1.0);
        assert_eq!(DotMaterial::coverage(0.0, 0.5), 1.0);
        assert_eq!(DotMaterial::coverage(0.5, 1.0), 1.0);
        // Sprite corners fall outside the circle
        assert_eq!(DotMaterial::coverage(0.0, 0.0), 0.0);
        assert_eq!(DotMaterial::coverage(1.0, 1.0), 0.0);
        assert_eq!(DotMaterial::coverage(0.9, 0.9), 0.0);
    }

    #[test]
    fn test_coverage_area_approximates_circle() {
        let steps = 200;
        let mut covered = 0.0;
        for i in 0..steps {
            for j in 0..steps {
                let u = (i as f32 + 0.5) / steps as f32;
                let v = (j as f32 + 0.5) / steps as f32;
                covered += DotMaterial::coverage(u, v);
            }
        }
        let area = covered / (steps * steps) as f32;
        approx::assert_relative_eq!(area, std::f32::consts::PI / 4.0, epsilon = 0.01);
    }

    #[test]
    fn test_shader_entry_points() {
        assert!(DOT_SHADER.contains("fn vs_main"));
        assert!(DOT_SHADER.contains("fn fs_main"));
    }
}
