use serde::Serialize;

/// Frosted-glass surface parameters derived from the visual intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlassStyle {
    pub background_alpha: f32,
    pub blur_px: f32,
    pub border_alpha: f32,
    pub shadow_alpha: f32,
    /// Backdrop saturation, percent.
    pub saturation: f32,
}

impl GlassStyle {
    pub fn from_intensity(intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            background_alpha: 0.4 * i,
            blur_px: 20.0 * i,
            border_alpha: 0.3 * i,
            shadow_alpha: 0.08 * i,
            saturation: 180.0,
        }
    }
}
