use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{
    DEFAULT_ANIMATION_SPEED, DEFAULT_VISUAL_INTENSITY, MIN_ANIMATION_SPEED, MIN_ORB_OPACITY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Inter,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    #[default]
    Comfortable,
    Compact,
}

/// Color preset for the orb gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbPreset {
    #[default]
    Theme,
    Cosmic,
    Ocean,
    Forest,
    Sunset,
    Fire,
}

/// Which orb renderer the render surface should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbKind {
    #[default]
    Custom,
    Classic,
}

/// Persisted display preferences.
///
/// Serialized as one flat JSON object. Missing keys take their defaults and
/// unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Divides every animation duration. Never below `MIN_ANIMATION_SPEED`.
    pub animation_speed_multiplier: f32,
    /// Glass effect strength in [0, 1].
    pub visual_intensity: f32,
    pub font_family: FontFamily,
    pub font_size: FontSize,
    pub orb_enabled: bool,
    /// Hue rotation speed of the orb gradient.
    pub orb_hue_speed: f32,
    /// Background orb opacity in [`MIN_ORB_OPACITY`, 1].
    pub orb_opacity: f32,
    pub orb_preset: OrbPreset,
    pub orb_kind: OrbKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            animation_speed_multiplier: DEFAULT_ANIMATION_SPEED,
            visual_intensity: DEFAULT_VISUAL_INTENSITY,
            font_family: FontFamily::default(),
            font_size: FontSize::default(),
            orb_enabled: true,
            orb_hue_speed: 0.5,
            orb_opacity: 0.4,
            orb_preset: OrbPreset::default(),
            orb_kind: OrbKind::default(),
        }
    }
}

impl Config {
    /// Brings every numeric field into its valid range. Non-finite values
    /// fall back to the default.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        self.animation_speed_multiplier = clamp_speed(finite_or(
            self.animation_speed_multiplier,
            defaults.animation_speed_multiplier,
        ));
        self.visual_intensity =
            clamp_intensity(finite_or(self.visual_intensity, defaults.visual_intensity));
        self.orb_hue_speed = finite_or(self.orb_hue_speed, defaults.orb_hue_speed).max(0.0);
        self.orb_opacity = clamp_orb_opacity(finite_or(self.orb_opacity, defaults.orb_opacity));
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

pub(crate) fn clamp_speed(value: f32) -> f32 {
    value.max(MIN_ANIMATION_SPEED)
}

pub(crate) fn clamp_intensity(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

pub(crate) fn clamp_orb_opacity(value: f32) -> f32 {
    value.clamp(MIN_ORB_OPACITY, 1.0)
}

/// Partial update merged into [`Config`] by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub animation_speed_multiplier: Option<f32>,
    pub visual_intensity: Option<f32>,
    pub font_family: Option<FontFamily>,
    pub font_size: Option<FontSize>,
    pub orb_enabled: Option<bool>,
    pub orb_hue_speed: Option<f32>,
    pub orb_opacity: Option<f32>,
    pub orb_preset: Option<OrbPreset>,
    pub orb_kind: Option<OrbKind>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animation_speed(mut self, multiplier: f32) -> Self {
        self.animation_speed_multiplier = Some(multiplier);
        self
    }

    pub fn visual_intensity(mut self, intensity: f32) -> Self {
        self.visual_intensity = Some(intensity);
        self
    }

    pub fn font_family(mut self, family: FontFamily) -> Self {
        self.font_family = Some(family);
        self
    }

    pub fn font_size(mut self, size: FontSize) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn orb_enabled(mut self, enabled: bool) -> Self {
        self.orb_enabled = Some(enabled);
        self
    }

    pub fn orb_hue_speed(mut self, speed: f32) -> Self {
        self.orb_hue_speed = Some(speed);
        self
    }

    pub fn orb_opacity(mut self, opacity: f32) -> Self {
        self.orb_opacity = Some(opacity);
        self
    }

    pub fn orb_preset(mut self, preset: OrbPreset) -> Self {
        self.orb_preset = Some(preset);
        self
    }

    pub fn orb_kind(mut self, kind: OrbKind) -> Self {
        self.orb_kind = Some(kind);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the set fields into `config`, clamping as it goes.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(speed) = checked("animationSpeedMultiplier", self.animation_speed_multiplier) {
            config.animation_speed_multiplier = clamp_speed(speed);
        }
        if let Some(intensity) = checked("visualIntensity", self.visual_intensity) {
            config.visual_intensity = clamp_intensity(intensity);
        }
        if let Some(family) = self.font_family {
            config.font_family = family;
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        if let Some(enabled) = self.orb_enabled {
            config.orb_enabled = enabled;
        }
        if let Some(speed) = checked("orbHueSpeed", self.orb_hue_speed) {
            config.orb_hue_speed = speed.max(0.0);
        }
        if let Some(opacity) = checked("orbOpacity", self.orb_opacity) {
            config.orb_opacity = clamp_orb_opacity(opacity);
        }
        if let Some(preset) = self.orb_preset {
            config.orb_preset = preset;
        }
        if let Some(kind) = self.orb_kind {
            config.orb_kind = kind;
        }
    }
}

impl From<Config> for ConfigPatch {
    fn from(config: Config) -> Self {
        Self {
            animation_speed_multiplier: Some(config.animation_speed_multiplier),
            visual_intensity: Some(config.visual_intensity),
            font_family: Some(config.font_family),
            font_size: Some(config.font_size),
            orb_enabled: Some(config.orb_enabled),
            orb_hue_speed: Some(config.orb_hue_speed),
            orb_opacity: Some(config.orb_opacity),
            orb_preset: Some(config.orb_preset),
            orb_kind: Some(config.orb_kind),
        }
    }
}

fn checked(field: &str, value: Option<f32>) -> Option<f32> {
    let value = value?;
    debug_assert!(value.is_finite(), "non-finite value for {field}");
    if value.is_finite() {
        Some(value)
    } else {
        warn!(field = field, "ignoring non-finite settings value");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_speed_is_floored() {
        let mut config = Config::default();
        ConfigPatch::new().animation_speed(0.0).apply_to(&mut config);
        assert!(config.animation_speed_multiplier > 0.0);
        assert_eq!(config.animation_speed_multiplier, MIN_ANIMATION_SPEED);
    }

    #[test]
    fn intensity_is_clamped() {
        let mut config = Config::default();
        ConfigPatch::new().visual_intensity(1.5).apply_to(&mut config);
        assert_eq!(config.visual_intensity, 1.0);
        ConfigPatch::new().visual_intensity(-0.5).apply_to(&mut config);
        assert_eq!(config.visual_intensity, 0.0);
    }

    #[test]
    fn orb_opacity_has_a_floor() {
        let mut config = Config::default();
        ConfigPatch::new().orb_opacity(0.0).apply_to(&mut config);
        assert_eq!(config.orb_opacity, MIN_ORB_OPACITY);
    }

    #[test]
    fn unset_fields_are_untouched() {
        let mut config = Config::default();
        ConfigPatch::new().font_size(FontSize::Compact).apply_to(&mut config);
        assert_eq!(
            config,
            Config {
                font_size: FontSize::Compact,
                ..Config::default()
            }
        );
    }

    #[test]
    fn flat_json_uses_camel_case_keys() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(json["animationSpeedMultiplier"], 1.0);
        assert_eq!(json["orbPreset"], "theme");
        assert_eq!(json["fontFamily"], "inter");
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config: Config = serde_json::from_str(r#"{"visualIntensity": 0.25}"#).unwrap();
        assert_eq!(
            config,
            Config {
                visual_intensity: 0.25,
                ..Config::default()
            }
        );
    }

    #[test]
    fn sanitize_clamps_loaded_values() {
        let mut config: Config =
            serde_json::from_str(r#"{"animationSpeedMultiplier": -3, "orbOpacity": 0.01}"#).unwrap();
        config.sanitize();
        assert_eq!(config.animation_speed_multiplier, MIN_ANIMATION_SPEED);
        assert_eq!(config.orb_opacity, MIN_ORB_OPACITY);
    }

    #[test]
    fn full_patch_round_trips_config() {
        let source = Config {
            animation_speed_multiplier: 2.0,
            orb_preset: OrbPreset::Ocean,
            ..Config::default()
        };
        let mut target = Config::default();
        ConfigPatch::from(source.clone()).apply_to(&mut target);
        assert_eq!(target, source);
    }
}
