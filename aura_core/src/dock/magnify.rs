use serde::{Deserialize, Serialize};

use crate::constants::{
    DOCK_BASE_SIZE, DOCK_COLLAPSED_BASE_SIZE, DOCK_COLLAPSED_MAGNIFICATION,
    DOCK_COLLAPSED_PANEL_WIDTH, DOCK_DISTANCE, DOCK_MAGNIFICATION, DOCK_MIN_HOVER_WIDTH,
    DOCK_PANEL_WIDTH,
};
use crate::geometry::{Point, Rect};

/// Axis along which pointer distance is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

impl Axis {
    /// Signed distance from `center` to `pointer` along this axis.
    pub fn offset(self, pointer: Point, center: Point) -> f32 {
        match self {
            Axis::Vertical => pointer.y - center.y,
            Axis::Horizontal => pointer.x - center.x,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DockConfig {
    pub axis: Axis,
    pub base_size: f32,
    pub magnification: f32,
    pub collapsed_base_size: f32,
    pub collapsed_magnification: f32,
    /// Falloff distance; beyond it an item stays at base size.
    pub distance: f32,
    pub panel_width: f32,
    pub collapsed_panel_width: f32,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            base_size: DOCK_BASE_SIZE,
            magnification: DOCK_MAGNIFICATION,
            collapsed_base_size: DOCK_COLLAPSED_BASE_SIZE,
            collapsed_magnification: DOCK_COLLAPSED_MAGNIFICATION,
            distance: DOCK_DISTANCE,
            panel_width: DOCK_PANEL_WIDTH,
            collapsed_panel_width: DOCK_COLLAPSED_PANEL_WIDTH,
        }
    }
}

impl DockConfig {
    /// `(base, peak)` sizes for the given mode.
    pub fn sizes(&self, collapsed: bool) -> (f32, f32) {
        if collapsed {
            (self.collapsed_base_size, self.collapsed_magnification)
        } else {
            (self.base_size, self.magnification)
        }
    }

    /// Target size of an item whose center is `offset` away from the pointer.
    pub fn item_size(&self, offset: f32, collapsed: bool) -> f32 {
        let (base, peak) = self.sizes(collapsed);
        interpolate(
            offset,
            &[-self.distance, 0.0, self.distance],
            &[base, peak, base],
        )
    }

    /// Item size for an optional rect; unmeasured items count as infinitely far.
    pub fn size_for(&self, pointer: Option<Point>, rect: Option<Rect>, collapsed: bool) -> f32 {
        let offset = match (pointer, rect) {
            (Some(p), Some(r)) => self.axis.offset(p, r.center()),
            _ => f32::INFINITY,
        };
        self.item_size(offset, collapsed)
    }

    /// Width the panel grows to so a magnified item and its label fit.
    pub fn hover_width(&self, collapsed: bool) -> f32 {
        let (_, peak) = self.sizes(collapsed);
        DOCK_MIN_HOVER_WIDTH.max(peak + peak / 2.0 + 4.0)
    }

    pub fn resting_width(&self, collapsed: bool) -> f32 {
        if collapsed {
            self.collapsed_panel_width
        } else {
            self.panel_width
        }
    }
}

/// Piecewise-linear map from `input` breakpoints to `output` values.
///
/// Values outside the input range clamp to the first or last output.
/// Breakpoints must be ascending and both slices the same length.
pub fn interpolate(value: f32, input: &[f32], output: &[f32]) -> f32 {
    debug_assert!(input.len() == output.len() && input.len() >= 2);
    debug_assert!(input.windows(2).all(|w| w[0] < w[1]), "breakpoints not ascending");
    debug_assert!(!value.is_nan(), "NaN interpolation input");

    let last = input.len() - 1;
    if value <= input[0] {
        return output[0];
    }
    if value >= input[last] {
        return output[last];
    }
    for i in 0..last {
        let (x0, x1) = (input[i], input[i + 1]);
        if value <= x1 {
            let t = (value - x0) / (x1 - x0);
            return output[i] + t * (output[i + 1] - output[i]);
        }
    }
    output[last]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_hits_breakpoints_and_midpoints() {
        let input = [-60.0, 0.0, 60.0];
        let output = [40.0, 56.0, 40.0];
        assert_eq!(interpolate(0.0, &input, &output), 56.0);
        assert_eq!(interpolate(-60.0, &input, &output), 40.0);
        assert_eq!(interpolate(30.0, &input, &output), 48.0);
        assert_eq!(interpolate(-30.0, &input, &output), 48.0);
    }

    #[test]
    fn interpolate_clamps_outside_range() {
        let input = [-60.0, 0.0, 60.0];
        let output = [40.0, 56.0, 40.0];
        assert_eq!(interpolate(500.0, &input, &output), 40.0);
        assert_eq!(interpolate(f32::INFINITY, &input, &output), 40.0);
        assert_eq!(interpolate(f32::NEG_INFINITY, &input, &output), 40.0);
    }

    #[test]
    fn item_size_at_distance_zero_is_peak() {
        let config = DockConfig::default();
        assert_eq!(config.item_size(0.0, false), DOCK_MAGNIFICATION);
        assert_eq!(config.item_size(0.0, true), DOCK_COLLAPSED_MAGNIFICATION);
    }

    #[test]
    fn item_size_beyond_falloff_is_base() {
        let config = DockConfig::default();
        assert_eq!(config.item_size(DOCK_DISTANCE, false), DOCK_BASE_SIZE);
        assert_eq!(config.item_size(DOCK_DISTANCE * 3.0, true), DOCK_COLLAPSED_BASE_SIZE);
    }

    #[test]
    fn unmeasured_item_is_base() {
        let config = DockConfig::default();
        let size = config.size_for(Some(Point::new(0.0, 0.0)), None, false);
        assert_eq!(size, DOCK_BASE_SIZE);
    }

    #[test]
    fn horizontal_axis_ignores_vertical_offset() {
        let config = DockConfig {
            axis: Axis::Horizontal,
            ..DockConfig::default()
        };
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        let size = config.size_for(Some(Point::new(20.0, 500.0)), Some(rect), false);
        assert_eq!(size, DOCK_MAGNIFICATION);
    }

    #[test]
    fn hover_width_has_a_floor() {
        let config = DockConfig::default();
        assert_eq!(config.hover_width(false), DOCK_MIN_HOVER_WIDTH);
        let wide = DockConfig {
            magnification: 100.0,
            ..DockConfig::default()
        };
        assert_eq!(wide.hover_width(false), 154.0);
    }
}
