use crate::EditorError;
use serde::{Deserialize, Serialize};
use sitekit_model::DeviceView;

/// Editor canvas settings, read from the `editor` section of
/// `sitekit.config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Pointer travel in px before a press becomes a reorder drag
    pub drag_activation_distance: f32,
    pub tablet_width: u32,
    pub mobile_width: u32,
    pub undo_levels: usize,
    /// Scale of the snapshot that follows the pointer while dragging
    pub overlay_scale: f32,
    pub overlay_max_height: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_activation_distance: 8.0,
            tablet_width: 768,
            mobile_width: 375,
            undo_levels: 100,
            overlay_scale: 0.5,
            overlay_max_height: 240,
        }
    }
}

impl EditorConfig {
    /// Maximum canvas width for `device`; `None` is full width
    pub fn canvas_width(&self, device: DeviceView) -> Option<u32> {
        match device {
            DeviceView::Desktop => None,
            DeviceView::Tablet => Some(self.tablet_width),
            DeviceView::Mobile => Some(self.mobile_width),
        }
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        if self.drag_activation_distance.is_nan() || self.drag_activation_distance < 0.0 {
            return Err(EditorError::Config(
                "dragActivationDistance must be zero or positive".to_string(),
            ));
        }
        if self.overlay_scale.is_nan() || self.overlay_scale <= 0.0 || self.overlay_scale > 1.0 {
            return Err(EditorError::Config(
                "overlayScale must be in (0, 1]".to_string(),
            ));
        }
        if self.mobile_width == 0 || self.tablet_width == 0 {
            return Err(EditorError::Config("device widths must be positive".to_string()));
        }
        Ok(())
    }
}
