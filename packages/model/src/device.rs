use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device view used to pick style and visibility overrides.
///
/// Not a stored entity: it is threaded through rendering and editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceView {
    Desktop,
    Tablet,
    Mobile,
}

impl DeviceView {
    pub const ALL: [DeviceView; 3] = [DeviceView::Desktop, DeviceView::Tablet, DeviceView::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceView::Desktop => "desktop",
            DeviceView::Tablet => "tablet",
            DeviceView::Mobile => "mobile",
        }
    }

    /// True for the baseline device whose styles every other device inherits
    pub fn is_base(&self) -> bool {
        matches!(self, DeviceView::Desktop)
    }
}

impl Default for DeviceView {
    fn default() -> Self {
        DeviceView::Desktop
    }
}

impl fmt::Display for DeviceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceView {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" => Ok(DeviceView::Desktop),
            "tablet" => Ok(DeviceView::Tablet),
            "mobile" => Ok(DeviceView::Mobile),
            _ => Err(ModelError::UnknownDevice(s.to_string())),
        }
    }
}
