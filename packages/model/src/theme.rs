use serde::{Deserialize, Serialize};

/// Site-wide theme.
///
/// A value object: renderers only read it. Replacing a theme means swapping
/// the whole value, never mutating fields while a render pass holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub palette: Palette,
    pub fonts: ThemeFonts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFonts {
    pub heading: String,
    pub body: String,
}

impl Theme {
    /// CSS custom properties exposing the theme to published pages
    pub fn css_variables(&self) -> Vec<(String, String)> {
        vec![
            ("--color-primary".to_string(), self.palette.primary.clone()),
            ("--color-secondary".to_string(), self.palette.secondary.clone()),
            ("--color-accent".to_string(), self.palette.accent.clone()),
            ("--color-background".to_string(), self.palette.background.clone()),
            ("--color-text".to_string(), self.palette.text.clone()),
            ("--font-heading".to_string(), self.fonts.heading.clone()),
            ("--font-body".to_string(), self.fonts.body.clone()),
        ]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: Palette {
                primary: "#2563eb".to_string(),
                secondary: "#7c3aed".to_string(),
                accent: "#f59e0b".to_string(),
                background: "#ffffff".to_string(),
                text: "#111827".to_string(),
            },
            fonts: ThemeFonts {
                heading: "Inter".to_string(),
                body: "Inter".to_string(),
            },
        }
    }
}
