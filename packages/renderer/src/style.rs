//! Style normalization applied before a block renders.

use serde_json::Value;
use sitekit_model::{Props, StyleMap};
use std::collections::BTreeMap;

/// Prop keys that blocks read as their background color
pub const BACKGROUND_PROP_KEYS: [&str; 3] = ["backgroundColor", "background_color", "bgColor"];

const BACKGROUND_STYLE_KEY: &str = "backgroundColor";

/// CSS text for a style value. Objects and arrays have no CSS form.
pub fn css_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Convert a merged style map to CSS property names and values.
///
/// camelCase keys become kebab-case; custom properties are kept verbatim.
pub fn to_css(style: &StyleMap) -> BTreeMap<String, String> {
    style
        .iter()
        .filter_map(|(key, value)| Some((css_property(key), css_value(value)?)))
        .collect()
}

pub fn css_property(key: &str) -> String {
    if key.starts_with("--") {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Gradients and alpha-channel color functions, which the renderer only
/// accepts through the `background` shorthand
pub fn needs_background_shorthand(value: &str) -> bool {
    let value = value.to_ascii_lowercase();
    ["gradient(", "rgba(", "hsla("]
        .iter()
        .any(|marker| value.contains(marker))
}

/// Move gradient and translucent backgrounds from props and style into the
/// `background` shorthand. Affected props are set to `transparent`.
///
/// Returns true when anything was promoted.
pub fn promote_background(props: &mut Props, style: &mut StyleMap) -> bool {
    let mut promoted: Option<String> = None;

    for key in BACKGROUND_PROP_KEYS {
        let Some(value) = props.get(key).and_then(Value::as_str) else {
            continue;
        };
        if needs_background_shorthand(value) {
            if promoted.is_none() {
                promoted = Some(value.to_string());
            }
            props.insert(key.to_string(), Value::String("transparent".to_string()));
        }
    }

    if let Some(value) = style.get(BACKGROUND_STYLE_KEY).and_then(Value::as_str) {
        if needs_background_shorthand(value) {
            let value = value.to_string();
            style.remove(BACKGROUND_STYLE_KEY);
            promoted.get_or_insert(value);
        }
    }

    match promoted {
        Some(value) => {
            style.insert("background".to_string(), Value::String(value));
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_css_property_names() {
        assert_eq!(css_property("paddingTop"), "padding-top");
        assert_eq!(css_property("color"), "color");
        assert_eq!(css_property("--brand"), "--brand");
    }

    #[test]
    fn test_to_css_skips_structured_values() {
        let style = map(json!({ "fontSize": 18, "margin": "0 auto", "grid": [1, 2] }));
        let css = to_css(&style);
        assert_eq!(css.get("font-size").map(String::as_str), Some("18"));
        assert_eq!(css.get("margin").map(String::as_str), Some("0 auto"));
        assert!(!css.contains_key("grid"));
    }

    #[test]
    fn test_gradient_prop_is_promoted() {
        let mut props = map(json!({ "backgroundColor": "linear-gradient(90deg, red, blue)" }));
        let mut style = StyleMap::new();

        assert!(promote_background(&mut props, &mut style));
        assert_eq!(props["backgroundColor"], json!("transparent"));
        assert_eq!(style["background"], json!("linear-gradient(90deg, red, blue)"));
    }

    #[test]
    fn test_gradient_style_moves_to_shorthand() {
        let mut props = Props::new();
        let mut style = map(json!({ "backgroundColor": "radial-gradient(circle, #fff, #000)" }));

        assert!(promote_background(&mut props, &mut style));
        assert!(!style.contains_key("backgroundColor"));
        assert_eq!(style["background"], json!("radial-gradient(circle, #fff, #000)"));
    }

    #[test]
    fn test_alpha_color_is_promoted() {
        let mut props = map(json!({ "bgColor": "rgba(0, 0, 0, 0.5)" }));
        let mut style = StyleMap::new();

        assert!(promote_background(&mut props, &mut style));
        assert_eq!(style["background"], json!("rgba(0, 0, 0, 0.5)"));
    }

    #[test]
    fn test_solid_colors_are_untouched() {
        let mut props = map(json!({ "bgColor": "#fafafa" }));
        let mut style = map(json!({ "backgroundColor": "rgb(0, 0, 0)" }));

        assert!(!promote_background(&mut props, &mut style));
        assert_eq!(props["bgColor"], json!("#fafafa"));
        assert_eq!(style["backgroundColor"], json!("rgb(0, 0, 0)"));
    }
}
