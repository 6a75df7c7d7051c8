//! Template gallery contract.
//!
//! A template supplies a theme and a page generator. Trees it produces are
//! valid model input as-is.

use crate::component::{Animation, AnimationKind, AnimationTrigger, Component};
use crate::device::DeviceView;
use crate::page::{Page, SeoMeta};
use crate::theme::{Palette, Theme, ThemeFonts};

#[derive(Debug, Clone)]
pub struct SiteTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub theme: Theme,
    pub generate_pages: fn() -> Vec<Page>,
}

impl SiteTemplate {
    pub fn pages(&self) -> Vec<Page> {
        (self.generate_pages)()
    }
}

/// Built-in single-page landing template
pub fn starter_template() -> SiteTemplate {
    SiteTemplate {
        id: "starter".to_string(),
        name: "Starter".to_string(),
        description: "Landing page with hero, features and a call to action".to_string(),
        theme: Theme {
            palette: Palette {
                primary: "#0f766e".to_string(),
                secondary: "#134e4a".to_string(),
                accent: "#f97316".to_string(),
                background: "#f8fafc".to_string(),
                text: "#0f172a".to_string(),
            },
            fonts: ThemeFonts {
                heading: "Poppins".to_string(),
                body: "Inter".to_string(),
            },
        },
        generate_pages: starter_pages,
    }
}

fn starter_pages() -> Vec<Page> {
    let home = Page::new("starter-home", "Home", "home")
        .home()
        .with_seo(SeoMeta {
            title: Some("Welcome".to_string()),
            description: Some("Built with the starter template".to_string()),
        })
        .with_components(vec![
            Component::new("starter-nav", "navbar")
                .with_label("Navigation")
                .with_prop("brand", "Starter")
                .with_prop("links", serde_json::json!(["Home", "About"])),
            Component::new("starter-hero", "hero")
                .with_label("Hero")
                .with_prop("title", "Launch faster")
                .with_prop("subtitle", "Everything you need on one page")
                .with_prop("backgroundColor", "linear-gradient(135deg, #0f766e, #134e4a)")
                .with_style(DeviceView::Desktop, "padding", "96px 24px")
                .with_style(DeviceView::Mobile, "padding", "48px 16px"),
            Component::new("starter-features", "features")
                .with_label("Features")
                .with_prop("items", serde_json::json!(["Fast", "Simple", "Reliable"]))
                .with_animation(Animation {
                    kind: AnimationKind::FadeUp,
                    trigger: AnimationTrigger::Scroll,
                    duration_ms: 600,
                    delay_ms: 0,
                }),
            Component::new("starter-cta", "cta-banner")
                .with_label("Call to action")
                .with_prop("text", "Ready to start?")
                .with_prop("buttonText", "Get started"),
        ]);

    let about = Page::new("starter-about", "About", "about").with_component(
        Component::new("starter-about-text", "text")
            .with_label("About text")
            .with_prop("content", "We build things."),
    );

    vec![home, about]
}
