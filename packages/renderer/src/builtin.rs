//! Built-in block set used by the CLI, previews and tests.

use crate::block::{from_fn, BlockError, BlockProps};
use crate::registry::{BlockMeta, BlockRegistry, BlockRegistryBuilder};
use crate::vdom::VNode;
use serde_json::{json, Value};
use sitekit_model::Props;

/// Prop injected into language-aware blocks
pub const LANGUAGE_PROP: &str = "currentLanguage";

fn heading(p: &BlockProps<'_>) -> Result<VNode, BlockError> {
    let level = p.u64_prop("level").unwrap_or(2);
    if !(1..=6).contains(&level) {
        return Err(BlockError::InvalidProp {
            name: "level".to_string(),
            reason: format!("expected 1-6, got {}", level),
        });
    }
    let text = p.str_prop("text").unwrap_or_default();
    Ok(p.root(&format!("h{}", level))
        .with_style("font-family", "var(--font-heading)")
        .with_child(VNode::text(text)))
}

fn text(p: &BlockProps<'_>) -> Result<VNode, BlockError> {
    let mut node = p.root("p").with_child(VNode::text(p.str_prop("content").unwrap_or_default()));
    if p.editing {
        node = node
            .with_attr("contenteditable", "true")
            .with_attr("data-prop", "content");
    }
    Ok(node)
}

fn hero(p: &BlockProps<'_>) -> Result<VNode, BlockError> {
    // Older sites stored the title under `heading`
    let title = match (p.str_prop("title"), p.str_prop("heading")) {
        (Some(title), _) => title,
        (None, Some(legacy)) => {
            let mut partial = Props::new();
            partial.insert("title".to_string(), json!(legacy));
            p.updater.update(partial);
            legacy
        }
        (None, None) => return Err(BlockError::MissingProp("title".to_string())),
    };

    let mut node = p
        .root("section")
        .with_attr("class", "hero")
        .with_child(
            VNode::element("h1")
                .with_style("font-family", "var(--font-heading)")
                .with_child(VNode::text(title)),
        );

    if let Some(subtitle) = p.str_prop("subtitle") {
        node = node.with_child(VNode::element("p").with_child(VNode::text(subtitle)));
    }

    if let Some(background) = p.str_prop("backgroundColor") {
        node = node.with_style("background-color", background);
    }

    if let Some(cta) = p.str_prop("ctaText") {
        let href = p.str_prop("ctaLink").unwrap_or("#");
        node = node.with_child(
            VNode::element("a")
                .with_attr("class", "button")
                .with_attr("href", href)
                .with_style("background-color", "var(--color-primary)")
                .with_child(VNode::text(cta)),
        );
    }

    Ok(node)
}

fn features(p: &BlockProps<'_>) -> Result<VNode, BlockError> {
    let items = match p.props.get("items") {
        None => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(_) => {
            return Err(BlockError::InvalidProp {
                name: "items".to_string(),
                reason: "expected a list".to_string(),
            })
        }
    };

    let mut grid = VNode::element("div")
        .with_attr("class", "features-grid")
        .with_style("display", "grid");

    for item in &items {
        // Plain strings are title-only items
        let (title, body) = match item {
            Value::String(title) => (title.as_str(), ""),
            _ => (
                item.get("title").and_then(Value::as_str).unwrap_or_default(),
                item.get("description").and_then(Value::as_str).unwrap_or_default(),
            ),
        };
        grid = grid.with_child(
            VNode::element("article")
                .with_child(VNode::element("h3").with_child(VNode::text(title)))
                .with_child(VNode::element("p").with_child(VNode::text(body))),
        );
    }

    let mut node = p.root("section").with_attr("class", "features");
    if let Some(title) = p.str_prop("title") {
        node = node.with_child(VNode::element("h2").with_child(VNode::text(title)));
    }
    Ok(node.with_child(grid))
}

fn cta_banner(p: &BlockProps<'_>) -> Result<VNode, BlockError> {
    let text = p.required_str("text")?;
    let mut node = p
        .root("section")
        .with_attr("class", "cta-banner")
        .with_child(VNode::element("p").with_child(VNode::text(text)));

    if let Some(background) = p.str_prop("backgroundColor") {
        node = node.with_style("background-color", background);
    }
    if let Some(label) = p.str_prop("buttonText") {
        node = node.with_child(
            VNode::element("a")
                .with_attr("class", "button")
                .with_attr("href", p.str_prop("buttonLink").unwrap_or("#"))
                .with_child(VNode::text(label)),
        );
    }
    Ok(node)
}

fn columns(p: &BlockProps<'_>) -> Result<VNode, BlockError> {
    let gap = p.u64_prop("gap").unwrap_or(16);
    Ok(p.root("div")
        .with_attr("class", "columns")
        .with_style("display", "flex")
        .with_style("gap", format!("{}px", gap))
        .with_children(p.children.clone()))
}

fn navbar(p: &BlockProps<'_>) -> Result<VNode, BlockError> {
    let mut links = VNode::element("ul").with_attr("class", "nav-links");
    for link in p.str_list("links") {
        let href = format!("/{}", link.to_lowercase().replace(' ', "-"));
        links = links.with_child(
            VNode::element("li").with_child(
                VNode::element("a")
                    .with_attr("href", href)
                    .with_child(VNode::text(link)),
            ),
        );
    }

    let mut node = p
        .root("nav")
        .with_child(
            VNode::element("strong")
                .with_attr("class", "brand")
                .with_child(VNode::text(p.str_prop("brand").unwrap_or_default())),
        )
        .with_child(links);

    if let Some(language) = p.str_prop(LANGUAGE_PROP) {
        node = node.with_attr("lang", language);
    }
    Ok(node)
}

fn language_switcher(p: &BlockProps<'_>) -> Result<VNode, BlockError> {
    let active = p.str_prop(LANGUAGE_PROP).unwrap_or("en");
    let mut languages = p.str_list("languages");
    if languages.is_empty() {
        languages.push(active);
    }

    let mut list = p.root("ul").with_attr("class", "language-switcher");
    for language in languages {
        let mut item = VNode::element("li")
            .with_attr("data-language", language)
            .with_child(VNode::text(language.to_uppercase()));
        if language == active {
            item = item.with_attr("aria-current", "true");
        }
        list = list.with_child(item);
    }
    Ok(list)
}

fn floating_button(p: &BlockProps<'_>) -> Result<VNode, BlockError> {
    let position = p.str_prop("position").unwrap_or("bottom-right");
    let (vertical, horizontal) = position.split_once('-').unwrap_or(("bottom", "right"));

    Ok(p.root("a")
        .with_attr("class", "floating-button")
        .with_attr("href", p.str_prop("link").unwrap_or("#"))
        .with_style("position", "fixed")
        .with_style(vertical, "24px")
        .with_style(horizontal, "24px")
        .with_child(VNode::text(p.str_prop("text").unwrap_or("Contact"))))
}

fn spacer(p: &BlockProps<'_>) -> Result<VNode, BlockError> {
    let height = p.u64_prop("height").unwrap_or(48);
    Ok(p.root("div").with_style("height", format!("{}px", height)))
}

/// Register every built-in block on `builder`
pub fn register_builtins(builder: BlockRegistryBuilder) -> BlockRegistryBuilder {
    builder
        .register_block(
            "heading",
            BlockMeta::new("Heading")
                .with_default_prop("text", "Heading")
                .with_default_prop("level", 2),
            from_fn(heading),
        )
        .register_block(
            "text",
            BlockMeta::new("Text").with_default_prop("content", "Write something here."),
            from_fn(text),
        )
        .register_block(
            "hero",
            BlockMeta::new("Hero")
                .with_default_prop("title", "Your headline")
                .with_default_prop("subtitle", "A short supporting sentence.")
                .with_placeholder_height(400),
            from_fn(hero),
        )
        .register_block(
            "features",
            BlockMeta::new("Features")
                .with_default_prop("title", "Features")
                .with_default_prop("items", json!([])),
            from_fn(features),
        )
        .register_block(
            "cta-banner",
            BlockMeta::new("Call to action")
                .with_default_prop("text", "Ready to get started?")
                .with_default_prop("buttonText", "Sign up"),
            from_fn(cta_banner),
        )
        .register_block("columns", BlockMeta::new("Columns"), from_fn(columns))
        .register_block(
            "navbar",
            BlockMeta::new("Navigation")
                .language_aware()
                .with_default_prop("links", json!(["Home", "About"])),
            from_fn(navbar),
        )
        .register_block(
            "language-switcher",
            BlockMeta::new("Language switcher").language_aware(),
            from_fn(language_switcher),
        )
        .register_block(
            "floating-button",
            BlockMeta::new("Floating button")
                .floating()
                .with_default_prop("text", "Contact"),
            from_fn(floating_button),
        )
        .register_block(
            "spacer",
            BlockMeta::new("Spacer").with_placeholder_height(48),
            from_fn(spacer),
        )
}

pub fn builtin_registry() -> BlockRegistry {
    register_builtins(BlockRegistry::builder()).build()
}
