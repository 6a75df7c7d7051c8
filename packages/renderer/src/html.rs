//! HTML serialization of rendered virtual DOM.

use crate::vdom::{CssRule, VNode, VirtualDomDocument};
use crate::viewer::RenderedPage;
use std::collections::BTreeMap;

/// Elements without closing tags
const VOID_ELEMENTS: [&str; 6] = ["br", "hr", "img", "input", "link", "meta"];

/// Marker attribute set on animation wrappers by the renderer
pub const ANIMATE_ATTR: &str = "data-animate";

const REVEAL_RULE: &str = "[data-animate].is-visible { opacity: 1 !important; transform: none !important; }";

/// Load-triggered wrappers reveal after the first frame, scroll-triggered
/// ones when they enter the viewport. Without IntersectionObserver
/// everything reveals at once.
const REVEAL_SCRIPT: [&str; 20] = [
    "document.addEventListener(\"DOMContentLoaded\", function () {",
    "  var reveal = function (el) { el.classList.add(\"is-visible\"); };",
    "  var nodes = Array.prototype.slice.call(document.querySelectorAll(\"[data-animate]\"));",
    "  var onScroll = nodes.filter(function (el) { return el.getAttribute(\"data-animate-trigger\") === \"scroll\"; });",
    "  var onLoad = nodes.filter(function (el) { return onScroll.indexOf(el) < 0; });",
    "  requestAnimationFrame(function () { onLoad.forEach(reveal); });",
    "  if (!(\"IntersectionObserver\" in window)) {",
    "    onScroll.forEach(reveal);",
    "    return;",
    "  }",
    "  var observer = new IntersectionObserver(function (entries) {",
    "    entries.forEach(function (entry) {",
    "      if (entry.isIntersecting) {",
    "        reveal(entry.target);",
    "        observer.unobserve(entry.target);",
    "      }",
    "    });",
    "  }, { threshold: 0.15 });",
    "  onScroll.forEach(function (el) { observer.observe(el); });",
    "});",
];

#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

impl HtmlOptions {
    pub fn compact() -> Self {
        Self {
            pretty: false,
            indent: String::new(),
        }
    }
}

struct Context {
    options: HtmlOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Serialize nodes as an HTML fragment
pub fn to_html(nodes: &[VNode], options: HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    for node in nodes {
        write_node(node, &mut ctx);
    }
    ctx.get_output()
}

/// Serialize a rendered page as a complete HTML document
pub fn page_html(page: &RenderedPage, options: HtmlOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line(&format!("<html lang=\"{}\">", escape_attr(&page.language)));
    ctx.indent();

    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"utf-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    ctx.add_line(&format!("<title>{}</title>", escape_text(&page.title)));
    if let Some(description) = &page.description {
        ctx.add_line(&format!(
            "<meta name=\"description\" content=\"{}\">",
            escape_attr(description)
        ));
    }
    let animated = has_animations(&page.document.nodes);
    write_styles(&page.document, animated, &mut ctx);
    if animated {
        ctx.add_line(&format!(
            "<noscript><style>[{}] {{ opacity: 1 !important; transform: none !important; }}</style></noscript>",
            ANIMATE_ATTR
        ));
    }
    ctx.dedent();
    ctx.add_line("</head>");

    ctx.add_line("<body>");
    ctx.indent();
    for node in &page.document.nodes {
        write_node(node, &mut ctx);
    }
    if animated {
        write_reveal_script(&mut ctx);
    }
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.get_output()
}

fn has_animations(nodes: &[VNode]) -> bool {
    nodes
        .iter()
        .any(|node| node.find(&|n| n.attr(ANIMATE_ATTR).is_some()).is_some())
}

fn write_styles(document: &VirtualDomDocument, animated: bool, ctx: &mut Context) {
    if document.styles.is_empty() && !animated {
        return;
    }
    ctx.add_line("<style>");
    ctx.indent();
    for CssRule {
        selector,
        properties,
    } in &document.styles
    {
        ctx.add_line(&format!("{} {{ {} }}", selector, declarations(properties)));
    }
    if animated {
        ctx.add_line(REVEAL_RULE);
    }
    ctx.dedent();
    ctx.add_line("</style>");
}

fn write_reveal_script(ctx: &mut Context) {
    ctx.add_line("<script>");
    ctx.indent();
    for line in REVEAL_SCRIPT {
        ctx.add_line(line);
    }
    ctx.dedent();
    ctx.add_line("</script>");
}

fn write_node(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Text { content } => ctx.add_line(&escape_text(content)),

        VNode::Element {
            tag,
            attributes,
            styles,
            children,
        } => {
            let open = open_tag(tag, attributes, styles);
            if VOID_ELEMENTS.contains(&tag.as_str()) {
                ctx.add_line(&open);
                return;
            }
            if children.is_empty() {
                ctx.add_line(&format!("{}</{}>", open, tag));
                return;
            }
            ctx.add_line(&open);
            ctx.indent();
            for child in children {
                write_node(child, ctx);
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", tag));
        }

        VNode::Placeholder {
            component_id,
            min_height,
        } => ctx.add_line(&format!(
            "<div class=\"block-placeholder\" data-block-id=\"{}\" style=\"min-height: {}px\"></div>",
            escape_attr(component_id),
            min_height
        )),

        VNode::Error {
            component_id,
            label,
            block_type,
            message,
        } => {
            ctx.add_line(&format!(
                "<div class=\"block-error\" role=\"alert\" data-block-id=\"{}\" data-block-type=\"{}\">",
                escape_attr(component_id),
                escape_attr(block_type)
            ));
            ctx.indent();
            ctx.add_line(&format!(
                "<strong>{} failed to render</strong>",
                escape_text(label)
            ));
            ctx.add_line(&format!("<p>{}</p>", escape_text(message)));
            ctx.add_line(&format!(
                "<button type=\"button\" data-retry=\"{}\">Retry</button>",
                escape_attr(component_id)
            ));
            ctx.dedent();
            ctx.add_line("</div>");
        }
    }
}

fn open_tag(tag: &str, attributes: &BTreeMap<String, String>, styles: &BTreeMap<String, String>) -> String {
    let mut out = format!("<{}", tag);
    for (key, value) in attributes {
        out.push_str(&format!(" {}=\"{}\"", key, escape_attr(value)));
    }
    if !styles.is_empty() {
        out.push_str(&format!(" style=\"{}\"", escape_attr(&declarations(styles))));
    }
    out.push('>');
    out
}

fn declarations(properties: &BTreeMap<String, String>) -> String {
    properties
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
