//! Public site viewer.

use crate::renderer::{ComponentRenderer, RenderContext};
use crate::vdom::VirtualDomDocument;
use sitekit_model::{DeviceView, Site};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    #[error("Site '{0}' is not published")]
    NotPublished(String),

    #[error("Page '{page}' not found on site '{site}'")]
    PageNotFound { site: String, page: String },

    #[error("Site '{0}' has no pages")]
    EmptySite(String),
}

#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Refuse unpublished sites
    pub require_published: bool,
    pub device: DeviceView,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            require_published: true,
            device: DeviceView::Desktop,
        }
    }
}

/// A page as served to visitors
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub language: String,
    pub document: VirtualDomDocument,
}

/// Render a page of `site` for visitors.
///
/// Without a slug, the home page is shown.
pub fn render_site(
    renderer: &ComponentRenderer,
    site: &Site,
    page_slug: Option<&str>,
    options: &ViewerOptions,
) -> Result<RenderedPage, ViewerError> {
    if options.require_published && !site.published {
        return Err(ViewerError::NotPublished(site.slug.clone()));
    }
    if site.pages.is_empty() {
        return Err(ViewerError::EmptySite(site.slug.clone()));
    }

    let page = site
        .resolve_page(page_slug)
        .ok_or_else(|| ViewerError::PageNotFound {
            site: site.slug.clone(),
            page: page_slug.unwrap_or_default().to_string(),
        })?;

    let ctx = RenderContext::public(&site.theme, options.device)
        .with_language(&site.default_language);
    let document = renderer.render_page(page, &ctx);

    info!(site = %site.slug, page = %page.slug, "Rendered public page");

    Ok(RenderedPage {
        slug: page.slug.clone(),
        title: page.document_title().to_string(),
        description: page.seo.as_ref().and_then(|s| s.description.clone()),
        language: site.default_language.clone(),
        document,
    })
}
