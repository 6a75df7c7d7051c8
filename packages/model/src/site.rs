//! # Sites
//!
//! The top-level aggregate. A site owns its pages and its single theme.

use crate::error::{ModelError, ModelResult};
use crate::id_generator::get_document_id;
use crate::page::Page;
use crate::template::SiteTemplate;
use crate::theme::Theme;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    /// URL-safe, unique across the store
    pub slug: String,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub pages: Vec<Page>,

    #[serde(default)]
    pub published: bool,

    #[serde(default = "default_language")]
    pub default_language: String,

    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_languages() -> Vec<String> {
    vec![default_language()]
}

impl Site {
    /// Blank site with a single empty home page
    pub fn blank(name: impl Into<String>, slug: impl Into<String>) -> ModelResult<Self> {
        let slug = slug.into();
        if !is_valid_slug(&slug) {
            return Err(ModelError::InvalidSlug(slug));
        }

        let id = get_document_id(&slug);
        let home = Page::new(format!("{}-home", id), "Home", "home").home();
        let now = Utc::now();

        Ok(Self {
            id,
            name: name.into(),
            slug,
            theme: Theme::default(),
            pages: vec![home],
            published: false,
            default_language: default_language(),
            languages: default_languages(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Site whose pages come from a template's page generator, unmodified
    pub fn from_template(
        name: impl Into<String>,
        slug: impl Into<String>,
        template: &SiteTemplate,
    ) -> ModelResult<Self> {
        let mut site = Self::blank(name, slug)?;
        site.theme = template.theme.clone();
        site.pages = (template.generate_pages)();
        debug!(template = %template.id, pages = site.pages.len(), "Created site from template");
        Ok(site)
    }

    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The marked home page, else the first page
    pub fn home_page(&self) -> Option<&Page> {
        self.pages
            .iter()
            .find(|p| p.is_home_page)
            .or_else(|| self.pages.first())
    }

    pub fn page_by_slug(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    pub fn page_by_slug_mut(&mut self, slug: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.slug == slug)
    }

    /// Page selection used by the public viewer.
    ///
    /// An explicit slug must match; no slug (or an empty one) means home.
    pub fn resolve_page(&self, slug: Option<&str>) -> Option<&Page> {
        match slug {
            Some(s) if !s.is_empty() => self.page_by_slug(s),
            _ => self.home_page(),
        }
    }

    /// Append a page; its slug must be unique within the site
    pub fn add_page(&mut self, page: Page) -> ModelResult<()> {
        if !is_valid_slug(&page.slug) {
            return Err(ModelError::InvalidSlug(page.slug));
        }
        if self.page_by_slug(&page.slug).is_some() {
            return Err(ModelError::DuplicatePageSlug(page.slug));
        }
        self.pages.push(page);
        self.touch();
        Ok(())
    }

    pub fn remove_page(&mut self, slug: &str) -> ModelResult<Page> {
        let index = self
            .pages
            .iter()
            .position(|p| p.slug == slug)
            .ok_or_else(|| ModelError::PageNotFound(slug.to_string()))?;
        let page = self.pages.remove(index);
        self.touch();
        Ok(page)
    }

    /// Mark `slug` as the only home page
    pub fn set_home_page(&mut self, slug: &str) -> ModelResult<()> {
        if self.page_by_slug(slug).is_none() {
            return Err(ModelError::PageNotFound(slug.to_string()));
        }
        for page in &mut self.pages {
            page.is_home_page = page.slug == slug;
        }
        self.touch();
        Ok(())
    }

    /// Replace the theme as a whole value
    pub fn replace_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Lowercase ASCII letters, digits and single inner hyphens
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Turn a display name into a URL-safe slug
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_site_has_home_page() {
        let site = Site::blank("Acme", "acme").unwrap();
        assert_eq!(site.pages.len(), 1);
        assert_eq!(site.home_page().unwrap().slug, "home");
        assert!(!site.published);
    }

    #[test]
    fn test_blank_rejects_bad_slug() {
        assert_eq!(
            Site::blank("Acme", "Acme Inc"),
            Err(ModelError::InvalidSlug("Acme Inc".to_string()))
        );
    }

    #[test]
    fn test_home_page_falls_back_to_first() {
        let mut site = Site::blank("Acme", "acme").unwrap();
        site.pages[0].is_home_page = false;
        site.add_page(Page::new("p2", "About", "about")).unwrap();

        assert_eq!(site.home_page().unwrap().slug, "home");

        site.set_home_page("about").unwrap();
        assert_eq!(site.home_page().unwrap().slug, "about");
        assert_eq!(site.pages.iter().filter(|p| p.is_home_page).count(), 1);
    }

    #[test]
    fn test_resolve_page() {
        let mut site = Site::blank("Acme", "acme").unwrap();
        site.add_page(Page::new("p2", "About", "about")).unwrap();

        assert_eq!(site.resolve_page(Some("about")).unwrap().slug, "about");
        assert_eq!(site.resolve_page(None).unwrap().slug, "home");
        assert_eq!(site.resolve_page(Some("")).unwrap().slug, "home");
        assert!(site.resolve_page(Some("missing")).is_none());
    }

    #[test]
    fn test_add_page_rejects_duplicate_slug() {
        let mut site = Site::blank("Acme", "acme").unwrap();
        let result = site.add_page(Page::new("p2", "Home again", "home"));
        assert_eq!(result, Err(ModelError::DuplicatePageSlug("home".to_string())));
    }

    #[test]
    fn test_slug_helpers() {
        assert!(is_valid_slug("my-site-2"));
        assert!(!is_valid_slug("-site"));
        assert!(!is_valid_slug("my--site"));
        assert!(!is_valid_slug(""));
        assert_eq!(slugify("  My Great Site! "), "my-great-site");
        assert_eq!(slugify("Café 42"), "caf-42");
    }

    #[test]
    fn test_json_roundtrip_keeps_tree() {
        let site = Site::blank("Acme", "acme").unwrap();
        let json = site.to_json_pretty().unwrap();
        let restored = Site::from_json(&json).unwrap();
        assert_eq!(site, restored);
    }
}
