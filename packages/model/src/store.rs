//! Storage provider boundary.
//!
//! Editors and renderers work on already-loaded sites; only the site
//! manager layer talks to a `SiteStore`.

use crate::error::ModelError;
use crate::site::Site;
use crate::template::SiteTemplate;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Site not found: {0}")]
    NotFound(String),

    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Filters for `list_sites`
#[derive(Debug, Clone, Default)]
pub struct SiteQuery {
    pub published_only: bool,
    /// Case-insensitive substring match on name or slug
    pub search: Option<String>,
    pub limit: Option<usize>,
}

/// Initial data for `create_site`
#[derive(Debug, Clone)]
pub struct NewSite {
    pub name: String,
    pub slug: String,
    pub template: Option<SiteTemplate>,
}

/// Storage provider contract
pub trait SiteStore {
    fn list_sites(&self, query: &SiteQuery) -> Vec<Site>;

    fn get_site_by_slug(&self, slug: &str) -> Option<Site>;

    fn create_site(&mut self, initial: NewSite) -> Result<Site, StoreError>;

    fn delete_site(&mut self, id: &str) -> Result<(), StoreError>;
}

/// In-memory store, insertion ordered
#[derive(Debug, Default)]
pub struct MemorySiteStore {
    sites: Vec<Site>,
}

impl MemorySiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already-built site (e.g. loaded from disk)
    pub fn insert(&mut self, site: Site) -> Result<(), StoreError> {
        if self.sites.iter().any(|s| s.slug == site.slug) {
            return Err(StoreError::SlugTaken(site.slug));
        }
        self.sites.push(site);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl SiteStore for MemorySiteStore {
    fn list_sites(&self, query: &SiteQuery) -> Vec<Site> {
        let needle = query.search.as_ref().map(|s| s.to_lowercase());

        self.sites
            .iter()
            .filter(|s| !query.published_only || s.published)
            .filter(|s| match &needle {
                Some(n) => s.name.to_lowercase().contains(n) || s.slug.contains(n.as_str()),
                None => true,
            })
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    fn get_site_by_slug(&self, slug: &str) -> Option<Site> {
        self.sites.iter().find(|s| s.slug == slug).cloned()
    }

    fn create_site(&mut self, initial: NewSite) -> Result<Site, StoreError> {
        if self.sites.iter().any(|s| s.slug == initial.slug) {
            return Err(StoreError::SlugTaken(initial.slug));
        }

        let site = match &initial.template {
            Some(template) => Site::from_template(initial.name, initial.slug, template)?,
            None => Site::blank(initial.name, initial.slug)?,
        };

        info!(slug = %site.slug, pages = site.pages.len(), "Created site");
        self.sites.push(site.clone());
        Ok(site)
    }

    fn delete_site(&mut self, id: &str) -> Result<(), StoreError> {
        let index = self
            .sites
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.sites.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::starter_template;

    fn new_site(name: &str, slug: &str) -> NewSite {
        NewSite {
            name: name.to_string(),
            slug: slug.to_string(),
            template: None,
        }
    }

    #[test]
    fn test_create_rejects_taken_slug() {
        let mut store = MemorySiteStore::new();
        store.create_site(new_site("Acme", "acme")).unwrap();

        let result = store.create_site(new_site("Acme 2", "acme"));
        assert_eq!(result, Err(StoreError::SlugTaken("acme".to_string())));
    }

    #[test]
    fn test_create_from_template() {
        let mut store = MemorySiteStore::new();
        let site = store
            .create_site(NewSite {
                name: "Demo".to_string(),
                slug: "demo".to_string(),
                template: Some(starter_template()),
            })
            .unwrap();

        assert_eq!(site.pages.len(), 2);
        assert_eq!(store.get_site_by_slug("demo"), Some(site));
    }

    #[test]
    fn test_list_filters() {
        let mut store = MemorySiteStore::new();
        store.create_site(new_site("Acme", "acme")).unwrap();
        let mut globex = Site::blank("Globex", "globex").unwrap();
        globex.published = true;
        store.insert(globex).unwrap();

        let published = store.list_sites(&SiteQuery {
            published_only: true,
            ..Default::default()
        });
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].slug, "globex");

        let searched = store.list_sites(&SiteQuery {
            search: Some("ACM".to_string()),
            ..Default::default()
        });
        assert_eq!(searched.len(), 1);

        let limited = store.list_sites(&SiteQuery {
            limit: Some(1),
            ..Default::default()
        });
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_delete_site() {
        let mut store = MemorySiteStore::new();
        let site = store.create_site(new_site("Acme", "acme")).unwrap();

        assert!(store.delete_site(&site.id).is_ok());
        assert!(store.is_empty());
        assert_eq!(
            store.delete_site(&site.id),
            Err(StoreError::NotFound(site.id.clone()))
        );
    }
}
