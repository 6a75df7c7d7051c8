/// Structural checks for sites loaded from storage or templates
use crate::component::Component;
use crate::page::Page;
use crate::site::{is_valid_slug, Site};
use crate::visitor::{walk_component, Visitor};
use std::collections::HashSet;

/// Validation warning level
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    /// Tolerated: rendering falls back to a convention
    Warning,
    /// Breaks lookups or routing
    Error,
}

/// Validation finding
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
    pub page_slug: Option<String>,
}

impl ValidationWarning {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: ValidationLevel::Warning,
            message: message.into(),
            page_slug: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ValidationLevel::Error,
            message: message.into(),
            page_slug: None,
        }
    }

    pub fn on_page(mut self, slug: impl Into<String>) -> Self {
        self.page_slug = Some(slug.into());
        self
    }
}

/// Site validator
#[derive(Debug, Default)]
pub struct Validator {
    warnings: Vec<ValidationWarning>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&mut self, site: &Site) -> Vec<ValidationWarning> {
        self.warnings.clear();

        if !is_valid_slug(&site.slug) {
            self.warnings
                .push(ValidationWarning::error(format!("Site slug '{}' is not URL-safe", site.slug)));
        }

        if !site.languages.contains(&site.default_language) {
            self.warnings.push(ValidationWarning::warning(format!(
                "Default language '{}' is not in the language list",
                site.default_language
            )));
        }

        if site.pages.is_empty() {
            self.warnings
                .push(ValidationWarning::warning("Site has no pages"));
        }

        let home_count = site.pages.iter().filter(|p| p.is_home_page).count();
        if home_count > 1 {
            self.warnings.push(ValidationWarning::error(format!(
                "{} pages are marked as home page",
                home_count
            )));
        } else if home_count == 0 && !site.pages.is_empty() {
            self.warnings.push(ValidationWarning::warning(
                "No home page marked; the first page is used",
            ));
        }

        let mut slugs = HashSet::new();
        for page in &site.pages {
            if !slugs.insert(page.slug.as_str()) {
                self.warnings.push(
                    ValidationWarning::error(format!("Duplicate page slug '{}'", page.slug))
                        .on_page(&page.slug),
                );
            }
            if !is_valid_slug(&page.slug) {
                self.warnings.push(
                    ValidationWarning::error(format!("Page slug '{}' is not URL-safe", page.slug))
                        .on_page(&page.slug),
                );
            }
            self.check_component_ids(page);
        }

        self.warnings.clone()
    }

    fn check_component_ids(&mut self, page: &Page) {
        let mut checker = DuplicateIdChecker::default();
        checker.visit_page(page);

        for id in checker.duplicates {
            self.warnings.push(
                ValidationWarning::error(format!("Duplicate component id '{}'", id))
                    .on_page(&page.slug),
            );
        }
        for id in checker.empty_types {
            self.warnings.push(
                ValidationWarning::warning(format!("Component '{}' has no type", id))
                    .on_page(&page.slug),
            );
        }
    }

    pub fn has_errors(warnings: &[ValidationWarning]) -> bool {
        warnings.iter().any(|w| w.level == ValidationLevel::Error)
    }
}

#[derive(Default)]
struct DuplicateIdChecker {
    seen: HashSet<String>,
    duplicates: Vec<String>,
    empty_types: Vec<String>,
}

impl Visitor for DuplicateIdChecker {
    fn visit_component(&mut self, component: &Component, depth: usize) {
        if !self.seen.insert(component.id.clone()) {
            self.duplicates.push(component.id.clone());
        }
        if component.block_type.is_empty() {
            self.empty_types.push(component.id.clone());
        }
        walk_component(self, component, depth);
    }
}
