use crate::component::Component;
use crate::page::Page;
use crate::site::Site;

/// Visitor for walking a site tree immutably.
///
/// Default implementations walk everything; override the hooks you need.
pub trait Visitor: Sized {
    fn visit_site(&mut self, site: &Site) {
        for page in &site.pages {
            self.visit_page(page);
        }
    }

    fn visit_page(&mut self, page: &Page) {
        walk_page(self, page);
    }

    /// `depth` is 0 for top-level page components
    fn visit_component(&mut self, component: &Component, depth: usize) {
        walk_component(self, component, depth);
    }
}

pub fn walk_page<V: Visitor>(visitor: &mut V, page: &Page) {
    for component in &page.components {
        visitor.visit_component(component, 0);
    }
}

pub fn walk_component<V: Visitor>(visitor: &mut V, component: &Component, depth: usize) {
    for child in &component.children {
        visitor.visit_component(child, depth + 1);
    }
}
