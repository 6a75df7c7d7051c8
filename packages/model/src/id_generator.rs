use crate::page::Page;
use crc32fast::Hasher;
use std::collections::HashSet;

/// Stable short id derived from a seed string using CRC32
pub fn get_document_id(seed: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(seed.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential component id generator for one page.
///
/// Ids are `<crc32(page id)>-<n>`. Ids already present in the page are
/// skipped, so a generator created for a loaded page never collides with
/// persisted components.
#[derive(Clone, Debug)]
pub struct IdGenerator {
    seed: String,
    count: u32,
    taken: HashSet<String>,
}

impl IdGenerator {
    pub fn new(seed: &str) -> Self {
        Self {
            seed: get_document_id(seed),
            count: 0,
            taken: HashSet::new(),
        }
    }

    /// Generator that avoids every id in `page`
    pub fn for_page(page: &Page) -> Self {
        let mut generator = Self::new(&page.id);
        generator.taken.extend(page.ids());
        generator
    }

    /// Mark an id as used (e.g. after inserting a component created elsewhere)
    pub fn reserve(&mut self, id: impl Into<String>) {
        self.taken.insert(id.into());
    }

    /// Generate the next unused id
    pub fn new_id(&mut self) -> String {
        loop {
            self.count += 1;
            let id = format!("{}-{}", self.seed, self.count);
            if self.taken.insert(id.clone()) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
