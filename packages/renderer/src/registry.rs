//! # Block Registry
//!
//! Static mapping from block type to a lazily loaded implementation.
//!
//! ## Loading contract
//!
//! - Unknown types resolve to `None`. Callers skip them silently.
//! - Each type is loaded at most once: concurrent and repeated resolutions
//!   share one in-flight load and then the cached block.
//! - A failed load is not cached; the next resolution tries again.
//! - The mapping is fixed when `build()` is called.

use crate::block::Block;
use futures::future::{join_all, BoxFuture, FutureExt};
use sitekit_model::Props;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::{watch, Mutex as AsyncMutex, OnceCell};
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Loader for '{block_type}' failed: {message}")]
    Failed { block_type: String, message: String },
}

impl LoadError {
    pub fn failed(block_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoadError::Failed {
            block_type: block_type.into(),
            message: message.into(),
        }
    }
}

pub type LoadFuture = BoxFuture<'static, Result<Arc<dyn Block>, LoadError>>;

/// Produces the block implementation on first use
pub type BlockLoader = Arc<dyn Fn() -> LoadFuture + Send + Sync>;

/// Static description of a block type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockMeta {
    /// Display name for palettes
    pub label: String,
    /// Fixed-position overlay widget, outside normal document flow
    pub floating: bool,
    /// Receives the active language as a prop
    pub language_aware: bool,
    /// Props given to newly created instances
    pub default_props: Props,
    /// Height reserved while the implementation loads
    pub placeholder_height: u32,
}

impl BlockMeta {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            placeholder_height: 120,
            ..Default::default()
        }
    }

    pub fn floating(mut self) -> Self {
        self.floating = true;
        self
    }

    pub fn language_aware(mut self) -> Self {
        self.language_aware = true;
        self
    }

    pub fn with_default_prop(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.default_props.insert(key.into(), value.into());
        self
    }

    pub fn with_placeholder_height(mut self, height: u32) -> Self {
        self.placeholder_height = height;
        self
    }
}

struct BlockEntry {
    meta: BlockMeta,
    loader: BlockLoader,
    cell: OnceCell<Arc<dyn Block>>,
    failure: Mutex<Option<LoadError>>,
    /// Failed attempts so far; callers that waited on a failing load see
    /// the counter move and share its error instead of loading again
    failures: AtomicU64,
    gate: AsyncMutex<()>,
}

/// Current resolution state of a block type, without waiting
#[derive(Clone)]
pub enum Resolution {
    Unknown,
    Pending,
    Ready(Arc<dyn Block>),
    Failed(LoadError),
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Unknown => f.write_str("Unknown"),
            Resolution::Pending => f.write_str("Pending"),
            Resolution::Ready(_) => f.write_str("Ready"),
            Resolution::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

pub struct BlockRegistry {
    entries: HashMap<String, BlockEntry>,
    loads: AtomicUsize,
    in_flight: Mutex<HashSet<String>>,
    loaded_tx: watch::Sender<u64>,
}

impl fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&String> = self.entries.keys().collect();
        types.sort();
        f.debug_struct("BlockRegistry")
            .field("types", &types)
            .field("loads", &self.load_count())
            .finish()
    }
}

impl BlockRegistry {
    pub fn builder() -> BlockRegistryBuilder {
        BlockRegistryBuilder::default()
    }

    pub fn contains(&self, block_type: &str) -> bool {
        self.entries.contains_key(block_type)
    }

    pub fn meta(&self, block_type: &str) -> Option<&BlockMeta> {
        self.entries.get(block_type).map(|e| &e.meta)
    }

    /// Registered types, sorted
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Number of loader invocations so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Resolution state right now
    pub fn peek(&self, block_type: &str) -> Resolution {
        let Some(entry) = self.entries.get(block_type) else {
            return Resolution::Unknown;
        };

        if let Some(block) = entry.cell.get() {
            return Resolution::Ready(block.clone());
        }

        match lock(&entry.failure).clone() {
            Some(err) => Resolution::Failed(err),
            None => Resolution::Pending,
        }
    }

    /// Resolve a block type, loading it on first use.
    ///
    /// Returns `Ok(None)` for unknown types. Concurrent calls share one
    /// load attempt, failed or not; a call made after a failure retries.
    pub async fn resolve(&self, block_type: &str) -> Result<Option<Arc<dyn Block>>, LoadError> {
        let Some(entry) = self.entries.get(block_type) else {
            debug!(block_type, "Unknown block type");
            return Ok(None);
        };
        if let Some(block) = entry.cell.get() {
            return Ok(Some(Arc::clone(block)));
        }

        let seen_failures = entry.failures.load(Ordering::SeqCst);
        let _gate = entry.gate.lock().await;
        if let Some(block) = entry.cell.get() {
            return Ok(Some(Arc::clone(block)));
        }
        if entry.failures.load(Ordering::SeqCst) != seen_failures {
            if let Some(err) = lock(&entry.failure).clone() {
                return Err(err);
            }
        }

        let result = entry
            .cell
            .get_or_try_init(|| async {
                let n = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
                debug!(block_type, load = n, "Loading block implementation");
                (entry.loader)().await
            })
            .await;

        match result {
            Ok(block) => {
                *lock(&entry.failure) = None;
                Ok(Some(block.clone()))
            }
            Err(err) => {
                warn!(block_type, error = %err, "Block load failed");
                *lock(&entry.failure) = Some(err.clone());
                entry.failures.fetch_add(1, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    /// Resolve several types concurrently; returns the failures
    pub async fn preload<I, S>(&self, block_types: I) -> Vec<LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: HashSet<String> = block_types
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();

        let results = join_all(unique.iter().map(|t| self.resolve(t))).await;
        let failures: Vec<LoadError> = results.into_iter().filter_map(Result::err).collect();

        info!(types = unique.len(), failures = failures.len(), "Preloaded block types");
        failures
    }

    /// Start loading `block_type` in the background.
    ///
    /// No-op when the type is unknown, already loaded, already being
    /// requested, or when no tokio runtime is running.
    pub fn request(self: &Arc<Self>, block_type: &str) {
        if !matches!(
            self.peek(block_type),
            Resolution::Pending | Resolution::Failed(_)
        ) {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(block_type, "No runtime available for background load");
            return;
        };

        if !lock(&self.in_flight).insert(block_type.to_string()) {
            return;
        }

        let registry = Arc::clone(self);
        let block_type = block_type.to_string();
        handle.spawn(async move {
            let outcome = registry.resolve(&block_type).await;
            lock(&registry.in_flight).remove(&block_type);
            if outcome.is_ok() {
                registry.loaded_tx.send_modify(|generation| *generation += 1);
            }
        });
    }

    /// Receiver that changes whenever a background load completes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.loaded_tx.subscribe()
    }

    /// Forget a recorded failure so the type reads as pending again
    pub fn clear_failure(&self, block_type: &str) {
        if let Some(entry) = self.entries.get(block_type) {
            *lock(&entry.failure) = None;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Collects registrations; the built registry is immutable
#[derive(Default)]
pub struct BlockRegistryBuilder {
    entries: HashMap<String, BlockEntry>,
}

impl BlockRegistryBuilder {
    /// Register a loader returning a boxed future
    pub fn register(mut self, block_type: impl Into<String>, meta: BlockMeta, loader: BlockLoader) -> Self {
        let block_type = block_type.into();
        if self.entries.contains_key(&block_type) {
            warn!(block_type = %block_type, "Block type registered twice; keeping the last loader");
        }
        self.entries.insert(
            block_type,
            BlockEntry {
                meta,
                loader,
                cell: OnceCell::new(),
                failure: Mutex::new(None),
                failures: AtomicU64::new(0),
                gate: AsyncMutex::new(()),
            },
        );
        self
    }

    /// Register an async loader function
    pub fn register_lazy<F, Fut>(self, block_type: impl Into<String>, meta: BlockMeta, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn Block>, LoadError>> + Send + 'static,
    {
        let loader: BlockLoader = Arc::new(move || loader().boxed());
        self.register(block_type, meta, loader)
    }

    /// Register an implementation that needs no loading work
    pub fn register_block(self, block_type: impl Into<String>, meta: BlockMeta, block: Arc<dyn Block>) -> Self {
        self.register_lazy(block_type, meta, move || {
            let block = Arc::clone(&block);
            async move { Ok(block) }
        })
    }

    pub fn build(self) -> BlockRegistry {
        let (loaded_tx, _) = watch::channel(0);
        info!(types = self.entries.len(), "Block registry built");
        BlockRegistry {
            entries: self.entries,
            loads: AtomicUsize::new(0),
            in_flight: Mutex::new(HashSet::new()),
            loaded_tx,
        }
    }
}
