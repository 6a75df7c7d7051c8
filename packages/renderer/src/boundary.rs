//! Per-component error boundaries.
//!
//! A failed render is recorded against its component id and keeps showing
//! the error card until the failure is cleared with a retry.

use std::collections::HashMap;
use std::sync::Mutex;

const MAX_MESSAGE_CHARS: usize = 160;

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryState {
    pub block_type: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ErrorBoundaries {
    tripped: Mutex<HashMap<String, BoundaryState>>,
}

impl ErrorBoundaries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, component_id: &str, block_type: &str, message: &str) {
        let state = BoundaryState {
            block_type: block_type.to_string(),
            message: truncate(message),
        };
        self.lock().insert(component_id.to_string(), state);
    }

    pub fn get(&self, component_id: &str) -> Option<BoundaryState> {
        self.lock().get(component_id).cloned()
    }

    /// Returns the cleared state, if the boundary was tripped
    pub fn clear(&self, component_id: &str) -> Option<BoundaryState> {
        self.lock().remove(component_id)
    }

    /// Drop boundaries whose component no longer exists; returns how many
    pub fn retain(&self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let mut tripped = self.lock();
        let before = tripped.len();
        tripped.retain(|id, _| keep(id));
        before - tripped.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, BoundaryState>> {
        self.tripped
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn truncate(message: &str) -> String {
    if message.chars().count() <= MAX_MESSAGE_CHARS {
        return message.to_string();
    }
    let mut short: String = message.chars().take(MAX_MESSAGE_CHARS).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_clear() {
        let boundaries = ErrorBoundaries::new();
        boundaries.record("c1", "hero", "boom");

        assert_eq!(boundaries.get("c1").map(|s| s.message), Some("boom".to_string()));
        assert!(boundaries.clear("c1").is_some());
        assert!(boundaries.is_empty());
    }

    #[test]
    fn test_retain_prunes_removed_components() {
        let boundaries = ErrorBoundaries::new();
        boundaries.record("c1", "hero", "boom");
        boundaries.record("c2", "map", "timeout");

        assert_eq!(boundaries.retain(|id| id == "c2"), 1);
        assert!(boundaries.get("c1").is_none());
        assert!(boundaries.get("c2").is_some());
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let boundaries = ErrorBoundaries::new();
        boundaries.record("c1", "hero", &"x".repeat(500));

        let message = boundaries.get("c1").map(|s| s.message).unwrap_or_default();
        assert_eq!(message.chars().count(), MAX_MESSAGE_CHARS + 1);
    }
}
