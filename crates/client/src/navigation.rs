//! Navigation collaborator used by the resolver and the views.

use std::sync::{Mutex, PoisonError};

pub const NOT_FOUND_PAGE: &str = "404";
pub const ACCESS_DENIED_PAGE: &str = "accessdenied";

/// Host-side router: the module only ever pushes a path or goes back.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);

    /// Return to the previous page.
    fn back(&self);
}

/// In-process navigation stack.
#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Navigator for History {
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "navigate");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }

    fn back(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let left = entries.pop();
        tracing::debug!(?left, "navigate back");
    }
}
