//! View controllers: state plus actions a renderer binds to.
//!
//! - `list.rs`: paged list, search, delete entry point
//! - `detail.rs`: read-only record
//! - `update.rs`: create/edit form and save
//! - `delete.rs`: delete confirmation dialog

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

pub use delete::{DialogOutcome, MovieDeleteDialog};
pub use detail::MovieDetailView;
pub use list::MovieListView;
pub use update::MovieUpdateView;

/// Shared "request in flight" flag (`is_loading`, `is_saving`).
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set the flag until the returned guard drops.
    pub(crate) fn raise(&self) -> BusyGuard {
        self.0.store(true, Ordering::SeqCst);
        BusyGuard(self.clone())
    }
}

pub(crate) struct BusyGuard(BusyFlag);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.0.store(false, Ordering::SeqCst);
    }
}
