//! Book engine handle

use crate::events::SettlementObserver;
use common::{Instruction, SecurityLookup};
use parking_lot::RwLock;
use state_store::Store;
use std::sync::Arc;

/// The position book
///
/// Holds the shared store, the typed lookup into the Security Registry, and
/// the post-commit settlement observers. All operations live in the
/// per-concern modules (`position`, `settlement`, `redemption`, `history`,
/// `dispatch`).
pub struct BookLedger {
    pub(crate) store: Arc<Store>,
    pub(crate) lookup: Arc<dyn SecurityLookup>,
    observers: RwLock<Vec<Box<dyn SettlementObserver>>>,
}

impl BookLedger {
    /// Create a book over a store and a registry lookup
    pub fn new(store: Arc<Store>, lookup: Arc<dyn SecurityLookup>) -> Self {
        Self {
            store,
            lookup,
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register a settlement observer
    pub fn subscribe(&self, observer: Box<dyn SettlementObserver>) {
        self.observers.write().push(observer);
    }

    pub(crate) fn notify_settled(&self, instruction: &Instruction) {
        for observer in self.observers.read().iter() {
            observer.instruction_settled(instruction);
        }
    }
}

impl std::fmt::Debug for BookLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookLedger")
            .field("observers", &self.observers.read().len())
            .finish_non_exhaustive()
    }
}
