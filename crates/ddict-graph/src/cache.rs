//! # Per-Call Term Cache
//!
//! Read-through memo of term lookups, keyed by global identifier. A
//! multi-hop resolution chain touches the same terms repeatedly; the
//! cache keeps that to one store round-trip per identifier.
//!
//! A cache is owned by one top-level call and discarded afterward. It is
//! never shared across concurrent calls: term documents may change
//! between calls and no invalidation protocol exists.

use std::cell::RefCell;
use std::collections::HashMap;

use ddict_core::{GlobalId, IdentifierField, StoreError, TermDocument, TermStore};

/// Read-through cache over a [`TermStore`]. Negative lookups are cached
/// too, since a resolution chain probes missing aliases repeatedly.
#[derive(Debug)]
pub struct TermCache<'a, T: TermStore> {
    store: &'a T,
    memo: RefCell<HashMap<GlobalId, Option<TermDocument>>>,
}

impl<'a, T: TermStore> TermCache<'a, T> {
    /// Wrap a store for the duration of one top-level call.
    pub fn new(store: &'a T) -> Self {
        Self {
            store,
            memo: RefCell::new(HashMap::new()),
        }
    }

    /// Number of distinct identifiers looked up so far.
    pub fn probed(&self) -> usize {
        self.memo.borrow().len()
    }
}

impl<T: TermStore> TermStore for TermCache<'_, T> {
    fn get(&self, gid: &GlobalId) -> Result<Option<TermDocument>, StoreError> {
        if let Some(hit) = self.memo.borrow().get(gid) {
            return Ok(hit.clone());
        }
        let fetched = self.store.get(gid)?;
        self.memo.borrow_mut().insert(gid.clone(), fetched.clone());
        Ok(fetched)
    }

    fn exists(&self, gid: &GlobalId) -> Result<bool, StoreError> {
        Ok(self.get(gid)?.is_some())
    }

    // Field search stays uncached: results depend on the whole store, not
    // on one identifier.
    fn search_by_field(
        &self,
        field: IdentifierField,
        code: &str,
    ) -> Result<Vec<GlobalId>, StoreError> {
        self.store.search_by_field(field, code)
    }
}
