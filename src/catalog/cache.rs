use std::collections::HashMap;

use crate::curve::FillCurve;
use crate::error::Result;

use super::UnitKey;

/// Fill curves of the units measured so far in one batch run.
///
/// Populate-once: the first successful computation for a key is kept and
/// reused. A failed computation stores nothing.
#[derive(Debug, Default)]
pub struct UnitCache {
    curves: HashMap<UnitKey, FillCurve>,
}

impl UnitCache {
    /// Creates a new, empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached curve for `key`, computing and storing it on a
    /// miss.
    ///
    /// # Errors
    ///
    /// Propagates the error of `compute`; the cache is left unchanged.
    pub fn get_or_compute<F>(&mut self, key: UnitKey, compute: F) -> Result<&FillCurve>
    where
        F: FnOnce() -> Result<FillCurve>,
    {
        use std::collections::hash_map::Entry;

        match self.curves.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let curve = compute()?;
                Ok(entry.insert(curve))
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &UnitKey) -> Option<&FillCurve> {
        self.curves.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &UnitKey) -> bool {
        self.curves.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}
