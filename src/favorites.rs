//! In-memory favorites set.
//!
//! Names are stored lowercased so that "Pikachu" and "pikachu" are one entry;
//! capitalization happens at render time. `list()` is the single source of the
//! display order, and index-based removal maps through the same listing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FavoritesError {
    #[error("Please select or enter a Pokemon")]
    EmptyName,
}

/// Outcome of a successful `add`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Added {
    New,
    AlreadyPresent,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesStore {
    names: BTreeSet<String>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str) -> Result<Added, FavoritesError> {
        let key = normalize(name);
        if key.is_empty() {
            return Err(FavoritesError::EmptyName);
        }
        if self.names.insert(key) {
            Ok(Added::New)
        } else {
            Ok(Added::AlreadyPresent)
        }
    }

    pub fn remove<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.names.remove(&normalize(name.as_ref()));
        }
    }

    /// Removes the rows at `indices` of the current `list()`. Out-of-range indices are ignored.
    /// Returns the names that were removed.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<String> {
        let listing = self.list();
        let doomed: Vec<String> = indices
            .iter()
            .filter_map(|index| listing.get(*index).cloned())
            .collect();
        self.remove(&doomed);
        doomed
    }

    pub fn list(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
