//! Indexed resource registry
//!
//! An append-only table of loaded resources. Every entry keeps the index it
//! was given at load time for the lifetime of the registry; indices are never
//! reused or reordered. Releasing an entry empties its slot but keeps the
//! slot, so later lookups report [`RegistryError::Released`] instead of
//! silently resolving to something else.

use super::AssetError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Registry lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Index is negative or past the end of the registry
    #[error("Index {index} out of range (registry holds {len} entries)")]
    OutOfRange {
        /// Requested index
        index: i64,
        /// Registry length at lookup time
        len: usize,
    },

    /// The entry at this index was released
    #[error("Entry {index} has been released")]
    Released {
        /// Requested index
        index: usize,
    },
}

/// First failure of a bulk load
///
/// Entries loaded before the failure stay in the registry.
#[derive(Error, Debug)]
#[error("Bulk load stopped at entry {index} ({}) after {loaded} successful loads: {source}", path.display())]
pub struct BulkLoadError {
    /// Position of the failing path in the input list
    pub index: usize,
    /// The failing path
    pub path: PathBuf,
    /// Number of entries appended before the failure
    pub loaded: usize,
    /// Why the entry failed
    #[source]
    pub source: AssetError,
}

/// Typed, stable reference to a registry entry
pub struct Handle<T> {
    index: usize,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Create a handle from a raw index
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying index
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// Append-only table of resources addressed by load order
pub struct Registry<T> {
    entries: Vec<Option<T>>,
    /// Name used in log messages
    label: &'static str,
}

impl<T> Registry<T> {
    /// Create an empty registry
    pub const fn new(label: &'static str) -> Self {
        Self {
            entries: Vec::new(),
            label,
        }
    }

    /// Number of slots, including released ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was ever loaded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry and return its handle
    pub fn push(&mut self, item: T) -> Handle<T> {
        let handle = Handle::new(self.entries.len());
        self.entries.push(Some(item));
        handle
    }

    /// Look up an entry by handle
    pub fn get(&self, handle: Handle<T>) -> Result<&T, RegistryError> {
        self.slot(handle.index)
    }

    /// Look up an entry by raw index
    ///
    /// Negative indices and indices at or past [`len`](Self::len) fail with
    /// [`RegistryError::OutOfRange`].
    pub fn get_by_index(&self, index: i64) -> Result<&T, RegistryError> {
        let position = usize::try_from(index).map_err(|_| RegistryError::OutOfRange {
            index,
            len: self.entries.len(),
        })?;
        self.slot(position)
    }

    /// Handle for a raw index, if it is in range
    pub fn handle(&self, index: i64) -> Result<Handle<T>, RegistryError> {
        let position = usize::try_from(index).map_err(|_| RegistryError::OutOfRange {
            index,
            len: self.entries.len(),
        })?;
        self.slot(position)?;
        Ok(Handle::new(position))
    }

    /// Take an entry out of its slot
    ///
    /// The slot stays allocated so no other entry ever takes its index.
    pub fn release(&mut self, handle: Handle<T>) -> Result<T, RegistryError> {
        let len = self.entries.len();
        let slot = self.entries.get_mut(handle.index).ok_or(RegistryError::OutOfRange {
            index: i64::try_from(handle.index).unwrap_or(i64::MAX),
            len,
        })?;
        slot.take().ok_or(RegistryError::Released { index: handle.index })
    }

    /// Empty every slot, yielding the live entries in index order
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.entries.iter_mut().filter_map(Option::take)
    }

    /// Iterate over live entries with their handles
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.as_ref().map(|item| (Handle::new(index), item)))
    }

    /// Load each path in order, appending every success
    ///
    /// Stops at the first failure. Entries appended before the failure are
    /// kept, so after an error the registry holds a prefix of `paths` and the
    /// caller may retry with the remaining paths.
    ///
    /// Returns the number of entries appended.
    pub fn load_many<P, F>(&mut self, paths: &[P], mut load: F) -> Result<usize, BulkLoadError>
    where
        P: AsRef<Path>,
        F: FnMut(&Path) -> Result<T, AssetError>,
    {
        let mut loaded = 0;
        for (index, path) in paths.iter().enumerate() {
            let path = path.as_ref();
            match load(path) {
                Ok(item) => {
                    let handle = self.push(item);
                    log::debug!("{} registry: loaded {:?} as entry {}", self.label, path, handle.index());
                    loaded += 1;
                }
                Err(source) => {
                    log::warn!(
                        "{} registry: bulk load aborted at {:?} ({} of {} loaded): {}",
                        self.label,
                        path,
                        loaded,
                        paths.len(),
                        source
                    );
                    return Err(BulkLoadError {
                        index,
                        path: path.to_path_buf(),
                        loaded,
                        source,
                    });
                }
            }
        }

        log::info!("{} registry: loaded {} entries ({} total)", self.label, loaded, self.len());
        Ok(loaded)
    }

    fn slot(&self, index: usize) -> Result<&T, RegistryError> {
        match self.entries.get(index) {
            Some(Some(item)) => Ok(item),
            Some(None) => Err(RegistryError::Released { index }),
            None => Err(RegistryError::OutOfRange {
                index: i64::try_from(index).unwrap_or(i64::MAX),
                len: self.entries.len(),
            }),
        }
    }
}
