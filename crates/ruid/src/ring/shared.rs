use std::sync::Arc;

use super::{
    Md5Hasher, PlacementHasher, Ring,
    lock::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use crate::{Id, Result, Ruid};

/// A [`Ring`] behind a read-write lock.
///
/// Lookups share the read lock and never observe a half-built table: a
/// rebuild happens entirely under the write lock, and a failed rebuild leaves
/// the previous table published.
///
/// Returned node names are reference-counted so they outlive the read guard.
///
/// With the `parking-lot` feature the lock is a `parking_lot::RwLock`;
/// otherwise `std::sync::RwLock`, whose poisoning surfaces as
/// [`Error::LockPoisoned`](crate::Error::LockPoisoned).
#[derive(Debug)]
pub struct SharedRing<ID = Ruid, H = Md5Hasher>
where
    ID: Id,
    H: PlacementHasher,
{
    inner: RwLock<Ring<ID, H>>,
}

impl<ID, H> SharedRing<ID, H>
where
    ID: Id,
    H: PlacementHasher,
{
    pub fn new(ring: Ring<ID, H>) -> Self {
        Self {
            inner: RwLock::new(ring),
        }
    }

    /// See [`Ring::get`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`](crate::Error::LockPoisoned) if a writer
    /// panicked while holding the lock.
    pub fn get(&self, id: ID) -> Result<Option<Arc<str>>> {
        let ring = self.read()?;
        Ok(ring.locate(id).cloned())
    }

    /// See [`Ring::update`].
    ///
    /// # Errors
    ///
    /// Returns a ring conflict or a poisoned lock.
    pub fn update<I, S>(&self, weights: I) -> Result<bool>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        self.write()?.update(weights)
    }

    /// See [`Ring::append`].
    ///
    /// # Errors
    ///
    /// Returns a ring conflict or a poisoned lock.
    pub fn append<I, S>(&self, nodes: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write()?.append(nodes)
    }

    /// See [`Ring::remove`].
    ///
    /// # Errors
    ///
    /// Returns a poisoned lock.
    pub fn remove<I, S>(&self, nodes: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.write()?.remove(nodes)
    }

    /// Runs `f` against a consistent snapshot of the ring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`](crate::Error::LockPoisoned) if a writer
    /// panicked while holding the lock.
    pub fn with_ring<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Ring<ID, H>) -> T,
    {
        let ring = self.read()?;
        Ok(f(&ring))
    }

    /// Consumes the lock and returns the ring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`](crate::Error::LockPoisoned) if a writer
    /// panicked while holding the lock.
    #[cfg(feature = "parking-lot")]
    #[allow(clippy::unnecessary_wraps)]
    pub fn into_inner(self) -> Result<Ring<ID, H>> {
        Ok(self.inner.into_inner())
    }

    /// Consumes the lock and returns the ring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`](crate::Error::LockPoisoned) if a writer
    /// panicked while holding the lock.
    #[cfg(not(feature = "parking-lot"))]
    pub fn into_inner(self) -> Result<Ring<ID, H>> {
        self.inner
            .into_inner()
            .map_err(|_| crate::Error::LockPoisoned)
    }

    #[cfg(feature = "parking-lot")]
    #[allow(clippy::unnecessary_wraps)]
    fn read(&self) -> Result<RwLockReadGuard<'_, Ring<ID, H>>> {
        Ok(self.inner.read())
    }

    #[cfg(not(feature = "parking-lot"))]
    fn read(&self) -> Result<RwLockReadGuard<'_, Ring<ID, H>>> {
        self.inner.read().map_err(|_| crate::Error::LockPoisoned)
    }

    #[cfg(feature = "parking-lot")]
    #[allow(clippy::unnecessary_wraps)]
    fn write(&self) -> Result<RwLockWriteGuard<'_, Ring<ID, H>>> {
        Ok(self.inner.write())
    }

    #[cfg(not(feature = "parking-lot"))]
    fn write(&self) -> Result<RwLockWriteGuard<'_, Ring<ID, H>>> {
        self.inner.write().map_err(|_| crate::Error::LockPoisoned)
    }
}

impl<ID, H> From<Ring<ID, H>> for SharedRing<ID, H>
where
    ID: Id,
    H: PlacementHasher,
{
    fn from(ring: Ring<ID, H>) -> Self {
        Self::new(ring)
    }
}
