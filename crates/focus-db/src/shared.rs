//! Process-wide handle to one [`Database`].

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{Database, DbError};

/// A cloneable handle that serializes access to a [`Database`].
///
/// Each call to [`SharedDatabase::with`] holds the lock for the whole closure,
/// so a rebuild's read of events and its session replacement cannot interleave
/// with an append from another thread.
#[derive(Clone)]
pub struct SharedDatabase {
    inner: Arc<Mutex<Database>>,
}

impl SharedDatabase {
    pub fn new(db: Database) -> Self {
        Self {
            inner: Arc::new(Mutex::new(db)),
        }
    }

    /// Acquires the database for one logical operation.
    pub fn lock(&self) -> Result<MutexGuard<'_, Database>, DbError> {
        self.inner.lock().map_err(|_| DbError::Poisoned)
    }

    /// Runs `f` with exclusive access to the database.
    pub fn with<T, E>(&self, f: impl FnOnce(&mut Database) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let mut guard = self.lock()?;
        f(&mut *guard)
    }
}
