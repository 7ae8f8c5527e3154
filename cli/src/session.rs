//! # Database Sessions
//!
//! Every command that touches the database runs inside a [`Session`]: the
//! advisory lock on `<db>.lock` is taken first, then the store is loaded.
//! Read-only commands share the lock, mutating commands hold it exclusively
//! until the session is dropped, so a concurrent writer can never interleave
//! its load and save with ours.

use std::fs::{File, OpenOptions};
use std::io;

use anyhow::Context;
use hostdb_common::config::Config;
use hostdb_core::HostStore;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

pub struct Session {
    store: HostStore,
    sort_on_save: bool,
    _lock: File,
}

impl Session {
    pub fn open(cfg: &Config, access: Access) -> anyhow::Result<Self> {
        let lock_path = cfg.lock_path();
        let lock: File = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("opening lock file {}", lock_path.display()))?;
        acquire(&lock, access).with_context(|| format!("locking {}", lock_path.display()))?;
        debug!(?access, "holding {}", lock_path.display());

        let store = HostStore::new(&cfg.db_path)
            .with_context(|| format!("loading {}", cfg.db_path.display()))?;

        Ok(Self {
            store,
            sort_on_save: cfg.sort_on_save,
            _lock: lock,
        })
    }

    pub fn store(&self) -> &HostStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut HostStore {
        &mut self.store
    }

    /// Saves the store and releases the lock.
    pub fn commit(self) -> anyhow::Result<()> {
        self.store
            .save(self.sort_on_save)
            .with_context(|| format!("saving {}", self.store.path().display()))
    }
}

fn acquire(lock: &File, access: Access) -> io::Result<()> {
    let attempt = match access {
        Access::Read => fs2::FileExt::try_lock_shared(lock),
        Access::Write => fs2::FileExt::try_lock_exclusive(lock),
    };

    match attempt {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
            info!("database is locked by another process, waiting");
            match access {
                Access::Read => fs2::FileExt::lock_shared(lock),
                Access::Write => fs2::FileExt::lock_exclusive(lock),
            }
        }
        Err(e) => Err(e),
    }
}
