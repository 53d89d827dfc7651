//! In-process locking keyed by filesystem path.
//!
//! Workspaces are processed in parallel on the assumption that distinct
//! paths never overlap. Operations that touch a path shared by several
//! workspaces (the superproject's index and `.gitmodules` during submodule
//! add/remove) take the lock for that path first.
//!
//! Locks are reentrant: a thread that already holds a path's lock may take
//! it again without deadlocking. Every acquisition is bounded by a timeout.
//! Nothing here guards against a second process working on the same tree.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct LockState {
    owner: Option<ThreadId>,
    depth: usize,
}

/// A reentrant mutex whose acquisition can time out.
#[derive(Debug, Default)]
pub struct ReentrantLock {
    state: Mutex<LockState>,
    released: Condvar,
}

impl ReentrantLock {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, LockState>> {
        self.state.lock().map_err(|_| Error::LockPoisoned {
            context: "reentrant lock state".to_string(),
        })
    }

    /// Acquires the lock, waiting at most `timeout`.
    ///
    /// `label` only appears in the timeout error.
    pub fn acquire(self: &Arc<Self>, timeout: Duration, label: &str) -> Result<LockGuard> {
        let me = thread::current().id();
        let started = Instant::now();
        let deadline = started + timeout;

        let mut state = self.state()?;
        loop {
            match state.owner {
                None => {
                    state.owner = Some(me);
                    state.depth = 1;
                    break;
                }
                Some(owner) if owner == me => {
                    state.depth += 1;
                    break;
                }
                Some(_) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(Error::LockTimeout {
                            path: label.to_string(),
                            waited_ms: started.elapsed().as_millis(),
                        });
                    }
                    let (guard, _) = self
                        .released
                        .wait_timeout(state, deadline - now)
                        .map_err(|_| Error::LockPoisoned {
                            context: format!("waiting for lock on {label}"),
                        })?;
                    state = guard;
                }
            }
        }

        Ok(LockGuard {
            lock: Arc::clone(self),
        })
    }

    /// Current recursion depth. Zero means unlocked.
    pub fn depth(&self) -> usize {
        self.state().map(|state| state.depth).unwrap_or(0)
    }

    fn release(&self) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            state.owner = None;
            self.released.notify_all();
        }
    }
}

/// Releases one level of a [`ReentrantLock`] on drop.
#[derive(Debug)]
pub struct LockGuard {
    lock: Arc<ReentrantLock>,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.lock.release();
    }
}

/// Registry handing out one [`ReentrantLock`] per canonical path.
#[derive(Debug, Clone)]
pub struct PathLocks {
    locks: Arc<Mutex<HashMap<PathBuf, Arc<ReentrantLock>>>>,
    timeout: Duration,
}

impl PathLocks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    fn lock_for(&self, key: PathBuf) -> Result<Arc<ReentrantLock>> {
        let mut locks = self.locks.lock().map_err(|_| Error::LockPoisoned {
            context: "path lock registry".to_string(),
        })?;
        Ok(Arc::clone(locks.entry(key).or_default()))
    }

    /// Locks `path` for the calling thread until the guard is dropped.
    pub fn acquire(&self, path: &Path) -> Result<LockGuard> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let label = key.display().to_string();
        self.lock_for(key)?.acquire(self.timeout, &label)
    }
}
