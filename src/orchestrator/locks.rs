//! Per-user request serialization.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::UserId;

/// Async mutex per user, created on demand and dropped once unused.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for this user's earlier requests to finish.
    ///
    /// The returned guard releases the user's turn when dropped, including
    /// when the surrounding future is cancelled.
    pub async fn acquire(&self, user: UserId) -> UserLockGuard<'_> {
        let lock = Arc::clone(self.locks.entry(user).or_default().value());
        let mut guard = UserLockGuard {
            locks: self,
            user,
            lock: Some(Arc::clone(&lock)),
            held: None,
        };
        guard.held = Some(lock.lock_owned().await);
        guard
    }

    /// Forgets the user's mutex if nobody else refers to it.
    fn forget_if_idle(&self, user: UserId) {
        self.locks
            .remove_if(&user, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Users with a live mutex.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

// == Guard ==
/// A user's turn, held until dropped.
#[derive(Debug)]
pub struct UserLockGuard<'a> {
    locks: &'a UserLocks,
    user: UserId,
    lock: Option<Arc<Mutex<()>>>,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserLockGuard<'_> {
    fn drop(&mut self) {
        // Both hold a reference count on the mutex; the map entry goes
        // only once they are gone.
        self.held.take();
        self.lock.take();
        self.locks.forget_if_idle(self.user);
    }
}
