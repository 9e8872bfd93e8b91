//! Mutex with a synchronously observable lock flag.
//!
//! Callers that only need to display "busy" state (is a sync running, is a
//! submission in flight) read the flag without suspending; callers that need
//! the critical section await `acquire`.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, MutexGuard};

pub struct StatusMutex {
    inner: Mutex<()>,
    locked: AtomicBool,
}

/// Holder of the critical section. Dropping it releases the lock.
pub struct StatusGuard<'a> {
    locked: &'a AtomicBool,
    // Held for the lifetime of the guard; released by drop, after the flag
    // has already been cleared (drop glue runs the body before fields).
    _guard: MutexGuard<'a, ()>,
}

impl Drop for StatusGuard<'_> {
    fn drop(&mut self) {
        // Invariant: the flag clears before the inner mutex releases, so a
        // waiter whose acquire() resolves never observes is_locked() == true
        // from the previous holder.
        self.locked.store(false, Ordering::SeqCst);
    }
}

impl StatusMutex {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(()),
            locked: AtomicBool::new(false),
        }
    }

    /// Await the underlying lock, then set the flag.
    pub async fn acquire(&self) -> StatusGuard<'_> {
        let guard = self.inner.lock().await;
        self.locked.store(true, Ordering::SeqCst);
        StatusGuard {
            locked: &self.locked,
            _guard: guard,
        }
    }

    /// Non-suspending read of the lock flag. True strictly between a
    /// successful `acquire` and the corresponding guard drop.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}

impl Default for StatusMutex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[tokio::test]
    async fn flag_tracks_acquire_and_release() {
        let lock = StatusMutex::new();
        assert!(!lock.is_locked());

        let guard = lock.acquire().await;
        assert!(lock.is_locked());

        drop(guard);
        assert!(!lock.is_locked());
    }

    #[tokio::test]
    async fn reacquire_after_release() {
        let lock = StatusMutex::new();
        drop(lock.acquire().await);
        drop(lock.acquire().await);
        assert!(!lock.is_locked());
    }

    #[tokio::test]
    async fn concurrent_holders_are_serialized() {
        let lock = Arc::new(StatusMutex::new());
        let active = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let lock = lock.clone();
            let active = active.clone();
            handles.push(tokio::spawn(async move {
                let _guard = lock.acquire().await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                assert_eq!(now, 1, "two holders inside the critical section");
                assert!(lock.is_locked());
                tokio::task::yield_now().await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for h in handles {
            h.await.unwrap();
        }
        assert!(!lock.is_locked());
    }
}
