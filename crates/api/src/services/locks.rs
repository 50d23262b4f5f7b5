//! Keyed lock table serialising changes to one character's lesson list.
//!
//! Each character id maps to its own async mutex; lists of different
//! characters never contend. Entries are created on first use and removed
//! when the last guard for that key is dropped. A waiter cancelled after
//! its holder left can strand an idle entry; the next `lock` call sweeps
//! those.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};

type Table = StdMutex<HashMap<String, Arc<Mutex<()>>>>;

#[derive(Default)]
pub struct LessonLocks {
    table: Arc<Table>,
}

/// Held for the duration of one read-validate-write sequence.
/// Dropping it releases the lock on every exit path.
pub struct LessonLockGuard {
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
    table: Arc<Table>,
}

impl LessonLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `character_id`'s lesson list.
    pub async fn lock(&self, character_id: &str) -> LessonLockGuard {
        let mutex = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            table.retain(|_, mutex| Arc::strong_count(mutex) > 1);
            Arc::clone(table.entry(character_id.to_string()).or_default())
        };
        let guard = mutex.lock_owned().await;
        LessonLockGuard {
            key: character_id.to_string(),
            guard: Some(guard),
            table: Arc::clone(&self.table),
        }
    }

    /// Number of characters with a live lock entry.
    pub fn active(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for LessonLockGuard {
    fn drop(&mut self) {
        // Release first so the strong count below only counts the table
        // entry and any waiters.
        self.guard.take();
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mutex) = table.get(&self.key) {
            if Arc::strong_count(mutex) == 1 {
                table.remove(&self.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_key_is_exclusive() {
        let locks = Arc::new(LessonLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let inside = Arc::clone(&inside);
            let max_inside = Arc::clone(&max_inside);
            handles.push(tokio::spawn(async move {
                let _guard = locks.lock("bibi").await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_inside.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert_eq!(locks.active(), 0);
    }

    #[tokio::test]
    async fn different_keys_do_not_contend() {
        let locks = LessonLocks::new();
        let _a = locks.lock("bibi").await;
        let b = tokio::time::timeout(Duration::from_secs(1), locks.lock("nanak")).await;
        assert!(b.is_ok());
        assert_eq!(locks.active(), 2);
    }

    #[tokio::test]
    async fn entry_is_removed_after_release() {
        let locks = LessonLocks::new();
        {
            let _guard = locks.lock("bibi").await;
            assert_eq!(locks.active(), 1);
        }
        assert_eq!(locks.active(), 0);
    }

    #[tokio::test]
    async fn cancelled_waiter_entry_is_swept() {
        let locks = LessonLocks::new();
        let holder = locks.lock("bibi").await;

        let mut waiter = Box::pin(locks.lock("bibi"));
        let pending = tokio::time::timeout(Duration::from_millis(20), &mut waiter).await;
        assert!(pending.is_err());

        // Holder leaves while the waiter is still queued, then the waiter
        // is abandoned without ever being polled again.
        drop(holder);
        drop(waiter);
        assert_eq!(locks.active(), 1);

        let other = locks.lock("nanak").await;
        assert_eq!(locks.active(), 1);
        drop(other);
        assert_eq!(locks.active(), 0);
    }
}
