use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-flight counter behind a spinner or a disabled button
///
/// Holders get a [`BusyGuard`]; the flag clears when the last guard drops, so
/// it is released on success, failure and task cancellation alike.
#[derive(Clone, Debug, Default)]
pub struct BusyFlag {
    count: Arc<AtomicUsize>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a guard unconditionally
    pub fn acquire(&self) -> BusyGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        BusyGuard {
            count: Arc::clone(&self.count),
        }
    }

    /// Take a guard only if nobody holds one
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.count
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard {
                count: Arc::clone(&self.count),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.count.load(Ordering::SeqCst) > 0
    }
}

/// Releases its [`BusyFlag`] on drop
#[derive(Debug)]
pub struct BusyGuard {
    count: Arc<AtomicUsize>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let flag = BusyFlag::new();
        let a = flag.acquire();
        let b = flag.acquire();
        assert!(flag.is_busy());
        drop(a);
        assert!(flag.is_busy());
        drop(b);
        assert!(!flag.is_busy());
    }

    #[test]
    fn test_try_acquire_is_exclusive() {
        let flag = BusyFlag::new();
        let guard = flag.try_acquire();
        assert!(guard.is_some());
        assert!(flag.try_acquire().is_none());
        drop(guard);
        assert!(flag.try_acquire().is_some());
    }
}
