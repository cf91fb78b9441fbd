//! The lock behind [`SynchronizedCounter`](crate::SynchronizedCounter).
//!
//! It is a non-reentrant mutual exclusion lock with two ways to hold it:
//!
//! -   [`FreezableLock::lock`] holds it for the lifetime of the returned [`LockHold`], and
//! -   [`FreezableLock::freeze`] holds it until [`FreezableLock::release`] is called, with no
//!     lexical scope tying the two together.
//!
//! A frozen lock is represented by a flag guarded by a std `Mutex`.  Scoped holders wait on a
//! `Condvar` until the flag is clear, and keep the `Mutex` guard while they work.  This keeps
//! the manual hand-off entirely in safe code, and a `release()` without a matching `freeze()`
//! is detected instead of being undefined.

use std::sync::{Condvar, Mutex, MutexGuard, TryLockError};

pub(crate) struct FreezableLock {
    /// The synchronized part.
    sync: Mutex<FreezableLockSync>,
    /// Scoped holders and freezers wait on this while the lock is frozen.  Notified by
    /// `release`.
    unfrozen: Condvar,
}

struct FreezableLockSync {
    frozen: bool,
}

/// A scoped hold on a [`FreezableLock`].  The lock is released when this is dropped.
pub(crate) struct LockHold<'a> {
    _sync: MutexGuard<'a, FreezableLockSync>,
}

impl FreezableLock {
    pub const fn new() -> Self {
        Self {
            sync: Mutex::new(FreezableLockSync { frozen: false }),
            unfrozen: Condvar::new(),
        }
    }

    /// Block until the lock is neither held nor frozen, and hold it until the returned value is
    /// dropped.
    pub fn lock(&self) -> LockHold<'_> {
        LockHold {
            _sync: self.lock_unfrozen(),
        }
    }

    /// Acquire the lock and keep holding it after returning.  Blocks while another caller holds
    /// or has frozen the lock.  The lock is not reentrant: the freezing thread deadlocks if it
    /// calls `lock` or `freeze` again before `release`.
    pub fn freeze(&self) {
        let mut sync = self.lock_unfrozen();
        sync.frozen = true;
        trace!("Lock frozen by {:?}", std::thread::current().id());
    }

    /// Like `freeze`, but never block.  Return `false` if the lock is frozen, or is held by a
    /// scoped holder at the moment.
    pub fn try_freeze(&self) -> bool {
        let mut sync = match self.sync.try_lock() {
            Ok(sync) => sync,
            Err(TryLockError::WouldBlock) => return false,
            Err(e @ TryLockError::Poisoned(_)) => panic!("{}", e),
        };
        if sync.frozen {
            return false;
        }
        sync.frozen = true;
        trace!("Lock frozen by {:?}", std::thread::current().id());
        true
    }

    /// Release a hold taken by `freeze` or `try_freeze`, and wake up everyone waiting for it.
    ///
    /// # Panics
    ///
    /// Panics if the lock is not frozen.
    pub fn release(&self) {
        let was_frozen = {
            let mut sync = self.sync.lock().unwrap();
            std::mem::replace(&mut sync.frozen, false)
        };
        // Panic after the guard is dropped so the mutex is not poisoned.
        assert!(
            was_frozen,
            "release() called on a counter lock that is not frozen"
        );
        trace!("Lock released by {:?}", std::thread::current().id());
        self.unfrozen.notify_all();
    }

    pub fn is_frozen(&self) -> bool {
        self.sync.lock().unwrap().frozen
    }

    fn lock_unfrozen(&self) -> MutexGuard<'_, FreezableLockSync> {
        let sync = self.sync.lock().unwrap();
        self.unfrozen
            .wait_while(sync, |sync| sync.frozen)
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::FreezableLock;
    use crate::util::test_util::panic_after;

    #[test]
    fn test_lock_unfrozen() {
        let lock = FreezableLock::new();
        assert!(!lock.is_frozen());
        let hold = lock.lock();
        drop(hold);
        let _hold_again = lock.lock();
    }

    #[test]
    fn test_freeze_blocks_other_holders() {
        panic_after(5000, || {
            let lock = FreezableLock::new();
            let acquired = AtomicBool::new(false);
            lock.freeze();
            assert!(lock.is_frozen());

            std::thread::scope(|scope| {
                scope.spawn(|| {
                    let _hold = lock.lock();
                    acquired.store(true, Ordering::SeqCst);
                });

                std::thread::sleep(Duration::from_millis(100));
                assert!(!acquired.load(Ordering::SeqCst));
                lock.release();
            });

            assert!(acquired.load(Ordering::SeqCst));
            assert!(!lock.is_frozen());
        });
    }

    #[test]
    fn test_try_freeze() {
        let lock = FreezableLock::new();
        assert!(lock.try_freeze());
        assert!(!lock.try_freeze());
        lock.release();
        assert!(lock.try_freeze());
        lock.release();
    }

    #[test]
    fn test_try_freeze_does_not_wait_for_holder() {
        panic_after(5000, || {
            let lock = FreezableLock::new();
            let hold = lock.lock();
            // Would block forever on this thread if it waited for the scoped hold.
            assert!(!lock.try_freeze());
            drop(hold);
            assert!(lock.try_freeze());
            lock.release();
        });
    }

    #[test]
    #[should_panic(expected = "not frozen")]
    fn test_release_without_freeze() {
        let lock = FreezableLock::new();
        lock.release();
    }

    #[test]
    fn test_usable_after_misuse() {
        let lock = FreezableLock::new();
        let result = std::panic::catch_unwind(|| lock.release());
        assert!(result.is_err());
        // The mutex is not poisoned by the misuse.
        lock.freeze();
        lock.release();
        let _hold = lock.lock();
    }
}
