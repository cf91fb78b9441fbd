use std::time::Duration;

use atomic::{Atomic, Ordering};
use crossbeam::utils::CachePadded;
use static_assertions::{assert_impl_all, assert_obj_safe};

use crate::counter::Counter;
use crate::util::freezable_lock::FreezableLock;
use crate::util::numeric::Countable;
use crate::util::options::{Options, ReadMode};
use crate::util::wait_group::WaitGroup;

/// A numeric counter that can be shared between threads.
///
/// See [`Counter`] for the operations.  Beyond those, a `SynchronizedCounter` offers a relaxed
/// read that never takes the lock ([`get_count_relaxed`](Self::get_count_relaxed)), a scoped
/// freeze ([`with_frozen`](Self::with_frozen)), and timed waits for contributors.
///
/// The value is only written while the lock is held.  It is stored in an [`Atomic`] cell so that
/// the relaxed read is well defined: it returns either the value before or after a concurrent
/// write.
pub struct SynchronizedCounter<T: Countable> {
    /// The current value.  Only written while `lock` is held.
    value: CachePadded<Atomic<T>>,
    /// Serializes all access to `value`, except for relaxed reads.
    lock: FreezableLock,
    /// The completion barrier for contributors.
    barrier: WaitGroup,
    options: Options,
}

assert_impl_all!(SynchronizedCounter<u64>: Send, Sync);
assert_impl_all!(SynchronizedCounter<f64>: Send, Sync);
assert_obj_safe!(Counter<u64>);

impl<T: Countable> SynchronizedCounter<T> {
    /// Create a counter with the default options.
    pub fn new(initial: T) -> Self {
        Self::with_options(initial, Options::default())
    }

    pub fn with_options(initial: T, options: Options) -> Self {
        if options.read_mode == ReadMode::Relaxed {
            debug!("Counter created with relaxed reads: get_count() will not take the lock");
        }
        Self {
            value: CachePadded::new(Atomic::new(initial)),
            lock: FreezableLock::new(),
            barrier: WaitGroup::new(),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Read the value without taking the lock.
    ///
    /// This never blocks, not even while the counter is frozen.  It is not ordered with
    /// concurrent updates: it may return the value from just before an update that another
    /// thread has already finished.
    pub fn get_count_relaxed(&self) -> T {
        self.value.load(Ordering::Relaxed)
    }

    /// Like [`Counter::freeze`], but never block.  Return `false` if the counter is frozen, or if
    /// another thread is in the middle of a locked operation.  If this returns `true`, the caller
    /// must call [`Counter::release`].
    pub fn try_freeze(&self) -> bool {
        self.lock.try_freeze()
    }

    /// Whether the counter is frozen at the moment.  Another thread may freeze or release it
    /// right after this returns.
    pub fn is_frozen(&self) -> bool {
        self.lock.is_frozen()
    }

    /// Freeze the counter, run `f`, and release the counter, even if `f` panics.
    ///
    /// `f` gets a [`FrozenCounter`] to read and update the value while every other user of the
    /// counter is blocked.  `f` must not call lock-taking methods on this counter itself: the
    /// lock is not reentrant, so such calls deadlock.
    pub fn with_frozen<R>(&self, f: impl FnOnce(&mut FrozenCounter<'_, T>) -> R) -> R {
        self.lock.freeze();
        let mut frozen = FrozenCounter { counter: self };
        f(&mut frozen)
    }

    /// Like [`Counter::wait`], but give up after `timeout`.  Return `true` if all contributors
    /// are done, or `false` if the timeout elapsed first.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.barrier.wait_timeout(timeout)
    }

    /// Like [`Counter::get_final_value`], but give up after `timeout` and return `None`.
    pub fn get_final_value_timeout(&self, timeout: Duration) -> Option<T> {
        if self.barrier.wait_timeout(timeout) {
            Some(self.get_count())
        } else {
            None
        }
    }

    /// The number of registered contributors that have not called `done` yet.
    pub fn outstanding_contributors(&self) -> usize {
        self.barrier.outstanding()
    }

    /// Replace the value with `f(value)` while holding the lock, and return the old value.
    fn update(&self, f: impl FnOnce(T) -> T) -> T {
        let _hold = self.lock.lock();
        let old = self.value.load(Ordering::Relaxed);
        self.value.store(f(old), Ordering::Relaxed);
        old
    }

    fn get_count_locked(&self) -> T {
        let _hold = self.lock.lock();
        self.value.load(Ordering::Relaxed)
    }

    fn wait_for_contributors(&self) {
        let warn_ms = self.options.wait_warn_ms;
        if warn_ms == 0 {
            self.barrier.wait();
            return;
        }
        if !self.barrier.wait_timeout(Duration::from_millis(warn_ms)) {
            warn!(
                "Still waiting for {} contributor(s) after {} ms. Is a done() call missing?",
                self.barrier.outstanding(),
                warn_ms
            );
            self.barrier.wait();
        }
    }
}

impl<T: Countable> Counter<T> for SynchronizedCounter<T> {
    fn increment(&self) {
        self.update(|v| v.counter_add(T::one()));
    }

    fn decrement(&self) {
        self.update(|v| v.counter_sub(T::one()));
    }

    fn increment_by(&self, n: T) {
        self.update(|v| v.counter_add(n));
    }

    fn decrement_by(&self, n: T) {
        self.update(|v| v.counter_sub(n));
    }

    fn get_count(&self) -> T {
        match self.options.read_mode {
            ReadMode::Locked => self.get_count_locked(),
            ReadMode::Relaxed => self.get_count_relaxed(),
        }
    }

    fn get_count_and_reset(&self) -> T {
        self.update(|_| T::zero())
    }

    fn reset(&self) {
        self.update(|_| T::zero());
    }

    fn set_count(&self, n: T) {
        self.update(|_| n);
    }

    fn add_contributors(&self, n: usize) {
        self.barrier.add(n);
    }

    fn done(&self) {
        self.barrier.done();
    }

    fn wait(&self) {
        self.wait_for_contributors();
    }

    fn get_final_value(&self) -> T {
        self.wait_for_contributors();
        // Always a locked read, so the result includes every contributor's last update.
        self.get_count_locked()
    }

    fn freeze(&self) {
        self.lock.freeze();
    }

    fn release(&self) {
        self.lock.release();
    }
}

impl<T: Countable> Default for SynchronizedCounter<T> {
    fn default() -> Self {
        Self::new(T::zero())
    }
}

impl<T: Countable> From<T> for SynchronizedCounter<T> {
    fn from(initial: T) -> Self {
        Self::new(initial)
    }
}

impl<T: Countable> std::fmt::Debug for SynchronizedCounter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Relaxed, so that formatting a frozen counter does not block.
        f.debug_struct("SynchronizedCounter")
            .field("value", &self.get_count_relaxed())
            .field("frozen", &self.is_frozen())
            .field("outstanding_contributors", &self.outstanding_contributors())
            .finish()
    }
}

/// Access to a frozen [`SynchronizedCounter`], handed out by
/// [`SynchronizedCounter::with_frozen`].  The counter is released when this is dropped.
pub struct FrozenCounter<'a, T: Countable> {
    counter: &'a SynchronizedCounter<T>,
}

impl<T: Countable> FrozenCounter<'_, T> {
    pub fn get(&self) -> T {
        self.counter.value.load(Ordering::Relaxed)
    }

    pub fn set(&mut self, n: T) {
        self.counter.value.store(n, Ordering::Relaxed);
    }

    pub fn increment_by(&mut self, n: T) {
        let v = self.get();
        self.set(v.counter_add(n));
    }

    pub fn decrement_by(&mut self, n: T) {
        let v = self.get();
        self.set(v.counter_sub(n));
    }

    /// Get the value and reset it to zero.
    pub fn take(&mut self) -> T {
        let v = self.get();
        self.set(T::zero());
        v
    }
}

impl<T: Countable> Drop for FrozenCounter<'_, T> {
    fn drop(&mut self) {
        // If the closure released the lock itself and then panicked, a second panic here would
        // abort the process.
        if std::thread::panicking() && !self.counter.lock.is_frozen() {
            return;
        }
        self.counter.lock.release();
    }
}
