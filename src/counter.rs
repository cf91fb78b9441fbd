use crate::util::numeric::Countable;

/// The operations of a thread-safe counter.
///
/// All methods take `&self` and may be called from any number of threads at the same time.
/// Apart from the barrier methods (`add_contributors`, `done`, `wait`), every method takes the
/// counter lock, so they all block while the counter is frozen.  The one exception is
/// `get_count` on a counter created with [`ReadMode::Relaxed`](crate::ReadMode::Relaxed), which
/// reads without the lock and never blocks.
///
/// [`SynchronizedCounter`](crate::SynchronizedCounter) is the implementation provided by this
/// crate.  The trait is object safe, so a counter can be shared as `&dyn Counter<T>` or
/// `Arc<dyn Counter<T>>`.
pub trait Counter<T: Countable>: Send + Sync {
    /// Increment the value by 1.
    fn increment(&self);

    /// Decrement the value by 1.
    fn decrement(&self);

    /// Increment the value by `n`.
    fn increment_by(&self, n: T);

    /// Decrement the value by `n`.
    fn decrement_by(&self, n: T);

    /// Get the current value.  Takes the lock unless the counter was created with
    /// [`ReadMode::Relaxed`](crate::ReadMode::Relaxed).
    fn get_count(&self) -> T;

    /// Get the current value and reset the value to zero, in one step.  No other update can
    /// happen between the read and the reset.
    fn get_count_and_reset(&self) -> T;

    /// Set the value to zero.
    fn reset(&self);

    /// Set the value to `n`.
    fn set_count(&self, n: T);

    /// Register `n` more contributors with the completion barrier.  This works like `Add(n)` of
    /// a Go `sync.WaitGroup`: call it before starting the contributors.
    fn add_contributors(&self, n: usize);

    /// Mark one contributor as finished.  Each contributor calls this exactly once, after its
    /// last update to the counter.
    ///
    /// # Panics
    ///
    /// Panics if called more times than contributors were added.
    fn done(&self);

    /// Block until every registered contributor has called `done`.
    fn wait(&self);

    /// Wait for every registered contributor to call `done`, then get the value.
    fn get_final_value(&self) -> T;

    /// Take the counter lock and keep it until [`release`](Counter::release) is called.  Every
    /// lock-taking call on this counter blocks in the meantime, including calls from the
    /// freezing thread itself, which then deadlocks.
    ///
    /// This is a manual hand-off that is not tied to any scope.  The caller must make sure
    /// `release` always runs, or every other user of the counter blocks forever.  Prefer
    /// [`SynchronizedCounter::with_frozen`](crate::SynchronizedCounter::with_frozen), which
    /// releases on every exit path.
    fn freeze(&self);

    /// Release the counter lock taken by [`freeze`](Counter::freeze).
    ///
    /// # Panics
    ///
    /// Panics if the counter is not frozen.
    fn release(&self);
}
