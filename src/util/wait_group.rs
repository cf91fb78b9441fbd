//! A counting completion barrier.
//!
//! Register contributors with [`WaitGroup::add`] before they start, let each of them call
//! [`WaitGroup::done`] exactly once when it finishes, and block on [`WaitGroup::wait`] until all
//! of them have.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

pub struct WaitGroup {
    /// The number of outstanding contributors.
    count: Mutex<usize>,
    /// Waiters wait on this.  Notified when `count` drops to zero.
    all_done: Condvar,
}

impl WaitGroup {
    pub const fn new() -> Self {
        Self {
            count: Mutex::new(0),
            all_done: Condvar::new(),
        }
    }

    /// Register `n` more contributors.
    ///
    /// Call this before the contributors are started.  Adding contributors while another thread
    /// may observe the count reaching zero is a race: a waiter may already have been released.
    pub fn add(&self, n: usize) {
        let mut count = self.count.lock().unwrap();
        let Some(new_count) = count.checked_add(n) else {
            drop(count);
            panic!("WaitGroup contributor count overflowed");
        };
        *count = new_count;
        trace!("WaitGroup: added {} contributor(s), {} outstanding", n, new_count);
    }

    /// Mark one contributor as finished.  Wakes up all waiters if it is the last one.
    ///
    /// # Panics
    ///
    /// Panics if there are no outstanding contributors, i.e. `done` has been called more times
    /// than contributors were added.
    pub fn done(&self) {
        let remaining = {
            let mut count = self.count.lock().unwrap();
            if *count == 0 {
                drop(count);
                panic!("WaitGroup::done() called more times than contributors were added");
            }
            *count -= 1;
            *count
        };
        if remaining == 0 {
            trace!("WaitGroup: all contributors done");
            self.all_done.notify_all();
        }
    }

    /// Block until there are no outstanding contributors.  Returns immediately if there are none.
    pub fn wait(&self) {
        let count = self.count.lock().unwrap();
        let _count = self.all_done.wait_while(count, |count| *count > 0).unwrap();
    }

    /// Like `wait`, but give up after `timeout`.  Return `true` if all contributors are done,
    /// or `false` if the timeout elapsed first.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let count = self.count.lock().unwrap();
        let (_count, result) = self
            .all_done
            .wait_timeout_while(count, timeout, |count| *count > 0)
            .unwrap();
        !result.timed_out()
    }

    /// The number of contributors that have not called `done` yet.
    pub fn outstanding(&self) -> usize {
        *self.count.lock().unwrap()
    }
}

impl Default for WaitGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WaitGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitGroup")
            .field("outstanding", &self.outstanding())
            .finish()
    }
}
