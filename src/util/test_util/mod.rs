//! Helpers for testing blocking code.

use std::panic;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

// https://github.com/rust-lang/rfcs/issues/2798#issuecomment-552949300
pub fn panic_after<T, F>(millis: u64, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T,
    F: Send + 'static,
{
    let call = spawn_call(f);
    match call.done_rx.recv_timeout(Duration::from_millis(millis)) {
        Ok(_) => call.join(),
        Err(e) => panic!("Thread took too long: {}", e),
    }
}

/// A call running on its own thread, started by [`spawn_call`].
pub struct PendingCall<T> {
    handle: thread::JoinHandle<T>,
    done_rx: mpsc::Receiver<()>,
}

impl<T> PendingCall<T> {
    /// Wait up to `millis` milliseconds for the call to return.  Return `true` if it did.
    /// A call that panics never counts as returned.
    pub fn returns_within(&self, millis: u64) -> bool {
        match self.done_rx.recv_timeout(Duration::from_millis(millis)) {
            Ok(()) => true,
            Err(mpsc::RecvTimeoutError::Timeout) => false,
            Err(mpsc::RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Block until the call returns, and get its result.
    pub fn join(self) -> T {
        self.handle.join().expect("Thread panicked")
    }
}

/// Run `f` on a new thread.  Used to check whether a call blocks.
pub fn spawn_call<T, F>(f: F) -> PendingCall<T>
where
    T: Send + 'static,
    F: FnOnce() -> T,
    F: Send + 'static,
{
    let (done_tx, done_rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let val = f();
        // The receiver may be gone if nobody is waiting for the result any more.
        let _ = done_tx.send(());
        val
    });
    PendingCall { handle, done_rx }
}

lazy_static::lazy_static! {
    // A global lock to make tests serial.
    static ref SERIAL_TEST_LOCK: Mutex<()> = Mutex::default();
}

// force some tests to be executed serially
pub fn serial_test<F>(f: F)
where
    F: FnOnce(),
{
    // If one test fails, the lock will become poisoned. We would want to continue for other tests anyway.
    let _guard = SERIAL_TEST_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f();
}

// Always execute a cleanup closure no matter the test panics or not.
pub fn with_cleanup<T, C>(test: T, cleanup: C)
where
    T: FnOnce() + panic::UnwindSafe,
    C: FnOnce(),
{
    let res = panic::catch_unwind(test);
    cleanup();
    if let Err(e) = res {
        panic::resume_unwind(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_call() {
        let (tx, rx) = mpsc::channel::<u32>();
        let call = spawn_call(move || rx.recv().unwrap() + 1);
        assert!(!call.returns_within(50));
        tx.send(41).unwrap();
        assert!(call.returns_within(5000));
        assert_eq!(call.join(), 42);
    }

    #[test]
    #[should_panic(expected = "Thread took too long")]
    fn test_panic_after() {
        panic_after(50, || thread::sleep(Duration::from_secs(1)));
    }
}
