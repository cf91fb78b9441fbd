//! A generic, thread-safe numeric counter.
//!
//! [`SynchronizedCounter`] holds a single number of any [`Countable`] kind (the signed and
//! unsigned integers and the IEEE floats).  Every mutation and the default read are serialized
//! on the counter's own lock.  The lock can also be held across several steps with
//! [`Counter::freeze`]/[`Counter::release`] or, preferably, with
//! [`SynchronizedCounter::with_frozen`].
//!
//! Each counter also carries a completion barrier.  Register the number of threads that will
//! contribute to the counter with [`Counter::add_contributors`] before spawning them, let each
//! of them call [`Counter::done`] when it stops updating the counter, and collect the total
//! with [`Counter::get_final_value`].
//!
//! ```ignore
//! use std::sync::Arc;
//! use sync_counter::{Counter, SynchronizedCounter};
//!
//! let counter = Arc::new(SynchronizedCounter::new(0u64));
//! counter.add_contributors(4);
//! for _ in 0..4 {
//!     let counter = counter.clone();
//!     std::thread::spawn(move || {
//!         for _ in 0..1000 {
//!             counter.increment();
//!         }
//!         counter.done();
//!     });
//! }
//! assert_eq!(counter.get_final_value(), 4000);
//! ```
//!
//! Logging goes through the [`log`] facade.  Call [`util::logger::try_init`] to install the
//! built-in `env_logger` if the embedding program has no logger of its own.

#[macro_use]
extern crate log;

mod counter;
mod synchronized_counter;
pub mod util;

pub use crate::counter::Counter;
pub use crate::synchronized_counter::{FrozenCounter, SynchronizedCounter};
pub use crate::util::numeric::Countable;
pub use crate::util::options::{Options, ReadMode};
