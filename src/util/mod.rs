//! Building blocks for [`SynchronizedCounter`](crate::SynchronizedCounter): the numeric kinds
//! it accepts, its lock, its completion barrier, options and logging.

pub(crate) mod freezable_lock;
pub mod logger;
pub mod numeric;
pub mod options;
#[cfg(any(test, feature = "test_private"))]
pub mod test_util;
pub mod wait_group;

pub use self::wait_group::WaitGroup;
