//! Construction-time options for [`SynchronizedCounter`](crate::SynchronizedCounter).
//!
//! `Options::default()` gives the built-in defaults.  Options can then be set by name with
//! [`Options::set_from_str`], or from environment variables with
//! [`Options::read_env_var_settings`].  An environment variable named `SYNC_COUNTER_` followed by
//! the upper-case option name (such as `SYNC_COUNTER_READ_MODE=relaxed`) sets that option.

use strum_macros::{Display, EnumString};

/// How [`Counter::get_count`](crate::Counter::get_count) reads the value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum ReadMode {
    /// Take the counter lock for the read.  The read is serialized with all writers and blocks
    /// while the counter is frozen.
    #[default]
    Locked,
    /// Read without taking the lock.  The read never blocks, not even while the counter is
    /// frozen, and may race with a concurrent writer.  It returns either the value before or
    /// after that write, never a mix of the two.
    Relaxed,
}

fn always_valid<T>(_: &T) -> bool {
    true
}

macro_rules! options {
    ($($(#[$outer:meta])* $name:ident: $type:ty [$validator:expr] = $default:expr),* $(,)?) => [
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct Options {
            $($(#[$outer])* pub $name: $type),*
        }

        impl Options {
            /// Set an option from its snake_case name and a string value.  Return `true` if the
            /// option was set.  If the name is unknown, or the value cannot be parsed or is
            /// invalid, the option keeps its current value and `false` is returned.
            pub fn set_from_str(&mut self, s: &str, val: &str) -> bool {
                match s {
                    // Parse the given value from str (by env vars or by calling set_from_str()) to the right type
                    $(stringify!($name) => if let Ok(val) = val.parse::<$type>() {
                        let validate_fn = $validator;
                        let is_valid = validate_fn(&val);
                        if is_valid {
                            debug!("Option {} set to {:?}", s, val);
                            self.$name = val;
                        } else {
                            warn!("Unable to set {}={:?}. Invalid value. The current value will be kept.", s, val);
                        }
                        is_valid
                    } else {
                        warn!("Unable to set {}={:?}. Can't parse value. The current value will be kept.", s, val);
                        false
                    })*
                    _ => {
                        warn!("Unknown option {:?}", s);
                        false
                    }
                }
            }

            /// Apply every `SYNC_COUNTER_*` environment variable that names an option.
            /// Variables with an unknown name are ignored.
            pub fn read_env_var_settings(&mut self) {
                const PREFIX: &str = "SYNC_COUNTER_";
                for (key, val) in std::env::vars() {
                    // strip the prefix, and get the lower case string
                    if let Some(rest_of_key) = key.strip_prefix(PREFIX) {
                        let lowercase: &str = &rest_of_key.to_lowercase();
                        match lowercase {
                            $(stringify!($name) => { self.set_from_str(lowercase, &val); },)*
                            _ => {}
                        }
                    }
                }
            }
        }

        impl Default for Options {
            fn default() -> Self {
                Options {
                    $($name: $default),*
                }
            }
        }
    ]
}

options! {
    /// How `get_count()` reads the value.
    read_mode:    ReadMode [always_valid] = ReadMode::Locked,
    /// If non-zero, a wait for contributors that has been blocked for this many milliseconds
    /// logs a warning with the number of outstanding contributors, then keeps waiting.
    wait_warn_ms: u64      [always_valid] = 0,
}

impl Options {
    /// The default options, overridden by `SYNC_COUNTER_*` environment variables.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        options.read_env_var_settings();
        options
    }
}
