//! Filesystem utilities.
//!
//! Atomic writes back the durable lock store and the config file.

pub mod atomic;

pub use atomic::{atomic_write, atomic_write_file, is_temp_file, remove_durable};
