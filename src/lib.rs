//! Terminal state control library.
//!
//! Inspect and change the state of a terminal attached to a descriptor:
//! - Detect whether a descriptor is an interactive terminal
//! - Read and set the window size
//! - Save and restore the terminal mode
//! - Switch to raw mode, or only turn echo off
//!
//! Descriptors are always borrowed. This crate never opens or closes one,
//! and keeps no state between calls: everything lives in the
//! [`TerminalState`] snapshots handed back to the caller and in the device
//! itself.
//!
//! ```no_run
//! # fn main() -> termstate::Result<()> {
//! let stdin = std::io::stdin();
//! if termstate::is_terminal(&stdin) {
//!     let saved = termstate::set_raw_terminal(&stdin)?;
//!     // ... read keys one byte at a time ...
//!     termstate::restore_terminal(&stdin, &saved)?;
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod guard;
mod logs;
mod mode;
mod probe;
mod state;
mod winsize;

#[cfg(unix)]
#[path = "unix.rs"]
mod sys;

#[cfg(windows)]
#[path = "windows.rs"]
mod sys;

#[cfg(all(test, unix))]
mod testutil;

pub use error::{Error, Result};
pub use guard::ModeGuard;
pub use logs::init_logging;
pub use mode::{
    disable_echo, make_raw, restore_terminal, save_state, set_raw_terminal,
    set_raw_terminal_output,
};
pub use probe::{get_fd_info, is_terminal};
pub use state::TerminalState;
pub use winsize::{WindowSize, get_winsize, set_winsize};

/// Anything that can lend out a descriptor: files, stdio handles, pty ends.
#[cfg(unix)]
pub use std::os::fd::AsFd as AsDescriptor;

/// Anything that can lend out a descriptor: files, stdio handles, console handles.
#[cfg(windows)]
pub use std::os::windows::io::AsHandle as AsDescriptor;

/// Numeric form of a descriptor, as returned by [`get_fd_info`].
#[cfg(unix)]
pub type RawDescriptor = std::os::fd::RawFd;

/// Numeric form of a descriptor, as returned by [`get_fd_info`].
#[cfg(windows)]
pub type RawDescriptor = std::os::windows::io::RawHandle;
