//! Scoped mode changes that undo themselves.

use crate::error::Result;
use crate::mode::{disable_echo, restore_terminal, save_state, set_raw_terminal};
use crate::state::TerminalState;
use crate::{AsDescriptor, sys};

#[cfg(unix)]
type Borrowed<'fd> = std::os::fd::BorrowedFd<'fd>;

#[cfg(windows)]
type Borrowed<'fd> = std::os::windows::io::BorrowedHandle<'fd>;

/// Keeps the snapshot taken before a mode change and restores it.
///
/// Call [`ModeGuard::restore`] to get the restore error back. A guard that
/// is dropped without it (early return, `?`, panic) restores the terminal
/// anyway; a failure there can only be logged.
///
/// The guard borrows the descriptor, so it cannot outlive it.
#[derive(Debug)]
#[must_use = "dropping the guard restores the terminal immediately"]
pub struct ModeGuard<'fd> {
    fd: Borrowed<'fd>,
    saved: TerminalState,
    restored: bool,
}

impl<'fd> ModeGuard<'fd> {
    /// Switch `fd` to raw mode until the guard is restored or dropped.
    ///
    /// # Errors
    ///
    /// Same as [`set_raw_terminal`]; nothing has changed when it fails.
    pub fn raw<F: AsDescriptor + ?Sized>(fd: &'fd F) -> Result<Self> {
        let fd = sys::borrow(fd);
        let saved = set_raw_terminal(fd)?;
        Ok(Self::new(fd, saved))
    }

    /// Turn echo off on `fd` until the guard is restored or dropped.
    ///
    /// # Errors
    ///
    /// Same as [`save_state`] and [`disable_echo`].
    pub fn echo_disabled<F: AsDescriptor + ?Sized>(fd: &'fd F) -> Result<Self> {
        let fd = sys::borrow(fd);
        let saved = save_state(fd)?;
        disable_echo(fd, &saved)?;
        Ok(Self::new(fd, saved))
    }

    fn new(fd: Borrowed<'fd>, saved: TerminalState) -> Self {
        Self {
            fd,
            saved,
            restored: false,
        }
    }

    /// The snapshot taken before the mode change.
    #[must_use]
    pub fn saved_state(&self) -> &TerminalState {
        &self.saved
    }

    /// Restore the saved mode now.
    ///
    /// # Errors
    ///
    /// Same as [`restore_terminal`]. The guard is consumed either way and
    /// does not retry on drop.
    pub fn restore(mut self) -> Result<()> {
        self.restored = true;
        restore_terminal(self.fd, &self.saved)
    }
}

impl Drop for ModeGuard<'_> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(err) = restore_terminal(self.fd, &self.saved) {
            tracing::warn!(fd = ?self.fd, error = %err, "failed to restore terminal on drop");
        }
    }
}
