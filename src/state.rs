//! Saved terminal mode snapshots.

use std::fmt;

use crate::sys;

/// Opaque snapshot of a terminal's mode attributes.
///
/// Holds the whole platform record at once (termios flags, control
/// characters and line speeds on POSIX, the console mode on Windows). It can
/// only be produced by [`save_state`](crate::save_state) and friends and only
/// be consumed by [`restore_terminal`](crate::restore_terminal) or used as
/// the baseline for [`disable_echo`](crate::disable_echo).
///
/// Snapshots are plain values: copy them, share them between threads,
/// restore them as many times as needed. Applying one to a different device
/// than the one it was taken from is not meaningful.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TerminalState {
    attrs: sys::Attributes,
}

impl TerminalState {
    pub(crate) fn from_attributes(attrs: sys::Attributes) -> Self {
        Self { attrs }
    }

    pub(crate) fn attributes(&self) -> &sys::Attributes {
        &self.attrs
    }
}

impl fmt::Debug for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalState").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_state_is_shareable() {
        assert_send_sync::<TerminalState>();
    }

    #[cfg(unix)]
    #[test]
    fn test_debug_hides_fields() {
        let Some(pty) = crate::testutil::open_pty() else {
            return;
        };
        let state = crate::save_state(&pty.slave).expect("pty slave is a terminal");
        assert_eq!(format!("{state:?}"), "TerminalState { .. }");
    }
}
