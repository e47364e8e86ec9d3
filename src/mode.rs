//! Terminal mode transitions.
//!
//! A session goes through the same steps every time:
//! 1. Capture the current mode with [`save_state`] (or let [`set_raw_terminal`] do it)
//! 2. Switch to raw mode, or only turn echo off with [`disable_echo`]
//! 3. Put everything back with [`restore_terminal`] and the saved snapshot
//!
//! Raw mode is a strict superset of disabling echo. Callers that only need
//! to hide input (password prompts) should use [`disable_echo`] so line
//! editing and Ctrl-C keep working.

use crate::error::{Error, Result};
use crate::state::TerminalState;
use crate::{AsDescriptor, sys};

/// Capture the current mode of the terminal behind `fd`.
///
/// The terminal is not modified.
///
/// # Arguments
///
/// - `fd` - Descriptor of the terminal, borrowed for the call
///
/// # Returns
///
/// - `Ok(TerminalState)` snapshot of every mode attribute
/// - `Err` if the attributes cannot be read
///
/// # Errors
///
/// - [`Error::NotATerminal`] if `fd` is not a terminal
/// - [`Error::InvalidDescriptor`] if `fd` is closed
/// - [`Error::Io`] on any other device failure
pub fn save_state(fd: impl AsDescriptor) -> Result<TerminalState> {
    let attrs = sys::get_attributes(sys::borrow(&fd))?;
    Ok(TerminalState::from_attributes(attrs))
}

/// Reapply a snapshot taken by [`save_state`], discarding every change made
/// since.
///
/// Restoring the same snapshot twice leaves the terminal in the same mode
/// both times.
///
/// # Arguments
///
/// - `fd` - Descriptor the snapshot was taken from
/// - `state` - Snapshot to apply verbatim
///
/// # Returns
///
/// - `Ok(())` once the terminal is back in the saved mode
/// - `Err` if the snapshot could not be applied
///
/// # Errors
///
/// Always [`Error::Io`], including when `fd` has been closed or no longer
/// refers to a terminal.
pub fn restore_terminal(fd: impl AsDescriptor, state: &TerminalState) -> Result<()> {
    let fd = sys::borrow(&fd);
    sys::set_attributes(fd, state.attributes()).map_err(Error::into_io)?;
    tracing::debug!(fd = ?fd, "terminal restored");
    Ok(())
}

/// Put the terminal behind `fd` into raw mode.
///
/// The new mode is applied in one call, so when it is refused the terminal
/// keeps its previous mode.
///
/// # Arguments
///
/// - `fd` - Descriptor of the terminal, borrowed for the call
///
/// # Returns
///
/// - `Ok(TerminalState)` containing the mode from before the switch, to hand to [`restore_terminal`]
/// - `Err` if the mode cannot be read or raw mode cannot be applied
///
/// # Errors
///
/// Same as [`save_state`], plus any failure to apply the raw mode.
pub fn make_raw(fd: impl AsDescriptor) -> Result<TerminalState> {
    let fd = sys::borrow(&fd);
    let saved = sys::get_attributes(fd)?;
    sys::enter_raw(fd, &saved)?;
    Ok(TerminalState::from_attributes(saved))
}

/// Save the current mode and switch to raw mode.
///
/// In raw mode there is no line editing, no echo and no signal keys: every
/// byte typed is delivered as soon as it arrives.
///
/// # Arguments
///
/// - `fd` - Descriptor of the terminal, borrowed for the call
///
/// # Returns
///
/// - `Ok(TerminalState)` containing the original mode, to pass to [`restore_terminal`] when done
/// - `Err` if the terminal could not be switched
///
/// # Errors
///
/// See [`make_raw`]. When an error is returned the terminal has not been
/// switched.
pub fn set_raw_terminal(fd: impl AsDescriptor) -> Result<TerminalState> {
    let fd = sys::borrow(&fd);
    let saved = make_raw(fd)?;
    tracing::debug!(fd = ?fd, "terminal switched to raw mode");
    Ok(saved)
}

/// Put the output side of a terminal into raw mode.
///
/// Only Windows consoles have a separate output mode (virtual terminal
/// processing). On POSIX systems raw output is already part of
/// [`set_raw_terminal`].
///
/// # Arguments
///
/// - `fd` - Descriptor of the terminal's output side
///
/// # Returns
///
/// - `Ok(Some(TerminalState))` with the previous output mode on Windows
/// - `Ok(None)` on POSIX systems, after checking `fd` is a terminal
/// - `Err` if `fd` is not a usable terminal
///
/// # Errors
///
/// Same as [`save_state`].
pub fn set_raw_terminal_output(fd: impl AsDescriptor) -> Result<Option<TerminalState>> {
    let fd = sys::borrow(&fd);
    let saved = sys::enter_raw_output(fd)?;
    if saved.is_some() {
        tracing::debug!(fd = ?fd, "terminal output switched to raw mode");
    }
    Ok(saved.map(TerminalState::from_attributes))
}

/// Turn echo off, keeping everything else from `state`.
///
/// The applied mode is `state` with only the echo flag cleared, so line
/// editing and signal keys behave as they did when it was captured.
///
/// # Arguments
///
/// - `fd` - Descriptor of the terminal, borrowed for the call
/// - `state` - Baseline snapshot; it is not changed and remains the one to restore
///
/// # Returns
///
/// - `Ok(())` once echo is off
/// - `Err` if the mode cannot be applied
///
/// # Errors
///
/// Fails if `fd` is not a terminal or the mode cannot be applied.
pub fn disable_echo(fd: impl AsDescriptor, state: &TerminalState) -> Result<()> {
    let fd = sys::borrow(&fd);
    sys::enter_echo_disabled(fd, state.attributes())?;
    tracing::debug!(fd = ?fd, "terminal echo disabled");
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::testutil::open_pty;
    use crate::winsize::{WindowSize, get_winsize};
    use termios::{ECHO, ICANON, ISIG};

    #[test]
    fn test_save_then_restore_changes_nothing() -> Result<()> {
        let Some(pty) = open_pty() else {
            return Ok(());
        };
        let size = get_winsize(&pty.slave)?;
        let state = save_state(&pty.slave)?;
        restore_terminal(&pty.slave, &state)?;

        assert_eq!(save_state(&pty.slave)?, state);
        assert_eq!(get_winsize(&pty.slave)?, size);
        Ok(())
    }

    #[test]
    fn test_save_state_does_not_mutate() -> Result<()> {
        let Some(pty) = open_pty() else {
            return Ok(());
        };
        let first = save_state(&pty.slave)?;
        let second = save_state(&pty.slave)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_raw_then_restore() -> Result<()> {
        let Some(pty) = open_pty() else {
            return Ok(());
        };
        let before = save_state(&pty.slave)?;
        let saved = set_raw_terminal(&pty.slave)?;
        assert_eq!(saved, before);

        let raw = save_state(&pty.slave)?;
        assert_ne!(raw, before);
        let lflag = raw.attributes().c_lflag;
        assert_eq!(lflag & (ECHO | ICANON | ISIG), 0);

        restore_terminal(&pty.slave, &saved)?;
        assert_eq!(save_state(&pty.slave)?, before);
        Ok(())
    }

    #[test]
    fn test_restore_is_idempotent() -> Result<()> {
        let Some(pty) = open_pty() else {
            return Ok(());
        };
        let saved = set_raw_terminal(&pty.slave)?;

        restore_terminal(&pty.slave, &saved)?;
        let once = save_state(&pty.slave)?;
        restore_terminal(&pty.slave, &saved)?;
        let twice = save_state(&pty.slave)?;
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn test_disable_echo_only_clears_echo() -> Result<()> {
        let Some(pty) = open_pty() else {
            return Ok(());
        };
        let state = save_state(&pty.slave)?;
        disable_echo(&pty.slave, &state)?;

        let quiet = save_state(&pty.slave)?;
        let (base, now) = (state.attributes(), quiet.attributes());
        assert_eq!(now.c_lflag, base.c_lflag & !ECHO);
        assert_ne!(now.c_lflag & ICANON, 0);
        assert_ne!(now.c_lflag & ISIG, 0);
        assert_eq!(now.c_iflag, base.c_iflag);
        assert_eq!(now.c_oflag, base.c_oflag);
        assert_eq!(now.c_cc, base.c_cc);

        restore_terminal(&pty.slave, &state)?;
        assert_eq!(save_state(&pty.slave)?, state);
        Ok(())
    }

    #[test]
    fn test_disable_echo_from_raw_session() -> Result<()> {
        let Some(pty) = open_pty() else {
            return Ok(());
        };
        let state = set_raw_terminal(&pty.slave)?;
        let copy = state;
        disable_echo(&pty.slave, &state)?;
        assert_eq!(state, copy);

        // Echo-disabled relative to the cooked baseline, not to raw mode.
        let quiet = save_state(&pty.slave)?;
        assert_ne!(quiet.attributes().c_lflag & ICANON, 0);
        assert_eq!(quiet.attributes().c_lflag & ECHO, 0);

        restore_terminal(&pty.slave, &state)?;
        Ok(())
    }

    #[test]
    fn test_window_size_survives_mode_changes() -> Result<()> {
        let Some(pty) = open_pty() else {
            return Ok(());
        };
        let saved = set_raw_terminal(&pty.slave)?;
        restore_terminal(&pty.slave, &saved)?;
        assert_eq!(get_winsize(&pty.slave)?, WindowSize::new(80, 24));
        Ok(())
    }

    #[test]
    fn test_raw_terminal_output_is_a_no_op() -> Result<()> {
        let Some(pty) = open_pty() else {
            return Ok(());
        };
        let before = save_state(&pty.slave)?;
        assert!(set_raw_terminal_output(&pty.slave)?.is_none());
        assert_eq!(save_state(&pty.slave)?, before);
        Ok(())
    }

    #[test]
    fn test_mode_operations_on_regular_file() -> std::io::Result<()> {
        let file = tempfile::tempfile()?;
        assert!(matches!(save_state(&file), Err(Error::NotATerminal)));
        assert!(matches!(set_raw_terminal(&file), Err(Error::NotATerminal)));
        assert!(matches!(make_raw(&file), Err(Error::NotATerminal)));
        assert!(matches!(
            set_raw_terminal_output(&file),
            Err(Error::NotATerminal)
        ));

        let Some(pty) = open_pty() else {
            return Ok(());
        };
        let state = save_state(&pty.slave).expect("pty slave is a terminal");
        assert!(matches!(disable_echo(&file, &state), Err(Error::NotATerminal)));
        Ok(())
    }

    #[test]
    fn test_restore_failures_are_io_errors() -> std::io::Result<()> {
        let Some(pty) = open_pty() else {
            return Ok(());
        };
        let state = save_state(&pty.slave).expect("pty slave is a terminal");

        let file = tempfile::tempfile()?;
        let err = restore_terminal(&file, &state).expect_err("regular file is not a terminal");
        assert!(matches!(err, Error::Io(_)));

        let (read_end, _write_end) = nix::unistd::pipe()?;
        let err = restore_terminal(&read_end, &state).expect_err("pipe is not a terminal");
        assert!(matches!(err, Error::Io(_)));
        Ok(())
    }
}
