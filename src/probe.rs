//! Terminal detection.

use crate::{AsDescriptor, RawDescriptor, sys};

/// Check whether `fd` refers to an interactive terminal.
///
/// Never fails: files, pipes, sockets and invalid descriptors all give
/// `false`.
///
/// # Arguments
///
/// - `fd` - Descriptor to check, borrowed for the call
///
/// # Returns
///
/// `true` only if the terminal attributes of `fd` can be read.
#[must_use]
pub fn is_terminal(fd: impl AsDescriptor) -> bool {
    sys::is_terminal(sys::borrow(&fd))
}

/// Return the raw descriptor behind `stream` and whether it is a terminal.
///
/// Works the same for terminals, redirected files and pipes, so callers can
/// decide between interactive and batch behavior up front.
///
/// # Arguments
///
/// - `stream` - Stream wrapping the descriptor: a file, stdio handle or pty end
///
/// # Returns
///
/// A tuple of the raw descriptor and whether it is a terminal.
///
/// # Examples
///
/// ```no_run
/// let (fd, tty) = termstate::get_fd_info(&std::io::stdin());
/// if !tty {
///     eprintln!("stdin (fd {fd:?}) is not a terminal, reading a script");
/// }
/// ```
#[must_use]
pub fn get_fd_info<S: AsDescriptor + ?Sized>(stream: &S) -> (RawDescriptor, bool) {
    let fd = sys::borrow(stream);
    (sys::raw(fd), sys::is_terminal(fd))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::fd::AsRawFd;

    #[test]
    fn test_is_terminal_on_regular_file() -> std::io::Result<()> {
        let file = tempfile::tempfile()?;
        assert!(!is_terminal(&file));
        Ok(())
    }

    #[test]
    fn test_is_terminal_on_pipe() -> nix::Result<()> {
        let (read_end, write_end) = nix::unistd::pipe()?;
        assert!(!is_terminal(&read_end));
        assert!(!is_terminal(&write_end));
        Ok(())
    }

    #[test]
    fn test_is_terminal_on_pty() {
        let Some(pty) = crate::testutil::open_pty() else {
            return;
        };
        assert!(is_terminal(&pty.slave));
    }

    #[test]
    fn test_get_fd_info() -> std::io::Result<()> {
        let file = tempfile::tempfile()?;
        assert_eq!(get_fd_info(&file), (file.as_raw_fd(), false));

        let Some(pty) = crate::testutil::open_pty() else {
            return Ok(());
        };
        let tty = std::fs::File::from(pty.slave);
        assert_eq!(get_fd_info(&tty), (tty.as_raw_fd(), true));
        Ok(())
    }
}
