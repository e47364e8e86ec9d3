//! POSIX backend.
//!
//! Mode state is the termios record read and written with `tcgetattr` and
//! `tcsetattr`; window size goes through the `TIOCGWINSZ`/`TIOCSWINSZ`
//! ioctls.

use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};

use nix::libc;
use termios::{
    BRKINT, CS8, CSIZE, ECHO, ECHONL, ICANON, ICRNL, IEXTEN, IGNBRK, IGNCR, INLCR, ISIG, ISTRIP,
    IXON, OPOST, PARENB, PARMRK, TCSANOW, Termios, VMIN, VTIME, tcsetattr,
};

use crate::error::Result;
use crate::winsize::WindowSize;

/// Native attribute record held by a [`crate::TerminalState`].
pub(crate) type Attributes = Termios;

#[allow(unsafe_code)]
mod ioctl {
    use nix::libc;

    nix::ioctl_read_bad!(
        /// Read the window size of a terminal.
        ///
        /// # Safety
        ///
        /// `data` must point to a writable `winsize`.
        tiocgwinsz,
        libc::TIOCGWINSZ,
        libc::winsize
    );

    nix::ioctl_write_ptr_bad!(
        /// Set the window size of a terminal.
        ///
        /// # Safety
        ///
        /// `data` must point to a valid `winsize`.
        tiocswinsz,
        libc::TIOCSWINSZ,
        libc::winsize
    );
}

pub(crate) fn borrow<F: AsFd + ?Sized>(fd: &F) -> BorrowedFd<'_> {
    fd.as_fd()
}

pub(crate) fn raw(fd: BorrowedFd<'_>) -> RawFd {
    fd.as_raw_fd()
}

pub(crate) fn is_terminal(fd: BorrowedFd<'_>) -> bool {
    Termios::from_fd(fd.as_raw_fd()).is_ok()
}

pub(crate) fn get_attributes(fd: BorrowedFd<'_>) -> Result<Attributes> {
    Ok(Termios::from_fd(fd.as_raw_fd())?)
}

pub(crate) fn set_attributes(fd: BorrowedFd<'_>, attrs: &Attributes) -> Result<()> {
    tcsetattr(fd.as_raw_fd(), TCSANOW, attrs)?;
    Ok(())
}

/// Raw mode as `cfmakeraw(3)` defines it.
///
/// Input arrives byte by byte (`VMIN` 1, `VTIME` 0) with no line editing,
/// no echo, no signal keys, no CR/NL translation and no output processing.
pub(crate) fn raw_attributes(attrs: &Attributes) -> Attributes {
    let mut raw = *attrs;
    raw.c_iflag &= !(IGNBRK | BRKINT | PARMRK | ISTRIP | INLCR | IGNCR | ICRNL | IXON);
    raw.c_oflag &= !OPOST;
    raw.c_lflag &= !(ECHO | ECHONL | ICANON | ISIG | IEXTEN);
    raw.c_cflag &= !(CSIZE | PARENB);
    raw.c_cflag |= CS8;
    raw.c_cc[VMIN] = 1;
    raw.c_cc[VTIME] = 0;
    raw
}

/// Only the echo bit goes; canonical input and signal keys stay as they were.
pub(crate) fn echo_disabled_attributes(attrs: &Attributes) -> Attributes {
    let mut quiet = *attrs;
    quiet.c_lflag &= !ECHO;
    quiet
}

pub(crate) fn enter_raw(fd: BorrowedFd<'_>, saved: &Attributes) -> Result<()> {
    set_attributes(fd, &raw_attributes(saved))
}

pub(crate) fn enter_echo_disabled(fd: BorrowedFd<'_>, baseline: &Attributes) -> Result<()> {
    set_attributes(fd, &echo_disabled_attributes(baseline))
}

/// Output processing lives in the same termios record as input, so there is
/// nothing separate to switch. The descriptor is still checked.
pub(crate) fn enter_raw_output(fd: BorrowedFd<'_>) -> Result<Option<Attributes>> {
    get_attributes(fd)?;
    Ok(None)
}

#[allow(unsafe_code)]
pub(crate) fn get_winsize(fd: BorrowedFd<'_>) -> Result<WindowSize> {
    let mut ws = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    // SAFETY: `fd` stays borrowed for the call and `ws` is a live winsize.
    unsafe { ioctl::tiocgwinsz(fd.as_raw_fd(), &raw mut ws) }?;
    Ok(WindowSize {
        width: ws.ws_col,
        height: ws.ws_row,
        x_pixels: ws.ws_xpixel,
        y_pixels: ws.ws_ypixel,
    })
}

#[allow(unsafe_code)]
pub(crate) fn set_winsize(fd: BorrowedFd<'_>, size: &WindowSize) -> Result<()> {
    let ws = libc::winsize {
        ws_row: size.height,
        ws_col: size.width,
        ws_xpixel: size.x_pixels,
        ws_ypixel: size.y_pixels,
    };
    // SAFETY: `fd` stays borrowed for the call and `ws` outlives it.
    unsafe { ioctl::tiocswinsz(fd.as_raw_fd(), &raw const ws) }?;
    Ok(())
}
