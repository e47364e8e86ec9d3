//! Pseudo-terminal fixtures for tests.

use nix::pty::{OpenptyResult, Winsize, openpty};
use nix::sys::termios::Termios;

/// Open a pty pair sized 80x24, or `None` when the host cannot allocate one.
///
/// Tests that need a real terminal return early on `None`, which is the
/// closest thing to a skip the test harness offers.
pub(crate) fn open_pty() -> Option<OpenptyResult> {
    let size = Winsize {
        ws_row: 24,
        ws_col: 80,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    match openpty(Some(&size), None::<&Termios>) {
        Ok(pty) => Some(pty),
        Err(err) => {
            eprintln!("pty unavailable, skipping: {err}");
            None
        }
    }
}
