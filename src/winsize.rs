//! Terminal window dimensions.
//!
//! The size is reported in character cells and, where the platform keeps
//! track of it, in pixels. Pixel fields are best-effort: POSIX terminals
//! store whatever was last set (often zero), Windows consoles always report
//! zero and ignore them on set.

use std::fmt;

use crate::error::Result;
use crate::{AsDescriptor, sys};

/// Dimensions of a terminal window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WindowSize {
    /// Width in character cells (columns)
    pub width: u16,
    /// Height in character cells (rows)
    pub height: u16,
    /// Width in pixels, zero when unknown
    pub x_pixels: u16,
    /// Height in pixels, zero when unknown
    pub y_pixels: u16,
}

impl WindowSize {
    /// Create a size in character cells with unknown pixel dimensions.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            x_pixels: 0,
            y_pixels: 0,
        }
    }

    /// Return a copy of this size with the given pixel dimensions.
    #[must_use]
    pub fn with_pixels(self, x_pixels: u16, y_pixels: u16) -> Self {
        Self {
            x_pixels,
            y_pixels,
            ..self
        }
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Query the current dimensions of the terminal behind `fd`.
///
/// # Arguments
///
/// - `fd` - Descriptor of the terminal, borrowed for the call
///
/// # Returns
///
/// - `Ok(WindowSize)` with the size in cells, and in pixels where known
/// - `Err` if the size cannot be read
///
/// # Errors
///
/// - [`Error::NotATerminal`](crate::Error::NotATerminal) if `fd` is a file, pipe or socket
/// - [`Error::InvalidDescriptor`](crate::Error::InvalidDescriptor) if `fd` is closed
/// - [`Error::Io`](crate::Error::Io) on any other device failure
pub fn get_winsize(fd: impl AsDescriptor) -> Result<WindowSize> {
    sys::get_winsize(sys::borrow(&fd))
}

/// Ask the terminal behind `fd` to adopt `size`.
///
/// On POSIX systems the kernel notifies the terminal's foreground process
/// group with `SIGWINCH`. This is mostly meaningful for pseudo-terminals,
/// where the size is metadata the other side reads back.
///
/// # Arguments
///
/// - `fd` - Descriptor of the terminal, borrowed for the call
/// - `size` - New dimensions; pixel fields are ignored on Windows
///
/// # Returns
///
/// - `Ok(())` once the terminal has taken the new size
/// - `Err` if the size was refused; the previous size is kept
///
/// # Errors
///
/// Same as [`get_winsize`].
pub fn set_winsize(fd: impl AsDescriptor, size: &WindowSize) -> Result<()> {
    let fd = sys::borrow(&fd);
    sys::set_winsize(fd, size)?;
    tracing::debug!(fd = ?fd, size = %size, "window size set");
    Ok(())
}
