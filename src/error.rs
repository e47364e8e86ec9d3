//! Error kinds reported by terminal operations.
//!
//! Every failure is classified into one of three kinds so callers can tell
//! "this is a file or pipe" apart from "this descriptor is gone" and from
//! genuine device failures, whatever the platform.

use std::io;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a terminal query or mode transition.
#[derive(Debug, Error)]
pub enum Error {
    /// The descriptor is valid but does not refer to a terminal device.
    #[error("descriptor does not refer to a terminal")]
    NotATerminal,

    /// The descriptor is closed or never existed.
    #[error("descriptor is closed or invalid")]
    InvalidDescriptor,

    /// The device-control primitive failed for another reason.
    #[error("terminal control failed")]
    Io(#[source] io::Error),
}

impl Error {
    /// Returns `true` for [`Error::NotATerminal`].
    #[must_use]
    pub fn is_not_a_terminal(&self) -> bool {
        matches!(self, Self::NotATerminal)
    }

    /// Fold the descriptor kinds into [`Error::Io`].
    ///
    /// Restoring reports every failure as a device failure: the descriptor
    /// was a terminal when the snapshot was taken, so losing it since is not
    /// a "not a terminal" condition the caller could have checked for.
    pub(crate) fn into_io(self) -> Self {
        match self {
            Self::NotATerminal => Self::Io(io::Error::other(
                "descriptor no longer refers to a terminal",
            )),
            Self::InvalidDescriptor => {
                Self::Io(io::Error::other("descriptor is closed or invalid"))
            }
            err @ Self::Io(_) => err,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        #[cfg(unix)]
        {
            use nix::errno::Errno;

            match err.raw_os_error() {
                Some(code) if code == Errno::ENOTTY as i32 => return Self::NotATerminal,
                Some(code) if code == Errno::EBADF as i32 => return Self::InvalidDescriptor,
                _ => {}
            }
        }
        Self::Io(err)
    }
}

#[cfg(unix)]
impl From<nix::errno::Errno> for Error {
    fn from(errno: nix::errno::Errno) -> Self {
        Self::from(io::Error::from(errno))
    }
}

#[cfg(windows)]
impl From<windows::core::Error> for Error {
    fn from(err: windows::core::Error) -> Self {
        use windows::Win32::Foundation::ERROR_INVALID_HANDLE;

        // Console APIs answer ERROR_INVALID_HANDLE for files and pipes too.
        if err.code() == ERROR_INVALID_HANDLE.to_hresult() {
            Self::NotATerminal
        } else {
            Self::Io(io::Error::from(err))
        }
    }
}
