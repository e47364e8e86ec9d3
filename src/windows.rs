//! Windows console backend.
//!
//! Mode state is the console mode word of the handle. Window size is the
//! visible window rectangle of the screen buffer; consoles have no notion of
//! pixel size, so those fields read as zero and are ignored on set.

use std::io;
use std::os::windows::io::{AsHandle, AsRawHandle, BorrowedHandle, RawHandle};

use windows::Win32::Foundation::{BOOL, HANDLE};
use windows::Win32::System::Console::{
    CONSOLE_MODE, CONSOLE_SCREEN_BUFFER_INFO, COORD, DISABLE_NEWLINE_AUTO_RETURN,
    ENABLE_ECHO_INPUT, ENABLE_EXTENDED_FLAGS, ENABLE_INSERT_MODE, ENABLE_LINE_INPUT,
    ENABLE_MOUSE_INPUT, ENABLE_PROCESSED_INPUT, ENABLE_QUICK_EDIT_MODE,
    ENABLE_VIRTUAL_TERMINAL_INPUT, ENABLE_VIRTUAL_TERMINAL_PROCESSING, ENABLE_WINDOW_INPUT,
    GetConsoleMode, GetConsoleScreenBufferInfo, SMALL_RECT, SetConsoleMode,
    SetConsoleScreenBufferSize, SetConsoleWindowInfo,
};

use crate::error::{Error, Result};
use crate::winsize::WindowSize;

/// Native attribute record held by a [`crate::TerminalState`].
pub(crate) type Attributes = CONSOLE_MODE;

pub(crate) fn borrow<F: AsHandle + ?Sized>(fd: &F) -> BorrowedHandle<'_> {
    fd.as_handle()
}

pub(crate) fn raw(fd: BorrowedHandle<'_>) -> RawHandle {
    fd.as_raw_handle()
}

fn handle(fd: BorrowedHandle<'_>) -> HANDLE {
    HANDLE(fd.as_raw_handle())
}

pub(crate) fn is_terminal(fd: BorrowedHandle<'_>) -> bool {
    get_attributes(fd).is_ok()
}

#[allow(unsafe_code)]
pub(crate) fn get_attributes(fd: BorrowedHandle<'_>) -> Result<Attributes> {
    let mut mode = CONSOLE_MODE(0);
    // SAFETY: the handle stays borrowed for the call and `mode` is writable.
    unsafe { GetConsoleMode(handle(fd), &raw mut mode) }?;
    Ok(mode)
}

#[allow(unsafe_code)]
pub(crate) fn set_attributes(fd: BorrowedHandle<'_>, attrs: &Attributes) -> Result<()> {
    // SAFETY: the handle stays borrowed for the call.
    unsafe { SetConsoleMode(handle(fd), *attrs) }?;
    Ok(())
}

/// No echo, no line assembly, no Ctrl-C processing, no mouse or resize
/// records; quick-edit and insert mode are forced on with extended flags.
pub(crate) fn raw_attributes(attrs: &Attributes) -> Attributes {
    let cleared = ENABLE_ECHO_INPUT.0
        | ENABLE_LINE_INPUT.0
        | ENABLE_MOUSE_INPUT.0
        | ENABLE_WINDOW_INPUT.0
        | ENABLE_PROCESSED_INPUT.0;
    let set = ENABLE_EXTENDED_FLAGS.0 | ENABLE_INSERT_MODE.0 | ENABLE_QUICK_EDIT_MODE.0;
    CONSOLE_MODE((attrs.0 & !cleared) | set)
}

/// Echo off. The console only echoes in line mode, so line and processed
/// input are kept on to preserve line editing and Ctrl-C.
pub(crate) fn echo_disabled_attributes(attrs: &Attributes) -> Attributes {
    CONSOLE_MODE((attrs.0 & !ENABLE_ECHO_INPUT.0) | ENABLE_PROCESSED_INPUT.0 | ENABLE_LINE_INPUT.0)
}

pub(crate) fn enter_raw(fd: BorrowedHandle<'_>, saved: &Attributes) -> Result<()> {
    let raw = raw_attributes(saved);
    let with_vt = CONSOLE_MODE(raw.0 | ENABLE_VIRTUAL_TERMINAL_INPUT.0);
    // Consoles older than Windows 10 reject virtual terminal input.
    if set_attributes(fd, &with_vt).is_ok() {
        return Ok(());
    }
    set_attributes(fd, &raw)
}

pub(crate) fn enter_echo_disabled(fd: BorrowedHandle<'_>, baseline: &Attributes) -> Result<()> {
    set_attributes(fd, &echo_disabled_attributes(baseline))
}

pub(crate) fn enter_raw_output(fd: BorrowedHandle<'_>) -> Result<Option<Attributes>> {
    let saved = get_attributes(fd)?;
    let raw = CONSOLE_MODE(
        saved.0 | ENABLE_VIRTUAL_TERMINAL_PROCESSING.0 | DISABLE_NEWLINE_AUTO_RETURN.0,
    );
    // Older consoles refuse these bits; the output is then left as it was.
    let _ = set_attributes(fd, &raw);
    Ok(Some(saved))
}

#[allow(unsafe_code)]
fn screen_buffer_info(fd: BorrowedHandle<'_>) -> Result<CONSOLE_SCREEN_BUFFER_INFO> {
    let mut info = CONSOLE_SCREEN_BUFFER_INFO::default();
    // SAFETY: the handle stays borrowed for the call and `info` is writable.
    unsafe { GetConsoleScreenBufferInfo(handle(fd), &raw mut info) }?;
    Ok(info)
}

fn span(low: i16, high: i16) -> u16 {
    u16::try_from(i32::from(high) - i32::from(low) + 1).unwrap_or(0)
}

fn cells(value: u16) -> Result<i16> {
    i16::try_from(value).map_err(|_| {
        Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{value} cells is larger than a console allows"),
        ))
    })
}

pub(crate) fn get_winsize(fd: BorrowedHandle<'_>) -> Result<WindowSize> {
    let window = screen_buffer_info(fd)?.srWindow;
    Ok(WindowSize::new(
        span(window.Left, window.Right),
        span(window.Top, window.Bottom),
    ))
}

/// Screen buffer dimensions needed to hold a window of `width` x `height`.
fn buffer_for(current: COORD, width: i16, height: i16) -> COORD {
    COORD {
        X: current.X.max(width),
        Y: current.Y.max(height),
    }
}

#[allow(unsafe_code)]
pub(crate) fn set_winsize(fd: BorrowedHandle<'_>, size: &WindowSize) -> Result<()> {
    let (width, height) = (cells(size.width)?, cells(size.height)?);
    let info = screen_buffer_info(fd)?;

    // The window has to fit inside the screen buffer.
    let buffer = buffer_for(info.dwSize, width, height);
    let grown = buffer != info.dwSize;
    if grown {
        // SAFETY: the handle stays borrowed for the call.
        unsafe { SetConsoleScreenBufferSize(handle(fd), buffer) }?;
    }

    let origin = info.srWindow;
    let window = SMALL_RECT {
        Left: origin.Left,
        Top: origin.Top,
        Right: origin.Left.saturating_add(width - 1),
        Bottom: origin.Top.saturating_add(height - 1),
    };
    // SAFETY: the handle stays borrowed for the call and `window` outlives it.
    let resized = unsafe { SetConsoleWindowInfo(handle(fd), BOOL::from(true), &raw const window) };
    if let Err(err) = resized {
        if grown {
            // Undo the buffer change so a refused size leaves nothing behind.
            // SAFETY: the handle stays borrowed for the call.
            let _ = unsafe { SetConsoleScreenBufferSize(handle(fd), info.dwSize) };
        }
        return Err(err.into());
    }
    Ok(())
}
