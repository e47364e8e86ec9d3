//! Report the terminal state of the standard streams.
//!
//! Prints one line per stream (stdin, stdout, stderr) with its raw
//! descriptor, whether it is a terminal and, if so, its window size:
//!
//! ```text
//! stdin  fd=0 tty=yes size=80x24 pixels=0x0
//! stdout fd=1 tty=no
//! stderr fd=2 tty=yes size=80x24 pixels=0x0
//! ```
//!
//! Exit codes:
//! - 0: at least one stream is a terminal
//! - 1: a terminal could not be queried
//! - 2: none of them is
//!
//! # Environment Variables
//!
//! - `DEBUG`: When set, enables debug output to stderr.
//! - `RUST_LOG`: Log filter used when `DEBUG` is not set.

use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};
use termstate::{AsDescriptor, get_fd_info, get_winsize, init_logging};

/// Describe one stream in the report format.
fn describe(name: &str, stream: &impl AsDescriptor) -> Result<(String, bool)> {
    let (fd, tty) = get_fd_info(stream);
    let mut line = format!("{name:<6} fd={fd:?} tty={}", if tty { "yes" } else { "no" });
    if tty {
        let size = get_winsize(stream).with_context(|| format!("Failed to read {name} size"))?;
        line.push_str(&format!(
            " size={size} pixels={}x{}",
            size.x_pixels, size.y_pixels
        ));
    }
    tracing::debug!(stream = name, tty, "probed");
    Ok((line, tty))
}

fn run() -> Result<bool> {
    let reports = [
        describe("stdin", &io::stdin())?,
        describe("stdout", &io::stdout())?,
        describe("stderr", &io::stderr())?,
    ];

    let mut out = io::stdout().lock();
    for (line, _) in &reports {
        writeln!(out, "{line}").context("Failed to write report")?;
    }
    Ok(reports.iter().any(|(_, tty)| *tty))
}

/// Main entry point for the termstate report utility.
fn main() {
    init_logging();

    match run() {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(2),
        Err(err) => {
            eprintln!("termstate: {err:#}");
            process::exit(1);
        }
    }
}
