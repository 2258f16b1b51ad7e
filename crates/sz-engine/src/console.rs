//! Line-oriented terminal abstraction.
//!
//! The engine never touches stdin or stdout directly; it talks to a
//! [`Console`], so sessions can be driven by scripted input in tests.

use std::io::{self, BufRead, Stderr, StdinLock, Stdout, Write};

use crate::error::{EngineError, EngineResult};

/// A blocking, line-oriented terminal.
pub trait Console {
    /// Read one line without its terminator. `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Write text as-is and flush.
    fn write_str(&mut self, text: &str) -> io::Result<()>;

    /// Write text followed by a newline.
    fn line(&mut self, text: &str) -> EngineResult<()> {
        self.write_str(text)?;
        self.write_str("\n")?;
        Ok(())
    }

    /// Show `prompt` and wait for a line of input.
    fn prompt(&mut self, prompt: &str) -> EngineResult<String> {
        self.write_str(prompt)?;
        self.read_line()?.ok_or(EngineError::InputClosed)
    }
}

/// A [`Console`] over any buffered reader and writer.
#[derive(Debug)]
pub struct Terminal<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    /// Wrap a reader and a writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl Terminal<StdinLock<'static>, Stdout> {
    /// The process's standard input and output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl Terminal<StdinLock<'static>, Stderr> {
    /// Standard input, with the transcript on standard error so standard
    /// output stays free for machine-readable results.
    pub fn stdin_to_stderr() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R> Terminal<R, Vec<u8>> {
    /// Everything written so far, for captured sessions.
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.writer).into_owned()
    }
}

impl<R: BufRead, W: Write> Console for Terminal<R, W> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()
    }
}

/// Draw a box around `text`, one row per line.
pub fn framed(text: &str) -> String {
    let lines: Vec<&str> = text.trim_end_matches('\n').split('\n').collect();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let bar = format!("+-{}-+", "-".repeat(width));

    let mut out = String::new();
    out.push_str(&bar);
    out.push('\n');
    for line in &lines {
        let pad = width - line.chars().count();
        out.push_str(&format!("| {line}{} |\n", " ".repeat(pad)));
    }
    out.push_str(&bar);
    out
}
