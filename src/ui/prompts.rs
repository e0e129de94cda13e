//! ui::prompts
//!
//! Interactive prompts.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must either have defaults or fail
//! with a clear error message.
//!
//! The `*_from` variants take explicit reader/writer handles so the
//! parsing can be tested without a terminal.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<io::Error> for PromptError {
    fn from(e: io::Error) -> Self {
        PromptError::IoError(e.to_string())
    }
}

/// Prompt for text input on the terminal.
pub fn input(
    message: &str,
    default: Option<&str>,
    interactive: bool,
) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    input_from(&mut io::stdin().lock(), &mut io::stderr(), message, default)
}

/// Prompt to pick one of `options` on the terminal; returns its index.
pub fn select<T: AsRef<str>>(
    message: &str,
    options: &[T],
    default: Option<usize>,
    interactive: bool,
) -> Result<usize, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    select_from(
        &mut io::stdin().lock(),
        &mut io::stderr(),
        message,
        options,
        default,
    )
}

/// Read one line of input. An empty answer takes `default`; end of input
/// cancels.
pub fn input_from<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
    default: Option<&str>,
) -> Result<String, PromptError> {
    match default {
        Some(d) => write!(writer, "{} [{}]: ", message, d)?,
        None => write!(writer, "{}: ", message)?,
    }
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(PromptError::Cancelled);
    }

    let answer = line.trim();
    match (answer.is_empty(), default) {
        (true, Some(d)) => Ok(d.to_string()),
        _ => Ok(answer.to_string()),
    }
}

/// List `options` numbered from 1 and read a choice, by number or by
/// (case-insensitive) name. Re-asks on an unrecognized answer.
pub fn select_from<R: BufRead, W: Write, T: AsRef<str>>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
    options: &[T],
    default: Option<usize>,
) -> Result<usize, PromptError> {
    for (i, option) in options.iter().enumerate() {
        writeln!(writer, "  {}) {}", i + 1, option.as_ref())?;
    }
    let default_label = default.map(|d| (d + 1).to_string());

    loop {
        let answer = input_from(reader, writer, message, default_label.as_deref())?;

        if let Ok(n) = answer.parse::<usize>() {
            if (1..=options.len()).contains(&n) {
                return Ok(n - 1);
            }
        }
        if let Some(i) = options
            .iter()
            .position(|o| o.as_ref().eq_ignore_ascii_case(&answer))
        {
            return Ok(i);
        }

        writeln!(writer, "Please choose 1-{}.", options.len())?;
    }
}
