use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Color;

use crate::{LoadError, Program, RunError};

/// Show this many source bytes on each side of the caret.
const WINDOW_BYTES: usize = 32;

/// Pretty-print a [`LoadError`] with caret positioning into `source`.
/// If `program` is `Some("bf")`, prefix messages with "bf: ...".
pub fn print_load_error(program: Option<&str>, source: &[u8], err: &LoadError) {
    match err {
        LoadError::UnmatchedBracket { ip, offset, kind } => {
            let msg = prefixed(program, &format!("Load error: unmatched bracket {kind} at instruction {ip}"));
            print_error_with_context(&msg, source, *offset);
        }
        LoadError::Io { source: e } => {
            eprintln!("{}", prefixed(program, &format!("Load error: {e}")));
            let _ = io::stderr().flush();
        }
    }
}

/// Pretty-print a [`RunError`]. The failing instruction is located in
/// `source` through the program's offset table.
pub fn print_run_error(program: Option<&str>, source: &[u8], code: &Program, err: &RunError) {
    let (msg, ip) = match err {
        RunError::PointerOutOfBounds { ip, ptr, op } => (
            format!("Runtime error: pointer out of bounds (ptr={ptr}, op={op}) at instruction {ip}"),
            Some(*ip),
        ),
        RunError::Io { ip, source: e } => (format!("Runtime error: I/O failure: {e} at instruction {ip}"), Some(*ip)),
        RunError::EmptyTape => ("Runtime error: tape size must be at least 1".to_string(), None),
    };
    let msg = prefixed(program, &msg);

    match ip.and_then(|ip| code.offset(ip)) {
        Some(offset) => print_error_with_context(&msg, source, offset),
        None => {
            eprintln!("{msg}");
            let _ = io::stderr().flush();
        }
    }
}

fn prefixed(program: Option<&str>, msg: &str) -> String {
    let msg = if io::stderr().is_terminal() {
        highlight(msg)
    } else {
        msg.to_string()
    };
    match program {
        Some(p) => format!("{p}: {msg}"),
        None => msg,
    }
}

/// Colour the "... error:" label.
fn highlight(msg: &str) -> String {
    match msg.find(':') {
        Some(colon) => {
            let (label, rest) = msg.split_at(colon);
            format!("{}{}", Color::Red.bold().paint(label), rest)
        }
        None => msg.to_string(),
    }
}

/// Print a concise error followed by a window of the source around byte
/// `offset` with a caret under it.
pub fn print_error_with_context(prefix: &str, source: &[u8], offset: usize) {
    eprintln!("{prefix}");
    let (line, caret) = context_window(source, offset);
    eprintln!("  {line}");
    eprintln!("  {caret}");
    let _ = io::stderr().flush();
}

/// Build the one-line excerpt and the caret line beneath it.
///
/// Bytes that would break the single-line layout (newlines, tabs, control
/// and non-ASCII bytes) are shown as a space or `?` so the caret stays aligned.
fn context_window(source: &[u8], offset: usize) -> (String, String) {
    let start = offset.saturating_sub(WINDOW_BYTES);
    let end = (offset + WINDOW_BYTES + 1).min(source.len());
    let start = start.min(end);

    let line: String = source[start..end]
        .iter()
        .map(|&b| match b {
            b' '..=b'~' => b as char,
            b'\t' | b'\n' | b'\r' => ' ',
            _ => '?',
        })
        .collect();

    let mut caret = " ".repeat(offset.saturating_sub(start));
    caret.push('^');
    (line, caret)
}
