use std::fmt;

/// Errors that can occur while loading a program.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Loops were not balanced; a matching `[` or `]` was not found.
    #[error("Unmatched bracket {kind} at instruction {ip} (byte offset {offset})")]
    UnmatchedBracket {
        ip: usize,
        offset: usize,
        kind: UnmatchedBracketKind,
    },

    /// The program source could not be read.
    #[error("I/O error while reading program: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while running a loaded program.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The data pointer attempted to move left of cell 0 or beyond the last cell.
    #[error("Pointer out of bounds at instruction {ip} (ptr={ptr}, op='{op}')")]
    PointerOutOfBounds { ip: usize, ptr: usize, op: char },

    /// Reading from the input stream or writing to the output stream failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: std::io::Error,
    },

    /// A tape with no cells cannot hold the data pointer.
    #[error("Tape size must be at least one cell")]
    EmptyTape,
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}
