//! A tiny, strict Brainfuck interpreter library.
//!
//! Interpretation is split in two phases:
//! - [`Program::load`] filters the source down to `><+-.,[]`, decodes it into
//!   [`Instruction`]s and builds the loop jump table. Unbalanced brackets are
//!   reported as [`LoadError::UnmatchedBracket`].
//! - [`Interpreter::run`] executes a loaded program on a fresh zeroed tape
//!   (65,535 cells by default) against any `Read`/`Write` pair and returns the
//!   final [`Tape`].
//!
//! Behaviors:
//! - Cells are bytes; `+` and `-` wrap.
//! - Strict pointer bounds: moving off either end of the tape returns
//!   [`RunError::PointerOutOfBounds`].
//! - `.` flushes after every byte.
//! - `,` on end-of-input follows the configured [`EofPolicy`] (0 by default).
//!
//! Quick start:
//!
//! ```
//! use tape_bf::{Interpreter, Program};
//!
//! let program = Program::from_bytes(b"++++++++[>++++++++<-]>+. print 'A'").unwrap();
//! let mut out = Vec::new();
//! let tape = Interpreter::new(16).run(&program, &b""[..], &mut out).unwrap();
//! assert_eq!(out, b"A");
//! assert_eq!(tape.pointer(), 1);
//! ```

pub mod cli_util;
pub mod config;
pub mod error;
pub mod machine;
pub mod program;

pub use error::{LoadError, RunError, UnmatchedBracketKind};
pub use machine::{DEFAULT_TAPE_SIZE, EofPolicy, Interpreter, Tape};
pub use program::{Instruction, Program};
