//! Loading and validating program text.
//!
//! Loading filters the raw source down to the eight instruction bytes,
//! decodes each into an [`Instruction`], and resolves every loop into a
//! bidirectional jump table. The resulting [`Program`] is immutable and can
//! be run any number of times.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::error::{LoadError, UnmatchedBracketKind};

/// One of the eight instructions of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `>`
    Right,
    /// `<`
    Left,
    /// `+`
    Increment,
    /// `-`
    Decrement,
    /// `.`
    Output,
    /// `,`
    Input,
    /// `[`
    LoopStart,
    /// `]`
    LoopEnd,
}

impl Instruction {
    /// Decode a source byte. Anything outside `><+-.,[]` is a comment.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'>' => Instruction::Right,
            b'<' => Instruction::Left,
            b'+' => Instruction::Increment,
            b'-' => Instruction::Decrement,
            b'.' => Instruction::Output,
            b',' => Instruction::Input,
            b'[' => Instruction::LoopStart,
            b']' => Instruction::LoopEnd,
            _ => return None,
        })
    }

    /// The source byte this instruction was decoded from.
    pub fn symbol(self) -> u8 {
        match self {
            Instruction::Right => b'>',
            Instruction::Left => b'<',
            Instruction::Increment => b'+',
            Instruction::Decrement => b'-',
            Instruction::Output => b'.',
            Instruction::Input => b',',
            Instruction::LoopStart => b'[',
            Instruction::LoopEnd => b']',
        }
    }
}

/// A validated program: the dense instruction sequence plus its jump table.
///
/// Positions are post-filter indices into the instruction sequence, not raw
/// byte offsets into the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    // open position -> matching close position
    forward: HashMap<usize, usize>,
    // close position -> matching open position
    backward: HashMap<usize, usize>,
    // instruction position -> raw byte offset in the source
    offsets: Vec<usize>,
}

impl Program {
    /// Load a program from any byte source.
    ///
    /// The source is consumed to the end. Loading fails on the first `]`
    /// with no open loop, or after the scan if any `[` is left unclosed.
    pub fn load<R: Read>(source: R) -> Result<Self, LoadError> {
        let mut program = Program::default();
        let mut stack: Vec<usize> = Vec::new();

        for (offset, byte) in source.bytes().enumerate() {
            let byte = byte.map_err(|source| LoadError::Io { source })?;
            let Some(instr) = Instruction::from_byte(byte) else {
                continue;
            };

            let ip = program.instructions.len();
            match instr {
                Instruction::LoopStart => stack.push(ip),
                Instruction::LoopEnd => {
                    let Some(open) = stack.pop() else {
                        return Err(LoadError::UnmatchedBracket {
                            ip,
                            offset,
                            kind: UnmatchedBracketKind::Close,
                        });
                    };
                    program.forward.insert(open, ip);
                    program.backward.insert(ip, open);
                }
                _ => {}
            }
            program.instructions.push(instr);
            program.offsets.push(offset);
        }

        if let Some(unclosed) = stack.last().copied() {
            return Err(LoadError::UnmatchedBracket {
                ip: unclosed,
                offset: program.offsets[unclosed],
                kind: UnmatchedBracketKind::Open,
            });
        }

        debug!(
            "loaded {} instructions with {} loops",
            program.len(),
            program.loop_count()
        );
        Ok(program)
    }

    /// Load a program from an in-memory buffer.
    pub fn from_bytes(source: &[u8]) -> Result<Self, LoadError> {
        Self::load(source)
    }

    /// Load a program from the file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = File::open(path.as_ref()).map_err(|source| LoadError::Io { source })?;
        Self::load(BufReader::new(file))
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Position of the `]` matching the `[` at `open`.
    pub fn forward(&self, open: usize) -> Option<usize> {
        self.forward.get(&open).copied()
    }

    /// Position of the `[` matching the `]` at `close`.
    pub fn backward(&self, close: usize) -> Option<usize> {
        self.backward.get(&close).copied()
    }

    /// Raw byte offset in the source of the instruction at `ip`.
    pub fn offset(&self, ip: usize) -> Option<usize> {
        self.offsets.get(ip).copied()
    }

    /// Number of matched `[`/`]` pairs.
    pub fn loop_count(&self) -> usize {
        self.forward.len()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instr in &self.instructions {
            write!(f, "{}", instr.symbol() as char)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn load(code: &str) -> Result<Program, LoadError> {
        Program::from_bytes(code.as_bytes())
    }

    #[test]
    fn comments_and_whitespace_are_ignored() {
        let noisy = load("+ + + comment [ ] >").unwrap();
        let clean = load("+++[]>").unwrap();
        assert_eq!(noisy.instructions(), clean.instructions());
        assert_eq!(noisy.to_string(), "+++[]>");
    }

    #[test]
    fn positions_are_post_filter() {
        let program = load("a[b]c").unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(program.forward(0), Some(1));
        assert_eq!(program.backward(1), Some(0));
        assert_eq!(program.offset(0), Some(1));
        assert_eq!(program.offset(1), Some(3));
    }

    #[test]
    fn nested_loops_match_by_stack_discipline() {
        let program = load("[[][]]").unwrap();
        assert_eq!(program.forward(0), Some(5));
        assert_eq!(program.forward(1), Some(2));
        assert_eq!(program.forward(3), Some(4));
        assert_eq!(program.loop_count(), 3);
    }

    #[test]
    fn jump_table_round_trips() {
        let program = load("+[>[-]<[->+<]]>[.[-]]").unwrap();
        for (ip, instr) in program.instructions().iter().enumerate() {
            match instr {
                Instruction::LoopStart => {
                    let close = program.forward(ip).unwrap();
                    assert_eq!(program.backward(close), Some(ip));
                    assert_eq!(program.backward(ip), None);
                }
                Instruction::LoopEnd => {
                    let open = program.backward(ip).unwrap();
                    assert_eq!(program.forward(open), Some(ip));
                    assert_eq!(program.forward(ip), None);
                }
                _ => {
                    assert_eq!(program.forward(ip), None);
                    assert_eq!(program.backward(ip), None);
                }
            }
        }
    }

    #[test]
    fn lone_close_is_unmatched_close() {
        let result = load("]");
        assert!(matches!(
            result,
            Err(LoadError::UnmatchedBracket { kind: UnmatchedBracketKind::Close, ip: 0, .. })
        ));
    }

    #[test]
    fn lone_open_is_unmatched_open() {
        let result = load("[");
        assert!(matches!(
            result,
            Err(LoadError::UnmatchedBracket { kind: UnmatchedBracketKind::Open, ip: 0, .. })
        ));
    }

    #[test]
    fn close_before_open_fails_immediately() {
        let result = load("+ ][");
        assert!(matches!(
            result,
            Err(LoadError::UnmatchedBracket { kind: UnmatchedBracketKind::Close, ip: 1, offset: 2 })
        ));
    }

    #[test]
    fn innermost_unclosed_open_is_reported() {
        let result = load("[ [ [ ]");
        assert!(matches!(
            result,
            Err(LoadError::UnmatchedBracket { kind: UnmatchedBracketKind::Open, ip: 1, offset: 2 })
        ));
    }

    #[test]
    fn empty_source_is_an_empty_program() {
        let program = load("no instructions here").unwrap();
        assert!(program.is_empty());
        assert_eq!(program.loop_count(), 0);
    }

    #[test]
    fn read_failure_is_io_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk on fire"))
            }
        }
        assert!(matches!(Program::load(Broken), Err(LoadError::Io { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = Program::from_file("/definitely/not/a/real/program.bf");
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
