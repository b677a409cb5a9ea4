//! Executing a loaded [`Program`] against a tape and a pair of byte streams.
//!
//! Behaviors:
//! - Tape cells are `u8`, initialized to 0, with wrapping `+`/`-`.
//! - Strict pointer bounds: moving left from cell 0 or right past the end
//!   returns an error.
//! - `.` writes one byte and flushes before the next instruction runs.
//! - `,` reads one byte; end-of-stream is resolved by the [`EofPolicy`].
//! - Every run starts from a fresh tape, so one `Program` can be run
//!   repeatedly (or from several threads) without state leaking between runs.

use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use log::{debug, trace};

use crate::error::RunError;
use crate::program::{Instruction, Program};

/// Tape size used by the `bf` binary unless configured otherwise.
pub const DEFAULT_TAPE_SIZE: usize = 0xFFFF;

/// What `,` stores in the current cell when the input stream is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EofPolicy {
    /// Set the cell to 0.
    #[default]
    Zero,
    /// Leave the cell as it was.
    Unchanged,
    /// Set the cell to 255.
    Max,
}

impl FromStr for EofPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" | "0" => Ok(EofPolicy::Zero),
            "unchanged" | "keep" => Ok(EofPolicy::Unchanged),
            "max" | "255" => Ok(EofPolicy::Max),
            other => Err(format!(
                "unknown EOF policy '{other}' (expected zero, unchanged or max)"
            )),
        }
    }
}

impl fmt::Display for EofPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EofPolicy::Zero => write!(f, "zero"),
            EofPolicy::Unchanged => write!(f, "unchanged"),
            EofPolicy::Max => write!(f, "max"),
        }
    }
}

/// The memory of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Tape {
    /// A zeroed tape of `size` cells with the pointer at cell 0.
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![0; size],
            pointer: 0,
        }
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<u8> {
        self.cells.get(index).copied()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// The cell under the pointer, `None` on a tape with no cells.
    pub fn current(&self) -> Option<u8> {
        self.cells.get(self.pointer).copied()
    }

    // Only called by `run`, which rejects empty tapes up front.
    fn value(&self) -> u8 {
        self.cells[self.pointer]
    }

    fn current_mut(&mut self) -> &mut u8 {
        &mut self.cells[self.pointer]
    }

    fn move_right(&mut self) -> bool {
        if self.pointer + 1 >= self.cells.len() {
            return false;
        }
        self.pointer += 1;
        true
    }

    fn move_left(&mut self) -> bool {
        if self.pointer == 0 {
            return false;
        }
        self.pointer -= 1;
        true
    }
}

/// Run configuration. Holds no per-run state; see [`Interpreter::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpreter {
    tape_size: usize,
    eof: EofPolicy,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(DEFAULT_TAPE_SIZE)
    }
}

impl Interpreter {
    /// An interpreter with a tape of `tape_size` cells and the default EOF policy.
    pub fn new(tape_size: usize) -> Self {
        Self {
            tape_size,
            eof: EofPolicy::default(),
        }
    }

    pub fn with_eof_policy(mut self, eof: EofPolicy) -> Self {
        self.eof = eof;
        self
    }

    pub fn tape_size(&self) -> usize {
        self.tape_size
    }

    pub fn eof_policy(&self) -> EofPolicy {
        self.eof
    }

    /// Run `program` to completion on a fresh tape.
    ///
    /// Returns the final tape on success. On failure the partially mutated
    /// tape is dropped and the error names the instruction that failed.
    pub fn run<R: Read, W: Write>(
        &self,
        program: &Program,
        mut input: R,
        mut output: W,
    ) -> Result<Tape, RunError> {
        if self.tape_size == 0 {
            return Err(RunError::EmptyTape);
        }

        let mut tape = Tape::new(self.tape_size);
        let instructions = program.instructions();
        let mut code_ptr = 0;
        let mut steps: u64 = 0;

        while code_ptr < instructions.len() {
            let instr = instructions[code_ptr];
            trace!(
                "ip={code_ptr} ptr={} cell={} op='{}'",
                tape.pointer,
                tape.value(),
                instr.symbol() as char
            );

            match instr {
                Instruction::Right => {
                    if !tape.move_right() {
                        return Err(out_of_bounds(code_ptr, &tape, instr));
                    }
                }
                Instruction::Left => {
                    if !tape.move_left() {
                        return Err(out_of_bounds(code_ptr, &tape, instr));
                    }
                }
                Instruction::Increment => {
                    let cell = tape.current_mut();
                    *cell = cell.wrapping_add(1);
                }
                Instruction::Decrement => {
                    let cell = tape.current_mut();
                    *cell = cell.wrapping_sub(1);
                }
                Instruction::Output => {
                    let byte = [tape.value()];
                    output
                        .write_all(&byte)
                        .and_then(|_| output.flush())
                        .map_err(|source| RunError::Io { ip: code_ptr, source })?;
                }
                Instruction::Input => {
                    let read = read_byte(&mut input)
                        .map_err(|source| RunError::Io { ip: code_ptr, source })?;
                    match (read, self.eof) {
                        (Some(byte), _) => *tape.current_mut() = byte,
                        (None, EofPolicy::Zero) => *tape.current_mut() = 0,
                        (None, EofPolicy::Max) => *tape.current_mut() = u8::MAX,
                        (None, EofPolicy::Unchanged) => {}
                    }
                }
                Instruction::LoopStart => {
                    if tape.value() == 0 {
                        // Land on the matching ']'; the increment below steps past it.
                        code_ptr = program.forward(code_ptr).expect("validated bracket");
                    }
                }
                Instruction::LoopEnd => {
                    if tape.value() != 0 {
                        // Land on the matching '['; the increment below re-enters the body.
                        code_ptr = program.backward(code_ptr).expect("validated bracket");
                    }
                }
            }

            steps += 1;
            code_ptr += 1;
        }

        debug!("program finished after {steps} steps (ptr={})", tape.pointer);
        Ok(tape)
    }

    /// Run `program` against locked stdin and stdout.
    pub fn run_stdio(&self, program: &Program) -> Result<Tape, RunError> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run(program, stdin.lock(), stdout.lock())
    }
}

fn out_of_bounds(ip: usize, tape: &Tape, instr: Instruction) -> RunError {
    RunError::PointerOutOfBounds {
        ip,
        ptr: tape.pointer,
        op: instr.symbol() as char,
    }
}

/// Read exactly one byte, `None` on end-of-stream.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
