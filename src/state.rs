// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use crate::decode::decode_program;
use crate::error::{err, ErrorKind, Result};
use crate::instruction::Instruction;
use crate::interrupt::Interrupt;
use crate::registers::RegisterBank;
use crate::stack::OperandStack;
use crate::value::Value;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// The interpreter's full machine state.
///
/// Fields are declared in teardown order (stack, garbage, instructions,
/// registers, then the remaining bookkeeping) so ordinary field-drop
/// glue tears things down in the order spec.md §3 specifies, with no
/// custom `Drop` impl needed.
pub struct State {
    pub stack: OperandStack,
    pub garbage: Vec<Value>,
    pub program: Vec<Instruction>,
    pub registers: RegisterBank,
    pub cursor: usize,
    /// Seed for a simple xorshift64* generator. Reserved storage per
    /// spec.md §3: no opcode in the current bytecode format consumes it.
    pub rng_seed: u64,
    pub verbose: bool,
    pub interrupt: Interrupt,
    /// Where `print` writes. Host I/O is an external collaborator per
    /// spec.md's own framing, so the core never hardcodes the process's
    /// stdout: the CLI driver wires the real thing, embedders and tests
    /// wire whatever sink they like.
    pub output: Box<dyn Write>,
    error: Option<crate::error::Error>,
}

impl Default for State {
    fn default() -> State {
        State {
            stack: OperandStack::new(),
            garbage: Vec::new(),
            program: Vec::new(),
            registers: RegisterBank::new(),
            cursor: 0,
            rng_seed: 0x9E3779B97F4A7C15,
            verbose: false,
            interrupt: Interrupt::new(),
            output: Box::new(io::stdout()),
            error: None,
        }
    }
}

impl State {
    /// Creates a fresh, empty state.
    pub fn new_state() -> State {
        State::default()
    }

    /// Decodes `buffer` (a full `.alc` image, signature included) and
    /// loads it as the current program, resetting the cursor to the
    /// start. Does not execute anything.
    pub fn start(&mut self, buffer: &[u8]) -> Result<()> {
        self.program = decode_program(buffer)?;
        self.cursor = 0;
        Ok(())
    }

    /// Reads `path` and hands its bytes to [`State::start`]. Host I/O
    /// failures are distinguished per spec.md §7: a missing path is
    /// `NOFIL`, a `stat` that fails for any other reason is `CSTAT`, and a
    /// failed read of an existing, stat-able path is `CREAD`.
    pub fn start_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match fs::metadata(path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(err!(ErrorKind::FileNotFound));
            }
            Err(e) => return Err(err!(ErrorKind::StatFailed, e.to_string())),
        }
        let bytes = fs::read(path).map_err(|e| err!(ErrorKind::ReadFailed, e.to_string()))?;
        self.start(&bytes)
    }

    /// Records the error that halted execution. Only the first error is
    /// kept, matching a single "error string" slot on the reference state.
    pub fn set_error(&mut self, e: crate::error::Error) {
        if self.error.is_none() {
            self.error = Some(e);
        }
    }

    pub fn error(&self) -> Option<&crate::error::Error> {
        self.error.as_ref()
    }

    /// Advances the xorshift64* generator and returns the next value.
    /// Exposed for embedders; no current opcode calls this.
    pub fn next_rand(&mut self) -> u64 {
        let mut x = self.rng_seed;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.rng_seed = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Tears down the state. Prints the recorded error line to stderr (if
    /// any) unconditionally — independent of `verbose` — and returns a
    /// process-style exit status: `0` on a clean run, `1` if an error was
    /// recorded. Idempotent: calling `close` on a state with nothing to
    /// report, or calling it twice, is harmless.
    pub fn close(&mut self) -> i32 {
        match &self.error {
            Some(e) => {
                eprintln!("{}", e);
                1
            }
            None => 0,
        }
    }
}
