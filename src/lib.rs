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

//! A small stack-based bytecode virtual machine: a decoder for the
//! `.alc` wire format, an interpreter loop, and the typed value model,
//! operand stack and register bank the interpreter operates on.
//!
//! This crate is the VM core only. Compiling source text down to `.alc`
//! bytes, and driving a program from the command line, live outside it
//! (the latter in `src/bin/alu.rs`).

/// Builtin callables reachable via `PUSHDEF`/`CALL` (`print`, `wait`).
pub mod builtins;
/// Turns a raw `.alc` byte buffer into a decoded instruction sequence.
pub mod decode;
/// The error taxonomy every fallible operation in this crate returns.
pub mod error;
/// One decoded instruction: an opcode plus its already-parsed operand.
pub mod instruction;
/// Cooperative cancellation, checked between instructions.
pub mod interrupt;
/// The dispatch loop and per-opcode execution semantics.
pub mod interp;
/// The fixed opcode set and its wire encoding.
pub mod opcode;
/// The sparse, index-addressed register bank `LOAD`/`UNLOAD` operate on.
pub mod registers;
/// The double-ended operand stack every opcode reads and writes.
pub mod stack;
/// The interpreter's full machine state and its lifecycle.
pub mod state;
/// Hex string conversions, used by the CLI and by golden-file tests that
/// store `.alc` fixtures as hex text rather than raw binary.
pub mod util;
/// The six-variant runtime value model.
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use state::State;
