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
use crate::opcode::Opcode;
use std::fmt;

/// The decoded operand payload of an instruction. The variant in use is
/// determined entirely by the instruction's opcode.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    I32(i32),
    F64(f64),
    U8(u8),
    U32(u32),
    /// `PUSHSTR`/`PUSHDEF`'s NUL-terminated name or string literal, with
    /// the terminator already stripped.
    Bytes(Vec<u8>),
}

/// One decoded instruction: an opcode plus its already-parsed operand.
/// The decoded program is a plain `Vec<Instruction>` rather than the
/// doubly-linked list of the reference implementation — see spec.md §9's
/// own recommendation that a dense, cursor-indexed vector replace it.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: Operand,
}

impl Instruction {
    pub fn new(opcode: Opcode, operand: Operand) -> Instruction {
        Instruction { opcode, operand }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.operand {
            Operand::None => write!(f, "{}", self.opcode),
            Operand::I32(n) => write!(f, "{} {}", self.opcode, n),
            Operand::F64(n) => write!(f, "{} {}", self.opcode, n),
            Operand::U8(n) => write!(f, "{} {}", self.opcode, n),
            Operand::U32(n) => write!(f, "{} {}", self.opcode, n),
            Operand::Bytes(bs) => write!(f, "{} {:?}", self.opcode, String::from_utf8_lossy(bs)),
        }
    }
}
