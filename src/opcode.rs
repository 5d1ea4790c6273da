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
use std::fmt;

/// Bit set by `EVAL`'s operand mask: result tags are equal.
pub const EVAL_EQ: u8 = 0b001;
/// `a < b`.
pub const EVAL_LT: u8 = 0b010;
/// `a > b`.
pub const EVAL_GT: u8 = 0b100;
/// `a != b`.
pub const EVAL_NE: u8 = EVAL_LT | EVAL_GT;
/// `a <= b`.
pub const EVAL_LE: u8 = EVAL_EQ | EVAL_LT;
/// `a >= b`.
pub const EVAL_GE: u8 = EVAL_EQ | EVAL_GT;

/// Opcode byte values, per the fixed wire encoding. `END` is an upper
/// bound sentinel, never itself decoded as an instruction: the decoder
/// halts on any byte `>= END`, exactly as it halts on `HALT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Halt = 0x00,
    Ret = 0x01,
    Jmp = 0x02,
    Jtr = 0x03,
    Jfa = 0x04,
    Jem = 0x05,
    Jnem = 0x06,
    PushNum = 0x07,
    PushStr = 0x08,
    PushBool = 0x09,
    PushDef = 0x0a,
    SumStack = 0x0b,
    StackClose = 0x0c,
    Eval = 0x0d,
    Super = 0x0e,
    Call = 0x0f,
    Load = 0x10,
    Unload = 0x11,
    DefUnload = 0x12,
}

/// Upper bound: any byte value `>= END` halts the decoder, same as `HALT`.
pub const END: u8 = 0x13;

impl Opcode {
    /// Decodes a single opcode byte, returning `None` for `HALT` or any
    /// byte `>= END` — both of which mean "stop decoding", per the wire
    /// format's §4.1 contract, not "invalid opcode".
    pub fn from_byte(byte: u8) -> Option<Opcode> {
        use Opcode::*;
        if byte == Halt as u8 || byte >= END {
            return None;
        }
        let op = match byte {
            0x01 => Ret,
            0x02 => Jmp,
            0x03 => Jtr,
            0x04 => Jfa,
            0x05 => Jem,
            0x06 => Jnem,
            0x07 => PushNum,
            0x08 => PushStr,
            0x09 => PushBool,
            0x0a => PushDef,
            0x0b => SumStack,
            0x0c => StackClose,
            0x0d => Eval,
            0x0e => Super,
            0x0f => Call,
            0x10 => Load,
            0x11 => Unload,
            0x12 => DefUnload,
            _ => unreachable!("byte {:#04x} is below END but unmapped", byte),
        };
        Some(op)
    }

    /// Whether this opcode is one of the five relative-jump instructions,
    /// which always carry an `i32` operand regardless of the generic
    /// per-opcode operand-width table.
    pub fn is_jump(self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::Jtr | Opcode::Jfa | Opcode::Jem | Opcode::Jnem)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Opcode::Halt => "HALT",
            Opcode::Ret => "RET",
            Opcode::Jmp => "JMP",
            Opcode::Jtr => "JTR",
            Opcode::Jfa => "JFA",
            Opcode::Jem => "JEM",
            Opcode::Jnem => "JNEM",
            Opcode::PushNum => "PUSHNUM",
            Opcode::PushStr => "PUSHSTR",
            Opcode::PushBool => "PUSHBOOL",
            Opcode::PushDef => "PUSHDEF",
            Opcode::SumStack => "SUMSTACK",
            Opcode::StackClose => "STACKCLOSE",
            Opcode::Eval => "EVAL",
            Opcode::Super => "SUPER",
            Opcode::Call => "CALL",
            Opcode::Load => "LOAD",
            Opcode::Unload => "UNLOAD",
            Opcode::DefUnload => "DEFUNLOAD",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halt_and_beyond_end_decode_to_none() {
        assert_eq!(Opcode::from_byte(0x00), None);
        assert_eq!(Opcode::from_byte(END), None);
        assert_eq!(Opcode::from_byte(0xff), None);
    }

    #[test]
    fn every_defined_byte_round_trips() {
        for byte in 0x01..END {
            assert!(Opcode::from_byte(byte).is_some(), "byte {:#04x}", byte);
        }
    }

    #[test]
    fn jump_opcodes_are_flagged() {
        assert!(Opcode::Jmp.is_jump());
        assert!(Opcode::Jnem.is_jump());
        assert!(!Opcode::Call.is_jump());
    }

    #[test]
    fn eval_masks_compose() {
        assert_eq!(EVAL_NE, EVAL_LT | EVAL_GT);
        assert_eq!(EVAL_LE & EVAL_GT, 0);
    }
}
