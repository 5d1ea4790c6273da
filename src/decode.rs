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
use crate::error::{err, ErrorKind, Result};
use crate::instruction::{Instruction, Operand};
use crate::opcode::Opcode;

/// The 3-byte signature every compiled program is prefixed with.
pub const MAGIC: [u8; 3] = [0x1B, 0xCA, 0xCA];

/// Checks for and strips the 3-byte `MAGIC` signature, then decodes the
/// remainder via [`feed`]. This is the `start` entry point's
/// responsibility in spec.md §4.2: `feed` itself never sees the signature.
pub fn decode_program(bytes: &[u8]) -> Result<Vec<Instruction>> {
    if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
        return Err(err!(ErrorKind::Other, "missing or malformed signature"));
    }
    feed(&bytes[MAGIC.len()..])
}

/// Scans a byte buffer (already positioned after the signature) into a
/// sequence of decoded instructions.
///
/// Decoding stops, without error, the moment it sees `HALT` (0x00) or any
/// byte `>= END` — per spec.md §4.1, those bytes terminate the program
/// rather than failing it. A truncated operand (not enough bytes left for
/// the opcode's required width, or a `PUSHSTR`/`PUSHDEF` with no NUL before
/// the buffer ends) is a decode error: the reference implementation trusts
/// the caller here, but spec.md §9 flags that trust as something a robust
/// implementation should not extend.
pub fn feed(bytes: &[u8]) -> Result<Vec<Instruction>> {
    let mut program = Vec::new();
    let mut pos = 0usize;

    while pos < bytes.len() {
        let opcode = match Opcode::from_byte(bytes[pos]) {
            Some(op) => op,
            None => break,
        };
        pos += 1;

        let operand = if opcode.is_jump() {
            Operand::I32(read_i32(bytes, &mut pos)?)
        } else {
            match opcode {
                Opcode::Ret
                | Opcode::SumStack
                | Opcode::StackClose
                | Opcode::Super
                | Opcode::Call => Operand::None,
                Opcode::PushNum => Operand::F64(read_f64(bytes, &mut pos)?),
                Opcode::PushStr | Opcode::PushDef => Operand::Bytes(read_cstring(bytes, &mut pos)?),
                Opcode::PushBool | Opcode::Eval => Operand::U8(read_u8(bytes, &mut pos)?),
                Opcode::Load | Opcode::Unload | Opcode::DefUnload => {
                    Operand::U32(read_u32(bytes, &mut pos)?)
                }
                Opcode::Halt | Opcode::Jmp | Opcode::Jtr | Opcode::Jfa | Opcode::Jem | Opcode::Jnem => {
                    unreachable!("HALT never decodes; jumps handled above")
                }
            }
        };

        program.push(Instruction::new(opcode, operand));
    }

    Ok(program)
}

fn read_u8(bytes: &[u8], pos: &mut usize) -> Result<u8> {
    let b = *bytes
        .get(*pos)
        .ok_or_else(|| err!(ErrorKind::Other, "truncated u8 operand"))?;
    *pos += 1;
    Ok(b)
}

fn read_i32(bytes: &[u8], pos: &mut usize) -> Result<i32> {
    Ok(read_u32(bytes, pos)? as i32)
}

fn read_u32(bytes: &[u8], pos: &mut usize) -> Result<u32> {
    let slice = bytes
        .get(*pos..*pos + 4)
        .ok_or_else(|| err!(ErrorKind::Other, "truncated u32 operand"))?;
    *pos += 4;
    Ok(u32::from_be_bytes(slice.try_into().unwrap()))
}

fn read_f64(bytes: &[u8], pos: &mut usize) -> Result<f64> {
    let slice = bytes
        .get(*pos..*pos + 8)
        .ok_or_else(|| err!(ErrorKind::Other, "truncated f64 operand"))?;
    *pos += 8;
    Ok(f64::from_be_bytes(slice.try_into().unwrap()))
}

/// Reads bytes up to (and consuming) the first NUL. Bounds-checked: an
/// unterminated string is a decode error rather than a buffer overrun.
fn read_cstring(bytes: &[u8], pos: &mut usize) -> Result<Vec<u8>> {
    let start = *pos;
    let nul = bytes[start..]
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| err!(ErrorKind::Other, "unterminated string operand"))?;
    let end = start + nul;
    *pos = end + 1; // consume the NUL
    Ok(bytes[start..end].to_vec())
}
