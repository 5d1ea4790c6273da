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
use crate::builtins;
use crate::error::{err, ErrorKind, Result};
use crate::instruction::Operand;
use crate::opcode::{Opcode, EVAL_EQ, EVAL_GT, EVAL_LT};
use crate::state::State;
use crate::value::Value;
use std::cmp::Ordering;

/// Runs `state`'s loaded program to completion (or to the first error, or
/// to a cooperative interrupt).
///
/// On an error, the error is recorded on `state` (retrievable via
/// [`State::error`](crate::state::State::error)) and this returns `Err`
/// with the same value — callers driving a single `execute` to exhaustion
/// can just propagate it; callers embedding the VM and inspecting
/// `state.error()` afterwards may prefer to ignore the `Result` and call
/// `close()`.
pub fn execute(state: &mut State) -> Result<()> {
    loop {
        if state.interrupt.is_set() {
            return Ok(());
        }
        if state.cursor >= state.program.len() {
            return Ok(());
        }

        let opcode = state.program[state.cursor].opcode;

        if state.verbose {
            log::debug!("{:04}: {}", state.cursor, state.program[state.cursor]);
        }

        if opcode == Opcode::Ret {
            return Ok(());
        }

        if opcode.is_jump() {
            match do_jump(state) {
                Ok(()) => continue,
                Err(e) => {
                    state.set_error(e.clone());
                    return Err(e);
                }
            }
        }

        if let Err(e) = dispatch(state, opcode) {
            state.set_error(e.clone());
            return Err(e);
        }
        state.cursor += 1;
    }
}

fn dispatch(state: &mut State, opcode: Opcode) -> Result<()> {
    let operand = state.program[state.cursor].operand.clone();
    match (opcode, operand) {
        (Opcode::PushNum, Operand::F64(n)) => {
            state.stack.push(Value::Number(n));
            Ok(())
        }
        (Opcode::PushBool, Operand::U8(b)) => {
            state.stack.push(Value::Bool(b != 0));
            Ok(())
        }
        (Opcode::PushStr, Operand::Bytes(bytes)) => {
            state.stack.push(Value::String(bytes));
            Ok(())
        }
        (Opcode::PushDef, Operand::Bytes(name)) => {
            let f = builtins::resolve(&name).ok_or_else(|| err!(ErrorKind::NotFound))?;
            state.stack.push(Value::Abstract(f));
            Ok(())
        }
        (Opcode::SumStack, Operand::None) => sumstack(state),
        (Opcode::StackClose, Operand::None) => {
            state.stack.clear();
            Ok(())
        }
        (Opcode::Eval, Operand::U8(mask)) => eval(state, mask),
        (Opcode::Super, Operand::None) => {
            state.stack.super_rotate();
            Ok(())
        }
        (Opcode::Call, Operand::None) => call(state),
        (Opcode::Load, Operand::U32(index)) => {
            state.stack.require(1)?;
            let top = state.stack.pop_n(1).pop().unwrap();
            state.registers.load(index, top);
            state.stack.clear();
            Ok(())
        }
        (Opcode::Unload, Operand::U32(index)) => {
            let v = state.registers.unload(index)?;
            state.stack.push(v);
            Ok(())
        }
        (Opcode::DefUnload, Operand::U32(index)) => {
            let v = state.registers.defunload(index)?;
            state.stack.push(v);
            Ok(())
        }
        _ => unreachable!("decoder never pairs {:?} with a mismatched operand", opcode),
    }
}

/// `SUMSTACK`: combine the top two values, then clear the *entire* stack
/// (not merely the two operands) before pushing the result. See spec.md
/// §4.4 — this is the one genuinely destructive opcode in the set.
fn sumstack(state: &mut State) -> Result<()> {
    state.stack.require(2)?;
    let a = state.stack.peek(0)?;
    let b = state.stack.peek(1)?;
    let result = match (&a, &b) {
        (Value::Number(x), Value::Number(y)) => Value::Number(x + y),
        (Value::Bool(x), Value::Bool(y)) => {
            let sum = Value::bool_as_number(*x) + Value::bool_as_number(*y);
            Value::Bool(sum != 0.0)
        }
        (Value::String(x), Value::String(y)) => {
            // top first, then bottom: a || b
            let mut combined = x.clone();
            combined.extend_from_slice(y);
            Value::String(combined)
        }
        _ => return Err(err!(ErrorKind::TypeMismatch)),
    };
    state.stack.clear();
    state.stack.push(result);
    Ok(())
}

/// `EVAL`: compare the top two values and push a `Bool` gated by `mask`.
/// See spec.md §4.5. Mismatched tags short-circuit to `false` with the
/// whole stack cleared; matched tags only drop their two operands.
fn eval(state: &mut State, mask: u8) -> Result<()> {
    state.stack.require(1)?;
    let a = state.stack.peek(0)?;

    // A lone operand (no second value to compare against) is well-defined
    // the same way a tag mismatch is: clear and push false, rather than
    // faulting on the missing `peek(1)`.
    let b = match state.stack.peek(1) {
        Ok(b) => b,
        Err(_) => {
            state.stack.clear();
            state.stack.push(Value::Bool(false));
            return Ok(());
        }
    };

    if std::mem::discriminant(&a) != std::mem::discriminant(&b) {
        state.stack.clear();
        state.stack.push(Value::Bool(false));
        return Ok(());
    }

    let ordering = match (&a, &b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => {
            Value::bool_as_number(*x).total_cmp(&Value::bool_as_number(*y))
        }
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::InstructionRef(x), Value::InstructionRef(y)) => x.cmp(y),
        (Value::Abstract(_), Value::Abstract(_)) => {
            if a.values_equal(&b) {
                Ordering::Equal
            } else {
                Ordering::Greater
            }
        }
        _ => unreachable!("same discriminant checked above"),
    };

    let bits = match ordering {
        Ordering::Equal => EVAL_EQ,
        Ordering::Less => EVAL_LT,
        Ordering::Greater => EVAL_GT,
    };

    state.stack.pop_n(2);
    state.stack.push(Value::Bool((bits & mask) != 0));
    Ok(())
}

/// `CALL`: pop the top value into the garbage list; if it is `Abstract`,
/// invoke it with the state.
fn call(state: &mut State) -> Result<()> {
    let top = state.stack.pop().ok_or_else(|| err!(ErrorKind::StackDepth))?;
    let f = match &top {
        Value::Abstract(f) => *f,
        _ => {
            state.garbage.push(top);
            return Err(err!(ErrorKind::TypeMismatch));
        }
    };
    state.garbage.push(top);
    f(state)
}

/// Evaluates a jump's predicate (§4.6's `shouldJump`), then either takes
/// it (walking `|n|+1` links, sign-aware) or falls through by one
/// instruction. Either way, the value that gated the jump is `popk`'d.
fn do_jump(state: &mut State) -> Result<()> {
    let opcode = state.program[state.cursor].opcode;
    let offset = match state.program[state.cursor].operand {
        Operand::I32(n) => n,
        _ => unreachable!("jump opcodes always decode an I32 operand"),
    };

    let predicate = match opcode {
        Opcode::Jmp => true,
        Opcode::Jem => state.stack.is_empty(),
        Opcode::Jnem => !state.stack.is_empty(),
        Opcode::Jtr => matches!(state.stack.peek(0), Ok(Value::Bool(true))),
        Opcode::Jfa => matches!(state.stack.peek(0), Ok(Value::Bool(false))),
        _ => true,
    };

    state.stack.popk();

    if !predicate {
        state.cursor += 1;
        return Ok(());
    }

    // A taken jump always costs the jump instruction's own ordinary step
    // (cursor -> cursor+1) plus |offset|+1 further links in the indicated
    // direction. Folding the two together: offset 0 still lands one past
    // the instruction immediately following the jump, which is what makes
    // "jump by 0" skip exactly that instruction rather than degenerate
    // into plain fallthrough.
    let target = if offset >= 0 {
        state.cursor as i64 + offset as i64 + 2
    } else {
        state.cursor as i64 + offset as i64
    };

    if target < 0 || target as usize >= state.program.len() {
        return Err(err!(ErrorKind::JumpOutOfBounds));
    }
    state.cursor = target as usize;
    Ok(())
}
