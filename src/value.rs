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
use crate::error::Result;
use crate::state::State;
use std::fmt::Write as _;

/// A builtin is an ordinary Rust function taking the interpreter state by
/// reference, matching the `fn(State)` calling convention a `PUSHDEF`'d
/// value is invoked with under `CALL`.
pub type BuiltinFn = fn(&mut State) -> Result<()>;

/// A runtime value. The tag uniquely determines the payload shape.
///
/// `Null` and `Abstract` never own heap memory; `Number` and `Bool` are
/// plain `Copy` payloads; `String` owns its backing bytes. `Clone` deep
/// copies `String`; every other variant is cheap to duplicate.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Number(f64),
    Bool(bool),
    /// An owned byte sequence. Not required to be valid UTF-8 — the
    /// reference format NUL-terminates strings for C interop, but the
    /// semantic length here is simply the byte length, with no
    /// terminator stored.
    String(Vec<u8>),
    /// An unowned handle to a host (builtin) function.
    Abstract(BuiltinFn),
    /// Reserved. No opcode in the current bytecode format emits this tag.
    InstructionRef(usize),
}

impl Value {
    /// Byte-wise equality for `String`, value equality for `Number`/`Bool`,
    /// pointer equality for `Abstract`. Mismatched tags compare unequal
    /// without error, never panicking.
    pub fn values_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Abstract(a), Value::Abstract(b)) => std::ptr::eq(
                *a as *const (),
                *b as *const (),
            ),
            (Value::InstructionRef(a), Value::InstructionRef(b)) => a == b,
            _ => false,
        }
    }

    /// Canonical conversion to a printable string, per the reference
    /// `tostring` rules:
    /// - `Null` → `"null"`.
    /// - `Bool` → `"true"` / `"false"`.
    /// - `Number` → sign, integer part, and (if non-zero) a `.` followed by
    ///   exactly 6 fractional digits; a whole number is emitted with no
    ///   decimal point at all.
    /// - `Abstract` → `"0x"` followed by lowercase hex digits of the
    ///   function pointer's address.
    /// - `String` → the bytes, lossily decoded as UTF-8.
    pub fn to_alu_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(true) => "true".to_string(),
            Value::Bool(false) => "false".to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Value::Abstract(f) => {
                let addr = *f as usize;
                let mut s = String::with_capacity(2 + 16);
                s.push_str("0x");
                write!(s, "{:x}", addr).unwrap();
                s
            }
            Value::InstructionRef(idx) => format!("<instruction {}>", idx),
        }
    }

    /// Numeric coercion used by `SUMSTACK`'s `Bool + Bool` case: `false`
    /// is `0.0`, `true` is `1.0`.
    pub fn bool_as_number(b: bool) -> f64 {
        if b {
            1.0
        } else {
            0.0
        }
    }
}

/// Formats a finite `f64` with up to 6 fractional digits, eliding the
/// decimal point entirely when the value is a whole number. Unlike the
/// reference implementation's hand-rolled formatter, this never mishandles
/// fractions smaller than 1 and never emits a bare trailing ".".
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{:.0}", n)
    } else {
        format!("{:.6}", n)
    }
}
