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
use crate::value::Value;
use std::collections::HashMap;

/// A sparse bank of owned register slots, addressed by a small integer
/// index. Unlike the operand stack, indices need not be dense or
/// contiguous.
#[derive(Default)]
pub struct RegisterBank {
    slots: HashMap<u32, Value>,
}

impl RegisterBank {
    pub fn new() -> RegisterBank {
        RegisterBank::default()
    }

    /// Replaces any existing value at `index` (freeing it, via ordinary
    /// drop) with `value`.
    pub fn load(&mut self, index: u32, value: Value) {
        self.slots.insert(index, value);
    }

    /// Returns a copy of the value at `index`, or `NOREG` if absent.
    pub fn unload(&self, index: u32) -> Result<Value> {
        self.slots
            .get(&index)
            .cloned()
            .ok_or_else(|| err!(ErrorKind::NoRegister))
    }

    /// Removes and returns the value at `index`, freeing the slot, or
    /// `NOREG` if absent.
    pub fn defunload(&mut self, index: u32) -> Result<Value> {
        self.slots.remove(&index).ok_or_else(|| err!(ErrorKind::NoRegister))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_then_unload_is_identity_up_to_copy() {
        let mut regs = RegisterBank::new();
        regs.load(0, Value::Number(42.0));
        let v = regs.unload(0).unwrap();
        match v {
            Value::Number(n) => assert_eq!(n, 42.0),
            _ => panic!("wrong variant"),
        }
        // still present — unload copies, doesn't remove
        assert!(regs.unload(0).is_ok());
    }

    #[test]
    fn defunload_removes_the_slot() {
        let mut regs = RegisterBank::new();
        regs.load(3, Value::Bool(true));
        assert!(regs.defunload(3).is_ok());
        assert_eq!(regs.unload(3).unwrap_err().kind, ErrorKind::NoRegister);
    }

    #[test]
    fn unload_missing_register_is_noreg() {
        let regs = RegisterBank::new();
        assert_eq!(regs.unload(9).unwrap_err().kind, ErrorKind::NoRegister);
    }

    #[test]
    fn load_replaces_prior_value() {
        let mut regs = RegisterBank::new();
        regs.load(1, Value::Number(1.0));
        regs.load(1, Value::Number(2.0));
        match regs.unload(1).unwrap() {
            Value::Number(n) => assert_eq!(n, 2.0),
            _ => panic!("wrong variant"),
        }
    }
}
