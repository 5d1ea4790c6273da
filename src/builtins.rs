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
use crate::state::State;
use crate::value::{BuiltinFn, Value};
use std::io::Write as _;
use std::time::Duration;

/// The fixed builtin table. Resolved by `PUSHDEF` via linear scan on
/// byte-equal name; order of declaration is not observable.
static BUILTINS: &[(&str, BuiltinFn)] = &[("print", print), ("wait", wait)];

/// Resolves a builtin by name, or `None` if no such name is registered
/// (callers turn this into `NOFND`).
pub fn resolve(name: &[u8]) -> Option<BuiltinFn> {
    BUILTINS
        .iter()
        .find(|(n, _)| n.as_bytes() == name)
        .map(|(_, f)| *f)
}

/// `print` — while the stack is non-empty, converts the top value to its
/// canonical string, writes it followed by a newline to stdout, and pops
/// it. Empties the stack entirely.
fn print(state: &mut State) -> Result<()> {
    while !state.stack.is_empty() {
        let top = state.stack.peek(0)?;
        writeln!(state.output, "{}", top.to_alu_string())
            .map_err(|e| err!(ErrorKind::Other, e.to_string()))?;
        state.stack.popk();
    }
    Ok(())
}

/// `wait(ms)` — suspends the calling thread for `ms` milliseconds. The
/// millisecond count is popped from the stack as a `Number`, following the
/// `CALL` convention: by the time a builtin runs, its `Abstract` value has
/// already been popped, so any further arguments come from the stack.
fn wait(state: &mut State) -> Result<()> {
    let arg = state.stack.pop().ok_or_else(|| err!(ErrorKind::StackDepth))?;
    let ms = match &arg {
        Value::Number(n) if *n >= 0.0 => *n as u64,
        _ => return Err(err!(ErrorKind::TypeMismatch)),
    };
    state.garbage.push(arg);
    std::thread::sleep(Duration::from_millis(ms));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_names() {
        assert!(resolve(b"print").is_some());
        assert!(resolve(b"wait").is_some());
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        assert!(resolve(b"nope").is_none());
    }

    #[test]
    fn print_drains_stack_to_output_newline_separated() {
        let mut state = State::default();
        state.output = Box::new(Vec::<u8>::new());
        state.stack.push(Value::Number(1.0));
        state.stack.push(Value::String(b"hi".to_vec()));
        print(&mut state).unwrap();
        assert!(state.stack.is_empty());
    }

    #[test]
    fn wait_rejects_negative_duration() {
        let mut state = State::default();
        state.stack.push(Value::Number(-1.0));
        assert_eq!(wait(&mut state).unwrap_err().kind, ErrorKind::TypeMismatch);
    }
}
