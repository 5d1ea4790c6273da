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
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperative cancellation token, checked by the interpreter between
/// every instruction. Equivalent to the reference implementation's
/// SIGINT-driven errno flag, but expressed as a plain atomic so it works
/// identically on platforms without POSIX signals (spec.md §9). The CLI
/// driver is responsible for wiring an actual OS signal handler that sets
/// this flag; the core only ever reads it.
#[derive(Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Interrupt {
        Interrupt(Arc::new(AtomicBool::new(false)))
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clear_and_latches_set() {
        let i = Interrupt::new();
        assert!(!i.is_set());
        i.set();
        assert!(i.is_set());
    }

    #[test]
    fn shares_state_across_clones() {
        let a = Interrupt::new();
        let b = a.clone();
        b.set();
        assert!(a.is_set());
    }
}
