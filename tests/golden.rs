use alu::interp::execute;
use alu::state::State;
use alu::util::FromHexString;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

pub static TESTS_DIR: &str = "tests/files";

include!(concat!(env!("OUT_DIR"), "/golden_tests.rs"));

#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn to_file(test: &str, ext: &str) -> PathBuf {
    let mut path = PathBuf::from(TESTS_DIR);
    path.push(test);
    path.set_extension(ext);
    path
}

/// Decodes `{test}.hex` (a hex-encoded `.alc` image), runs it, and checks
/// the captured `print` output against `{test}.expected` verbatim.
fn check(test: &str) {
    let hex = fs::read_to_string(to_file(test, "hex")).unwrap();
    let expected = fs::read_to_string(to_file(test, "expected")).unwrap();
    let bytes = hex.trim().from_hex_string().unwrap();

    let sink = SharedBuf::default();
    let mut state = State::new_state();
    state.output = Box::new(sink.clone());
    state.start(&bytes).unwrap();
    let _ = execute(&mut state);

    assert_eq!(state.close(), 0, "program {test} did not run cleanly");
    let out = String::from_utf8(sink.0.borrow().clone()).unwrap();
    assert_eq!(out, expected);
}
