use alu::decode::MAGIC;
use alu::error::ErrorKind;
use alu::interp::execute;
use alu::state::State;
use alu::value::Value;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;

/// A `Write` sink that stays readable after the `State` that owns it (as
/// a boxed trait object) has been moved away.
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

fn run_capturing(bytes: &[u8]) -> (State, String) {
    let mut program = MAGIC.to_vec();
    program.extend_from_slice(bytes);
    let sink = SharedBuf::default();
    let mut state = State::default();
    state.output = Box::new(sink.clone());
    state.start(&program).unwrap();
    let _ = execute(&mut state);
    let out = String::from_utf8(sink.0.borrow().clone()).unwrap();
    (state, out)
}

#[test]
fn arithmetic_then_print_formats_six_fractional_digits() {
    // PUSHNUM 100.1 PUSHNUM 25.2 SUMSTACK PUSHDEF "print" CALL RET
    let mut bytes = vec![0x07];
    bytes.extend_from_slice(&100.1f64.to_be_bytes());
    bytes.push(0x07);
    bytes.extend_from_slice(&25.2f64.to_be_bytes());
    bytes.push(0x0b); // SUMSTACK
    bytes.push(0x0a); // PUSHDEF
    bytes.extend_from_slice(b"print\0");
    bytes.push(0x0f); // CALL
    bytes.push(0x01); // RET
    let (state, out) = run_capturing(&bytes);
    assert_eq!(state.close(), 0);
    assert_eq!(out, "125.300000\n");
}

#[test]
fn string_concat_then_conditional_print() {
    // "foo" "bar" SUMSTACK (concat, top-then-bottom) -> "barfoo"; print it.
    let mut bytes = vec![0x08];
    bytes.extend_from_slice(b"foo\0");
    bytes.push(0x08);
    bytes.extend_from_slice(b"bar\0");
    bytes.push(0x0b); // SUMSTACK -> top (bar) ++ bottom (foo) => "barfoo"
    bytes.push(0x0a); // PUSHDEF
    bytes.extend_from_slice(b"print\0");
    bytes.push(0x0f); // CALL
    bytes.push(0x01); // RET
    let (state, out) = run_capturing(&bytes);
    assert_eq!(state.close(), 0);
    assert_eq!(out, "barfoo\n");
}

#[test]
fn type_mismatch_is_reported_as_types_and_halts() {
    let mut bytes = vec![0x07];
    bytes.extend_from_slice(&1.0f64.to_be_bytes());
    bytes.push(0x09); // PUSHBOOL
    bytes.push(1);
    bytes.push(0x0b); // SUMSTACK: Number + Bool, no rule
    bytes.push(0x01);
    let (state, _out) = run_capturing(&bytes);
    assert_eq!(state.error().unwrap().kind, ErrorKind::TypeMismatch);
    assert_eq!(state.close(), 1);
}

#[test]
fn jump_out_of_bounds_is_reported_as_outjm() {
    let mut bytes = vec![0x02]; // JMP
    bytes.extend_from_slice(&i32::MAX.to_be_bytes());
    bytes.push(0x00); // HALT terminates decoding; program has 1 instruction
    let (state, _out) = run_capturing(&bytes);
    assert_eq!(state.error().unwrap().kind, ErrorKind::JumpOutOfBounds);
}

#[test]
fn super_rotation_prints_in_rotated_order() {
    let mut bytes = vec![];
    for s in [b"a".as_slice(), b"b", b"c"] {
        bytes.push(0x08);
        bytes.extend_from_slice(s);
        bytes.push(0);
    }
    bytes.push(0x0e); // SUPER: a b c -> a c b (top unchanged, next two swap)
    bytes.push(0x0a); // PUSHDEF
    bytes.extend_from_slice(b"print\0");
    bytes.push(0x0f); // CALL
    bytes.push(0x01);
    let (state, out) = run_capturing(&bytes);
    assert_eq!(state.close(), 0);
    assert_eq!(out, "a\nc\nb\n");
}

#[test]
fn register_roundtrip_across_a_counted_loop() {
    // Mirrors the register bank being the only thing that survives
    // STACKCLOSE/LOAD's full-stack clear across iterations.
    let mut bytes = vec![];
    bytes.push(0x07); // PUSHNUM 0
    bytes.extend_from_slice(&0.0f64.to_be_bytes());
    bytes.push(0x10); // LOAD 0
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.push(0x11); // UNLOAD 0
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.push(0x07); // PUSHNUM 1
    bytes.extend_from_slice(&1.0f64.to_be_bytes());
    bytes.push(0x0b); // SUMSTACK
    bytes.push(0x10); // LOAD 0
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.push(0x11); // UNLOAD 0
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.push(0x07); // PUSHNUM 3
    bytes.extend_from_slice(&3.0f64.to_be_bytes());
    bytes.push(0x0d); // EVAL
    bytes.push(alu::opcode::EVAL_LT);
    bytes.push(0x04); // JFA back to the UNLOAD at loop start
    bytes.extend_from_slice(&(-7i32).to_be_bytes());
    bytes.push(0x01); // RET
    let (state, _out) = run_capturing(&bytes);
    assert_eq!(state.close(), 0);
    match state.registers.unload(0).unwrap() {
        Value::Number(n) => assert_eq!(n, 4.0),
        _ => panic!("wrong value"),
    }
}
