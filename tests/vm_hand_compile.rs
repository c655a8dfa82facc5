use rlox::{
  chunk::{Chunk, OpCode},
  debug::Debug,
  value::Value,
  vm::{InterpretOutcome, VM},
};
use serial_test::serial;

/// `-(1.2 + 2.3) / 5.6`, assembled by hand instead of through the
/// compiler, exercising `VM::interpret_chunk` directly.
#[test]
#[serial]
fn manual_demo() {
  let mut vm = VM::new();
  let mut chunk = Chunk::new();

  let constant = chunk.add_constant(Value::number_val(1.2));
  chunk.write(OpCode::Constant as u8, 123);
  chunk.write(constant as u8, 123);

  let constant = chunk.add_constant(Value::number_val(2.3));
  chunk.write(OpCode::Constant as u8, 123);
  chunk.write(constant as u8, 123);

  chunk.write(OpCode::Add as u8, 123);

  let constant = chunk.add_constant(Value::number_val(5.6));
  chunk.write(OpCode::Constant as u8, 123);
  chunk.write(constant as u8, 123);

  chunk.write(OpCode::Divide as u8, 123);
  chunk.write(OpCode::Negate as u8, 123);
  chunk.write(OpCode::Return as u8, 123);

  chunk.disassemble("Test Chunk");
  assert_eq!(vm.interpret_chunk(chunk), InterpretOutcome::Ok);
}

#[test]
#[serial]
fn hand_compiled_equality() {
  let mut vm = VM::new();
  let mut chunk = Chunk::new();

  chunk.write(OpCode::True as u8, 1);
  chunk.write(OpCode::False as u8, 1);
  chunk.write(OpCode::Equal as u8, 1);
  chunk.write(OpCode::Return as u8, 1);

  assert_eq!(vm.interpret_chunk(chunk), InterpretOutcome::Ok);
}

#[test]
#[serial]
fn division_by_zero_is_not_a_runtime_error() {
  // IEEE-754 division, not integer division: `1 / 0` is `inf`, not a trap.
  let mut vm = VM::new();
  let mut chunk = Chunk::new();

  let one = chunk.add_constant(Value::number_val(1.0));
  chunk.write(OpCode::Constant as u8, 1);
  chunk.write(one as u8, 1);

  let zero = chunk.add_constant(Value::number_val(0.0));
  chunk.write(OpCode::Constant as u8, 1);
  chunk.write(zero as u8, 1);

  chunk.write(OpCode::Divide as u8, 1);
  chunk.write(OpCode::Return as u8, 1);

  assert_eq!(vm.interpret_chunk(chunk), InterpretOutcome::Ok);
}
