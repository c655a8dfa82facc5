use rlox::value::Value;
use rlox::vm::{InterpretOutcome, VM};
use serial_test::serial;

#[test]
#[serial]
fn arithmetic_and_grouping() {
  let mut vm = VM::new();
  assert_eq!(vm.interpret("(-1 + 2) * 3 - -4"), InterpretOutcome::Ok);
  assert_eq!(vm.last_value(), Some(Value::number_val(7.0)));
}

#[test]
#[serial]
fn boolean_and_comparison_operators() {
  let mut vm = VM::new();
  assert_eq!(
    vm.interpret("!(5 - 4 > 3 * 2 == !nil)"),
    InterpretOutcome::Ok
  );
  assert_eq!(vm.last_value(), Some(Value::bool_val(true)));
}

#[test]
#[serial]
fn string_concatenation() {
  let mut vm = VM::new();
  assert_eq!(vm.interpret("\"st\" + \"ri\" + \"ng\""), InterpretOutcome::Ok);
  assert_eq!(vm.last_value().unwrap().as_rust_str(), Some("string"));
}

#[test]
#[serial]
fn adding_a_number_to_a_string_is_a_runtime_error() {
  let mut vm = VM::new();
  assert_eq!(vm.interpret("1 + \"a\""), InterpretOutcome::RuntimeError);
}

#[test]
#[serial]
fn negating_a_non_number_is_a_runtime_error() {
  let mut vm = VM::new();
  assert_eq!(vm.interpret("-true"), InterpretOutcome::RuntimeError);
}

#[test]
#[serial]
fn unterminated_group_is_a_compile_error() {
  let mut vm = VM::new();
  assert_eq!(vm.interpret("("), InterpretOutcome::CompileError);
}

#[test]
#[serial]
fn empty_source_is_a_compile_error() {
  let mut vm = VM::new();
  assert_eq!(vm.interpret(""), InterpretOutcome::CompileError);
}

#[test]
#[serial]
fn trailing_garbage_after_the_expression_is_a_compile_error() {
  let mut vm = VM::new();
  assert_eq!(vm.interpret("1 + 2 3"), InterpretOutcome::CompileError);
}

#[test]
#[serial]
fn equal_strings_compare_equal_by_content() {
  let mut vm = VM::new();
  assert_eq!(vm.interpret("\"abc\" == \"ab\" + \"c\""), InterpretOutcome::Ok);
  assert_eq!(vm.last_value(), Some(Value::bool_val(true)));
}

#[test]
#[serial]
fn not_equal_less_equal_and_greater_equal_compile_as_two_instructions() {
  let mut vm = VM::new();
  assert_eq!(vm.interpret("1 != 2"), InterpretOutcome::Ok);
  assert_eq!(vm.last_value(), Some(Value::bool_val(true)));
  assert_eq!(vm.interpret("1 <= 2"), InterpretOutcome::Ok);
  assert_eq!(vm.last_value(), Some(Value::bool_val(true)));
  assert_eq!(vm.interpret("2 >= 1"), InterpretOutcome::Ok);
  assert_eq!(vm.last_value(), Some(Value::bool_val(true)));
}

#[test]
#[serial]
fn a_vm_can_interpret_more_than_once() {
  let mut vm = VM::new();
  assert_eq!(vm.interpret("1 + 1"), InterpretOutcome::Ok);
  assert_eq!(vm.last_value(), Some(Value::number_val(2.0)));
  assert_eq!(vm.interpret("2 + 2"), InterpretOutcome::Ok);
  assert_eq!(vm.last_value(), Some(Value::number_val(4.0)));
}

#[test]
#[serial]
fn a_257th_constant_overflows_the_one_byte_operand() {
  // Each `0.0 +` forces a fresh constant into the pool; 257 distinct
  // number literals is one past what a `u8` constant index can address.
  let mut source = String::new();
  for _ in 0..257 {
    source.push_str("0.0 + ");
  }
  source.push_str("0.0");

  let mut vm = VM::new();
  assert_eq!(vm.interpret(&source), InterpretOutcome::CompileError);
}
