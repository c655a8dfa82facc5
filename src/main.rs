use rlox::vm::{InterpretOutcome, VM};

fn main() {
  let mut vm = VM::new();
  let source = "(-1 + 2) * 3 - -4";
  match vm.interpret(source) {
    InterpretOutcome::Ok => {}
    InterpretOutcome::CompileError => std::process::exit(65),
    InterpretOutcome::RuntimeError => std::process::exit(70),
  }
}
