//! # VM
//!
//! The stack-based virtual machine: a program counter into the currently
//! installed [`Chunk`], a value stack, and the shared intern table and
//! object list that back every [`crate::object::ObjString`] the compiler
//! or the VM itself allocates.
//!
//! The VM is an ordinary Rust value, not a global singleton: a caller
//! constructs one with [`VM::new`], drives it through one or more calls
//! to [`VM::interpret`], and lets `Drop` (or an explicit [`VM::free`])
//! release every heap object it ever allocated.

use std::ptr::NonNull;

use thiserror::Error;

use crate::{
  chunk::{Chunk, OpCode},
  compiler,
  object::{fnv1a_hash, Obj, ObjString},
  table::Table,
  value::Value,
};

#[cfg(feature = "debug_trace_execution")]
use crate::debug::Debug;

/// The stack's capacity. A correct single-pass compiler never emits an
/// expression whose evaluation depth exceeds this; overflowing it is a
/// programmer error, not a recoverable runtime condition (see spec §4.5).
const STACK_MAX: usize = 256;

/// Internal result type: either stratum of failure carries its fully
/// formatted diagnostic text.
#[derive(Debug, Clone, Error)]
pub enum InterpretError {
  #[error("{0}")]
  CompileError(String),
  #[error("{0}")]
  RuntimeError(String),
}

pub type LoxResult<T> = Result<T, InterpretError>;

/// The public, book-compatible tri-state returned by [`VM::interpret`].
/// Recovered at the embedding boundary from the internal `Result`, so
/// that callers who don't care about the diagnostic text (already printed
/// to stderr) can just match on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretOutcome {
  Ok,
  CompileError,
  RuntimeError,
}

/// The virtual machine.
#[derive(Default)]
pub struct VM {
  pub(crate) chunk: Chunk,
  /// Index of the next byte to execute in `chunk.code`.
  pub(crate) ip: usize,
  pub(crate) stack: Vec<Value>,
  /// Canonicalizes every string the compiler or the VM allocates.
  pub(crate) strings: Table,
  /// Head of the intrusive list of every heap object this VM owns.
  pub(crate) objects: Option<NonNull<Obj>>,
  /// The value `OP_RETURN` last popped and printed, kept around so callers
  /// (and tests) can inspect what a script actually evaluated to rather
  /// than just the pass/fail outcome of [`VM::interpret`].
  pub(crate) last_value: Option<Value>,
}

impl VM {
  pub fn new() -> Self {
    Self::default()
  }

  /// Compile and run `source`. Mirrors the reference `interpret`: a fresh
  /// chunk is compiled, installed, and run; a compile failure discards the
  /// chunk without ever entering the dispatch loop.
  pub fn interpret(&mut self, source: &str) -> InterpretOutcome {
    match self.run_source(source) {
      Ok(()) => InterpretOutcome::Ok,
      Err(InterpretError::CompileError(message)) => {
        eprintln!("{message}");
        InterpretOutcome::CompileError
      }
      Err(InterpretError::RuntimeError(message)) => {
        eprintln!("{message}");
        InterpretOutcome::RuntimeError
      }
    }
  }

  fn run_source(&mut self, source: &str) -> LoxResult<()> {
    let chunk = compiler::compile(source, self)?;
    self.chunk = chunk;
    self.ip = 0;
    self.stack.clear();
    self.last_value = None;
    self.run()
  }

  /// The value the most recent successful `interpret`/`interpret_chunk`
  /// call returned, or `None` if nothing has run yet (or the run ended in
  /// an error before reaching `OP_RETURN`).
  pub fn last_value(&self) -> Option<Value> {
    self.last_value
  }

  /// Install `chunk` directly and run it, bypassing the compiler. Exposed
  /// for hand-compiled bytecode (tests, demos) the way the reference
  /// implementation's `main` runs a manually built chunk.
  pub fn interpret_chunk(&mut self, chunk: Chunk) -> InterpretOutcome {
    self.chunk = chunk;
    self.ip = 0;
    self.stack.clear();
    self.last_value = None;
    match self.run() {
      Ok(()) => InterpretOutcome::Ok,
      Err(InterpretError::CompileError(message)) => {
        eprintln!("{message}");
        InterpretOutcome::CompileError
      }
      Err(InterpretError::RuntimeError(message)) => {
        eprintln!("{message}");
        InterpretOutcome::RuntimeError
      }
    }
  }

  /// Free every heap object this VM owns and reset it to a fresh state.
  /// Idempotent: safe to call more than once (`Drop` calls it again).
  pub fn free(&mut self) {
    unsafe { crate::memory::free_objects(self.objects.take()) }
    self.strings = Table::new();
    self.stack.clear();
    self.chunk.clear();
    // A string result would otherwise dangle: its `Obj` was just freed.
    self.last_value = None;
  }

  /// Canonicalize `s`: if an equal string is already interned, return the
  /// existing object; otherwise allocate, link onto the object list, and
  /// register a fresh one. The single allocation path for every string in
  /// this VM (see [`crate::object`]'s module docs) — there is no separate
  /// `copyString`/`takeString` distinction because Rust's ownership model
  /// means there's never a borrowed buffer to avoid copying.
  pub(crate) fn intern_string(&mut self, s: String) -> NonNull<ObjString> {
    let hash = fnv1a_hash(s.as_bytes());
    if let Some(existing) = self.strings.find_string(&s, hash) {
      return existing;
    }
    let boxed = Box::new(ObjString::new(s));
    let mut ptr = NonNull::new(Box::into_raw(boxed)).expect("Box::into_raw never returns null");
    unsafe {
      ptr.as_mut().obj.next = self.objects;
    }
    self.objects = Some(ptr.cast());
    self.strings.set(ptr, Value::Nil);
    ptr
  }

  fn concatenate(&mut self, a: &str, b: &str) -> NonNull<ObjString> {
    let mut combined = String::with_capacity(a.len() + b.len());
    combined.push_str(a);
    combined.push_str(b);
    self.intern_string(combined)
  }
}

impl Drop for VM {
  fn drop(&mut self) {
    self.free();
  }
}

impl VM {
  fn push(&mut self, value: Value) {
    debug_assert!(self.stack.len() < STACK_MAX, "value stack overflow");
    self.stack.push(value);
  }

  fn pop(&mut self) -> Value {
    self.stack.pop().expect("pop from an empty value stack")
  }

  /// Read the value `distance` slots below the top without popping it.
  fn peek(&self, distance: usize) -> Value {
    self.stack[self.stack.len() - 1 - distance]
  }

  fn read_byte(&mut self) -> u8 {
    let byte = self.chunk.code[self.ip];
    self.ip += 1;
    byte
  }

  fn read_constant(&mut self) -> Value {
    let index = self.read_byte();
    *self
      .chunk
      .constants
      .get(index as usize)
      .expect("OP_CONSTANT index out of bounds")
  }

  /// Report a runtime error at the instruction that just executed,
  /// appending the faulting source line and emptying the stack.
  fn runtime_error(&mut self, message: impl Into<String>) -> LoxResult<()> {
    let line = self.chunk.line(self.ip - 1);
    let formatted = format!("{}\n[line {}] in script", message.into(), line);
    self.stack.clear();
    Err(InterpretError::RuntimeError(formatted))
  }

  fn binary_numeric(&mut self, op: impl Fn(f64, f64) -> f64) -> LoxResult<()> {
    if !self.peek(0).is_number() || !self.peek(1).is_number() {
      return self.runtime_error("Operands must be numbers.");
    }
    let b = self.pop().as_number();
    let a = self.pop().as_number();
    self.push(Value::number_val(op(a, b)));
    Ok(())
  }

  fn binary_compare(&mut self, op: impl Fn(f64, f64) -> bool) -> LoxResult<()> {
    if !self.peek(0).is_number() || !self.peek(1).is_number() {
      return self.runtime_error("Operands must be numbers.");
    }
    let b = self.pop().as_number();
    let a = self.pop().as_number();
    self.push(Value::bool_val(op(a, b)));
    Ok(())
  }

  /// `OP_ADD`: numeric sum for two numbers, interned concatenation for two
  /// strings, a runtime error for anything else.
  fn add(&mut self) -> LoxResult<()> {
    if self.peek(0).is_number() && self.peek(1).is_number() {
      let b = self.pop().as_number();
      let a = self.pop().as_number();
      self.push(Value::number_val(a + b));
      Ok(())
    } else if self.peek(0).is_string() && self.peek(1).is_string() {
      let b = self.pop();
      let a = self.pop();
      let ptr = self.concatenate(a.as_rust_str().unwrap(), b.as_rust_str().unwrap());
      self.push(Value::obj_val(ptr.cast()));
      Ok(())
    } else {
      self.runtime_error("Operands must be two numbers or two strings.")
    }
  }

  fn negate(&mut self) -> LoxResult<()> {
    if !self.peek(0).is_number() {
      return self.runtime_error("Operand must be a number.");
    }
    let value = self.pop().as_number();
    self.push(Value::number_val(-value));
    Ok(())
  }

  #[cfg(feature = "debug_trace_stack")]
  fn trace_stack(&self) {
    print!("          ");
    for value in &self.stack {
      print!("[ {value} ]");
    }
    println!();
  }

  /// The dispatch loop: repeatedly read one byte at the instruction
  /// pointer, switch on the opcode, execute its effect. Returns on
  /// `OP_RETURN` or on the first runtime error.
  fn run(&mut self) -> LoxResult<()> {
    loop {
      #[cfg(feature = "debug_trace_execution")]
      {
        #[cfg(feature = "debug_trace_stack")]
        self.trace_stack();
        self.chunk.disassemble_instruction(self.ip);
      }

      let instruction = OpCode::from(self.read_byte());
      match instruction {
        OpCode::Constant => {
          let value = self.read_constant();
          self.push(value);
        }
        OpCode::Nil => self.push(Value::nil_val()),
        OpCode::True => self.push(Value::bool_val(true)),
        OpCode::False => self.push(Value::bool_val(false)),
        OpCode::Equal => {
          let b = self.pop();
          let a = self.pop();
          self.push(Value::bool_val(a == b));
        }
        OpCode::Greater => self.binary_compare(|a, b| a > b)?,
        OpCode::Less => self.binary_compare(|a, b| a < b)?,
        OpCode::Add => self.add()?,
        OpCode::Subtract => self.binary_numeric(|a, b| a - b)?,
        OpCode::Multiply => self.binary_numeric(|a, b| a * b)?,
        OpCode::Divide => self.binary_numeric(|a, b| a / b)?,
        OpCode::Not => {
          let value = self.pop();
          self.push(Value::bool_val(value.is_falsey()));
        }
        OpCode::Negate => self.negate()?,
        OpCode::Return => {
          let value = self.pop();
          println!("{value}");
          self.last_value = Some(value);
          return Ok(());
        }
      }
    }
  }
}
