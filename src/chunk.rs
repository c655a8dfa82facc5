//! # Chunk
//!
//! A module which represents a sequence of bytecode,
//! with its dependent components: the byte stream itself, a parallel
//! per-byte line-number table (diagnostics only), and the constant pool.

use crate::value::{Value, ValueArray};
use enum_repr::EnumFromU8;

/// ## OpCode
///
/// The bytecode instruction set. Every instruction is one byte except
/// `Constant`, which is followed by a one-byte index into the chunk's
/// constant pool.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumFromU8)]
pub enum OpCode {
  Constant,
  Nil,
  True,
  False,
  Equal,
  Greater,
  Less,
  Add,
  Subtract,
  Multiply,
  Divide,
  Not,
  Negate,
  Return,
}

/// ## Chunk
///
/// A self-contained bytecode unit: instructions, per-byte line numbers,
/// and a constant pool.
///
/// Invariant: `code.len() == lines.len()`.
#[derive(Debug, Default, Clone)]
pub struct Chunk {
  pub(crate) code: Vec<u8>,
  pub(crate) lines: Vec<usize>,
  pub(crate) constants: ValueArray,
}

impl Chunk {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.code.len()
  }

  pub fn is_empty(&self) -> bool {
    self.code.is_empty()
  }

  /// Write a byte to the given chunk, tagging it with the source line
  /// that produced it.
  pub fn write(&mut self, byte: u8, line: usize) {
    self.code.push(byte);
    self.lines.push(line);
  }

  /// Add a constant to the given chunk, then return its index.
  ///
  /// Does not itself enforce the 256-constant limit: the compiler's
  /// `make_constant` is responsible for rejecting an index that doesn't
  /// fit in a byte before it ever reaches this method's caller.
  pub fn add_constant(&mut self, value: Value) -> usize {
    self.constants.write(value);
    self.constants.len() - 1
  }

  pub fn line(&self, offset: usize) -> usize {
    self.lines[offset]
  }

  /// Clear the given chunk.
  pub fn clear(&mut self) {
    self.code.clear();
    self.lines.clear();
    self.constants.clear();
  }
}
