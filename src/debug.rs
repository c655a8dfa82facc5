//! # Debug
//!
//! The disassembler: a read-only diagnostic aid with no effect on
//! compilation or execution outcomes, mirroring the reference
//! implementation's `debug.c`. Gated behind the `debug_print_code` /
//! `debug_trace_execution` Cargo features so release builds can omit it
//! entirely.

use crate::chunk::{Chunk, OpCode};

pub trait Debug {
  /// Disassemble the whole chunk: a header followed by every instruction
  /// in order.
  fn disassemble(&self, name: &str);

  /// Disassemble a single instruction at `offset`, printing its source
  /// line (or `|` when it repeats the previous instruction's line) and
  /// returning the offset of the next instruction.
  fn disassemble_instruction(&self, offset: usize) -> usize;
}

impl Debug for Chunk {
  fn disassemble(&self, name: &str) {
    println!("== {name} ==");
    let mut offset = 0;
    while offset < self.len() {
      offset = self.disassemble_instruction(offset);
    }
  }

  fn disassemble_instruction(&self, offset: usize) -> usize {
    print!("{offset:04} ");
    if offset > 0 && self.line(offset) == self.line(offset - 1) {
      print!("   | ");
    } else {
      print!("{:4} ", self.line(offset));
    }

    let instruction = self.code[offset];
    match OpCode::from(instruction) {
      OpCode::Constant => self.constant_instruction("OP_CONSTANT", offset),
      OpCode::Nil => simple_instruction("OP_NIL", offset),
      OpCode::True => simple_instruction("OP_TRUE", offset),
      OpCode::False => simple_instruction("OP_FALSE", offset),
      OpCode::Equal => simple_instruction("OP_EQUAL", offset),
      OpCode::Greater => simple_instruction("OP_GREATER", offset),
      OpCode::Less => simple_instruction("OP_LESS", offset),
      OpCode::Add => simple_instruction("OP_ADD", offset),
      OpCode::Subtract => simple_instruction("OP_SUBTRACT", offset),
      OpCode::Multiply => simple_instruction("OP_MULTIPLY", offset),
      OpCode::Divide => simple_instruction("OP_DIVIDE", offset),
      OpCode::Not => simple_instruction("OP_NOT", offset),
      OpCode::Negate => simple_instruction("OP_NEGATE", offset),
      OpCode::Return => simple_instruction("OP_RETURN", offset),
    }
  }
}

impl Chunk {
  /// Disassemble the two-byte `OP_CONSTANT idx` instruction, printing the
  /// constant's resolved value alongside its pool index.
  fn constant_instruction(&self, name: &str, offset: usize) -> usize {
    let index = self.code[offset + 1];
    print!("{name:-16} {index:4} '");
    if let Some(value) = self.constants.get(index as usize) {
      print!("{value}");
    }
    println!("'");
    offset + 2
  }
}

fn simple_instruction(name: &str, offset: usize) -> usize {
  println!("{name}");
  offset + 1
}
