//! # Compiler
//!
//! The compiler turns source text directly into a [`crate::chunk::Chunk`]
//! in a single pass: there is no intermediate AST. Parsing and code
//! generation are interleaved through a Pratt-style precedence climber
//! (see [`parser`]).

pub mod parser;

use crate::chunk::Chunk;
use crate::vm::{LoxResult, VM};
use parser::Parser;

/// Precedence levels, lowest to highest, mirroring the reference
/// implementation's `Precedence` enum. `Ord`/`PartialOrd` are derived from
/// declaration order so a rule's precedence can be compared directly
/// against the precedence threshold a caller is parsing at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
  None,
  Assignment,
  Or,
  And,
  Equality,
  Comparison,
  Term,
  Factor,
  Unary,
  Call,
  Primary,
}

impl Precedence {
  /// The next tighter-binding level, used to parse the right operand of a
  /// left-associative binary operator one level above its own precedence.
  pub fn next(self) -> Self {
    match self {
      Precedence::None => Precedence::Assignment,
      Precedence::Assignment => Precedence::Or,
      Precedence::Or => Precedence::And,
      Precedence::And => Precedence::Equality,
      Precedence::Equality => Precedence::Comparison,
      Precedence::Comparison => Precedence::Term,
      Precedence::Term => Precedence::Factor,
      Precedence::Factor => Precedence::Unary,
      Precedence::Unary => Precedence::Call,
      Precedence::Call => Precedence::Primary,
      Precedence::Primary => Precedence::Primary,
    }
  }
}

/// Compile `source` into a fresh [`Chunk`], interning any string literals
/// into `vm` along the way.
pub fn compile(source: &str, vm: &mut VM) -> LoxResult<Chunk> {
  Parser::new(source).run(vm)
}
