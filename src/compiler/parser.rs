//! # Parser
//!
//! Submodule of `compiler`: a Pratt-style precedence climber that parses
//! and emits bytecode in the same pass, with no intervening AST.
//!
//! Unlike the reference implementation's module-level `parser`/`current`
//! globals, [`Parser`] is an ordinary value the caller owns, and the VM it
//! compiles into (needed only so string literals can be interned at
//! compile time) is threaded through as an explicit `&mut VM` parameter
//! rather than stored as a field — that keeps `Parser` single-lifetime
//! (its borrowed [`Scanner`]/[`Token`]s) instead of needing a second named
//! lifetime for a borrowed VM.

use crate::{
  chunk::{Chunk, OpCode},
  compiler::Precedence,
  scanner::{Scanner, Token, TokenType},
  value::Value,
  vm::{InterpretError, LoxResult, VM},
};

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::*;

/// A prefix or infix parse function. Lifetime-elided: Rust treats an
/// elided lifetime in a fn-pointer type as universally quantified, which
/// is what lets one `Lazy<HashMap<_, ParseRule>>` serve every `Parser<'a>`
/// regardless of its source's lifetime.
type ParseFn = fn(&mut Parser<'_>, &mut VM) -> LoxResult<()>;

pub mod compile_time_error_handlers;
pub mod emit_methods;
pub mod ops_after_get_parse_rule;

/// A single row of the Pratt dispatch table: how to parse a token when it
/// appears in prefix position, how to parse it in infix position, and the
/// precedence of the infix operator (if any).
#[derive(Clone, Copy)]
pub struct ParseRule {
  pub prefix: Option<ParseFn>,
  pub infix: Option<ParseFn>,
  pub precedence: Precedence,
}

impl ParseRule {
  pub fn new(prefix: Option<ParseFn>, infix: Option<ParseFn>, precedence: Precedence) -> Self {
    Self {
      prefix,
      infix,
      precedence,
    }
  }
}

/// The rule table, built once on first use. `=` has no handler at either
/// position (there are no assignment targets in this language) and
/// precedence `None`; every keyword that only makes sense as a statement
/// or declaration (`var`, `print`, `if`, `and`, `or`, ...) likewise has no
/// handler.
static RULES: Lazy<HashMap<TokenType, ParseRule>> = Lazy::new(|| {
  use TokenType::*;
  let rows: Vec<(TokenType, ParseRule)> = vec![
    (LeftParen, ParseRule::new(Some(Parser::grouping), None, Precedence::None)),
    (RightParen, ParseRule::new(None, None, Precedence::None)),
    (LeftBrace, ParseRule::new(None, None, Precedence::None)),
    (RightBrace, ParseRule::new(None, None, Precedence::None)),
    (Comma, ParseRule::new(None, None, Precedence::None)),
    (Dot, ParseRule::new(None, None, Precedence::None)),
    (
      Minus,
      ParseRule::new(Some(Parser::unary), Some(Parser::binary), Precedence::Term),
    ),
    (Plus, ParseRule::new(None, Some(Parser::binary), Precedence::Term)),
    (Semicolon, ParseRule::new(None, None, Precedence::None)),
    (Slash, ParseRule::new(None, Some(Parser::binary), Precedence::Factor)),
    (Star, ParseRule::new(None, Some(Parser::binary), Precedence::Factor)),
    (Bang, ParseRule::new(Some(Parser::unary), None, Precedence::None)),
    (BangEqual, ParseRule::new(None, Some(Parser::binary), Precedence::Equality)),
    (Equal, ParseRule::new(None, None, Precedence::None)),
    (EqualEqual, ParseRule::new(None, Some(Parser::binary), Precedence::Equality)),
    (Greater, ParseRule::new(None, Some(Parser::binary), Precedence::Comparison)),
    (GreaterEqual, ParseRule::new(None, Some(Parser::binary), Precedence::Comparison)),
    (Less, ParseRule::new(None, Some(Parser::binary), Precedence::Comparison)),
    (LessEqual, ParseRule::new(None, Some(Parser::binary), Precedence::Comparison)),
    (Identifier, ParseRule::new(None, None, Precedence::None)),
    (String, ParseRule::new(Some(Parser::string), None, Precedence::None)),
    (Number, ParseRule::new(Some(Parser::number), None, Precedence::None)),
    (And, ParseRule::new(None, None, Precedence::None)),
    (Class, ParseRule::new(None, None, Precedence::None)),
    (Else, ParseRule::new(None, None, Precedence::None)),
    (False, ParseRule::new(Some(Parser::literal), None, Precedence::None)),
    (For, ParseRule::new(None, None, Precedence::None)),
    (Fun, ParseRule::new(None, None, Precedence::None)),
    (If, ParseRule::new(None, None, Precedence::None)),
    (Nil, ParseRule::new(Some(Parser::literal), None, Precedence::None)),
    (Or, ParseRule::new(None, None, Precedence::None)),
    (Print, ParseRule::new(None, None, Precedence::None)),
    (Return, ParseRule::new(None, None, Precedence::None)),
    (Super, ParseRule::new(None, None, Precedence::None)),
    (This, ParseRule::new(None, None, Precedence::None)),
    (True, ParseRule::new(Some(Parser::literal), None, Precedence::None)),
    (Var, ParseRule::new(None, None, Precedence::None)),
    (While, ParseRule::new(None, None, Precedence::None)),
    (Error, ParseRule::new(None, None, Precedence::None)),
    (Eof, ParseRule::new(None, None, Precedence::None)),
  ];
  rows.into_iter().collect()
});

/// A single-expression parser bound to one source buffer.
pub struct Parser<'a> {
  pub(crate) chunk: Chunk,
  pub(crate) scanner: Scanner<'a>,
  pub(crate) current: Token<'a>,
  pub(crate) previous: Token<'a>,
  pub(crate) had_error: bool,
  pub(crate) panic_mode: bool,
}

impl<'a> Parser<'a> {
  pub fn new(source: &'a str) -> Self {
    Self {
      chunk: Chunk::new(),
      scanner: Scanner::new(source),
      current: Token::default(),
      previous: Token::default(),
      had_error: false,
      panic_mode: false,
    }
  }

  /// Drive the whole parse: one leading [`Parser::advance_token`] to prime
  /// `current`, a single top-level expression, and a mandatory EOF check
  /// — this language has no statement separator, so "more tokens after
  /// the expression" is always an error.
  pub fn run(mut self, vm: &mut VM) -> LoxResult<Chunk> {
    self.advance_token()?;
    self.expression(vm)?;
    self.consume_token(TokenType::Eof, "Expect end of expression.".to_owned())?;
    self.emit_return()?;

    #[cfg(feature = "debug_print_code")]
    {
      use crate::debug::Debug;
      self.chunk.disassemble("code");
    }

    Ok(self.chunk)
  }

  fn parse_precedence(&mut self, vm: &mut VM, precedence: Precedence) -> LoxResult<()> {
    self.advance_token()?;
    let prefix_rule = self.get_rule(self.previous.token_type()).prefix;
    let prefix_rule = match prefix_rule {
      Some(rule) => rule,
      None => return self.error("Expect expression.".to_owned()),
    };
    prefix_rule(self, vm)?;

    while precedence <= self.get_rule(self.current.token_type()).precedence {
      self.advance_token()?;
      let infix_rule = self
        .get_rule(self.previous.token_type())
        .infix
        .expect("a token with precedence above None always has an infix rule");
      infix_rule(self, vm)?;
    }

    Ok(())
  }

  fn get_rule(&self, token_type: TokenType) -> ParseRule {
    *RULES.get(&token_type).expect("every TokenType has a rule")
  }
}

impl<'a> Parser<'a> {
  /// Advance to the next non-error token, reporting (and, since error
  /// tokens never stop the scan, skipping past) any lexical errors along
  /// the way.
  pub(crate) fn advance_token(&mut self) -> LoxResult<()> {
    self.previous = self.current;
    loop {
      self.current = self.scanner.scan_token();
      if self.current.token_type() != TokenType::Error {
        break;
      }
      self.error_at_current(self.current.lexeme().to_owned())?;
    }
    Ok(())
  }

  fn consume_token(&mut self, token_type: TokenType, message: String) -> LoxResult<()> {
    if self.current.token_type() == token_type {
      self.advance_token()
    } else {
      self.error_at_current(message)
    }
  }

  fn expression(&mut self, vm: &mut VM) -> LoxResult<()> {
    self.parse_precedence(vm, Precedence::Assignment)
  }
}

impl<'a> Parser<'a> {
  /// Add `value` to the chunk's constant pool, returning its index as a
  /// byte. A single-byte `OP_CONSTANT` operand caps the pool at 256
  /// entries; a 257th constant is a compile error rather than silently
  /// wrapping or growing the operand width.
  fn make_constant(&mut self, value: Value) -> LoxResult<u8> {
    let index = self.chunk.add_constant(value);
    if index > u8::MAX as usize {
      self
        .error("Too many constants in one chunk.".to_owned())
        .map(|_| 0)
    } else {
      Ok(index as u8)
    }
  }
}
