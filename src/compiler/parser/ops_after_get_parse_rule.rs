use super::*;

impl<'a> Parser<'a> {
  pub(crate) fn number(&mut self, _vm: &mut VM) -> LoxResult<()> {
    let value: f64 = self
      .previous
      .lexeme()
      .parse()
      .expect("scanner only produces well-formed number lexemes");
    self.emit_constant(value.into())
  }

  /// Intern the literal's contents (the lexeme without its surrounding
  /// quotes) into `vm`'s string table and emit it as a constant.
  pub(crate) fn string(&mut self, vm: &mut VM) -> LoxResult<()> {
    let lexeme = self.previous.lexeme();
    let contents = lexeme[1..lexeme.len() - 1].to_owned();
    let obj = vm.intern_string(contents);
    self.emit_constant(Value::obj_val(obj.cast()))
  }

  pub(crate) fn unary(&mut self, vm: &mut VM) -> LoxResult<()> {
    let operator_type = self.previous.token_type();

    self.parse_precedence(vm, Precedence::Unary)?;

    match operator_type {
      TokenType::Bang => self.emit_byte(OpCode::Not as u8),
      TokenType::Minus => self.emit_byte(OpCode::Negate as u8),
      _ => unreachable!("unary() only ever registered for Bang and Minus"),
    }
  }

  /// `!=`, `<=`, and `>=` have no opcode of their own: they're compiled as
  /// their positive counterpart followed by `OP_NOT`.
  pub(crate) fn binary(&mut self, vm: &mut VM) -> LoxResult<()> {
    let operator_type = self.previous.token_type();
    let rule = self.get_rule(operator_type);
    self.parse_precedence(vm, rule.precedence.next())?;

    match operator_type {
      TokenType::BangEqual => self.emit_bytes(&[OpCode::Equal as u8, OpCode::Not as u8]),
      TokenType::EqualEqual => self.emit_byte(OpCode::Equal as u8),
      TokenType::Greater => self.emit_byte(OpCode::Greater as u8),
      TokenType::GreaterEqual => self.emit_bytes(&[OpCode::Less as u8, OpCode::Not as u8]),
      TokenType::Less => self.emit_byte(OpCode::Less as u8),
      TokenType::LessEqual => self.emit_bytes(&[OpCode::Greater as u8, OpCode::Not as u8]),
      TokenType::Plus => self.emit_byte(OpCode::Add as u8),
      TokenType::Minus => self.emit_byte(OpCode::Subtract as u8),
      TokenType::Star => self.emit_byte(OpCode::Multiply as u8),
      TokenType::Slash => self.emit_byte(OpCode::Divide as u8),
      _ => unreachable!("binary() only ever registered for the binary operator tokens"),
    }
  }

  pub(crate) fn literal(&mut self, _vm: &mut VM) -> LoxResult<()> {
    match self.previous.token_type() {
      TokenType::False => self.emit_byte(OpCode::False as u8),
      TokenType::Nil => self.emit_byte(OpCode::Nil as u8),
      TokenType::True => self.emit_byte(OpCode::True as u8),
      _ => unreachable!("literal() only ever registered for False, Nil, and True"),
    }
  }

  pub(crate) fn grouping(&mut self, vm: &mut VM) -> LoxResult<()> {
    self.expression(vm)?;
    self.consume_token(TokenType::RightParen, "Expect ')' after expression.".to_owned())
  }
}
