use super::*;

impl<'a> Parser<'a> {
  /// Report an error at the current (not yet consumed) token.
  pub(crate) fn error_at_current(&mut self, message: String) -> LoxResult<()> {
    self.error_at(true, message)
  }

  /// Report an error at the previous (just consumed) token — used when
  /// the faulting token has already been advanced past.
  pub(crate) fn error(&mut self, message: String) -> LoxResult<()> {
    self.error_at(false, message)
  }

  /// Format and return a `CompileError` for the selected token. Once
  /// `panic_mode` is set, further errors are swallowed rather than
  /// reported: this parser has no error-recovery/synchronization pass, so
  /// in practice the very first error always ends compilation via `?`
  /// before a second one could be attempted.
  pub(crate) fn error_at(&mut self, if_current: bool, message: String) -> LoxResult<()> {
    if self.panic_mode {
      return Ok(());
    }
    self.panic_mode = true;
    self.had_error = true;

    let token = if if_current { &self.current } else { &self.previous };
    let mut error_str = format!("[line {}] Error", token.line());
    match token.token_type() {
      TokenType::Eof => error_str += " at end",
      TokenType::Error => {}
      _ => error_str += &format!(" at '{}'", token.lexeme()),
    }
    error_str += &format!(": {message}");

    Err(InterpretError::CompileError(error_str))
  }
}
