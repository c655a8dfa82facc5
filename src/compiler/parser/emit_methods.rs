use super::*;

impl<'a> Parser<'a> {
  /// Append a single byte to the chunk, tagged with the line of the token
  /// that produced it.
  pub(crate) fn emit_byte(&mut self, byte: u8) -> LoxResult<()> {
    let line = self.previous.line();
    self.chunk.write(byte, line);
    Ok(())
  }

  /// Append a sequence of bytes, in order.
  pub(crate) fn emit_bytes(&mut self, bytes: &[u8]) -> LoxResult<()> {
    for &byte in bytes {
      self.emit_byte(byte)?;
    }
    Ok(())
  }

  pub(crate) fn emit_return(&mut self) -> LoxResult<()> {
    self.emit_byte(OpCode::Return as u8)
  }

  /// Add `value` to the constant pool and emit the two-byte
  /// `OP_CONSTANT idx` instruction referencing it.
  pub(crate) fn emit_constant(&mut self, value: Value) -> LoxResult<()> {
    let constant_index = self.make_constant(value)?;
    self.emit_bytes(&[OpCode::Constant as u8, constant_index])
  }
}
