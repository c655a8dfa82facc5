//! # Scanner
//!
//! The scanner is responsible for:
//!
//! - reading the source code
//! - lazily producing a stream of tokens, one call to [`Scanner::scan_token`]
//!   at a time.
//!
//! It never looks ahead further than two characters, and it holds no
//! owned data: every [`Token`] is a view (start + length) into the
//! caller-supplied source buffer, which must outlive every token the
//! scanner emits.

/// ## TokenType
///
/// An enum which represents the different types of tokens.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenType {
  // Single-character tokens.
  LeftParen,
  RightParen,
  LeftBrace,
  RightBrace,
  Comma,
  Dot,
  Minus,
  Plus,
  Semicolon,
  Slash,
  Star,
  // One or two character tokens.
  Bang,
  BangEqual,
  Equal,
  EqualEqual,
  Greater,
  GreaterEqual,
  Less,
  LessEqual,
  // Literals.
  Identifier,
  String,
  Number,
  // Keywords.
  And,
  Class,
  Else,
  False,
  For,
  Fun,
  If,
  Nil,
  Or,
  Print,
  Return,
  Super,
  This,
  True,
  Var,
  While,
  // Error and EOF.
  Error,
  Eof,
}

/// ## Token
///
/// A non-owning view into the source buffer, plus its kind and source
/// line. `lexeme` is the raw slice for ordinary tokens, or the sentinel
/// error message itself for [`TokenType::Error`] tokens.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
  pub(crate) token_type: TokenType,
  pub(crate) line: usize,
  pub(crate) lexeme: &'a str,
}

impl<'a> Default for Token<'a> {
  fn default() -> Self {
    Self {
      token_type: TokenType::Eof,
      line: 1,
      lexeme: "",
    }
  }
}

impl<'a> Token<'a> {
  pub fn token_type(&self) -> TokenType {
    self.token_type
  }

  pub fn lexeme(&self) -> &'a str {
    self.lexeme
  }

  pub fn line(&self) -> usize {
    self.line
  }
}

/// ## Scanner
///
/// Scans one lexeme at a time out of an immutable source buffer.
#[derive(Debug)]
pub struct Scanner<'a> {
  source: &'a str,
  start: usize,
  current: usize,
  line: usize,
}

impl<'a> Scanner<'a> {
  /// Bind a new scanner to the source code.
  pub fn new(source: &'a str) -> Self {
    Self {
      source,
      start: 0,
      current: 0,
      line: 1,
    }
  }

  /// Scan and return the next token. Once the source is exhausted, every
  /// subsequent call returns `EOF` again; every call either advances the
  /// cursor by at least one byte or returns `EOF` with the cursor pinned
  /// at end-of-input, so callers are guaranteed eventual progress.
  pub fn scan_token(&mut self) -> Token<'a> {
    self.skip_whitespace();
    self.start = self.current;

    if self.is_at_end() {
      return self.make_token(TokenType::Eof);
    }

    let c = self.advance();

    if is_id_start(c) {
      return self.identifier();
    }
    if c.is_ascii_digit() {
      return self.number();
    }

    match c {
      b'(' => self.make_token(TokenType::LeftParen),
      b')' => self.make_token(TokenType::RightParen),
      b'{' => self.make_token(TokenType::LeftBrace),
      b'}' => self.make_token(TokenType::RightBrace),
      b';' => self.make_token(TokenType::Semicolon),
      b',' => self.make_token(TokenType::Comma),
      b'.' => self.make_token(TokenType::Dot),
      b'-' => self.make_token(TokenType::Minus),
      b'+' => self.make_token(TokenType::Plus),
      b'/' => self.make_token(TokenType::Slash),
      b'*' => self.make_token(TokenType::Star),
      b'!' => {
        let tt = if self.match_next(b'=') {
          TokenType::BangEqual
        } else {
          TokenType::Bang
        };
        self.make_token(tt)
      }
      b'=' => {
        let tt = if self.match_next(b'=') {
          TokenType::EqualEqual
        } else {
          TokenType::Equal
        };
        self.make_token(tt)
      }
      b'<' => {
        let tt = if self.match_next(b'=') {
          TokenType::LessEqual
        } else {
          TokenType::Less
        };
        self.make_token(tt)
      }
      b'>' => {
        let tt = if self.match_next(b'=') {
          TokenType::GreaterEqual
        } else {
          TokenType::Greater
        };
        self.make_token(tt)
      }
      b'"' => self.string(),
      _ => self.error_token("Unexpected character."),
    }
  }
}

impl<'a> Scanner<'a> {
  fn string(&mut self) -> Token<'a> {
    while self.peek() != b'"' && !self.is_at_end() {
      if self.peek() == b'\n' {
        self.line += 1;
      }
      self.advance();
    }

    if self.is_at_end() {
      return self.error_token("Unterminated string.");
    }

    // the closing quote
    self.advance();
    self.make_token(TokenType::String)
  }

  fn number(&mut self) -> Token<'a> {
    while self.peek().is_ascii_digit() {
      self.advance();
    }

    // Look for a fractional part.
    if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
      // Consume the "."
      self.advance();
      while self.peek().is_ascii_digit() {
        self.advance();
      }
    }

    self.make_token(TokenType::Number)
  }

  fn identifier(&mut self) -> Token<'a> {
    while is_id_continue(self.peek()) {
      self.advance();
    }
    self.make_token(self.identifier_type())
  }

  /// Deterministic trie over the first one or two characters of the
  /// lexeme: a single leading-byte match resolves most keywords, and the
  /// two genuinely ambiguous prefixes (`f...`, `t...`) branch one level
  /// deeper before falling back to `check_keyword`'s suffix comparison.
  fn identifier_type(&self) -> TokenType {
    let lexeme = self.current_lexeme();
    let mut chars = lexeme.bytes();
    match chars.next().unwrap_or(0) {
      b'a' => self.check_keyword(lexeme, "and", TokenType::And),
      b'c' => self.check_keyword(lexeme, "class", TokenType::Class),
      b'e' => self.check_keyword(lexeme, "else", TokenType::Else),
      b'f' => match chars.next().unwrap_or(0) {
        b'a' => self.check_keyword(lexeme, "false", TokenType::False),
        b'o' => self.check_keyword(lexeme, "for", TokenType::For),
        b'u' => self.check_keyword(lexeme, "fun", TokenType::Fun),
        _ => TokenType::Identifier,
      },
      b'i' => self.check_keyword(lexeme, "if", TokenType::If),
      b'n' => self.check_keyword(lexeme, "nil", TokenType::Nil),
      b'o' => self.check_keyword(lexeme, "or", TokenType::Or),
      b'p' => self.check_keyword(lexeme, "print", TokenType::Print),
      b'r' => self.check_keyword(lexeme, "return", TokenType::Return),
      b's' => self.check_keyword(lexeme, "super", TokenType::Super),
      b't' => match chars.next().unwrap_or(0) {
        b'h' => self.check_keyword(lexeme, "this", TokenType::This),
        b'r' => self.check_keyword(lexeme, "true", TokenType::True),
        _ => TokenType::Identifier,
      },
      b'v' => self.check_keyword(lexeme, "var", TokenType::Var),
      b'w' => self.check_keyword(lexeme, "while", TokenType::While),
      _ => TokenType::Identifier,
    }
  }

  fn check_keyword(&self, lexeme: &str, keyword: &str, token_type: TokenType) -> TokenType {
    if lexeme == keyword {
      token_type
    } else {
      TokenType::Identifier
    }
  }

  fn current_lexeme(&self) -> &'a str {
    &self.source[self.start..self.current]
  }
}

impl<'a> Scanner<'a> {
  fn make_token(&self, token_type: TokenType) -> Token<'a> {
    Token {
      token_type,
      line: self.line,
      lexeme: self.current_lexeme(),
    }
  }

  fn error_token(&self, message: &'a str) -> Token<'a> {
    Token {
      token_type: TokenType::Error,
      line: self.line,
      lexeme: message,
    }
  }
}

impl<'a> Scanner<'a> {
  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  fn advance(&mut self) -> u8 {
    self.current += 1;
    self.source.as_bytes()[self.current - 1]
  }

  fn match_next(&mut self, expected: u8) -> bool {
    if self.is_at_end() || self.source.as_bytes()[self.current] != expected {
      return false;
    }
    self.current += 1;
    true
  }

  fn peek(&self) -> u8 {
    if self.is_at_end() {
      return b'\0';
    }
    self.source.as_bytes()[self.current]
  }

  fn peek_next(&self) -> u8 {
    if self.current + 1 >= self.source.len() {
      return b'\0';
    }
    self.source.as_bytes()[self.current + 1]
  }

  fn skip_whitespace(&mut self) {
    loop {
      match self.peek() {
        b' ' | b'\r' | b'\t' => {
          self.advance();
        }
        b'\n' => {
          self.line += 1;
          self.advance();
        }
        b'/' => {
          if self.peek_next() == b'/' {
            while self.peek() != b'\n' && !self.is_at_end() {
              self.advance();
            }
          } else {
            return;
          }
        }
        _ => return,
      }
    }
  }
}

fn is_id_start(c: u8) -> bool {
  c.is_ascii_alphabetic() || c == b'_'
}

fn is_id_continue(c: u8) -> bool {
  c.is_ascii_alphanumeric() || c == b'_'
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scan_all(src: &str) -> Vec<TokenType> {
    let mut scanner = Scanner::new(src);
    let mut out = Vec::new();
    loop {
      let token = scanner.scan_token();
      let tt = token.token_type();
      out.push(tt);
      if tt == TokenType::Eof {
        break;
      }
    }
    out
  }

  #[test]
  fn scans_punctuation_and_operators() {
    use TokenType::*;
    assert_eq!(
      scan_all("(){}+-*/!=,.;<<=>>===!"),
      vec![
        LeftParen, RightParen, LeftBrace, RightBrace, Plus, Minus, Star, Slash, BangEqual, Comma,
        Dot, Semicolon, Less, LessEqual, Greater, GreaterEqual, EqualEqual, Bang, Eof
      ]
    );
  }

  #[test]
  fn scans_keywords_not_prefixes() {
    use TokenType::*;
    assert_eq!(scan_all("true truer for function"), vec![True, Identifier, For, Identifier, Eof]);
  }

  #[test]
  fn number_stops_before_lone_trailing_dot() {
    let mut scanner = Scanner::new("1.");
    let number = scanner.scan_token();
    assert_eq!(number.token_type(), TokenType::Number);
    assert_eq!(number.lexeme(), "1");
    let dot = scanner.scan_token();
    assert_eq!(dot.token_type(), TokenType::Dot);
  }

  #[test]
  fn unterminated_string_reports_as_error() {
    let mut scanner = Scanner::new("\"abc");
    let token = scanner.scan_token();
    assert_eq!(token.token_type(), TokenType::Error);
    assert_eq!(token.lexeme(), "Unterminated string.");
  }

  #[test]
  fn multiline_string_tracks_line_number() {
    let mut scanner = Scanner::new("\"a\nb\" 1");
    let string_tok = scanner.scan_token();
    assert_eq!(string_tok.token_type(), TokenType::String);
    let number_tok = scanner.scan_token();
    assert_eq!(number_tok.line(), 2);
  }

  #[test]
  fn eof_is_returned_forever() {
    let mut scanner = Scanner::new("");
    assert_eq!(scanner.scan_token().token_type(), TokenType::Eof);
    assert_eq!(scanner.scan_token().token_type(), TokenType::Eof);
    assert_eq!(scanner.scan_token().token_type(), TokenType::Eof);
  }

  #[test]
  fn skips_line_comments() {
    use TokenType::*;
    assert_eq!(scan_all("1 // a comment\n2"), vec![Number, Number, Eof]);
  }
}
