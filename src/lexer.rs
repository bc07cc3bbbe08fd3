use std::{iter::Peekable, num::ParseIntError};

use crate::{
    source::UnitId,
    token::{Span, Spanned, Token, TokenKind, KEYWORDS},
    util::iter::UpToExt,
};

pub const SUGGESTED_TOKENS_CAPACITY: usize = 8_192;

/// Lexes the whole unit eagerly, returning every token (the last one being
/// [`TokenKind::Eof`]) and every lexical error found along the way.
pub fn lex(src: &str, unit: UnitId) -> (Vec<Token>, Vec<Spanned<Error>>) {
    let mut lexer = Lexer::new(src, unit);
    let mut tokens = Vec::with_capacity(SUGGESTED_TOKENS_CAPACITY.min(src.len() + 1));
    tokens.extend(lexer.by_ref().up_to(Token::is_eof));
    (tokens, lexer.errors)
}

/// The Deslang lexer.
///
/// Tokens are produced lazily through [`Lexer::next_token`]. Once the input is
/// exhausted, every following call produces an [`TokenKind::Eof`] token.
pub struct Lexer<'src> {
    src: &'src str,
    iter: Peekable<std::str::Chars<'src>>,
    cursor: usize,
    current_lo: usize,
    unit: UnitId,
    errors: Vec<Spanned<Error>>,
}

impl<'src> Lexer<'src> {
    /// Constructs a new lexer with the default state.
    pub fn new(src: &'src str, unit: UnitId) -> Lexer<'src> {
        Lexer {
            src,
            iter: src.chars().peekable(),
            cursor: 0,
            current_lo: 0,
            unit,
            errors: Vec::new(),
        }
    }

    pub fn src(&self) -> &'src str {
        self.src
    }

    pub fn errors(&self) -> &[Spanned<Error>] {
        &self.errors
    }

    /// Returns the errors recorded so far, leaving the lexer with none.
    pub fn take_errors(&mut self) -> Vec<Spanned<Error>> {
        std::mem::take(&mut self.errors)
    }

    /// Scans the next token, skipping whitespace, comments and discarded
    /// characters.
    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(kind) = self.scan_token_kind() {
                return Token::new(kind, self.span());
            }
        }
    }

    /// Tries to scan the current character. Returns `None` if nothing was
    /// produced (trivia, or an invalid character).
    fn scan_token_kind(&mut self) -> Option<TokenKind> {
        use TokenKind::*;
        let Some(c) = self.mark_advance() else {
            return Some(Eof);
        };
        let kind = match c {
            ' ' | '\t' | '\n' | '\r' => return None,
            '#' => {
                self.line_comment();
                return None;
            }
            '+' => Plus,
            '-' => Minus,
            '*' => Star,
            '/' => Slash,
            '%' => Percent,
            '^' => Caret,
            '=' => match self.peek() {
                Some('=') => self.advance_with(EqEq),
                _ => Assign,
            },
            '<' => match self.peek() {
                Some('=') => self.advance_with(LessEq),
                _ => Less,
            },
            '>' => match self.peek() {
                Some('=') => self.advance_with(GreaterEq),
                _ => Greater,
            },
            '!' => match self.peek() {
                Some('=') => self.advance_with(NotEq),
                _ => self.lone_bang(),
            },
            '(' => LParen,
            ')' => RParen,
            '{' => LBrace,
            '}' => RBrace,
            '[' => LBracket,
            ']' => RBracket,
            ',' => Comma,
            '.' => Dot,
            ';' => Semicolon,
            '"' => self.string(),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier_or_keyword(),
            c if c.is_ascii_digit() => self.number(c),
            c => {
                self.invalid_symbol(c);
                return None;
            }
        };
        Some(kind)
    }

    /// A `!` must always be followed by `=`. The error token is still produced
    /// so that the parser reports it in context.
    fn lone_bang(&mut self) -> TokenKind {
        self.error(self.span(), Error::LoneBang);
        TokenKind::Error
    }

    /// Invalid characters are reported and discarded.
    fn invalid_symbol(&mut self, c: char) {
        self.error(self.span(), Error::InvalidSymbol(c));
    }

    /// Strings can't span multiple lines and have no escape sequences. An
    /// unterminated string still produces a string token, which ends right
    /// before the line break (or the end of the input).
    fn string(&mut self) -> TokenKind {
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\n' | '\r') | None => {
                    self.error(self.span(), Error::UnterminatedString);
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        TokenKind::StringLiteral
    }

    fn identifier_or_keyword(&mut self) -> TokenKind {
        let valid_identifier_suffix = |c: char| c.is_ascii_alphanumeric() || c == '_';

        while self.peek().is_some_and(valid_identifier_suffix) {
            self.advance();
        }
        match KEYWORDS.get(self.substr()).copied() {
            Some(keyword) => keyword,
            None => TokenKind::Identifier,
        }
    }

    /// Numbers are `0` or `[1-9][0-9]*`, optionally followed by `.` and at
    /// least one digit. Malformed numbers are reported but still produce a
    /// literal token.
    fn number(&mut self, first: char) -> TokenKind {
        if first == '0' && self.peek_digit() {
            self.error(self.span(), Error::LeadingZero);
        }
        self.digits();
        if self.peek() != Some('.') {
            return TokenKind::IntLiteral;
        }
        let dot_span = self.advance_span();
        if !self.peek_digit() {
            self.error(dot_span, Error::MissingDecimals);
        }
        self.digits();
        TokenKind::RealLiteral
    }

    fn digits(&mut self) {
        while self.peek_digit() {
            self.advance();
        }
    }

    fn line_comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }
}

impl Lexer<'_> {
    /// Starts a new token "mark" and advances the iterator.
    fn mark_advance(&mut self) -> Option<char> {
        self.current_lo = self.cursor;
        self.advance()
    }

    /// Returns the next char and advances the iterator, or `None` at the end
    /// of the input. A NUL character is an ordinary (invalid) character.
    fn advance(&mut self) -> Option<char> {
        self.iter.next().inspect(|c| self.cursor += c.len_utf8())
    }

    /// Advances and returns the provided value.
    fn advance_with<T>(&mut self, value: T) -> T {
        self.advance();
        value
    }

    /// Advances the iterator, returning the span of the skipped char.
    fn advance_span(&mut self) -> Span {
        let lo = self.cursor;
        self.advance();
        Span::new_of_bounds(lo..self.cursor, self.unit)
    }

    /// Returns the next char without advancing the iterator.
    fn peek(&mut self) -> Option<char> {
        self.iter.peek().copied()
    }

    fn peek_digit(&mut self) -> bool {
        matches!(self.peek(), Some('0'..='9'))
    }

    /// Returns the current span.
    fn span(&self) -> Span {
        Span::new_of_bounds(self.current_lo..self.cursor, self.unit)
    }

    /// Returns the substring of the current marked bounds.
    fn substr(&self) -> &str {
        &self.src[self.current_lo..self.cursor]
    }

    fn error(&mut self, span: Span, error: Error) {
        self.errors.push(span.wrap(error));
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Never returns `None`. Use [`UpToExt::up_to`] with
    /// [`Token::is_eof`] to stop at the end of the input.
    fn next(&mut self) -> Option<Token> {
        Some(self.next_token())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    InvalidSymbol(char),
    LeadingZero,
    MissingDecimals,
    LoneBang,
    UnterminatedString,
}

pub mod extract {
    use super::*;

    pub fn int(token: Token, src: &str) -> Result<i64, ParseIntError> {
        debug_assert_eq!(token.kind, TokenKind::IntLiteral);
        token.span.substr(src).parse()
    }

    /// Reals are always well formed enough for `f64`'s parser, except for a
    /// missing fractional part (already reported), which is read as `.0`.
    pub fn real(token: Token, src: &str) -> f64 {
        debug_assert_eq!(token.kind, TokenKind::RealLiteral);
        let s = token.span.substr(src);
        s.trim_end_matches('.').parse().unwrap_or(0.0)
    }

    pub fn ident(token: Token, src: &str) -> &str {
        debug_assert_eq!(token.kind, TokenKind::Identifier);
        token.span.substr(src)
    }

    /// Returns the string contents, without the quotes.
    pub fn string(token: Token, src: &str) -> Box<str> {
        debug_assert_eq!(token.kind, TokenKind::StringLiteral);
        let s = token.span.substr(src);
        let s = s.strip_prefix('"').unwrap_or(s);
        let s = s.strip_suffix('"').unwrap_or(s);
        s.to_string().into_boxed_str()
    }
}
