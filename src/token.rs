use std::{fmt, ops::Range};

use crate::source::UnitId;

#[derive(Copy, Clone)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Token {
        Token { kind, span }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:?}, {})", self.kind, self.span)
    }
}

/// A byte range inside one source unit.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub lo: u32,
    pub len: u32,
    pub unit: UnitId,
}

impl Span {
    /// A span which doesn't point into any unit. Used for diagnostics that
    /// concern the whole program.
    pub const DUMMY: Span = Span {
        lo: 0,
        len: 0,
        unit: UnitId::NONE,
    };

    pub fn new_of_bounds(Range { start: lo, end: hi }: Range<usize>, unit: UnitId) -> Span {
        debug_assert!(hi >= lo);
        let lo = u32::try_from(lo).expect("unit is too large");
        let hi = u32::try_from(hi).expect("unit is too large");
        Span {
            lo,
            len: hi - lo,
            unit,
        }
    }

    pub fn new_of_length(lo: u32, len: u32, unit: UnitId) -> Span {
        Span { lo, len, unit }
    }

    pub fn hi(self) -> u32 {
        self.lo + self.len
    }

    /// Returns a span which starts at `self` and ends at `other`'s end.
    pub fn to(self, other: Span) -> Span {
        debug_assert_eq!(self.unit, other.unit);
        let hi = self.hi().max(other.hi());
        Span {
            lo: self.lo,
            len: hi - self.lo,
            unit: self.unit,
        }
    }

    /// Returns the zero-length span placed right after this one.
    pub fn end(self) -> Span {
        Span::new_of_length(self.hi(), 0, self.unit)
    }

    pub fn is_dummy(self) -> bool {
        self.unit == UnitId::NONE
    }

    pub fn substr(self, src: &str) -> &str {
        &src[self.lo as usize..self.hi() as usize]
    }

    pub fn wrap<T>(self, inner: T) -> Spanned<T> {
        Spanned { span: self, inner }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({self}, len: {})", self.len)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lo = self.lo;
        let hi = self.hi();
        write!(f, "{lo}..{hi}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spanned<T> {
    pub span: Span,
    pub inner: T,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    And,
    Or,
    Not,
    True,
    False,
    Null,
    Int,
    Real,
    Boolean,
    String,
    Void,
    While,
    Foreach,
    In,
    If,
    Elseif,
    Else,
    Return,
    Class,
    Constructor,
    Interface,
    Implements,
    This,
    New,
    Var,
    Method,
    Break,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    /// `^`
    Caret,
    /// `=`
    Assign,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Semicolon,

    Identifier,
    IntLiteral,
    RealLiteral,
    StringLiteral,

    Eof,
    /// A lone `!`. The lexical error is reported by the lexer; the token is
    /// kept so the parser can report where it didn't expect it.
    Error,
}

impl TokenKind {
    /// Whether this token may start a type (see [`crate::parser`]).
    pub fn starts_type(self) -> bool {
        use TokenKind::*;
        matches!(self, Identifier | Int | Real | String | Boolean)
    }

    /// Whether this token may start an action (statement).
    pub fn starts_action(self) -> bool {
        use TokenKind::*;
        matches!(self, Identifier | This | While | Foreach | If | Break)
    }

    /// Whether this token may start an expression.
    pub fn starts_expr(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Identifier
                | LParen
                | IntLiteral
                | RealLiteral
                | StringLiteral
                | True
                | False
                | Null
                | Plus
                | Minus
                | New
                | This
                | Not
        )
    }
}

/// Keywords are matched exactly (the language is case sensitive).
pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "and" => TokenKind::And,
    "or" => TokenKind::Or,
    "not" => TokenKind::Not,
    "true" => TokenKind::True,
    "false" => TokenKind::False,
    "null" => TokenKind::Null,
    "int" => TokenKind::Int,
    "real" => TokenKind::Real,
    "boolean" => TokenKind::Boolean,
    "string" => TokenKind::String,
    "void" => TokenKind::Void,
    "while" => TokenKind::While,
    "foreach" => TokenKind::Foreach,
    "in" => TokenKind::In,
    "if" => TokenKind::If,
    "elseif" => TokenKind::Elseif,
    "else" => TokenKind::Else,
    "return" => TokenKind::Return,
    "class" => TokenKind::Class,
    "constructor" => TokenKind::Constructor,
    "interface" => TokenKind::Interface,
    "implements" => TokenKind::Implements,
    "this" => TokenKind::This,
    "new" => TokenKind::New,
    "var" => TokenKind::Var,
    "method" => TokenKind::Method,
    "break" => TokenKind::Break,
};
