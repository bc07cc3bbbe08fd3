/// The lexer maps the source text of a unit into a sequence of tokens.
pub mod lexer;

/// The parser maps a unit into an AST, recovering from syntax errors.
pub mod parser;

/// The symbol table registers every class, interface and method before any
/// type is checked.
pub mod symbol_table;

/// The type checker decorates the AST with types and initialization state.
pub mod type_checker;

/// Ties the stages together.
pub mod driver;

pub mod ast;
pub mod source;
pub mod token;
pub mod types;

pub mod util {
    pub mod fmt;
    pub mod intern;
    pub mod iter;
    #[cfg(test)]
    pub(crate) mod test_utils;
}
