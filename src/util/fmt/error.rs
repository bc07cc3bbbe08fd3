use std::fmt::Formatter;

use crate::{
    lexer,
    parser::{self, Expectation},
    symbol_table,
    token::Spanned,
    type_checker,
    util::fmt::{Context, Show},
};

type Result = std::fmt::Result;

/// Writes the span prefix for the alternate (`{:#}`) form.
fn prefix<T>(f: &mut Formatter<'_>, error: &Spanned<T>) -> Result {
    if f.alternate() {
        write!(f, "{}: ", error.span)?;
    }
    Ok(())
}

fn show_lexical(f: &mut Formatter<'_>, error: &lexer::Error) -> Result {
    use lexer::Error::*;
    match error {
        InvalidSymbol(c) => write!(f, "Invalid symbol '{c}'"),
        LeadingZero => write!(f, "Number literals cannot be prefixed with '0'"),
        MissingDecimals => write!(
            f,
            "Invalid symbol '.'. Did you forget to add decimals to a real number?"
        ),
        LoneBang => write!(
            f,
            "Invalid symbol '!'. Did you forget the '=' symbol in a '!=' compare operator?"
        ),
        UnterminatedString => write!(f, "Lexical error. Did you forget to terminate a string?"),
    }
}

impl Show for Spanned<lexer::Error> {
    fn show(&self, f: &mut Formatter<'_>, _: &Context<'_>) -> Result {
        prefix(f, self)?;
        show_lexical(f, &self.inner)
    }
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            Expectation::Declaration => "Expected interface, class or EOF",
            Expectation::Expression => {
                "Expected identifier, leftParen, intLiteral, realLiteral, stringLiteral, \
                booleanLiteral, null, additiveOperator, new, this or not"
            }
            Expectation::Primary => "The token is invalid in the current context",
            Expectation::InstantiationSuffix => "Expected leftBracket or leftParen",
            Expectation::ReturnType => {
                "Expected int, real, string, boolean, identifier, void or array type"
            }
            Expectation::Type => "Expected int, real, string, boolean, identifier, or array type",
        };
        f.write_str(text)
    }
}

impl Show for Spanned<parser::Error> {
    fn show(&self, f: &mut Formatter<'_>, _: &Context<'_>) -> Result {
        prefix(f, self)?;

        use parser::Error::*;
        match &self.inner {
            Lexical(error) => show_lexical(f, error),
            ExpectedToken { expected, .. } => write!(f, "Expected token of type '{expected:?}'"),
            UnexpectedToken {
                actual,
                expectation,
            } => write!(f, "Unexpected token of type '{actual:?}'. {expectation}"),
            InterfaceAfterClass => write!(f, "Interfaces must be declared before classes"),
            IntOutOfRange => write!(f, "Integer literal is out of range"),
        }
    }
}

impl Show for Spanned<symbol_table::Error> {
    fn show(&self, f: &mut Formatter<'_>, ctx: &Context<'_>) -> Result {
        let i = ctx.ident_interner;
        prefix(f, self)?;

        use symbol_table::Error::*;
        match &self.inner {
            AlreadyDeclared(name) => write!(f, "'{}' is already declared", i.get(name)),
            EntryNotVoid => write!(f, "Entry method must be of type 'void'"),
            EntryAlreadyDeclared => write!(f, "Entry method already declared"),
            NoEntry(name) => write!(f, "No viable '{}' method found", i.get(name)),
        }
    }
}

impl Show for Spanned<type_checker::Error> {
    fn show(&self, f: &mut Formatter<'_>, ctx: &Context<'_>) -> Result {
        let i = ctx.ident_interner;
        prefix(f, self)?;

        use type_checker::Error::*;
        match &self.inner {
            NotDeclared(name) => write!(f, "{} is not declared", i.get(name)),
            NotAnInterface(name) => write!(f, "{} is not an interface", i.get(name)),
            MissingInterfaceMethod { method, interface } => write!(
                f,
                "Class does not implement the method '{}' required by interface '{}'",
                i.get(method),
                i.get(interface)
            ),
            UndeclaredVarType { name, ty } => write!(
                f,
                "Cannot declare variable '{}' to undeclared type '{}'",
                i.get(name),
                ty.display(ctx)
            ),
            UndeclaredParamType { name, ty } => write!(
                f,
                "Cannot declare parameter '{}' to undeclared type '{}'",
                i.get(name),
                ty.display(ctx)
            ),
            UndeclaredReturnType { name, ty } => write!(
                f,
                "Cannot declare method '{}' to undeclared return type '{}'",
                i.get(name),
                ty.display(ctx)
            ),
            ConstructorName => write!(f, "Constructor name does not match class name"),
            IllegalClassLevelAssignment => write!(f, "Illegal class level assignment"),
            ClassLevelReference(name) => write!(
                f,
                "The member '{}' cannot be referred at class level before the class has \
                been initialized. Move the assignment to the constructor",
                i.get(name)
            ),
            IllegalAssignment { value, target } => write!(
                f,
                "Illegal assignment of type '{}' to declared type '{}'",
                value.display(ctx),
                target.display(ctx)
            ),
            NotAssignable(name) => {
                let name = name.map_or("this", |name| i.get(name));
                write!(f, "LHS identifier '{name}' of assignment is not a variable")
            }
            Unassigned(name) => write!(f, "Use of unassigned variable '{}'", i.get(name)),
            NonBooleanCondition => write!(f, "Expression of conditional is not of type boolean"),
            LoopVarIsParameter(name) => write!(
                f,
                "Foreach loop variable '{}' cannot be a method parameter",
                i.get(name)
            ),
            NotAVariable(name) => write!(f, "{} is not a variable", i.get(name)),
            NonArrayLoop(ty) => write!(f, "Cannot loop over nonarray type '{}'", ty.display(ctx)),
            LoopVarMismatch(name) => write!(
                f,
                "Type of foreach loop variable '{}' does not match the element type of the array",
                i.get(name)
            ),
            ReturnInVoid => write!(f, "Attempted to return a value in a void method"),
            MissingReturn(ty) => write!(
                f,
                "The method must return a value of type '{}'",
                ty.display(ctx)
            ),
            ReturnMethod => write!(f, "Cannot return method type"),
            ReturnMismatch { value, expected } => write!(
                f,
                "Return type '{}' does not match the declared type '{}'",
                value.display(ctx),
                expected.display(ctx)
            ),
            BreakOutsideLoop => write!(f, "Break statement must be inside a loop"),
            IncompatibleOperands { op, lhs, rhs } => write!(
                f,
                "Incompatible types ({} and {}) for operator {op}",
                lhs.display(ctx),
                rhs.display(ctx)
            ),
            InvalidOperand { op, ty } => write!(
                f,
                "Operator {op} cannot be applied to type '{}'",
                ty.display(ctx)
            ),
            CallUndeclared(name) => {
                write!(f, "Cannot call undeclared identifier '{}'", i.get(name))
            }
            NotAMethod(name) => write!(f, "{} is not a method identifier", i.get(name)),
            ArgumentCount => write!(f, "Invalid number of arguments provided to call"),
            MethodArgument => write!(f, "Methods cannot be used as arguments"),
            ArgumentSubstitution { arg, param } => write!(
                f,
                "Provided argument type '{}' cannot be substituted for type '{}'",
                arg.display(ctx),
                param.display(ctx)
            ),
            ArgumentMismatch { arg, param } => write!(
                f,
                "Provided argument type '{}' does not match parameter type '{}'",
                arg.display(ctx),
                param.display(ctx)
            ),
            InstantiateUndeclared(name) => {
                write!(f, "Cannot instantiate undeclared type '{}'", i.get(name))
            }
            InstantiateInterface => write!(f, "Cannot instantiate interface types"),
            InstantiateUndeclaredArray(ty) => write!(
                f,
                "Cannot instantiate array of undeclared type '{}'",
                ty.display(ctx)
            ),
            NonIntArraySize => write!(f, "Arrays can only be instantiated with integer values"),
            InvalidThis => write!(f, "'this' keyword is not valid in the current context"),
            ExpectedArray => write!(f, "Expected array type"),
            NonIntIndex => write!(f, "Indexing on arrays can only be done using int values"),
            DotOnNonClass => write!(f, "Cannot use dot notation on a non class type"),
        }
    }
}
