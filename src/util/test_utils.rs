use crate::{
    ast::Program,
    parser,
    source::{SourceMap, UnitId},
    symbol_table::{self, Stdlib, SymbolTable},
    token::Spanned,
    type_checker::{Checker, Decorations},
    util::{
        self,
        fmt::{tree, Show},
        intern::Interner,
    },
};

pub fn format_errors<E>(i: &Interner<str>, e: &[Spanned<E>]) -> Vec<String>
where
    Spanned<E>: Show,
{
    let ctx = util::fmt::Context::new(i);
    e.iter().map(|e| format!("{:#}", e.display(&ctx))).collect()
}

/// Formats errors as `line:column: message`. Errors without a position are
/// formatted as the bare message.
pub fn format_positioned_errors<E>(
    i: &Interner<str>,
    sources: &SourceMap,
    e: &[Spanned<E>],
) -> Vec<String>
where
    Spanned<E>: Show,
{
    let ctx = util::fmt::Context::new(i);
    e.iter()
        .map(|e| match sources.position(e.span) {
            Some(pos) => format!("{}:{}: {}", pos.line, pos.column, e.display(&ctx)),
            None => e.display(&ctx).to_string(),
        })
        .collect()
}

/// A single unit run through every stage.
pub struct Checked {
    pub sources: SourceMap,
    pub interner: Interner<str>,
    pub program: Program,
    pub table: SymbolTable,
    pub decorations: Decorations,
    /// Syntax, table and checker errors, in this order.
    pub errors: Vec<String>,
}

/// Runs every stage over `src`, even after errors.
pub fn check_program(src: &str) -> Checked {
    let mut sources = SourceMap::new();
    let unit = sources.add("test.des", src);
    let mut interner = Interner::with_capacity(128);

    let (program, syntax_errors) = match parser::parse_program(src, unit, &mut interner) {
        Ok(program) => (program, vec![]),
        Err((program, errors)) => (program, errors),
    };
    let mut errors = format_positioned_errors(&interner, &sources, &syntax_errors);

    let stdlib = Stdlib::new(&mut interner);
    let entry = interner.intern("entry");
    let units = [program];
    let (table, table_errors) = symbol_table::build(&units, stdlib, entry);
    errors.extend(format_positioned_errors(&interner, &sources, &table_errors));

    let decorations = match Checker::new(&table).check(&units) {
        Ok(decorations) => decorations,
        Err((decorations, check_errors)) => {
            errors.extend(format_positioned_errors(&interner, &sources, &check_errors));
            decorations
        }
    };

    let [program] = units;
    Checked {
        sources,
        interner,
        program,
        table,
        decorations,
        errors,
    }
}

/// Each variant contains the input.
pub enum Test {
    ParserProgram(&'static str),
    ParserExpr(&'static str),
    CheckerProgram(&'static str),
}

pub enum Assertion {
    TreeOk(&'static str),
    TreeError(&'static str),
    ExpectedErrors(&'static [&'static str]),
}

#[track_caller]
pub fn run_pipeline(test: Test) -> (String, Vec<String>) {
    let interner = &mut Interner::with_capacity(128);

    match test {
        Test::ParserProgram(input) => {
            let (prog, errors) = match parser::parse_program(input, UnitId::new(0), interner) {
                Ok(prog) => (prog, vec![]),
                Err((prog, errors)) => (prog, errors),
            };
            let tree = tree::print_program_string(interner, None, &prog);
            let errors = format_errors(interner, &errors);
            (tree, errors)
        }
        Test::ParserExpr(input) => {
            let (expr, errors) = match parser::parse_expr(input, UnitId::new(0), interner) {
                Ok(expr) => (expr, vec![]),
                Err((expr, errors)) => (expr, errors),
            };
            let tree = tree::print_expr_string(interner, &expr);
            let errors = format_errors(interner, &errors);
            (tree, errors)
        }
        Test::CheckerProgram(input) => {
            let checked = check_program(input);
            let tree = tree::print_program_string(
                &checked.interner,
                Some(&checked.decorations),
                &checked.program,
            );
            (tree, checked.errors)
        }
    }
}

#[track_caller]
pub fn run_assertion(
    assertion: Assertion,
    formatted_actual_tree: &str,
    formatted_actual_errors: &[String],
) {
    match assertion {
        Assertion::TreeOk(expected_tree) => {
            let expected_errors: &[&str] = &[];
            ::pretty_assertions::assert_eq!(formatted_actual_errors, expected_errors);
            ::pretty_assertions::assert_eq!(formatted_actual_tree.trim(), expected_tree.trim());
        }
        Assertion::TreeError(expected_tree) => {
            ::pretty_assertions::assert_eq!(formatted_actual_tree.trim(), expected_tree.trim())
        }
        Assertion::ExpectedErrors(expected_errors) => {
            ::pretty_assertions::assert_eq!(formatted_actual_errors, expected_errors)
        }
    }
}

macro_rules! tree_tests {
    (
        use $test_kind:ident;

        $(
            fn $test_name:ident() {
                let $source_kind:ident = $source:expr;
                $($assertions_tt:tt)*
            }
        )*
    ) => {
        $(
            #[test]
            fn $test_name() {
                let test: crate::util::test_utils::Test =
                    tree_tests!(@@get_test($test_kind, $source_kind), $source);
                let (formatted_actual_tree, formatted_actual_errors) =
                    crate::util::test_utils::run_pipeline(test);
                let ctx = (&formatted_actual_tree, &formatted_actual_errors);
                tree_tests!(@@expand_assertions, ctx, [$($assertions_tt)*]);
            }
        )*
    };

    (@@expand_assertions, $ctx:expr, []) => {};
    (@@expand_assertions, $ctx:expr, [
        let $assertion:ident = $assertion_expected:expr;
        $($rest_assertions_tt:tt)*
    ]) => {
        crate::util::test_utils::run_assertion(
            tree_tests!(@@assertion, $assertion, $assertion_expected),
            $ctx.0,
            $ctx.1,
        );
        tree_tests!(@@expand_assertions, $ctx, [$($rest_assertions_tt)*]);
    };

    (@@assertion, tree_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::TreeOk(::indoc::indoc! { $expected })
    };
    (@@assertion, tree_error, $expected:expr) => {
        crate::util::test_utils::Assertion::TreeError(::indoc::indoc! { $expected })
    };
    (@@assertion, expected_errors, $expected:expr) => {
        crate::util::test_utils::Assertion::ExpectedErrors($expected)
    };

    (@@get_test(parser, program), $source:expr) => {
        crate::util::test_utils::Test::ParserProgram($source)
    };
    (@@get_test(parser, expr), $source:expr) => {
        crate::util::test_utils::Test::ParserExpr($source)
    };
    (@@get_test(checker, program), $source:expr) => {
        crate::util::test_utils::Test::CheckerProgram($source)
    };
}
pub(crate) use tree_tests;
