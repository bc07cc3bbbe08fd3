use crate::{
    ast::*,
    lexer::{self, extract, Lexer},
    source::UnitId,
    token::{Span, Spanned, Token, TokenKind},
    types::Type,
    util::intern::Interner,
};

type Result<T, E = ()> = std::result::Result<T, E>;

/// On failure, the best-effort tree is returned alongside the errors.
pub type ParseResult<T> = Result<T, (T, Vec<Spanned<Error>>)>;

/// Parses a whole unit. Lexical errors are reported as [`Error::Lexical`].
pub fn parse_program(
    src: &str,
    unit: UnitId,
    ident_interner: &mut Interner<str>,
) -> ParseResult<Program> {
    let mut p = Parser::new(src, unit, ident_interner);
    let program = p.parse_program();
    p.finish(program)
}

/// Parses a single expression, which must span the whole input.
pub fn parse_expr(src: &str, unit: UnitId, ident_interner: &mut Interner<str>) -> ParseResult<Expr> {
    let mut p = Parser::new(src, unit, ident_interner);
    let expr = p.parse_expr();
    p.consume(TokenKind::Eof);
    p.finish(expr)
}

struct Parser<'src, 'ident> {
    src: &'src str,
    unit: UnitId,
    lexer: Lexer<'src>,
    ident_interner: &'ident mut Interner<str>,
    /// The lookahead token.
    current: Token,
    /// The span of the last consumed token.
    prev: Span,
    next_node: u32,
    errors: Vec<Spanned<Error>>,
}

impl Parser<'_, '_> {
    fn parse_program(&mut self) -> Program {
        let mut program = Program::dummy(self.unit);
        loop {
            match self.peek().kind {
                TokenKind::Interface => {
                    if !program.classes.is_empty() {
                        let span = self.peek().span;
                        self.error(span.wrap(Error::InterfaceAfterClass));
                    }
                    let interface = self.parse_interface();
                    program.interfaces.push(interface);
                }
                TokenKind::Class => {
                    let class = self.parse_class();
                    program.classes.push(class);
                }
                TokenKind::Eof => break,
                _ => {
                    self.unexpected(Expectation::Declaration);
                    self.skip_until(&[TokenKind::Interface, TokenKind::Class]);
                }
            }
        }
        program
    }

    fn parse_interface(&mut self) -> Interface {
        let id = self.id();
        let start = self.advance().span;
        let name = self.parse_ident();
        self.consume(TokenKind::LBrace);
        let mut methods = Vec::new();
        while self.is(TokenKind::Method) {
            methods.push(self.parse_method_signature());
        }
        self.consume(TokenKind::RBrace);
        Interface {
            id,
            name,
            methods,
            span: self.span_from(start),
        }
    }

    fn parse_method_signature(&mut self) -> MethodSignature {
        let id = self.id();
        let start = self.advance().span;
        let return_ty = self.parse_return_type();
        let name = self.parse_ident();
        self.consume(TokenKind::LParen);
        let params = self.parse_params();
        self.consume(TokenKind::RParen);
        self.consume(TokenKind::Semicolon);
        MethodSignature {
            id,
            return_ty,
            name,
            params,
            span: self.span_from(start),
        }
    }

    fn parse_class(&mut self) -> Class {
        let id = self.id();
        let start = self.advance().span;
        let name = self.parse_ident();

        let mut implements = Vec::new();
        if self.take(TokenKind::Implements) {
            loop {
                implements.push(self.parse_ident());
                if !self.take(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::LBrace);
        let fields = self.parse_var_decls();
        let constructor = self.parse_constructor();
        let mut methods = Vec::new();
        while self.is(TokenKind::Method) {
            methods.push(self.parse_method());
        }
        self.consume(TokenKind::RBrace);

        Class {
            id,
            name,
            implements,
            fields,
            constructor,
            methods,
            span: self.span_from(start),
        }
    }

    fn parse_var_decls(&mut self) -> Vec<VarDecl> {
        let mut decls = Vec::new();
        while self.is(TokenKind::Var) {
            decls.push(self.parse_var_decl());
        }
        decls
    }

    fn parse_var_decl(&mut self) -> VarDecl {
        let id = self.id();
        let start = self.advance().span;
        let ty = self.parse_type();
        let name = self.parse_ident();
        let initializer = if self.take(TokenKind::Assign) {
            Some(self.parse_expr())
        } else {
            None
        };
        self.consume(TokenKind::Semicolon);
        VarDecl {
            id,
            ty,
            name,
            initializer,
            span: self.span_from(start),
        }
    }

    fn parse_constructor(&mut self) -> Constructor {
        let id = self.id();
        let start = self.peek().span;
        self.consume(TokenKind::Constructor);
        let name = self.parse_ident();
        self.consume(TokenKind::LParen);
        let params = self.parse_params();
        self.consume(TokenKind::RParen);
        self.consume(TokenKind::LBrace);
        let locals = self.parse_var_decls();
        let body = self.parse_actions();
        self.consume(TokenKind::RBrace);
        Constructor {
            id,
            name,
            params,
            locals,
            body,
            span: self.span_from(start),
        }
    }

    fn parse_method(&mut self) -> Method {
        let id = self.id();
        let start = self.advance().span;
        let return_ty = self.parse_return_type();
        let name = self.parse_ident();
        self.consume(TokenKind::LParen);
        let params = self.parse_params();
        self.consume(TokenKind::RParen);
        self.consume(TokenKind::LBrace);
        let locals = self.parse_var_decls();
        let body = self.parse_actions();
        let ret = if self.is(TokenKind::Return) {
            Some(self.parse_return())
        } else {
            None
        };
        self.consume(TokenKind::RBrace);
        Method {
            id,
            return_ty,
            name,
            params,
            locals,
            body,
            ret,
            span: self.span_from(start),
        }
    }

    fn parse_return(&mut self) -> Return {
        let start = self.advance().span;
        let expr = if self.is(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.consume(TokenKind::Semicolon);
        Return {
            expr,
            span: self.span_from(start),
        }
    }

    /// Parses `(type ID (',' type ID)*)?`. Does **NOT** consume the
    /// parentheses.
    fn parse_params(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        if !self.peek().kind.starts_type() {
            return params;
        }
        loop {
            let id = self.id();
            let ty = self.parse_type();
            let name = self.parse_ident();
            params.push(Param { id, ty, name });
            if !self.take(TokenKind::Comma) {
                break;
            }
        }
        params
    }

    fn parse_type(&mut self) -> TypeAnnotation {
        let start = self.peek();
        let base = match start.kind {
            TokenKind::Identifier => Type::Class(self.parse_ident().name),
            TokenKind::Int | TokenKind::Real | TokenKind::String | TokenKind::Boolean => {
                self.advance();
                Self::value_type(start.kind)
            }
            _ => {
                self.unexpected(Expectation::Type);
                return TypeAnnotation {
                    ty: Type::Error,
                    span: start.span,
                };
            }
        };
        let ty = if self.take(TokenKind::LBracket) {
            self.consume(TokenKind::RBracket);
            Type::array_of(base)
        } else {
            base
        };
        TypeAnnotation {
            ty,
            span: self.span_from(start.span),
        }
    }

    fn parse_return_type(&mut self) -> TypeAnnotation {
        let c = self.peek();
        if c.kind == TokenKind::Void {
            self.advance();
            TypeAnnotation {
                ty: Type::Void,
                span: c.span,
            }
        } else if c.kind.starts_type() {
            self.parse_type()
        } else {
            self.unexpected(Expectation::ReturnType);
            TypeAnnotation {
                ty: Type::Error,
                span: c.span,
            }
        }
    }

    fn value_type(kind: TokenKind) -> Type {
        match kind {
            TokenKind::Int => Type::Int,
            TokenKind::Real => Type::Real,
            TokenKind::String => Type::String,
            _ => Type::Boolean,
        }
    }

    fn parse_ident(&mut self) -> Ident {
        let c = self.peek();
        let token = if c.kind == TokenKind::Identifier {
            self.advance()
        } else {
            match self.consume(TokenKind::Identifier) {
                Some(token) => token,
                None => {
                    return Ident {
                        name: self.ident_interner.intern(""),
                        span: c.span,
                    }
                }
            }
        };
        let name = self.ident_interner.intern(extract::ident(token, self.src));
        Ident {
            name,
            span: token.span,
        }
    }
}

// Actions.
impl Parser<'_, '_> {
    fn parse_actions(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        while self.peek().kind.starts_action() {
            actions.push(self.parse_action());
        }
        actions
    }

    fn parse_block(&mut self) -> Vec<Action> {
        self.consume(TokenKind::LBrace);
        let actions = self.parse_actions();
        self.consume(TokenKind::RBrace);
        actions
    }

    fn parse_action(&mut self) -> Action {
        let start = self.peek().span;
        let kind = match self.peek().kind {
            TokenKind::Identifier | TokenKind::This => {
                let target = if self.is(TokenKind::This) {
                    self.parse_this()
                } else {
                    self.parse_member()
                };
                let kind = if self.take(TokenKind::Assign) {
                    let value = self.parse_expr();
                    ActionKind::Assign { target, value }
                } else {
                    ActionKind::Reference(target)
                };
                self.consume(TokenKind::Semicolon);
                kind
            }
            TokenKind::While => {
                self.advance();
                let cond = self.parse_cond();
                let body = self.parse_block();
                ActionKind::While { cond, body }
            }
            TokenKind::Foreach => {
                self.advance();
                self.consume(TokenKind::LParen);
                let var = {
                    let id = self.id();
                    let start = self.peek().span;
                    self.consume(TokenKind::Var);
                    let ty = self.parse_type();
                    let name = self.parse_ident();
                    VarDecl {
                        id,
                        ty,
                        name,
                        initializer: None,
                        span: self.span_from(start),
                    }
                };
                self.consume(TokenKind::In);
                let iterable = self.parse_expr();
                self.consume(TokenKind::RParen);
                let body = self.parse_block();
                ActionKind::Foreach {
                    var,
                    iterable,
                    body,
                }
            }
            TokenKind::Break => {
                self.advance();
                self.consume(TokenKind::Semicolon);
                ActionKind::Break
            }
            _ => self.parse_if(),
        };
        Action {
            kind,
            span: self.span_from(start),
        }
    }

    fn parse_if(&mut self) -> ActionKind {
        self.consume(TokenKind::If);
        let cond = self.parse_cond();
        let then = self.parse_block();

        let mut elseifs = Vec::new();
        while self.is(TokenKind::Elseif) {
            let start = self.advance().span;
            let cond = self.parse_cond();
            let body = self.parse_block();
            elseifs.push(ElseIf {
                cond,
                body,
                span: self.span_from(start),
            });
        }

        let otherwise = if self.take(TokenKind::Else) {
            Some(self.parse_block())
        } else {
            None
        };

        ActionKind::If {
            cond,
            then,
            elseifs,
            otherwise,
        }
    }

    /// Parses `'(' expr ')'`.
    fn parse_cond(&mut self) -> Expr {
        self.consume(TokenKind::LParen);
        let cond = self.parse_expr();
        self.consume(TokenKind::RParen);
        cond
    }
}

// Expressions.
impl Parser<'_, '_> {
    fn parse_expr(&mut self) -> Expr {
        if self.peek().kind.starts_expr() {
            self.parse_or()
        } else {
            self.unexpected(Expectation::Expression);
            self.dummy()
        }
    }

    fn parse_or(&mut self) -> Expr {
        let mut lhs = self.parse_and();
        while self.take(TokenKind::Or) {
            let rhs = self.parse_and();
            lhs = self.binary(BinaryOperator::Or, lhs, rhs);
        }
        lhs
    }

    fn parse_and(&mut self) -> Expr {
        let mut lhs = self.parse_not();
        while self.take(TokenKind::And) {
            let rhs = self.parse_not();
            lhs = self.binary(BinaryOperator::And, lhs, rhs);
        }
        lhs
    }

    fn parse_not(&mut self) -> Expr {
        if self.is(TokenKind::Not) {
            let start = self.advance().span;
            let expr = self.parse_not();
            self.unary(UnaryOperator::Not, expr, start)
        } else {
            self.parse_compare()
        }
    }

    fn parse_compare(&mut self) -> Expr {
        let mut lhs = self.parse_additive();
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => BinaryOperator::Eq,
                TokenKind::NotEq => BinaryOperator::Ne,
                TokenKind::Less => BinaryOperator::Lt,
                TokenKind::Greater => BinaryOperator::Gt,
                TokenKind::LessEq => BinaryOperator::Le,
                TokenKind::GreaterEq => BinaryOperator::Ge,
                _ => break lhs,
            };
            self.advance();
            let rhs = self.parse_additive();
            lhs = self.binary(op, lhs, rhs);
        }
    }

    fn parse_additive(&mut self) -> Expr {
        let mut lhs = self.parse_multiplicative();
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Sub,
                _ => break lhs,
            };
            self.advance();
            let rhs = self.parse_multiplicative();
            lhs = self.binary(op, lhs, rhs);
        }
    }

    fn parse_multiplicative(&mut self) -> Expr {
        let mut lhs = self.parse_unary();
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOperator::Mul,
                TokenKind::Slash => BinaryOperator::Div,
                TokenKind::Percent => BinaryOperator::Rem,
                _ => break lhs,
            };
            self.advance();
            let rhs = self.parse_unary();
            lhs = self.binary(op, lhs, rhs);
        }
    }

    fn parse_unary(&mut self) -> Expr {
        let op = match self.peek().kind {
            TokenKind::Plus => UnaryOperator::Plus,
            TokenKind::Minus => UnaryOperator::Neg,
            _ => return self.parse_exponent(),
        };
        let start = self.advance().span;
        let expr = self.parse_unary();
        self.unary(op, expr, start)
    }

    /// Exponents are right-associative.
    fn parse_exponent(&mut self) -> Expr {
        let base = self.parse_primary();
        if self.take(TokenKind::Caret) {
            let exponent = self.parse_exponent();
            self.binary(BinaryOperator::Pow, base, exponent)
        } else {
            base
        }
    }

    fn parse_primary(&mut self) -> Expr {
        let token = self.peek();
        let kind = match token.kind {
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr();
                self.consume(TokenKind::RParen);
                return Expr {
                    span: self.span_from(token.span),
                    ..inner
                };
            }
            TokenKind::IntLiteral => {
                self.advance();
                match extract::int(token, self.src) {
                    Ok(int) => ExprKind::Int(int),
                    Err(_) => {
                        self.error(token.span.wrap(Error::IntOutOfRange));
                        ExprKind::Dummy
                    }
                }
            }
            TokenKind::RealLiteral => {
                self.advance();
                ExprKind::Real(extract::real(token, self.src))
            }
            TokenKind::StringLiteral => {
                self.advance();
                ExprKind::String(extract::string(token, self.src))
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                ExprKind::Bool(token.kind == TokenKind::True)
            }
            TokenKind::Null => {
                self.advance();
                ExprKind::Null
            }
            TokenKind::Identifier => ExprKind::Member(self.parse_member()),
            TokenKind::This => ExprKind::Member(self.parse_this()),
            TokenKind::New => self.parse_instantiation(),
            _ => {
                self.unexpected(Expectation::Primary);
                return self.dummy();
            }
        };
        Expr {
            id: self.id(),
            kind,
            span: self.span_from(token.span),
        }
    }

    fn parse_instantiation(&mut self) -> ExprKind {
        self.advance();
        let c = self.peek();
        let instantiation = match c.kind {
            TokenKind::Int | TokenKind::Real | TokenKind::String | TokenKind::Boolean => {
                self.advance();
                let elem = TypeAnnotation {
                    ty: Self::value_type(c.kind),
                    span: c.span,
                };
                let size = Box::new(self.parse_index());
                Instantiation::Array { elem, size }
            }
            _ => {
                let class = self.parse_ident();
                match self.peek().kind {
                    TokenKind::LBracket => {
                        let elem = TypeAnnotation {
                            ty: Type::Class(class.name),
                            span: class.span,
                        };
                        let size = Box::new(self.parse_index());
                        Instantiation::Array { elem, size }
                    }
                    TokenKind::LParen => {
                        let (args, _) = self.parse_args();
                        Instantiation::Object { class, args }
                    }
                    _ => {
                        self.unexpected(Expectation::InstantiationSuffix);
                        return ExprKind::Dummy;
                    }
                }
            }
        };
        ExprKind::New(instantiation)
    }

    /// Parses `this ('.' member)?`.
    fn parse_this(&mut self) -> Member {
        let start = self.advance().span;
        let member = if self.take(TokenKind::Dot) {
            Some(Box::new(self.parse_member()))
        } else {
            None
        };
        Member {
            id: self.id(),
            kind: MemberKind::This(member),
            span: self.span_from(start),
        }
    }

    /// Parses a member chain such as `a.b(x)[i].c`.
    fn parse_member(&mut self) -> Member {
        let start = self.peek().span;
        let name = self.parse_ident();
        let mut member = self.parse_member_suffix(None, name, start);
        while self.take(TokenKind::Dot) {
            let name = self.parse_ident();
            member = self.parse_member_suffix(Some(member), name, start);
        }
        member
    }

    /// Parses the optional call and index after a name of a member chain.
    fn parse_member_suffix(&mut self, receiver: Option<Member>, name: Ident, start: Span) -> Member {
        if self.is(TokenKind::LParen) {
            let (args, args_span) = self.parse_args();
            let call = Call {
                receiver: receiver.map(Box::new),
                name,
                args,
                args_span,
            };
            let kind = if self.is(TokenKind::LBracket) {
                let index = Box::new(self.parse_index());
                MemberKind::CalledIndexed { call, index }
            } else {
                MemberKind::Called(call)
            };
            return Member {
                id: self.id(),
                kind,
                span: self.span_from(start),
            };
        }

        let kind = match receiver {
            Some(parent) => MemberKind::Dot {
                parent: Box::new(parent),
                name,
            },
            None => MemberKind::Simple(name),
        };
        let member = Member {
            id: self.id(),
            kind,
            span: self.span_from(start),
        };
        if self.is(TokenKind::LBracket) {
            let index = Box::new(self.parse_index());
            Member {
                id: self.id(),
                kind: MemberKind::Indexed {
                    member: Box::new(member),
                    index,
                },
                span: self.span_from(start),
            }
        } else {
            member
        }
    }

    /// Parses `'[' expr ']'`.
    fn parse_index(&mut self) -> Expr {
        self.consume(TokenKind::LBracket);
        let index = self.parse_expr();
        self.consume(TokenKind::RBracket);
        index
    }

    /// Parses `'(' (expr (',' expr)*)? ')'`, returning the arguments and the
    /// span of the whole list.
    fn parse_args(&mut self) -> (Vec<Expr>, Span) {
        let start = self.peek().span;
        self.consume(TokenKind::LParen);
        let mut args = Vec::new();
        if self.peek().kind.starts_expr() {
            loop {
                args.push(self.parse_expr());
                if !self.take(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen);
        (args, self.span_from(start))
    }

    fn binary(&mut self, op: BinaryOperator, lhs: Expr, rhs: Expr) -> Expr {
        let span = lhs.span.to(rhs.span);
        Expr {
            id: self.id(),
            kind: ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span,
        }
    }

    fn unary(&mut self, op: UnaryOperator, expr: Expr, start: Span) -> Expr {
        let span = start.to(expr.span);
        Expr {
            id: self.id(),
            kind: ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
            span,
        }
    }

    /// Returns a placeholder for an expression which failed to parse.
    fn dummy(&mut self) -> Expr {
        let span = Span::new_of_length(self.peek().span.lo, 0, self.unit);
        Expr::dummy(self.id(), span)
    }
}

impl<'src, 'ident> Parser<'src, 'ident> {
    fn new(
        src: &'src str,
        unit: UnitId,
        ident_interner: &'ident mut Interner<str>,
    ) -> Parser<'src, 'ident> {
        let mut lexer = Lexer::new(src, unit);
        let current = lexer.next_token();
        let mut p = Parser {
            src,
            unit,
            lexer,
            ident_interner,
            current,
            prev: Span::new_of_length(0, 0, unit),
            next_node: 0,
            errors: Vec::with_capacity(8),
        };
        p.drain_lexer_errors();
        p
    }

    fn finish<T>(mut self, el: T) -> ParseResult<T> {
        self.drain_lexer_errors();
        if self.errors.is_empty() {
            Ok(el)
        } else {
            Err((el, self.errors))
        }
    }

    /// Allocates the identity of a new node.
    fn id(&mut self) -> NodeId {
        let index = self.next_node;
        self.next_node += 1;
        NodeId {
            unit: self.unit,
            index,
        }
    }

    fn error(&mut self, error: Spanned<Error>) {
        self.errors.push(error);
    }

    /// Records an [`Error::UnexpectedToken`] at the current token, without
    /// advancing.
    fn unexpected(&mut self, expectation: Expectation) {
        let c = self.peek();
        self.error(c.span.wrap(Error::UnexpectedToken {
            actual: c.kind,
            expectation,
        }));
    }

    fn drain_lexer_errors(&mut self) {
        let errors = self.lexer.take_errors();
        self.errors.extend(
            errors
                .into_iter()
                .map(|Spanned { span, inner }| span.wrap(Error::Lexical(inner))),
        );
    }

    /// Returns the current token.
    fn peek(&self) -> Token {
        self.current
    }

    /// Returns the current token and advances.
    fn advance(&mut self) -> Token {
        let c = self.current;
        if !c.is_eof() {
            self.current = self.lexer.next_token();
            self.drain_lexer_errors();
        }
        self.prev = c.span;
        c
    }

    /// Checks whether the current token matches the given one.
    fn is(&self, expect: TokenKind) -> bool {
        self.peek().kind == expect
    }

    /// Advances if the current token matches the provided one, returning true.
    /// If not, returns false and doesn't advance.
    fn take(&mut self, expect: TokenKind) -> bool {
        if self.is(expect) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advances if the current token matches the provided one. If not, records
    /// an error and recovers by discarding tokens until the expected one (which
    /// is then consumed) or the end of file.
    fn consume(&mut self, expect: TokenKind) -> Option<Token> {
        if self.is(expect) {
            return Some(self.advance());
        }
        let c = self.peek();
        self.error(c.span.wrap(Error::ExpectedToken {
            expected: expect,
            actual: c.kind,
        }));
        self.skip_until(&[expect]);
        if self.is(expect) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Discards tokens until one of the provided ones (or the end of file) is
    /// the current one.
    fn skip_until(&mut self, stop: &[TokenKind]) {
        while !self.is(TokenKind::Eof) && !stop.contains(&self.peek().kind) {
            self.advance();
        }
    }

    /// Returns a span from `start` up to the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.to(self.prev)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Lexical(lexer::Error),
    ExpectedToken {
        expected: TokenKind,
        actual: TokenKind,
    },
    UnexpectedToken {
        actual: TokenKind,
        expectation: Expectation,
    },
    InterfaceAfterClass,
    IntOutOfRange,
}

/// What was expected where an unexpected token was found.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Expectation {
    Declaration,
    Expression,
    Primary,
    InstantiationSuffix,
    ReturnType,
    Type,
}


#[cfg(test)]
mod tests {
    use crate::util::test_utils::tree_tests;

    tree_tests!(
        use parser;

        fn test_simple_expression() {
            let expr = "(1 * 2 + 3) - (1 + 2 * 3)";
            let tree_ok = "
                binary Sub (0..25)
                  binary Add (0..11)
                    binary Mul (1..6)
                      int 1 (1..2)
                      int 2 (5..6)
                    int 3 (9..10)
                  binary Add (14..25)
                    int 1 (15..16)
                    binary Mul (19..24)
                      int 2 (19..20)
                      int 3 (23..24)
            ";
        }

        fn test_literals() {
            let expr = "f(1, 2.5, \"s\", true, false, null)";
            let tree_ok = r#"
                member (0..33)
                  call f (0..33)
                    arguments
                      int 1 (2..3)
                      real 2.5 (5..8)
                      string "s" (10..13)
                      bool true (15..19)
                      bool false (21..26)
                      null (28..32)
            "#;
        }

        fn test_boolean_precedence() {
            let expr = "not a == b or c and d";
            let tree_ok = "
                binary Or (0..21)
                  unary Not (0..10)
                    binary Eq (4..10)
                      member (4..5)
                        simple a (4..5)
                      member (9..10)
                        simple b (9..10)
                  binary And (14..21)
                    member (14..15)
                      simple c (14..15)
                    member (20..21)
                      simple d (20..21)
            ";
        }

        fn test_exponent_is_right_associative() {
            let expr = "-2 ^ 3 ^ 4 * 5";
            let tree_ok = "
                binary Mul (0..14)
                  unary Neg (0..10)
                    binary Pow (1..10)
                      int 2 (1..2)
                      binary Pow (5..10)
                        int 3 (5..6)
                        int 4 (9..10)
                  int 5 (13..14)
            ";
        }

        fn test_remainder_and_comparison() {
            let expr = "a % 2 != 0";
            let tree_ok = "
                binary Ne (0..10)
                  binary Rem (0..5)
                    member (0..1)
                      simple a (0..1)
                    int 2 (4..5)
                  int 0 (9..10)
            ";
        }

        fn test_member_chain() {
            let expr = "a.b(x)[i].c";
            let tree_ok = "
                member (0..11)
                  dot c (0..11)
                    called indexed (0..9)
                      call b (0..6)
                        receiver
                          simple a (0..1)
                        arguments
                          member (4..5)
                            simple x (4..5)
                      index
                        member (7..8)
                          simple i (7..8)
            ";
        }

        fn test_indexed_member() {
            let expr = "xs[0].length";
            let tree_ok = "
                member (0..12)
                  dot length (0..12)
                    indexed (0..5)
                      simple xs (0..2)
                      index
                        int 0 (3..4)
            ";
        }

        fn test_this_reference() {
            let expr = "this.count + this";
            let tree_ok = "
                binary Add (0..17)
                  member (0..10)
                    this (0..10)
                      simple count (5..10)
                  member (13..17)
                    this (13..17)
            ";
        }

        fn test_instantiation() {
            let expr = "new int[3] == new Shape[n] or new Circle(1.0)";
            let tree_ok = "
                binary Or (0..45)
                  binary Eq (0..26)
                    new array int (0..10)
                      int 3 (8..9)
                    new array Shape (14..26)
                      member (24..25)
                        simple n (24..25)
                  new object Circle (30..45)
                    arguments
                      real 1 (41..44)
            ";
        }

        fn test_program() {
            let program = "interface I { method int f(int a, C[] b); } class C implements I, J { var real x = 1.5; constructor C() { } method void entry() { return; } }";
            let tree_ok = "
                interface I
                  signature f(a: int, b: C[]) : int
                class C implements I, J
                  field x: real (initialized)
                    real 1.5 (83..86)
                  constructor C()
                  method entry() : void
                    return
            ";
        }

        fn test_method_body() {
            let program = "class A { constructor A(int n) { var int i; i = n; } method int m() { var int[] xs; foreach (var int x in xs) { if (x > 0) { break; } elseif (x < 0) { p(x); } else { } } while (true) { this.i = 1; } return 0; } }";
            let tree_ok = "
                class A
                  constructor A(n: int)
                    local i: int
                    assign (44..50)
                      simple i (44..45)
                      member (48..49)
                        simple n (48..49)
                  method m() : int
                    local xs: int[]
                    foreach x: int (84..169)
                      member (106..108)
                        simple xs (106..108)
                      if (112..167)
                        binary Gt (116..121)
                          member (116..117)
                            simple x (116..117)
                          int 0 (120..121)
                        then
                          break (125..131)
                        elseif (134..158)
                          binary Lt (142..147)
                            member (142..143)
                              simple x (142..143)
                            int 0 (146..147)
                          reference (151..156)
                            call p (151..155)
                              arguments
                                member (153..154)
                                  simple x (153..154)
                        else
                    while (170..198)
                      bool true (177..181)
                      assign (185..196)
                        this (185..191)
                          simple i (190..191)
                        int 1 (194..195)
                    return
                      int 0 (206..207)
            ";
        }

        fn test_empty_program() {
            let program = "  # nothing but a comment";
            let tree_ok = "";
        }

        fn test_error_expected_token() {
            let program = "class A { constructor A() { x = 1 } method void entry() { return; } }";
            let tree_error = "
                class A
                  constructor A()
                    assign (28..65)
                      simple x (28..29)
                      int 1 (32..33)
            ";
            let expected_errors = &["34..35: Expected token of type 'Semicolon'"];
        }

        fn test_error_missing_expression() {
            let expr = "1 + ";
            let tree_error = "
                binary Add (0..4)
                  int 1 (0..1)
                  dummy (4..4)
            ";
            let expected_errors = &[
                "4..4: Unexpected token of type 'Eof'. The token is invalid in the current context",
            ];
        }

        fn test_error_bad_declaration() {
            let program = "var int x; class A { constructor A() {} }";
            let tree_error = "
                class A
                  constructor A()
            ";
            let expected_errors = &[
                "0..3: Unexpected token of type 'Var'. Expected interface, class or EOF",
            ];
        }

        fn test_error_instantiation_suffix() {
            let expr = "new A";
            let tree_error = "dummy (0..5)";
            let expected_errors = &[
                "5..5: Unexpected token of type 'Eof'. Expected leftBracket or leftParen",
            ];
        }

        fn test_error_lexical() {
            let expr = "a ! b";
            let expected_errors = &[
                "2..3: Invalid symbol '!'. Did you forget the '=' symbol in a '!=' compare operator?",
                "2..3: Expected token of type 'Eof'",
            ];
        }

        fn test_error_interface_after_class() {
            let program = "class A { constructor A() {} } interface I { }";
            let expected_errors = &["31..40: Interfaces must be declared before classes"];
        }

        fn test_error_int_out_of_range() {
            let expr = "99999999999999999999";
            let tree_error = "dummy (0..20)";
            let expected_errors = &["0..20: Integer literal is out of range"];
        }
    );

    #[test]
    fn test_parsing_is_deterministic() {
        let src = include_str!("../demos/shapes.des");
        let parse = || {
            let mut interner = crate::util::intern::Interner::with_capacity(64);
            super::parse_program(src, crate::source::UnitId::new(0), &mut interner)
        };
        let first = parse();
        assert!(first.is_ok());
        assert_eq!(first, parse());
    }
}
