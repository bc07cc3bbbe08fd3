// program ::= interface+ class* EOF | class+ EOF | EOF
// interface ::= interface ID '{' (method returnType ID '(' [params] ')' ';')* '}'
// class ::= class ID [implements ID (',' ID)*] '{' varDecl* constructor method* '}'
// varDecl ::= var type ID ['=' expr] ';'
// constructor ::= constructor ID '(' [params] ')' '{' varDecl* action* '}'
// method ::= method returnType ID '(' [params] ')' '{' varDecl* action* [return [expr] ';'] '}'
// params ::= type ID (',' type ID)*
// type ::= (ID | int | real | string | boolean) ['[' ']']
// returnType ::= type | void
// action ::= member ['=' expr] ';'
//          | this ['.' member] ['=' expr] ';'
//          | if '(' expr ')' block (elseif '(' expr ')' block)* [else block]
//          | while '(' expr ')' block
//          | foreach '(' var type ID in expr ')' block
//          | break ';'
// block ::= '{' action* '}'
// member ::= ID [call [index] | index] ('.' ID [call [index] | index])*
// call ::= '(' [expr (',' expr)*] ')'
// index ::= '[' expr ']'
// expr ::= expr or expr | expr and expr | not expr
//        | expr ('==' | '!=' | '<' | '>' | '<=' | '>=') expr
//        | expr ('+' | '-') expr
//        | expr ('*' | '/' | '%') expr
//        | ('+' | '-') expr
//        | expr '^' expr
//        | '(' expr ')' | literal | member | this ['.' member]
//        | new (int | real | string | boolean | ID) '[' expr ']'
//        | new ID call

// Precedence (lowest first)
//
// or
// and
// not
// == != < > <= >=
// + -
// * / %
// unary + -
// ^ (right-associative)

use crate::{source::UnitId, token::Span, types::Type, util::intern::Interned};

/// The identity of a node, stable across runs over the same input. Used to
/// key the checker's decorations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub unit: UnitId,
    pub index: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: Interned<str>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeAnnotation {
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub struct Program {
    pub unit: UnitId,
    pub interfaces: Vec<Interface>,
    pub classes: Vec<Class>,
}

impl Program {
    pub fn dummy(unit: UnitId) -> Program {
        Program {
            unit,
            interfaces: Vec::new(),
            classes: Vec::new(),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Interface {
    pub id: NodeId,
    pub name: Ident,
    pub methods: Vec<MethodSignature>,
    pub span: Span,
}

/// A method declared by an interface.
#[derive(Debug, PartialEq)]
pub struct MethodSignature {
    pub id: NodeId,
    pub return_ty: TypeAnnotation,
    pub name: Ident,
    pub params: Vec<Param>,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub struct Class {
    pub id: NodeId,
    pub name: Ident,
    pub implements: Vec<Ident>,
    pub fields: Vec<VarDecl>,
    pub constructor: Constructor,
    pub methods: Vec<Method>,
    pub span: Span,
}

/// A field, a local or a foreach loop variable.
#[derive(Debug, PartialEq)]
pub struct VarDecl {
    pub id: NodeId,
    pub ty: TypeAnnotation,
    pub name: Ident,
    pub initializer: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub struct Param {
    pub id: NodeId,
    pub ty: TypeAnnotation,
    pub name: Ident,
}

/// Constructors can't return, hence there's no return position at all.
#[derive(Debug, PartialEq)]
pub struct Constructor {
    pub id: NodeId,
    pub name: Ident,
    pub params: Vec<Param>,
    pub locals: Vec<VarDecl>,
    pub body: Vec<Action>,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub struct Method {
    pub id: NodeId,
    pub return_ty: TypeAnnotation,
    pub name: Ident,
    pub params: Vec<Param>,
    pub locals: Vec<VarDecl>,
    pub body: Vec<Action>,
    /// The trailing return, if any. Returns can't appear anywhere else.
    pub ret: Option<Return>,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub struct Return {
    pub expr: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub enum ActionKind {
    Assign {
        target: Member,
        value: Expr,
    },
    /// A member used as a statement (usually a call).
    Reference(Member),
    If {
        cond: Expr,
        then: Vec<Action>,
        elseifs: Vec<ElseIf>,
        otherwise: Option<Vec<Action>>,
    },
    While {
        cond: Expr,
        body: Vec<Action>,
    },
    Foreach {
        var: VarDecl,
        iterable: Expr,
        body: Vec<Action>,
    },
    Break,
}

#[derive(Debug, PartialEq)]
pub struct ElseIf {
    pub cond: Expr,
    pub body: Vec<Action>,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn dummy(id: NodeId, span: Span) -> Expr {
        Expr {
            id,
            kind: ExprKind::Dummy,
            span,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ExprKind {
    Binary {
        op: BinaryOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
    Int(i64),
    Real(f64),
    String(Box<str>),
    Bool(bool),
    Null,
    Member(Member),
    New(Instantiation),
    /// Stands for an expression which failed to parse.
    Dummy,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Or => "or",
            And => "and",
            Eq => "==",
            Ne => "!=",
            Lt => "<",
            Gt => ">",
            Le => "<=",
            Ge => ">=",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Rem => "%",
            Pow => "^",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Neg,
    Not,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Neg => "-",
            UnaryOperator::Not => "not",
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Instantiation {
    /// `new T[size]`. The element type is never an array itself.
    Array {
        elem: TypeAnnotation,
        size: Box<Expr>,
    },
    /// `new C(args)`.
    Object { class: Ident, args: Vec<Expr> },
}

#[derive(Debug, PartialEq)]
pub struct Member {
    pub id: NodeId,
    pub kind: MemberKind,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub enum MemberKind {
    Simple(Ident),
    /// `parent.name`
    Dot { parent: Box<Member>, name: Ident },
    /// `member[index]`, where `member` is simple or dotted.
    Indexed { member: Box<Member>, index: Box<Expr> },
    Called(Call),
    /// `call[index]`
    CalledIndexed { call: Call, index: Box<Expr> },
    /// `this`, or `this.member`.
    This(Option<Box<Member>>),
}

/// A method call. The callee is always a name, optionally qualified by a
/// receiver (`receiver.name(args)`).
#[derive(Debug, PartialEq)]
pub struct Call {
    pub receiver: Option<Box<Member>>,
    pub name: Ident,
    pub args: Vec<Expr>,
    /// Spans the parenthesized argument list.
    pub args_span: Span,
}

impl Member {
    /// Returns the root identifier of this member chain, looking through
    /// `this`. Returns `None` for a bare `this`.
    pub fn root(&self) -> Option<Ident> {
        match &self.kind {
            MemberKind::Simple(ident) => Some(*ident),
            MemberKind::Dot { parent, .. } => parent.root(),
            MemberKind::Indexed { member, .. } => member.root(),
            MemberKind::Called(call) | MemberKind::CalledIndexed { call, .. } => {
                match &call.receiver {
                    Some(receiver) => receiver.root(),
                    None => Some(call.name),
                }
            }
            MemberKind::This(member) => member.as_ref().and_then(|m| m.root()),
        }
    }
}
