use std::io::Write;

use crate::{
    ast::*,
    token::Span,
    type_checker::Decorations,
    util::{
        fmt::{Context, Show},
        intern::Interner,
    },
};

const INDENT_WIDTH: usize = 2;

/// Prints the tree of `program`. If `decorations` are provided, the type of
/// each expression and member is printed next to its span.
pub fn print_program_string(
    idents: &Interner<str>,
    decorations: Option<&Decorations>,
    program: &Program,
) -> String {
    let mut buf = Vec::with_capacity(1024);
    Printer::new(&mut buf, idents, decorations)
        .program(program)
        .expect("writing to a vec never fails");
    String::from_utf8(buf).expect("tree is always utf-8")
}

pub fn print_expr_string(idents: &Interner<str>, expr: &Expr) -> String {
    let mut buf = Vec::with_capacity(512);
    Printer::new(&mut buf, idents, None)
        .expr(0, expr)
        .expect("writing to a vec never fails");
    String::from_utf8(buf).expect("tree is always utf-8")
}

pub struct Printer<'a, W> {
    w: &'a mut W,
    ctx: Context<'a>,
    decorations: Option<&'a Decorations>,
}

type Result = std::io::Result<()>;

impl<'a, W: Write> Printer<'a, W> {
    pub fn new(
        w: &'a mut W,
        idents: &'a Interner<str>,
        decorations: Option<&'a Decorations>,
    ) -> Printer<'a, W> {
        Printer {
            w,
            ctx: Context::new(idents),
            decorations,
        }
    }

    pub fn program(&mut self, program: &Program) -> Result {
        for interface in &program.interfaces {
            self.interface(0, interface)?;
        }
        for class in &program.classes {
            self.class(0, class)?;
        }
        Ok(())
    }

    fn interface(&mut self, i: usize, interface: &Interface) -> Result {
        self.sp(i)?;
        writeln!(self.w, "interface {}", self.name(interface.name))?;
        for signature in &interface.methods {
            self.sp(i + 1)?;
            write!(self.w, "signature {}", self.name(signature.name))?;
            self.params(&signature.params)?;
            writeln!(self.w, " : {}", signature.return_ty.ty.display(&self.ctx))?;
        }
        Ok(())
    }

    fn class(&mut self, i: usize, class: &Class) -> Result {
        self.sp(i)?;
        write!(self.w, "class {}", self.name(class.name))?;
        for (idx, interface) in class.implements.iter().enumerate() {
            let sep = if idx == 0 { " implements " } else { ", " };
            write!(self.w, "{sep}{}", self.name(*interface))?;
        }
        writeln!(self.w)?;

        for field in &class.fields {
            self.var_decl(i + 1, "field", field)?;
        }

        let constructor = &class.constructor;
        self.sp(i + 1)?;
        write!(self.w, "constructor {}", self.name(constructor.name))?;
        self.params(&constructor.params)?;
        writeln!(self.w)?;
        for local in &constructor.locals {
            self.var_decl(i + 2, "local", local)?;
        }
        self.actions(i + 2, &constructor.body)?;

        for method in &class.methods {
            self.sp(i + 1)?;
            write!(self.w, "method {}", self.name(method.name))?;
            self.params(&method.params)?;
            writeln!(self.w, " : {}", method.return_ty.ty.display(&self.ctx))?;
            for local in &method.locals {
                self.var_decl(i + 2, "local", local)?;
            }
            self.actions(i + 2, &method.body)?;
            if let Some(ret) = &method.ret {
                self.sp(i + 2)?;
                writeln!(self.w, "return")?;
                if let Some(expr) = &ret.expr {
                    self.expr(i + 3, expr)?;
                }
            }
        }
        Ok(())
    }

    fn params(&mut self, params: &[Param]) -> Result {
        write!(self.w, "(")?;
        for (idx, param) in params.iter().enumerate() {
            if idx > 0 {
                write!(self.w, ", ")?;
            }
            write!(
                self.w,
                "{}: {}",
                self.name(param.name),
                param.ty.ty.display(&self.ctx)
            )?;
        }
        write!(self.w, ")")
    }

    fn var_decl(&mut self, i: usize, label: &str, decl: &VarDecl) -> Result {
        self.sp(i)?;
        write!(
            self.w,
            "{label} {}: {}",
            self.name(decl.name),
            decl.ty.ty.display(&self.ctx)
        )?;
        if let Some(initializer) = &decl.initializer {
            writeln!(self.w, " (initialized)")?;
            self.expr(i + 1, initializer)?;
        } else {
            writeln!(self.w)?;
        }
        Ok(())
    }

    fn actions(&mut self, i: usize, actions: &[Action]) -> Result {
        for action in actions {
            self.action(i, action)?;
        }
        Ok(())
    }

    fn action(&mut self, i: usize, action: &Action) -> Result {
        self.sp(i)?;
        let span = action.span;
        match &action.kind {
            ActionKind::Assign { target, value } => {
                writeln!(self.w, "assign ({span})")?;
                self.member(i + 1, target)?;
                self.expr(i + 1, value)?;
            }
            ActionKind::Reference(member) => {
                writeln!(self.w, "reference ({span})")?;
                self.member(i + 1, member)?;
            }
            ActionKind::If {
                cond,
                then,
                elseifs,
                otherwise,
            } => {
                writeln!(self.w, "if ({span})")?;
                self.expr(i + 1, cond)?;
                self.sp(i + 1)?;
                writeln!(self.w, "then")?;
                self.actions(i + 2, then)?;
                for elseif in elseifs {
                    self.sp(i + 1)?;
                    writeln!(self.w, "elseif ({})", elseif.span)?;
                    self.expr(i + 2, &elseif.cond)?;
                    self.actions(i + 2, &elseif.body)?;
                }
                if let Some(otherwise) = otherwise {
                    self.sp(i + 1)?;
                    writeln!(self.w, "else")?;
                    self.actions(i + 2, otherwise)?;
                }
            }
            ActionKind::While { cond, body } => {
                writeln!(self.w, "while ({span})")?;
                self.expr(i + 1, cond)?;
                self.actions(i + 1, body)?;
            }
            ActionKind::Foreach {
                var,
                iterable,
                body,
            } => {
                writeln!(
                    self.w,
                    "foreach {}: {} ({span})",
                    self.name(var.name),
                    var.ty.ty.display(&self.ctx)
                )?;
                self.expr(i + 1, iterable)?;
                self.actions(i + 1, body)?;
            }
            ActionKind::Break => writeln!(self.w, "break ({span})")?,
        }
        Ok(())
    }

    pub fn expr(&mut self, i: usize, expr: &Expr) -> Result {
        self.sp(i)?;
        let info = self.info(expr.id);
        let span = expr.span;
        match &expr.kind {
            ExprKind::Binary { op, lhs, rhs } => {
                writeln!(self.w, "binary {op:?} ({span}{info})")?;
                self.expr(i + 1, lhs)?;
                self.expr(i + 1, rhs)?;
            }
            ExprKind::Unary { op, expr: inner } => {
                writeln!(self.w, "unary {op:?} ({span}{info})")?;
                self.expr(i + 1, inner)?;
            }
            ExprKind::Int(val) => writeln!(self.w, "int {val} ({span}{info})")?,
            ExprKind::Real(val) => writeln!(self.w, "real {val} ({span}{info})")?,
            ExprKind::String(val) => writeln!(self.w, "string {val:?} ({span}{info})")?,
            ExprKind::Bool(val) => writeln!(self.w, "bool {val} ({span}{info})")?,
            ExprKind::Null => writeln!(self.w, "null ({span}{info})")?,
            ExprKind::Member(member) => {
                writeln!(self.w, "member ({span}{info})")?;
                self.member(i + 1, member)?;
            }
            ExprKind::New(Instantiation::Array { elem, size }) => {
                let elem = elem.ty.display(&self.ctx);
                writeln!(self.w, "new array {elem} ({span}{info})")?;
                self.expr(i + 1, size)?;
            }
            ExprKind::New(Instantiation::Object { class, args }) => {
                writeln!(self.w, "new object {} ({span}{info})", self.name(*class))?;
                self.args(i + 1, args)?;
            }
            ExprKind::Dummy => writeln!(self.w, "dummy ({span}{info})")?,
        }
        Ok(())
    }

    fn member(&mut self, i: usize, member: &Member) -> Result {
        self.sp(i)?;
        let info = self.info(member.id);
        let span = member.span;
        match &member.kind {
            MemberKind::Simple(name) => {
                writeln!(self.w, "simple {} ({span}{info})", self.name(*name))?;
            }
            MemberKind::Dot { parent, name } => {
                writeln!(self.w, "dot {} ({span}{info})", self.name(*name))?;
                self.member(i + 1, parent)?;
            }
            MemberKind::Indexed { member, index } => {
                writeln!(self.w, "indexed ({span}{info})")?;
                self.member(i + 1, member)?;
                self.index(i + 1, index)?;
            }
            MemberKind::Called(call) => {
                self.call(i, call, span, &info)?;
            }
            MemberKind::CalledIndexed { call, index } => {
                writeln!(self.w, "called indexed ({span}{info})")?;
                let call_span = Span::new_of_length(span.lo, 0, span.unit).to(call.args_span);
                self.sp(i + 1)?;
                self.call(i + 1, call, call_span, "")?;
                self.index(i + 1, index)?;
            }
            MemberKind::This(member) => {
                writeln!(self.w, "this ({span}{info})")?;
                if let Some(member) = member {
                    self.member(i + 1, member)?;
                }
            }
        }
        Ok(())
    }

    /// Expects the indentation of the first line to be already written.
    fn call(&mut self, i: usize, call: &Call, span: Span, info: &str) -> Result {
        writeln!(self.w, "call {} ({span}{info})", self.name(call.name))?;
        if let Some(receiver) = &call.receiver {
            self.sp(i + 1)?;
            writeln!(self.w, "receiver")?;
            self.member(i + 2, receiver)?;
        }
        self.args(i + 1, &call.args)
    }

    fn args(&mut self, i: usize, args: &[Expr]) -> Result {
        if !args.is_empty() {
            self.sp(i)?;
            writeln!(self.w, "arguments")?;
            for arg in args {
                self.expr(i + 1, arg)?;
            }
        }
        Ok(())
    }

    fn index(&mut self, i: usize, index: &Expr) -> Result {
        self.sp(i)?;
        writeln!(self.w, "index")?;
        self.expr(i + 1, index)
    }

    fn info(&self, id: NodeId) -> String {
        self.decorations
            .and_then(|decorations| decorations.get(id))
            .map(|decoration| format!(" %: {}", decoration.ty.display(&self.ctx)))
            .unwrap_or_default()
    }

    fn name(&self, ident: Ident) -> &'a str {
        self.ctx.ident_interner.get(ident.name)
    }

    fn sp(&mut self, i: usize) -> Result {
        write!(self.w, "{:width$}", "", width = i * INDENT_WIDTH)
    }
}
