use std::collections::{HashMap, HashSet};

use crate::{
    ast::*,
    symbol_table::{ClassScope, Origin, Scope, Signature, Symbol, SymbolKind, SymbolTable},
    token::{Span, Spanned},
    types::Type,
    util::intern::Interned,
};

/// What the checker learned about an expression or a member.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoration {
    pub ty: Type,
    /// Whether the node denotes a storage location (and may be assigned to).
    pub is_variable: bool,
    pub is_initialized: bool,
    /// The declaration a member resolved to.
    pub resolved: Option<Origin>,
}

impl Decoration {
    fn value(ty: Type) -> Decoration {
        Decoration {
            ty,
            is_variable: false,
            is_initialized: true,
            resolved: None,
        }
    }

    fn error() -> Decoration {
        Decoration::value(Type::Error)
    }
}

/// The checker output, keyed by node identity.
#[derive(Debug, Default, PartialEq)]
pub struct Decorations {
    nodes: HashMap<NodeId, Decoration>,
    initialized: HashSet<NodeId>,
}

impl Decorations {
    pub fn get(&self, id: NodeId) -> Option<&Decoration> {
        self.nodes.get(&id)
    }

    /// Whether the variable declared at `decl` was assigned at some point.
    pub fn is_initialized(&self, decl: NodeId) -> bool {
        self.initialized.contains(&decl)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub struct Checker<'t> {
    table: &'t SymbolTable,
    decorations: Decorations,
    errors: Vec<Spanned<Error>>,
}

/// The context an action is checked in.
#[derive(Copy, Clone)]
struct Frame<'t> {
    scope: Scope<'t>,
    loop_depth: u32,
}

impl Frame<'_> {
    fn is_class_level(&self) -> bool {
        self.scope.method.is_none()
    }
}

/// Where the next name of a member chain is looked up.
#[derive(Copy, Clone)]
enum Lookup<'t> {
    /// The caller's scopes, innermost first.
    Scope(Scope<'t>),
    /// Only the members of a class, after a dot or `this.`.
    Class(&'t ClassScope),
}

impl<'t> Lookup<'t> {
    fn resolve(self, table: &'t SymbolTable, name: Interned<str>) -> Option<&'t Symbol> {
        match self {
            Lookup::Scope(scope) => scope.lookup(table, name),
            Lookup::Class(class) => class.lookup_own(name),
        }
    }
}

impl<'t> Checker<'t> {
    pub fn new(table: &'t SymbolTable) -> Checker<'t> {
        Checker {
            table,
            decorations: Decorations::default(),
            errors: Vec::with_capacity(16),
        }
    }

    /// Checks every unit against the table. Results depend only on the units
    /// and the table, so checking the same input twice yields the same output.
    pub fn check(
        mut self,
        units: &[Program],
    ) -> Result<Decorations, (Decorations, Vec<Spanned<Error>>)> {
        for unit in units {
            for interface in &unit.interfaces {
                self.check_interface(interface);
            }
            for class in &unit.classes {
                self.check_class(class);
            }
        }

        log::debug!(
            "decorated {} nodes with {} errors",
            self.decorations.len(),
            self.errors.len()
        );

        if self.errors.is_empty() {
            Ok(self.decorations)
        } else {
            Err((self.decorations, self.errors))
        }
    }

    /// Returns the scope registered for `name`, unless it belongs to another
    /// declaration (the one at `decl` was a rejected duplicate).
    fn own_scope(&self, name: Interned<str>, decl: NodeId) -> Option<&'t ClassScope> {
        self.table.get(name).filter(|scope| scope.decl == decl)
    }

    fn check_interface(&mut self, interface: &Interface) {
        if self.own_scope(interface.name.name, interface.id).is_none() {
            return;
        }
        for signature in &interface.methods {
            self.check_return_type(signature.name, &signature.return_ty);
            self.check_params(&signature.params);
        }
    }

    fn check_class(&mut self, class: &Class) {
        let Some(scope) = self.own_scope(class.name.name, class.id) else {
            return;
        };

        for (i, interface) in class.implements.iter().enumerate() {
            let repeated = class.implements[..i].iter().any(|p| p.name == interface.name);
            if !repeated {
                self.check_conformance(class, scope, *interface);
            }
        }

        let class_level = Frame {
            scope: Scope::class_level(scope),
            loop_depth: 0,
        };
        for field in &class.fields {
            self.check_var_decl(class_level, field);
        }

        let constructor = &class.constructor;
        if constructor.name.name != class.name.name {
            self.error(constructor.name.span, Error::ConstructorName);
        }
        self.check_params(&constructor.params);
        if let Some(frame) = method_frame(scope, constructor.id) {
            for local in &constructor.locals {
                self.check_var_decl(frame, local);
            }
            self.check_actions(frame, &constructor.body);
        }

        for method in &class.methods {
            self.check_method(scope, method);
        }
    }

    fn check_conformance(&mut self, class: &Class, scope: &ClassScope, interface: Ident) {
        let Some(required) = self.table.get(interface.name) else {
            self.error(interface.span, Error::NotDeclared(interface.name));
            return;
        };
        if !required.is_interface() {
            self.error(interface.span, Error::NotAnInterface(interface.name));
            return;
        }

        let mut methods: Vec<_> = required
            .symbols()
            .filter_map(|symbol| match &symbol.kind {
                SymbolKind::Method(signature) => Some((symbol, signature)),
                _ => None,
            })
            .collect();
        methods.sort_by_key(|(symbol, _)| declaration_order(symbol));

        for (symbol, signature) in methods {
            let implemented = match scope.lookup_own(symbol.name).map(|s| &s.kind) {
                Some(SymbolKind::Method(own)) => own == signature,
                _ => false,
            };
            if !implemented {
                self.error(
                    class.name.span,
                    Error::MissingInterfaceMethod {
                        method: symbol.name,
                        interface: interface.name,
                    },
                );
            }
        }
    }

    fn check_method(&mut self, scope: &'t ClassScope, method: &Method) {
        let declared = self.check_return_type(method.name, &method.return_ty);
        self.check_params(&method.params);
        let Some(frame) = method_frame(scope, method.id) else {
            return;
        };
        for local in &method.locals {
            self.check_var_decl(frame, local);
        }
        self.check_actions(frame, &method.body);

        match &method.ret {
            None if declared == Type::Void || declared.is_error() => {}
            None => self.error(method.name.span, Error::MissingReturn(declared)),
            Some(Return { expr: None, span }) => {
                if declared != Type::Void && !declared.is_error() {
                    self.error(*span, Error::MissingReturn(declared));
                }
            }
            Some(Return {
                expr: Some(expr),
                span,
            }) => {
                let value = self.read_expr(frame, expr);
                if declared == Type::Void {
                    self.error(*span, Error::ReturnInVoid);
                } else if !value.is_error() && !declared.is_error() {
                    if matches!(value, Type::Method(_)) {
                        self.error(expr.span, Error::ReturnMethod);
                    } else if !self.assignable(&declared, &value) {
                        self.error(
                            expr.span,
                            Error::ReturnMismatch {
                                value,
                                expected: declared,
                            },
                        );
                    }
                }
            }
        }
    }

    /// Returns the effective return type.
    fn check_return_type(&mut self, name: Ident, ret: &TypeAnnotation) -> Type {
        if !self.is_declared(&ret.ty) {
            let ty = ret.ty.clone();
            self.error(ret.span, Error::UndeclaredReturnType { name: name.name, ty });
        }
        self.effective(&ret.ty)
    }

    fn check_params(&mut self, params: &[Param]) {
        for param in params {
            if !self.is_declared(&param.ty.ty) {
                let ty = param.ty.ty.clone();
                self.error(
                    param.ty.span,
                    Error::UndeclaredParamType {
                        name: param.name.name,
                        ty,
                    },
                );
            }
        }
    }

    fn check_var_decl(&mut self, frame: Frame<'t>, decl: &VarDecl) {
        let declared = self.is_declared(&decl.ty.ty);
        if !declared {
            let ty = decl.ty.ty.clone();
            self.error(
                decl.ty.span,
                Error::UndeclaredVarType {
                    name: decl.name.name,
                    ty,
                },
            );
        }
        let Some(initializer) = &decl.initializer else {
            return;
        };

        let value = self.read_expr(frame, initializer);
        if frame.is_class_level() {
            self.check_class_level(initializer);
        }
        if declared && !value.is_error() && !self.assignable(&decl.ty.ty, &value) {
            self.error(
                initializer.span,
                Error::IllegalAssignment {
                    value,
                    target: decl.ty.ty.clone(),
                },
            );
        }
        // Even an ill-typed initializer counts, since its error was reported.
        self.decorations.initialized.insert(decl.id);
    }

    /// Field initializers run before the instance exists, so they may only
    /// use literals, operators, array instantiation and standard library calls.
    fn check_class_level(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Binary { lhs, rhs, .. } => {
                self.check_class_level(lhs);
                self.check_class_level(rhs);
            }
            ExprKind::Unary { expr, .. } => self.check_class_level(expr),
            ExprKind::New(Instantiation::Array { size, .. }) => self.check_class_level(size),
            ExprKind::New(Instantiation::Object { .. }) => {
                self.error(expr.span, Error::IllegalClassLevelAssignment);
            }
            ExprKind::Member(member) => self.check_class_level_member(member),
            ExprKind::Int(_)
            | ExprKind::Real(_)
            | ExprKind::String(_)
            | ExprKind::Bool(_)
            | ExprKind::Null
            | ExprKind::Dummy => {}
        }
    }

    fn check_class_level_member(&mut self, member: &Member) {
        let call = match &member.kind {
            MemberKind::Called(call) => Some((call, None)),
            MemberKind::CalledIndexed { call, index } => Some((call, Some(index))),
            // Already rejected.
            MemberKind::This(_) => return,
            _ => None,
        };
        let Some(decoration) = self.decorations.get(member.id) else {
            return;
        };
        // An ill-typed member was already reported.
        if decoration.ty.is_error() {
            return;
        }
        let resolved = decoration.resolved;

        match call {
            Some((call, index)) if call.receiver.is_none() && resolved == Some(Origin::Stdlib) => {
                for arg in &call.args {
                    self.check_class_level(arg);
                }
                if let Some(index) = index {
                    self.check_class_level(index);
                }
            }
            _ => {
                if let Some(root) = member.root() {
                    self.error(member.span, Error::ClassLevelReference(root.name));
                }
            }
        }
    }

    fn check_actions(&mut self, frame: Frame<'t>, actions: &[Action]) {
        for action in actions {
            self.check_action(frame, action);
        }
    }

    fn check_action(&mut self, frame: Frame<'t>, action: &Action) {
        match &action.kind {
            ActionKind::Assign { target, value } => self.check_assign(frame, target, value),
            ActionKind::Reference(member) => {
                self.member(frame, Lookup::Scope(frame.scope), member);
            }
            ActionKind::If {
                cond,
                then,
                elseifs,
                otherwise,
            } => {
                self.check_cond(frame, cond);
                self.check_actions(frame, then);
                for elseif in elseifs {
                    self.check_cond(frame, &elseif.cond);
                    self.check_actions(frame, &elseif.body);
                }
                if let Some(otherwise) = otherwise {
                    self.check_actions(frame, otherwise);
                }
            }
            ActionKind::While { cond, body } => {
                self.check_cond(frame, cond);
                let inner = Frame {
                    loop_depth: frame.loop_depth + 1,
                    ..frame
                };
                self.check_actions(inner, body);
            }
            ActionKind::Foreach {
                var,
                iterable,
                body,
            } => {
                self.check_foreach(frame, var, iterable);
                let inner = Frame {
                    loop_depth: frame.loop_depth + 1,
                    ..frame
                };
                self.check_actions(inner, body);
            }
            ActionKind::Break => {
                if frame.loop_depth == 0 {
                    self.error(action.span, Error::BreakOutsideLoop);
                }
            }
        }
    }

    fn check_assign(&mut self, frame: Frame<'t>, target: &Member, value: &Expr) {
        let lhs = self.member(frame, Lookup::Scope(frame.scope), target);
        let rhs = self.read_expr(frame, value);

        if lhs.ty.is_error() {
            return;
        }
        if !lhs.is_variable {
            let name = target.root().map(|root| root.name);
            self.error(target.span, Error::NotAssignable(name));
            return;
        }
        if rhs.is_error() {
            return;
        }
        if !self.assignable(&lhs.ty, &rhs) {
            self.error(
                value.span,
                Error::IllegalAssignment {
                    value: rhs,
                    target: lhs.ty,
                },
            );
            return;
        }

        if let Some(decl) = assigned_decl(target).and_then(|m| self.resolved_decl(m)) {
            self.decorations.initialized.insert(decl);
        }
        if let Some(decoration) = self.decorations.nodes.get_mut(&target.id) {
            decoration.is_initialized = true;
        }
    }

    fn check_cond(&mut self, frame: Frame<'t>, cond: &Expr) {
        let ty = self.read_expr(frame, cond);
        if !ty.is_error() && ty != Type::Boolean {
            self.error(cond.span, Error::NonBooleanCondition);
        }
    }

    fn check_foreach(&mut self, frame: Frame<'t>, var: &VarDecl, iterable: &Expr) {
        let iterable_ty = self.read_expr(frame, iterable);

        let name = var.name.name;
        // Every loop variable is entered into its method scope by the table
        // builder, so the lookup only fails if that scope wasn't built.
        let Some(symbol) = frame.scope.lookup(self.table, name) else {
            return;
        };
        let var_ty = match &symbol.kind {
            SymbolKind::Variable { ty, .. } => ty,
            SymbolKind::Parameter { .. } => {
                self.error(var.name.span, Error::LoopVarIsParameter(name));
                return;
            }
            SymbolKind::Method(_) | SymbolKind::Constructor(_) => {
                self.error(var.name.span, Error::NotAVariable(name));
                return;
            }
        };
        if !self.is_declared(&var.ty.ty) {
            let ty = var.ty.ty.clone();
            self.error(var.ty.span, Error::UndeclaredVarType { name, ty });
            return;
        }

        match iterable_ty {
            Type::Error => {}
            Type::Array(elem) => {
                if elem.equivalent(var_ty) {
                    if let Origin::User(decl) = symbol.origin {
                        self.decorations.initialized.insert(decl);
                    }
                } else {
                    self.error(var.name.span, Error::LoopVarMismatch(name));
                }
            }
            ty => self.error(iterable.span, Error::NonArrayLoop(ty)),
        }
    }

    /// Checks an expression whose value is read, reporting reads of unassigned
    /// variables.
    fn read_expr(&mut self, frame: Frame<'t>, expr: &Expr) -> Type {
        let decoration = self.expr(frame, expr);
        // At class level every such member is rejected as a class level reference.
        if !decoration.is_initialized && !frame.is_class_level() {
            if let ExprKind::Member(member) = &expr.kind {
                self.unassigned(member);
                return Type::Error;
            }
        }
        decoration.ty
    }

    fn expr(&mut self, frame: Frame<'t>, expr: &Expr) -> Decoration {
        let decoration = match &expr.kind {
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.read_expr(frame, lhs);
                let rhs = self.read_expr(frame, rhs);
                Decoration::value(self.binary(expr.span, *op, lhs, rhs))
            }
            ExprKind::Unary { op, expr: operand } => {
                let ty = self.read_expr(frame, operand);
                Decoration::value(self.unary(expr.span, *op, ty))
            }
            ExprKind::Int(_) => Decoration::value(Type::Int),
            ExprKind::Real(_) => Decoration::value(Type::Real),
            ExprKind::String(_) => Decoration::value(Type::String),
            ExprKind::Bool(_) => Decoration::value(Type::Boolean),
            ExprKind::Null => Decoration::value(Type::Null),
            ExprKind::Member(member) => self.member(frame, Lookup::Scope(frame.scope), member),
            ExprKind::New(instantiation) => {
                Decoration::value(self.instantiation(frame, expr.span, instantiation))
            }
            ExprKind::Dummy => Decoration::error(),
        };
        self.decorations.nodes.insert(expr.id, decoration.clone());
        decoration
    }

    fn binary(&mut self, span: Span, op: BinaryOperator, lhs: Type, rhs: Type) -> Type {
        use BinaryOperator::*;
        if lhs.is_error() || rhs.is_error() {
            return Type::Error;
        }
        let numeric = lhs.is_numeric() && rhs.is_numeric();
        let ty = match op {
            Add | Sub | Mul | Div | Rem if numeric => {
                if lhs == Type::Int && rhs == Type::Int {
                    Some(Type::Int)
                } else {
                    Some(Type::Real)
                }
            }
            Pow if numeric => Some(Type::Real),
            Lt | Gt | Le | Ge if numeric => Some(Type::Boolean),
            Eq | Ne => match (&lhs, &rhs) {
                _ if numeric => Some(Type::Boolean),
                (Type::Boolean, Type::Boolean) | (Type::String, Type::String) => {
                    Some(Type::Boolean)
                }
                _ => None,
            },
            And | Or if lhs == Type::Boolean && rhs == Type::Boolean => Some(Type::Boolean),
            _ => None,
        };
        ty.unwrap_or_else(|| {
            self.error(
                span,
                Error::IncompatibleOperands {
                    op: op.symbol(),
                    lhs,
                    rhs,
                },
            );
            Type::Error
        })
    }

    fn unary(&mut self, span: Span, op: UnaryOperator, ty: Type) -> Type {
        let valid = match op {
            _ if ty.is_error() => return Type::Error,
            UnaryOperator::Plus | UnaryOperator::Neg => ty.is_numeric(),
            UnaryOperator::Not => ty == Type::Boolean,
        };
        if valid {
            ty
        } else {
            self.error(
                span,
                Error::InvalidOperand {
                    op: op.symbol(),
                    ty,
                },
            );
            Type::Error
        }
    }

    fn instantiation(&mut self, frame: Frame<'t>, span: Span, new: &Instantiation) -> Type {
        match new {
            Instantiation::Array { elem, size } => {
                let size_ty = self.read_expr(frame, size);
                if !self.is_declared(&elem.ty) {
                    let ty = elem.ty.clone();
                    self.error(elem.span, Error::InstantiateUndeclaredArray(ty));
                    return Type::Error;
                }
                match size_ty {
                    Type::Int => Type::array_of(elem.ty.clone()),
                    Type::Error => Type::Error,
                    _ => {
                        self.error(size.span, Error::NonIntArraySize);
                        Type::Error
                    }
                }
            }
            Instantiation::Object { class, args } => {
                let arg_tys = self.args(frame, args);
                let Some(scope) = self.table.get(class.name) else {
                    self.error(class.span, Error::InstantiateUndeclared(class.name));
                    return Type::Error;
                };
                if scope.is_interface() {
                    self.error(span, Error::InstantiateInterface);
                    return Type::Error;
                }
                // A constructor which doesn't match the class name was already
                // reported, so the instantiation fails silently.
                match scope.lookup_own(class.name).map(|s| &s.kind) {
                    Some(SymbolKind::Constructor(signature)) => {
                        let span = args_span(span, args);
                        self.check_args(signature, args, arg_tys, span);
                        Type::Class(class.name)
                    }
                    _ => Type::Error,
                }
            }
        }
    }

    fn member(&mut self, frame: Frame<'t>, lookup: Lookup<'t>, member: &Member) -> Decoration {
        let decoration = match &member.kind {
            MemberKind::Simple(name) => self.simple(lookup, *name),
            MemberKind::Dot { parent, name } => {
                let parent = self.member(frame, lookup, parent);
                match self.enter_class(&parent, member) {
                    Some(class) => match self.simple(Lookup::Class(class), *name) {
                        Decoration {
                            is_variable: true,
                            ty,
                            resolved,
                            ..
                        } => Decoration {
                            ty,
                            is_variable: true,
                            is_initialized: parent.is_initialized,
                            resolved,
                        },
                        other => other,
                    },
                    None => Decoration::error(),
                }
            }
            MemberKind::Indexed {
                member: inner,
                index,
            } => {
                let decoration = self.member(frame, lookup, inner);
                self.index(frame, decoration, inner, index)
            }
            MemberKind::Called(call) => self.call(frame, lookup, call),
            MemberKind::CalledIndexed { call, index } => {
                let decoration = self.call(frame, lookup, call);
                self.index(frame, decoration, member, index)
            }
            MemberKind::This(None) => {
                if frame.is_class_level() {
                    self.error(member.span, Error::InvalidThis);
                    Decoration::error()
                } else {
                    Decoration::value(Type::Class(frame.scope.class.name))
                }
            }
            MemberKind::This(Some(inner)) => {
                if frame.is_class_level() {
                    self.error(member.span, Error::InvalidThis);
                    Decoration::error()
                } else {
                    self.member(frame, Lookup::Class(frame.scope.class), inner)
                }
            }
        };
        self.decorations.nodes.insert(member.id, decoration.clone());
        decoration
    }

    fn simple(&mut self, lookup: Lookup<'t>, name: Ident) -> Decoration {
        let Some(symbol) = lookup.resolve(self.table, name.name) else {
            self.error(name.span, Error::NotDeclared(name.name));
            return Decoration::error();
        };
        let resolved = Some(symbol.origin);
        match &symbol.kind {
            SymbolKind::Variable { ty, .. } => Decoration {
                ty: self.effective(ty),
                is_variable: true,
                is_initialized: match symbol.origin {
                    Origin::User(decl) => self.decorations.initialized.contains(&decl),
                    Origin::Stdlib => true,
                },
                resolved,
            },
            SymbolKind::Parameter { ty } => Decoration {
                ty: self.effective(ty),
                is_variable: true,
                is_initialized: true,
                resolved,
            },
            SymbolKind::Method(signature) => Decoration {
                ty: Type::Method(Box::new(self.effective(&signature.ret))),
                is_variable: false,
                is_initialized: true,
                resolved,
            },
            SymbolKind::Constructor(_) => {
                self.error(name.span, Error::NotAVariable(name.name));
                Decoration::error()
            }
        }
    }

    /// Resolves the class scope a dotted access or a qualified call continues
    /// in, reporting why it can't when it doesn't exist.
    fn enter_class(&mut self, parent: &Decoration, member: &Member) -> Option<&'t ClassScope> {
        if parent.ty.is_error() {
            return None;
        }
        let Some(name) = parent.ty.class_name() else {
            self.error(member.span, Error::DotOnNonClass);
            return None;
        };
        if !parent.is_initialized {
            self.unassigned(member);
            return None;
        }
        // Types naming undeclared classes were collapsed into errors.
        self.table.get(name)
    }

    fn index(&mut self, frame: Frame<'t>, inner: Decoration, of: &Member, index: &Expr) -> Decoration {
        // Indices are evaluated in the caller's scope.
        let index_ty = self.read_expr(frame, index);
        if inner.ty.is_error() {
            return Decoration::error();
        }
        if !inner.is_initialized {
            self.unassigned(of);
            return Decoration::error();
        }
        let Type::Array(elem) = inner.ty else {
            self.error(of.span, Error::ExpectedArray);
            return Decoration::error();
        };
        match index_ty {
            Type::Int => Decoration {
                ty: *elem,
                is_variable: inner.is_variable,
                is_initialized: true,
                resolved: None,
            },
            Type::Error => Decoration::error(),
            _ => {
                self.error(index.span, Error::NonIntIndex);
                Decoration::error()
            }
        }
    }

    fn call(&mut self, frame: Frame<'t>, lookup: Lookup<'t>, call: &Call) -> Decoration {
        let target = match &call.receiver {
            Some(receiver) => {
                let parent = self.member(frame, lookup, receiver);
                self.enter_class(&parent, receiver).map(Lookup::Class)
            }
            None => Some(lookup),
        };
        // Arguments are always evaluated in the caller's scope.
        let arg_tys = self.args(frame, &call.args);
        let Some(target) = target else {
            return Decoration::error();
        };

        let name = call.name;
        let Some(symbol) = target.resolve(self.table, name.name) else {
            self.error(name.span, Error::CallUndeclared(name.name));
            return Decoration::error();
        };
        let SymbolKind::Method(signature) = &symbol.kind else {
            self.error(name.span, Error::NotAMethod(name.name));
            return Decoration::error();
        };

        self.check_args(signature, &call.args, arg_tys, call.args_span);
        Decoration {
            ty: self.effective(&signature.ret),
            is_variable: false,
            is_initialized: true,
            resolved: Some(symbol.origin),
        }
    }

    fn args(&mut self, frame: Frame<'t>, args: &[Expr]) -> Vec<Type> {
        args.iter().map(|arg| self.read_expr(frame, arg)).collect()
    }

    fn check_args(&mut self, signature: &Signature, args: &[Expr], tys: Vec<Type>, span: Span) {
        if args.len() != signature.params.len() {
            self.error(span, Error::ArgumentCount);
            return;
        }
        for ((arg, arg_ty), (_, param)) in args.iter().zip(tys).zip(&signature.params) {
            let param = self.effective(param);
            if arg_ty.is_error() || param.is_error() {
                continue;
            }
            let error = if matches!(arg_ty, Type::Method(_)) {
                Error::MethodArgument
            } else if let (Type::Class(p), Type::Class(a)) = (&param, &arg_ty) {
                if self.valid_class_assign(*p, *a) {
                    continue;
                }
                Error::ArgumentSubstitution {
                    arg: arg_ty.clone(),
                    param: param.clone(),
                }
            } else if self.assignable(&param, &arg_ty) {
                continue;
            } else {
                Error::ArgumentMismatch { arg: arg_ty, param }
            };
            self.error(arg.span, error);
        }
    }

    /// Reports a read of an unassigned member chain, naming its root.
    fn unassigned(&mut self, member: &Member) {
        if let Some(root) = member.root() {
            self.error(member.span, Error::Unassigned(root.name));
        }
    }

    fn resolved_decl(&self, member: &Member) -> Option<NodeId> {
        match self.decorations.get(member.id)?.resolved? {
            Origin::User(decl) => Some(decl),
            Origin::Stdlib => None,
        }
    }

    /// The assignment compatibility relation.
    fn assignable(&self, target: &Type, value: &Type) -> bool {
        match (target, value) {
            (Type::Class(target), Type::Class(value)) => self.valid_class_assign(*target, *value),
            (target, Type::Null) => target.is_nullable() || target.equivalent(value),
            (target, value) => target.equivalent(value),
        }
    }

    /// Classes and interfaces are nominal, except that a class may be stored
    /// where an interface it implements is expected.
    fn valid_class_assign(&self, target: Interned<str>, value: Interned<str>) -> bool {
        let (Some(t), Some(v)) = (self.table.get(target), self.table.get(value)) else {
            return target == value;
        };
        match (t.is_interface(), v.is_interface()) {
            (true, false) => self.table.implements(value, target),
            (false, true) => false,
            _ => target == value,
        }
    }

    /// Whether every class named by `ty` is declared.
    fn is_declared(&self, ty: &Type) -> bool {
        match ty.base_class() {
            Some(name) => self.table.contains(name),
            None => true,
        }
    }

    /// Declared types naming undeclared classes collapse into errors, which
    /// were reported at the declaration.
    fn effective(&self, ty: &Type) -> Type {
        if self.is_declared(ty) {
            ty.clone()
        } else {
            Type::Error
        }
    }

    fn error(&mut self, span: Span, error: Error) {
        self.errors.push(span.wrap(error));
    }
}

fn method_frame(scope: &ClassScope, decl: NodeId) -> Option<Frame<'_>> {
    let method = scope.method_scope(decl)?;
    Some(Frame {
        scope: Scope {
            class: scope,
            method: Some(method),
        },
        loop_depth: 0,
    })
}

/// Returns the member whose declaration an assignment to `target` marks as
/// initialized: a simple name, optionally under `this.`.
fn assigned_decl(target: &Member) -> Option<&Member> {
    match &target.kind {
        MemberKind::Simple(_) => Some(target),
        MemberKind::This(Some(inner)) => match inner.kind {
            MemberKind::Simple(_) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

fn declaration_order(symbol: &Symbol) -> Option<NodeId> {
    match symbol.origin {
        Origin::User(id) => Some(id),
        Origin::Stdlib => None,
    }
}

/// The span of an object instantiation's argument list, which isn't kept on
/// the node.
fn args_span(span: Span, args: &[Expr]) -> Span {
    match (args.first(), args.last()) {
        (Some(first), Some(last)) => first.span.to(last.span),
        _ => span,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    NotDeclared(Interned<str>),
    NotAnInterface(Interned<str>),
    MissingInterfaceMethod {
        method: Interned<str>,
        interface: Interned<str>,
    },
    UndeclaredVarType {
        name: Interned<str>,
        ty: Type,
    },
    UndeclaredParamType {
        name: Interned<str>,
        ty: Type,
    },
    UndeclaredReturnType {
        name: Interned<str>,
        ty: Type,
    },
    ConstructorName,
    IllegalClassLevelAssignment,
    ClassLevelReference(Interned<str>),
    IllegalAssignment {
        value: Type,
        target: Type,
    },
    /// Holds the root name of the target, if it isn't a bare `this`.
    NotAssignable(Option<Interned<str>>),
    Unassigned(Interned<str>),
    NonBooleanCondition,
    LoopVarIsParameter(Interned<str>),
    NotAVariable(Interned<str>),
    NonArrayLoop(Type),
    LoopVarMismatch(Interned<str>),
    ReturnInVoid,
    MissingReturn(Type),
    ReturnMethod,
    ReturnMismatch {
        value: Type,
        expected: Type,
    },
    BreakOutsideLoop,
    IncompatibleOperands {
        op: &'static str,
        lhs: Type,
        rhs: Type,
    },
    InvalidOperand {
        op: &'static str,
        ty: Type,
    },
    CallUndeclared(Interned<str>),
    NotAMethod(Interned<str>),
    ArgumentCount,
    MethodArgument,
    ArgumentSubstitution {
        arg: Type,
        param: Type,
    },
    ArgumentMismatch {
        arg: Type,
        param: Type,
    },
    InstantiateUndeclared(Interned<str>),
    InstantiateInterface,
    InstantiateUndeclaredArray(Type),
    NonIntArraySize,
    InvalidThis,
    ExpectedArray,
    NonIntIndex,
    DotOnNonClass,
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::util::test_utils::{check_program, tree_tests};

    static SHAPES: &str = include_str!("../demos/shapes.des");
    static QUEUE: &str = include_str!("../demos/queue.des");

    tree_tests!(
        use checker;

        fn test_hello() {
            let program = indoc! {"
                class A {
                    constructor A() {}
                    method void entry() { printLine(\"hi\"); }
                }
            "};
            let expected_errors = &[];
        }

        fn test_decorated_tree() {
            let program = indoc! {"
                class A {
                    var int n = 2;
                    constructor A() {}
                    method void entry() {
                        var real r;
                        r = n * 1.5;
                        print(r);
                    }
                }
            "};
            let tree_ok = "
                class A
                  field n: int (initialized)
                    int 2 (26..27 %: int)
                  constructor A()
                  method entry() : void
                    local r: real
                    assign (106..118)
                      simple r (106..107 %: real)
                      binary Mul (110..117 %: real)
                        member (110..111 %: int)
                          simple n (110..111 %: int)
                        real 1.5 (114..117 %: real)
                    reference (127..136)
                      call print (127..135 %: void)
                        arguments
                          member (133..134 %: real)
                            simple r (133..134 %: real)
            ";
        }

        fn test_illegal_assignment() {
            let program = indoc! {"
                class A {
                    constructor A() {}
                    method void entry() {
                        var int x;
                        x = \"a\";
                    }
                }
            "};
            let expected_errors = &[
                "5:13: Illegal assignment of type 'string' to declared type 'int'",
            ];
        }

        fn test_undeclared_interface() {
            let program = indoc! {"
                class B implements I {
                    constructor B() {}
                    method void entry() {}
                }
            "};
            let expected_errors = &[
                "1:20: I is not declared",
            ];
        }

        fn test_foreach_element_mismatch() {
            let program = indoc! {"
                class A {
                    constructor A() {}
                    method void entry() {
                        var int[] intArray;
                        intArray = new int[3];
                        foreach (var real r in intArray) { }
                    }
                }
            "};
            let expected_errors = &[
                "6:27: Type of foreach loop variable 'r' does not match the element type of the array",
            ];
        }

        fn test_duplicate_entry() {
            let program = indoc! {"
                class A {
                    constructor A() {}
                    method void entry() {}
                }
                class B {
                    constructor B() {}
                    method void entry() {}
                }
            "};
            let expected_errors = &[
                "7:17: Entry method already declared",
            ];
        }

        fn test_missing_entry() {
            let program = indoc! {"
                class A {
                    constructor A() {}
                    method void run() {}
                }
            "};
            let expected_errors = &[
                "No viable 'entry' method found",
            ];
        }

        fn test_missing_interface_method() {
            let program = indoc! {"
                interface Shape {
                    method real area();
                }
                class Square implements Shape {
                    constructor Square() {}
                    method void entry() {}
                }
            "};
            let expected_errors = &[
                "4:7: Class does not implement the method 'area' required by interface 'Shape'",
            ];
        }

        fn test_interface_signatures() {
            let program = indoc! {"
                interface Shape {
                    method real area();
                    method string name(int verbose);
                }
                class Square implements Shape {
                    constructor Square() {}
                    method real area() { return 1.0; }
                    method string name(int quiet) { return \"square\"; }
                }
                class Main implements Square {
                    constructor Main() {}
                    method void entry() {}
                }
            "};
            let expected_errors = &[
                "5:7: Class does not implement the method 'name' required by interface 'Shape'",
                "10:23: Square is not an interface",
            ];
        }

        fn test_interface_assignment() {
            let program = indoc! {"
                interface Shape {
                    method real area();
                }
                interface Named {
                    method string name();
                }
                class Square implements Shape {
                    constructor Square() {}
                    method real area() { return 2.0; }
                }
                class A {
                    constructor A() {}
                    method void entry() {
                        var Shape s;
                        var Named n;
                        var Square q;
                        s = new Square();
                        q = new Square();
                        s = q;
                        n = q;
                        q = s;
                        s = null;
                        q = null;
                    }
                }
            "};
            let expected_errors = &[
                "20:13: Illegal assignment of type 'Square' to declared type 'Named'",
                "21:13: Illegal assignment of type 'Shape' to declared type 'Square'",
            ];
        }

        fn test_unassigned_field() {
            let program = indoc! {"
                class A {
                    var int x;
                    constructor A() {}
                    method void entry() {
                        print(x + 1);
                    }
                }
            "};
            let expected_errors = &[
                "5:15: Use of unassigned variable 'x'",
            ];
        }

        fn test_unassigned_locals() {
            let program = indoc! {"
                class A {
                    var int[] xs;
                    constructor A() {}
                    method void entry() {
                        var int y;
                        var A other;
                        y = y + 1;
                        y = 2;
                        print(y);
                        print(xs[0]);
                        print(other.xs);
                        other.xs = new int[2];
                    }
                }
            "};
            let expected_errors = &[
                "7:13: Use of unassigned variable 'y'",
                "10:15: Use of unassigned variable 'xs'",
                "11:15: Use of unassigned variable 'other'",
                "12:9: Use of unassigned variable 'other'",
            ];
        }

        fn test_forward_references() {
            let program = indoc! {"
                class A {
                    var B b;
                    constructor A() { b = new B(); }
                    method void entry() { n(); }
                    method void n() { b.m(this); m(); }
                    method void m() {}
                }
                class B {
                    constructor B() {}
                    method void m(A a) {}
                }
            "};
            let expected_errors = &[];
        }

        fn test_class_level_initializers() {
            let program = indoc! {"
                class A {
                    var int a = 1 + 2;
                    var real b = normal(1.0, 2.0) * 2;
                    var int c = f();
                    var int d = a;
                    var A e = new A();
                    var int[] g = new int[discreteUniform(1, a)];
                    var int h = nope();
                    var int i = ghost;
                    constructor A() {}
                    method int f() { return 1; }
                    method void entry() {}
                }
            "};
            let expected_errors = &[
                "4:17: The member 'f' cannot be referred at class level before the class has been initialized. Move the assignment to the constructor",
                "5:17: The member 'a' cannot be referred at class level before the class has been initialized. Move the assignment to the constructor",
                "6:15: Illegal class level assignment",
                "7:46: The member 'a' cannot be referred at class level before the class has been initialized. Move the assignment to the constructor",
                "8:17: Cannot call undeclared identifier 'nope'",
                "9:17: ghost is not declared",
            ];
        }

        fn test_class_level_shadowed_stdlib() {
            let program = indoc! {"
                class A {
                    var int n = length(new int[3]);
                    constructor A() {}
                    method void entry() {}
                }
                class B {
                    var int n = length(new int[3]);
                    constructor B() {}
                    method int length(int[] xs) { return 0; }
                }
            "};
            let expected_errors = &[
                "7:17: The member 'length' cannot be referred at class level before the class has been initialized. Move the assignment to the constructor",
            ];
        }

        fn test_this_at_class_level() {
            let program = indoc! {"
                class A {
                    var A self = this;
                    constructor A() {}
                    method void entry() {}
                }
            "};
            let expected_errors = &[
                "2:18: 'this' keyword is not valid in the current context",
            ];
        }

        fn test_conditions_and_break() {
            let program = indoc! {"
                class A {
                    constructor A() {}
                    method void entry() {
                        var int i;
                        i = 0;
                        if (i) { }
                        while (i < 10) {
                            if (i == 5) { break; }
                            i = i + 1;
                        }
                        break;
                    }
                }
            "};
            let expected_errors = &[
                "6:13: Expression of conditional is not of type boolean",
                "11:9: Break statement must be inside a loop",
            ];
        }

        fn test_foreach_variables() {
            let program = indoc! {"
                class A {
                    constructor A() {}
                    method void entry() {}
                    method void loop(int x, int[] xs) {
                        var int n;
                        n = 0;
                        foreach (var int x in xs) { }
                        foreach (var int y in n) { }
                        foreach (var int z in xs) { n = z; }
                    }
                }
            "};
            let expected_errors = &[
                "7:26: 'x' is already declared",
                "7:26: Foreach loop variable 'x' cannot be a method parameter",
                "8:31: Cannot loop over nonarray type 'int'",
            ];
        }

        fn test_operators() {
            let program = indoc! {"
                class A {
                    constructor A() {}
                    method void entry() {
                        var boolean b;
                        var real r;
                        var int n;
                        r = 2 ^ 3;
                        n = 7 % 2;
                        b = 1 < 2.5 and \"a\" == \"b\";
                        n = \"a\" + 1;
                        b = not 1;
                        r = -true;
                        b = true == 1;
                        n = 2 ^ 3;
                    }
                }
            "};
            let expected_errors = &[
                "10:13: Incompatible types (string and int) for operator +",
                "11:13: Operator not cannot be applied to type 'int'",
                "12:13: Operator - cannot be applied to type 'boolean'",
                "13:13: Incompatible types (boolean and int) for operator ==",
                "14:13: Illegal assignment of type 'real' to declared type 'int'",
            ];
        }

        fn test_calls() {
            let program = indoc! {"
                class Counter {
                    var int total;
                    constructor Counter() { total = 0; }
                    method void add(int n) { total = total + n; }
                }
                class A {
                    var int n;
                    constructor A() {}
                    method void entry() {
                        var Counter c;
                        var int k;
                        k = 1;
                        c = new Counter();
                        c.add(k);
                        c.add(k, k);
                        c.add(\"one\");
                        c.add(entry);
                        missing();
                        n(1);
                        c.missing();
                        k.add(1);
                        print(null);
                        printLine(null);
                    }
                }
            "};
            let expected_errors = &[
                "15:14: Invalid number of arguments provided to call",
                "16:15: Provided argument type 'string' does not match parameter type 'int'",
                "17:15: Methods cannot be used as arguments",
                "18:9: Cannot call undeclared identifier 'missing'",
                "19:9: n is not a method identifier",
                "20:11: Cannot call undeclared identifier 'missing'",
                "21:9: Cannot use dot notation on a non class type",
            ];
        }

        fn test_argument_substitution() {
            let program = indoc! {"
                interface Shape {
                    method real area();
                }
                class Square implements Shape {
                    constructor Square() {}
                    method real area() { return 1.0; }
                }
                class Circle {
                    constructor Circle() {}
                }
                class A {
                    constructor A() {}
                    method void entry() {
                        var Shape s;
                        s = new Square();
                        measure(new Square());
                        measure(s);
                        measure(new Circle());
                        measure(null);
                        square(s);
                    }
                    method void measure(Shape s) { printLine(s.area()); }
                    method void square(Square s) {}
                }
            "};
            let expected_errors = &[
                "18:17: Provided argument type 'Circle' cannot be substituted for type 'Shape'",
                "20:16: Provided argument type 'Shape' cannot be substituted for type 'Square'",
            ];
        }

        fn test_instantiation() {
            let program = indoc! {"
                interface Shape {
                    method real area();
                }
                class A {
                    constructor A(int n) {}
                    method void entry() {
                        var A a;
                        var Shape[] shapes;
                        a = new A(1);
                        a = new A();
                        a = new Missing();
                        shapes = new Shape[2];
                        shapes = new Missing[2];
                        shapes = new Shape[1.5];
                        print(new Shape());
                    }
                }
            "};
            let expected_errors = &[
                "10:13: Invalid number of arguments provided to call",
                "11:17: Cannot instantiate undeclared type 'Missing'",
                "13:22: Cannot instantiate array of undeclared type 'Missing'",
                "14:28: Arrays can only be instantiated with integer values",
                "15:15: Cannot instantiate interface types",
            ];
        }

        fn test_constructor_name() {
            let program = indoc! {"
                class A {
                    constructor B() {}
                    method void entry() {
                        var A a;
                        a = new A();
                    }
                }
            "};
            let expected_errors = &[
                "2:17: Constructor name does not match class name",
            ];
        }

        fn test_returns() {
            let program = indoc! {"
                class A {
                    constructor A() {}
                    method void entry() { return 1; }
                    method int none() { }
                    method int empty() { return; }
                    method int wrong() { return \"s\"; }
                    method int ref() { return none; }
                    method real widened() { return 1; }
                }
            "};
            let expected_errors = &[
                "3:27: Attempted to return a value in a void method",
                "4:16: The method must return a value of type 'int'",
                "5:26: The method must return a value of type 'int'",
                "6:33: Return type 'string' does not match the declared type 'int'",
                "7:31: Cannot return method type",
                "8:36: Return type 'int' does not match the declared type 'real'",
            ];
        }

        fn test_members() {
            let program = indoc! {"
                class A {
                    var int n;
                    constructor A() { n = 0; }
                    method void entry() {
                        var int[] xs;
                        var boolean b;
                        xs = new int[2];
                        n = xs[true];
                        n = n[0];
                        n = n.size;
                        n = count;
                        b = this;
                        this.n = 1;
                        this.missing = 1;
                        entry = 1;
                        n = A;
                    }
                }
            "};
            let expected_errors = &[
                "8:16: Indexing on arrays can only be done using int values",
                "9:13: Expected array type",
                "10:13: Cannot use dot notation on a non class type",
                "11:13: count is not declared",
                "12:13: Illegal assignment of type 'A' to declared type 'boolean'",
                "14:14: missing is not declared",
                "15:9: LHS identifier 'entry' of assignment is not a variable",
                "16:13: A is not a variable",
            ];
        }

        fn test_undeclared_types() {
            let program = indoc! {"
                class A {
                    var Missing m;
                    constructor A(Other o) {}
                    method void entry() {}
                    method Gone g() {}
                    method void f(Missing[] ms) {
                        var Missing[] local;
                        local = ms;
                    }
                }
            "};
            let expected_errors = &[
                "2:9: Cannot declare variable 'm' to undeclared type 'Missing'",
                "3:19: Cannot declare parameter 'o' to undeclared type 'Other'",
                "5:12: Cannot declare method 'g' to undeclared return type 'Gone'",
                "6:19: Cannot declare parameter 'ms' to undeclared type 'Missing[]'",
                "7:13: Cannot declare variable 'local' to undeclared type 'Missing[]'",
            ];
        }
    );

    #[test]
    fn test_demos_check_cleanly() {
        for src in [SHAPES, QUEUE] {
            let checked = check_program(src);
            assert_eq!(checked.errors, Vec::<String>::new());
            assert!(checked.table.entry.is_some());
        }
    }

    fn expr_ids(expr: &Expr, ids: &mut Vec<NodeId>) {
        ids.push(expr.id);
        match &expr.kind {
            ExprKind::Binary { lhs, rhs, .. } => {
                expr_ids(lhs, ids);
                expr_ids(rhs, ids);
            }
            ExprKind::Unary { expr, .. } => expr_ids(expr, ids),
            ExprKind::Member(member) => member_ids(member, ids),
            ExprKind::New(Instantiation::Array { size, .. }) => expr_ids(size, ids),
            ExprKind::New(Instantiation::Object { args, .. }) => {
                args.iter().for_each(|arg| expr_ids(arg, ids));
            }
            _ => {}
        }
    }

    fn call_ids(call: &Call, ids: &mut Vec<NodeId>) {
        if let Some(receiver) = &call.receiver {
            member_ids(receiver, ids);
        }
        call.args.iter().for_each(|arg| expr_ids(arg, ids));
    }

    fn member_ids(member: &Member, ids: &mut Vec<NodeId>) {
        ids.push(member.id);
        match &member.kind {
            MemberKind::Simple(_) | MemberKind::This(None) => {}
            MemberKind::Dot { parent, .. } => member_ids(parent, ids),
            MemberKind::Indexed { member, index } => {
                member_ids(member, ids);
                expr_ids(index, ids);
            }
            MemberKind::Called(call) => call_ids(call, ids),
            MemberKind::CalledIndexed { call, index } => {
                call_ids(call, ids);
                expr_ids(index, ids);
            }
            MemberKind::This(Some(inner)) => member_ids(inner, ids),
        }
    }

    fn action_ids(action: &Action, ids: &mut Vec<NodeId>) {
        match &action.kind {
            ActionKind::Assign { target, value } => {
                member_ids(target, ids);
                expr_ids(value, ids);
            }
            ActionKind::Reference(member) => member_ids(member, ids),
            ActionKind::If {
                cond,
                then,
                elseifs,
                otherwise,
            } => {
                expr_ids(cond, ids);
                then.iter().for_each(|a| action_ids(a, ids));
                for elseif in elseifs {
                    expr_ids(&elseif.cond, ids);
                    elseif.body.iter().for_each(|a| action_ids(a, ids));
                }
                otherwise.iter().flatten().for_each(|a| action_ids(a, ids));
            }
            ActionKind::While { cond, body } => {
                expr_ids(cond, ids);
                body.iter().for_each(|a| action_ids(a, ids));
            }
            ActionKind::Foreach { iterable, body, .. } => {
                expr_ids(iterable, ids);
                body.iter().for_each(|a| action_ids(a, ids));
            }
            ActionKind::Break => {}
        }
    }

    #[test]
    fn test_every_node_is_decorated() {
        for src in [SHAPES, QUEUE] {
            let checked = check_program(src);
            let mut ids = Vec::new();
            for class in &checked.program.classes {
                let initializers = class.fields.iter().filter_map(|f| f.initializer.as_ref());
                initializers.for_each(|e| expr_ids(e, &mut ids));
                class.constructor.body.iter().for_each(|a| action_ids(a, &mut ids));
                for method in &class.methods {
                    method.body.iter().for_each(|a| action_ids(a, &mut ids));
                    let ret = method.ret.as_ref().and_then(|r| r.expr.as_ref());
                    ret.into_iter().for_each(|e| expr_ids(e, &mut ids));
                }
            }
            assert!(ids.len() > 20);
            let missing: Vec<_> = ids
                .iter()
                .filter(|id| checked.decorations.get(**id).is_none())
                .collect();
            assert_eq!(missing, Vec::<&NodeId>::new());
        }
    }

    #[test]
    fn test_checking_is_idempotent() {
        let checked = check_program(QUEUE);
        let again = Checker::new(&checked.table).check(std::slice::from_ref(&checked.program));
        assert_eq!(again, Ok(checked.decorations));
    }

    #[test]
    fn test_errors_are_stable_across_runs() {
        let src = "class A { constructor A() {} method void entry() { var int x; print(x); } }";
        let first = check_program(src);
        let second = check_program(src);
        assert_eq!(first.errors, ["1:69: Use of unassigned variable 'x'"]);
        assert_eq!(first.errors, second.errors);
        assert_eq!(first.decorations, second.decorations);
    }

    #[test]
    fn test_assignment_decorations() {
        let checked = check_program(indoc! {"
            class A {
                constructor A() {}
                method void entry() {
                    var int x;
                    x = 1;
                    print(x);
                }
            }
        "});
        assert_eq!(checked.errors, Vec::<String>::new());

        let method = &checked.program.classes[0].methods[0];
        let local = &method.locals[0];
        assert!(checked.decorations.is_initialized(local.id));

        let ActionKind::Assign { target, value } = &method.body[0].kind else {
            panic!("expected an assignment");
        };
        let target = checked.decorations.get(target.id).unwrap();
        assert_eq!(target.ty, Type::Int);
        assert!(target.is_variable);
        assert!(target.is_initialized);
        assert_eq!(target.resolved, Some(Origin::User(local.id)));
        assert!(!checked.decorations.get(value.id).unwrap().is_variable);

        let ActionKind::Reference(call) = &method.body[1].kind else {
            panic!("expected a call");
        };
        let call = checked.decorations.get(call.id).unwrap();
        assert_eq!(call.ty, Type::Void);
        assert_eq!(call.resolved, Some(Origin::Stdlib));
    }
}
