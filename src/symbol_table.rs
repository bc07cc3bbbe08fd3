use std::collections::{hash_map::Entry, HashMap};

use crate::{
    ast::{Action, ActionKind, Class, Interface, NodeId, Param, Program, VarDecl},
    token::{Span, Spanned},
    types::Type,
    util::intern::{Interned, Interner},
};

/// Where a symbol was declared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    User(NodeId),
    Stdlib,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub origin: Origin,
    pub name: Interned<str>,
    /// The span of the declared name. Dummy for standard library symbols.
    pub span: Span,
    pub kind: SymbolKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SymbolKind {
    /// A field, a local or a foreach loop variable.
    Variable { ty: Type, has_initializer: bool },
    Parameter { ty: Type },
    Method(Signature),
    Constructor(Signature),
}

/// The declared types of a method. Types are kept as written, so they may
/// name undeclared classes.
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    pub ret: Type,
    pub params: Vec<(Interned<str>, Type)>,
}

impl Signature {
    fn of_params(ret: Type, params: &[Param]) -> Signature {
        Signature {
            ret,
            params: params
                .iter()
                .map(|param| (param.name.name, param.ty.ty.clone()))
                .collect(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Class,
    Interface,
}

/// The scope of a class or of an interface.
#[derive(Debug)]
pub struct ClassScope {
    pub name: Interned<str>,
    pub kind: ScopeKind,
    /// The declaring node.
    pub decl: NodeId,
    /// The interfaces named in the `implements` clause, without duplicates.
    pub implements: Vec<Interned<str>>,
    symbols: HashMap<Interned<str>, Symbol>,
    /// Keyed by the declaring node, so that methods with a duplicate name still
    /// get their own scope.
    methods: HashMap<NodeId, MethodScope>,
}

impl ClassScope {
    /// Looks up a name declared directly in this class.
    pub fn lookup_own(&self, name: Interned<str>) -> Option<&Symbol> {
        self.symbols.get(&name)
    }

    pub fn method_scope(&self, decl: NodeId) -> Option<&MethodScope> {
        self.methods.get(&decl)
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ScopeKind::Interface
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }
}

/// The scope of a constructor, of a method or of an interface method. Holds
/// parameters, locals and foreach loop variables (at any nesting depth).
#[derive(Debug)]
pub struct MethodScope {
    /// The name of the class or interface which declares the method.
    pub owner: Interned<str>,
    symbols: HashMap<Interned<str>, Symbol>,
}

impl MethodScope {
    pub fn lookup_own(&self, name: Interned<str>) -> Option<&Symbol> {
        self.symbols.get(&name)
    }
}

/// The standard library signatures. Built once and handed to [`build`].
#[derive(Debug)]
pub struct Stdlib {
    symbols: HashMap<Interned<str>, Symbol>,
}

impl Stdlib {
    pub fn new(ident_interner: &mut Interner<str>) -> Stdlib {
        let any_array = Type::array_of(Type::Any);
        let decls = [
            ("print", vec![Type::Any], Type::Void),
            ("printLine", vec![Type::Any], Type::Void),
            ("length", vec![any_array], Type::Int),
            ("normal", vec![Type::Real, Type::Real], Type::Real),
            ("exponential", vec![Type::Real], Type::Real),
            ("discreteUniform", vec![Type::Int, Type::Int], Type::Int),
            ("continuousUniform", vec![Type::Int, Type::Int], Type::Real),
        ];
        let unnamed = ident_interner.intern("");
        let symbols = decls
            .into_iter()
            .map(|(name, params, ret)| {
                let name = ident_interner.intern(name);
                let params = params.into_iter().map(|ty| (unnamed, ty)).collect();
                let symbol = Symbol {
                    origin: Origin::Stdlib,
                    name,
                    span: Span::DUMMY,
                    kind: SymbolKind::Method(Signature { ret, params }),
                };
                (name, symbol)
            })
            .collect();
        Stdlib { symbols }
    }

    pub fn get(&self, name: Interned<str>) -> Option<&Symbol> {
        self.symbols.get(&name)
    }
}

/// The global table, mapping class and interface names to their scopes.
#[derive(Debug)]
pub struct SymbolTable {
    classes: HashMap<Interned<str>, ClassScope>,
    stdlib: Stdlib,
    /// The class which declares the entry method.
    pub entry: Option<Interned<str>>,
}

impl SymbolTable {
    pub fn get(&self, name: Interned<str>) -> Option<&ClassScope> {
        self.classes.get(&name)
    }

    pub fn contains(&self, name: Interned<str>) -> bool {
        self.classes.contains_key(&name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassScope> {
        self.classes.values()
    }

    pub fn stdlib(&self) -> &Stdlib {
        &self.stdlib
    }

    /// Whether the class `class` declares that it implements `interface`.
    pub fn implements(&self, class: Interned<str>, interface: Interned<str>) -> bool {
        self.get(class)
            .is_some_and(|scope| scope.implements.contains(&interface))
    }
}

/// A pair of class and method scopes in which names are resolved. The method
/// scope is absent at class level (in field initializers).
#[derive(Copy, Clone, Debug)]
pub struct Scope<'t> {
    pub class: &'t ClassScope,
    pub method: Option<&'t MethodScope>,
}

impl<'t> Scope<'t> {
    pub fn class_level(class: &'t ClassScope) -> Scope<'t> {
        Scope {
            class,
            method: None,
        }
    }

    /// Resolves a name from the innermost scope outwards: method, class, then
    /// the standard library.
    pub fn lookup(self, table: &'t SymbolTable, name: Interned<str>) -> Option<&'t Symbol> {
        self.method
            .and_then(|method| method.lookup_own(name))
            .or_else(|| self.class.lookup_own(name))
            .or_else(|| table.stdlib.get(name))
    }
}

/// Builds the global table from every unit.
///
/// Registration never consults types, so checking may then resolve forward
/// references across classes and units.
pub fn build(
    units: &[Program],
    stdlib: Stdlib,
    entry_name: Interned<str>,
) -> (SymbolTable, Vec<Spanned<Error>>) {
    let mut builder = Builder {
        classes: HashMap::with_capacity(units.iter().map(|u| u.classes.len()).sum()),
        entry_name,
        entry: None,
        errors: Vec::with_capacity(8),
    };

    for unit in units {
        for interface in &unit.interfaces {
            builder.register_interface(interface);
        }
        for class in &unit.classes {
            builder.register_class(class);
        }
    }

    if builder.entry.is_none() {
        builder
            .errors
            .push(Span::DUMMY.wrap(Error::NoEntry(builder.entry_name)));
    }

    log::debug!(
        "registered {} classes and interfaces, entry in {:?}",
        builder.classes.len(),
        builder.entry
    );

    let table = SymbolTable {
        classes: builder.classes,
        stdlib,
        entry: builder.entry,
    };
    (table, builder.errors)
}

struct Builder {
    classes: HashMap<Interned<str>, ClassScope>,
    entry_name: Interned<str>,
    entry: Option<Interned<str>>,
    errors: Vec<Spanned<Error>>,
}

impl Builder {
    fn register_interface(&mut self, interface: &Interface) {
        let owner = interface.name.name;
        let mut scope = ClassScope {
            name: owner,
            kind: ScopeKind::Interface,
            decl: interface.id,
            implements: Vec::new(),
            symbols: HashMap::with_capacity(interface.methods.len()),
            methods: HashMap::with_capacity(interface.methods.len()),
        };

        for signature in &interface.methods {
            let symbol = Symbol {
                origin: Origin::User(signature.id),
                name: signature.name.name,
                span: signature.name.span,
                kind: SymbolKind::Method(Signature::of_params(
                    signature.return_ty.ty.clone(),
                    &signature.params,
                )),
            };
            self.enter(&mut scope.symbols, symbol);

            let mut method = MethodScope {
                owner,
                symbols: HashMap::with_capacity(signature.params.len()),
            };
            self.enter_params(&mut method, &signature.params);
            scope.methods.insert(signature.id, method);
        }

        self.enter_class(interface.name.span, scope);
    }

    fn register_class(&mut self, class: &Class) {
        let owner = class.name.name;
        let mut scope = ClassScope {
            name: owner,
            kind: ScopeKind::Class,
            decl: class.id,
            implements: Vec::with_capacity(class.implements.len()),
            symbols: HashMap::with_capacity(class.fields.len() + class.methods.len() + 1),
            methods: HashMap::with_capacity(class.methods.len() + 1),
        };

        for interface in &class.implements {
            if scope.implements.contains(&interface.name) {
                self.error(interface.span, Error::AlreadyDeclared(interface.name));
            } else {
                scope.implements.push(interface.name);
            }
        }

        for field in &class.fields {
            self.enter(&mut scope.symbols, variable(field));
        }

        let constructor = &class.constructor;
        let symbol = Symbol {
            origin: Origin::User(constructor.id),
            name: constructor.name.name,
            span: constructor.name.span,
            kind: SymbolKind::Constructor(Signature::of_params(
                Type::Class(owner),
                &constructor.params,
            )),
        };
        self.enter(&mut scope.symbols, symbol);
        let mut method = MethodScope {
            owner,
            symbols: HashMap::with_capacity(constructor.params.len() + constructor.locals.len()),
        };
        self.enter_params(&mut method, &constructor.params);
        self.enter_locals(&mut method, &constructor.locals, &constructor.body);
        scope.methods.insert(constructor.id, method);

        // A duplicate class is rejected whole, so it can't claim the entry.
        let duplicate = self.classes.contains_key(&owner);
        for decl in &class.methods {
            if decl.name.name == self.entry_name && !duplicate {
                self.check_entry(owner, decl.name.span, &decl.return_ty.ty);
            }

            let symbol = Symbol {
                origin: Origin::User(decl.id),
                name: decl.name.name,
                span: decl.name.span,
                kind: SymbolKind::Method(Signature::of_params(
                    decl.return_ty.ty.clone(),
                    &decl.params,
                )),
            };
            self.enter(&mut scope.symbols, symbol);

            let mut method = MethodScope {
                owner,
                symbols: HashMap::with_capacity(decl.params.len() + decl.locals.len()),
            };
            self.enter_params(&mut method, &decl.params);
            self.enter_locals(&mut method, &decl.locals, &decl.body);
            scope.methods.insert(decl.id, method);
        }

        self.enter_class(class.name.span, scope);
    }

    /// The first method with the entry name and a void return type is the entry
    /// method. A non-void one doesn't count, but is reported.
    fn check_entry(&mut self, class: Interned<str>, span: Span, ret: &Type) {
        if self.entry.is_some() {
            self.error(span, Error::EntryAlreadyDeclared);
        } else if *ret != Type::Void {
            self.error(span, Error::EntryNotVoid);
        } else {
            log::debug!("entry method found at {span}");
            self.entry = Some(class);
        }
    }

    fn enter_class(&mut self, span: Span, scope: ClassScope) {
        match self.classes.entry(scope.name) {
            Entry::Occupied(_) => self.error(span, Error::AlreadyDeclared(scope.name)),
            Entry::Vacant(vacant) => {
                vacant.insert(scope);
            }
        }
    }

    fn enter_params(&mut self, method: &mut MethodScope, params: &[Param]) {
        for param in params {
            let symbol = Symbol {
                origin: Origin::User(param.id),
                name: param.name.name,
                span: param.name.span,
                kind: SymbolKind::Parameter {
                    ty: param.ty.ty.clone(),
                },
            };
            self.enter(&mut method.symbols, symbol);
        }
    }

    fn enter_locals(&mut self, method: &mut MethodScope, locals: &[VarDecl], body: &[Action]) {
        for local in locals {
            self.enter(&mut method.symbols, variable(local));
        }
        self.enter_loop_vars(method, body);
    }

    fn enter_loop_vars(&mut self, method: &mut MethodScope, actions: &[Action]) {
        for action in actions {
            match &action.kind {
                ActionKind::Foreach { var, body, .. } => {
                    self.enter(&mut method.symbols, variable(var));
                    self.enter_loop_vars(method, body);
                }
                ActionKind::If {
                    then,
                    elseifs,
                    otherwise,
                    ..
                } => {
                    self.enter_loop_vars(method, then);
                    for elseif in elseifs {
                        self.enter_loop_vars(method, &elseif.body);
                    }
                    if let Some(otherwise) = otherwise {
                        self.enter_loop_vars(method, otherwise);
                    }
                }
                ActionKind::While { body, .. } => self.enter_loop_vars(method, body),
                ActionKind::Assign { .. } | ActionKind::Reference(_) | ActionKind::Break => {}
            }
        }
    }

    /// Enters a symbol in a scope. On redeclaration the first symbol stands.
    fn enter(&mut self, symbols: &mut HashMap<Interned<str>, Symbol>, symbol: Symbol) {
        match symbols.entry(symbol.name) {
            Entry::Occupied(_) => self.error(symbol.span, Error::AlreadyDeclared(symbol.name)),
            Entry::Vacant(vacant) => {
                vacant.insert(symbol);
            }
        }
    }

    fn error(&mut self, span: Span, error: Error) {
        self.errors.push(span.wrap(error));
    }
}

fn variable(decl: &VarDecl) -> Symbol {
    Symbol {
        origin: Origin::User(decl.id),
        name: decl.name.name,
        span: decl.name.span,
        kind: SymbolKind::Variable {
            ty: decl.ty.ty.clone(),
            has_initializer: decl.initializer.is_some(),
        },
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    AlreadyDeclared(Interned<str>),
    EntryNotVoid,
    EntryAlreadyDeclared,
    /// Holds the entry method name.
    NoEntry(Interned<str>),
}

impl Error {
    /// Whether this error leaves no program to check at all.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::EntryNotVoid | Error::EntryAlreadyDeclared | Error::NoEntry(_)
        )
    }
}
