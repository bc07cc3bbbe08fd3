use crate::util::{
    fmt::{Context, Show},
    intern::Interned,
};

/// A type descriptor.
///
/// Structural equality (`==`) is only used to compare trees; type checking
/// uses [`Type::equivalent`], which treats [`Type::Any`] and [`Type::Error`]
/// specially.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Real,
    String,
    Boolean,
    Void,
    Null,
    /// Only used in the standard library signatures.
    Any,
    Array(Box<Type>),
    /// A class or an interface.
    Class(Interned<str>),
    /// The type of a method which is referred to, but not called. Holds the
    /// return type.
    Method(Box<Type>),
    /// A sentinel for an ill-typed entity. Its error was already reported.
    Error,
}

impl Type {
    /// The type equivalence relation:
    ///
    /// - [`Type::Error`] is never equivalent to anything (even to itself);
    /// - [`Type::Any`] is equivalent to everything but itself (and errors);
    /// - arrays are equivalent if their element types are;
    /// - classes are equivalent if their names are the same;
    /// - method types are equivalent if their return types are.
    pub fn equivalent(&self, other: &Type) -> bool {
        use Type::*;
        match (self, other) {
            (Error, _) | (_, Error) | (Any, Any) => false,
            (Any, _) | (_, Any) => true,
            (Array(a), Array(b)) | (Method(a), Method(b)) => a.equivalent(b),
            (Class(a), Class(b)) => a == b,
            (a, b) => a == b,
        }
    }

    pub fn array_of(elem: Type) -> Type {
        Type::Array(Box::new(elem))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Real)
    }

    /// Whether `null` may be stored in a location of this type.
    pub fn is_nullable(&self) -> bool {
        matches!(self, Type::Class(_) | Type::Array(_))
    }

    /// Returns the class name, if this is a class type.
    pub fn class_name(&self) -> Option<Interned<str>> {
        match self {
            Type::Class(name) => Some(*name),
            _ => None,
        }
    }

    /// Returns the innermost named class of this type, looking through array
    /// element types.
    pub fn base_class(&self) -> Option<Interned<str>> {
        match self {
            Type::Class(name) => Some(*name),
            Type::Array(elem) => elem.base_class(),
            _ => None,
        }
    }
}

impl Show for Type {
    fn show(&self, f: &mut std::fmt::Formatter<'_>, ctx: &Context<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Real => write!(f, "real"),
            Type::String => write!(f, "string"),
            Type::Boolean => write!(f, "boolean"),
            Type::Void => write!(f, "void"),
            Type::Null => write!(f, "null"),
            Type::Any => write!(f, "anyType"),
            Type::Array(elem) => {
                elem.show(f, ctx)?;
                write!(f, "[]")
            }
            Type::Class(name) => write!(f, "{}", ctx.ident_interner.get(name)),
            Type::Method(ret) => ret.show(f, ctx),
            Type::Error => write!(f, "ErrorType"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::intern::Interner;

    #[test]
    fn test_equivalence() {
        let mut i = Interner::<str>::with_capacity(4);
        let a = Type::Class(i.intern("A"));
        let b = Type::Class(i.intern("B"));

        assert!(Type::Int.equivalent(&Type::Int));
        assert!(!Type::Int.equivalent(&Type::Real));
        assert!(a.equivalent(&a.clone()));
        assert!(!a.equivalent(&b));
        assert!(Type::array_of(Type::Int).equivalent(&Type::array_of(Type::Int)));
        assert!(!Type::array_of(Type::Int).equivalent(&Type::array_of(Type::Real)));
        assert!(!Type::array_of(Type::Int).equivalent(&Type::Int));

        assert!(Type::Any.equivalent(&Type::String));
        assert!(a.equivalent(&Type::Any));
        assert!(Type::array_of(Type::Any).equivalent(&Type::array_of(b.clone())));
        assert!(!Type::Any.equivalent(&Type::Any));

        assert!(!Type::Error.equivalent(&Type::Error));
        assert!(!Type::Error.equivalent(&Type::Any));
        assert!(!Type::Int.equivalent(&Type::Error));

        let m = Type::Method(Box::new(Type::Int));
        assert!(m.equivalent(&Type::Method(Box::new(Type::Int))));
        assert!(!m.equivalent(&Type::Int));
    }

    #[test]
    fn test_show() {
        let mut i = Interner::<str>::with_capacity(4);
        let shape = i.intern("Shape");
        let ctx = Context::new(&i);
        let cases = [
            (Type::Real, "real"),
            (Type::array_of(Type::Boolean), "boolean[]"),
            (Type::array_of(Type::Class(shape)), "Shape[]"),
            (Type::Method(Box::new(Type::String)), "string"),
            (Type::Any, "anyType"),
            (Type::Error, "ErrorType"),
        ];
        for (ty, expected) in cases {
            assert_eq!(ty.display(&ctx).to_string(), expected);
        }
    }
}
