//! Type identities and component types.

use std::fmt;

use crate::{Name, StringInterner};

/// Globally unique identity of a type: its interned fully qualified path
/// (`geom.Point`).
///
/// The same path names the same type in every compilation unit and at run
/// time, which is what lets the reflective path key its cache on it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct TypeIdent(Name);

impl TypeIdent {
    #[inline]
    pub const fn new(path: Name) -> Self {
        TypeIdent(path)
    }

    /// Intern `path` and wrap it.
    pub fn intern(interner: &StringInterner, path: &str) -> Self {
        TypeIdent(interner.intern(path))
    }

    #[inline]
    pub const fn name(self) -> Name {
        self.0
    }

    /// Fully qualified path.
    pub fn path(self, interner: &StringInterner) -> &'static str {
        interner.lookup(self.0)
    }

    /// Last path segment (`Point` for `geom.Point`).
    pub fn simple_name(self, interner: &StringInterner) -> &'static str {
        let path = interner.lookup(self.0);
        path.rsplit('.').next().unwrap_or(path)
    }
}

/// Declared type of a component.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    Unit,
    Int,
    Float,
    Bool,
    Str,
    Char,
    List(Box<Ty>),
    Option(Box<Ty>),
    Tuple(Vec<Ty>),
    /// Another nominal type, typically a nested structural product.
    Named(TypeIdent),
}

impl Ty {
    pub fn list(elem: Ty) -> Ty {
        Ty::List(Box::new(elem))
    }

    pub fn option(inner: Ty) -> Ty {
        Ty::Option(Box::new(inner))
    }

    /// Render with paths resolved through `interner`.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> TyDisplay<'a> {
        TyDisplay { ty: self, interner }
    }
}

/// `Display` adapter returned by [`Ty::display`].
pub struct TyDisplay<'a> {
    ty: &'a Ty,
    interner: &'a StringInterner,
}

impl fmt::Display for TyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Ty::Unit => f.write_str("()"),
            Ty::Int => f.write_str("int"),
            Ty::Float => f.write_str("float"),
            Ty::Bool => f.write_str("bool"),
            Ty::Str => f.write_str("str"),
            Ty::Char => f.write_str("char"),
            Ty::List(elem) => write!(f, "[{}]", elem.display(self.interner)),
            Ty::Option(inner) => write!(f, "Option<{}>", inner.display(self.interner)),
            Ty::Tuple(elems) => {
                f.write_str("(")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", elem.display(self.interner))?;
                }
                f.write_str(")")
            }
            Ty::Named(ident) => f.write_str(ident.path(self.interner)),
        }
    }
}
