//! Runtime values.
//!
//! Instances of structural product types are [`RecordValue`]s whose fields
//! are stored in canonical component order. Values are immutable and cheap
//! to clone; aggregates share their storage through `Arc`.

use std::fmt;
use std::sync::Arc;

use keel_ir::{StringInterner, Ty, TypeIdent};

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Unit,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Arc<str>),
    Char(char),
    List(Arc<[Value]>),
    Tuple(Arc<[Value]>),
    None,
    Some(Arc<Value>),
    Record(RecordValue),
}

/// Instance of a structural product type.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordValue {
    pub ty: TypeIdent,
    /// Component values in canonical order.
    pub fields: Arc<[Value]>,
}

impl RecordValue {
    pub fn new(ty: TypeIdent, fields: impl Into<Arc<[Value]>>) -> Self {
        RecordValue {
            ty,
            fields: fields.into(),
        }
    }
}

impl Value {
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    pub fn string(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    pub fn tuple(elems: Vec<Value>) -> Self {
        Value::Tuple(elems.into())
    }

    pub fn list(elems: Vec<Value>) -> Self {
        Value::List(elems.into())
    }

    pub fn some(inner: Value) -> Self {
        Value::Some(Arc::new(inner))
    }

    pub fn record(ty: TypeIdent, fields: Vec<Value>) -> Self {
        Value::Record(RecordValue::new(ty, fields))
    }

    /// Short name of the value's runtime kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Unit => "()",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::Char(_) => "char",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::None | Value::Some(_) => "option",
            Value::Record(_) => "record",
        }
    }

    /// Runtime shape test: does this value inhabit `ty`?
    pub fn conforms_to(&self, ty: &Ty) -> bool {
        match (self, ty) {
            (Value::Unit, Ty::Unit)
            | (Value::Int(_), Ty::Int)
            | (Value::Float(_), Ty::Float)
            | (Value::Bool(_), Ty::Bool)
            | (Value::Str(_), Ty::Str)
            | (Value::Char(_), Ty::Char)
            | (Value::None, Ty::Option(_)) => true,
            (Value::List(elems), Ty::List(elem_ty)) => elems.iter().all(|e| e.conforms_to(elem_ty)),
            (Value::Some(inner), Ty::Option(inner_ty)) => inner.conforms_to(inner_ty),
            (Value::Tuple(elems), Ty::Tuple(elem_tys)) => {
                elems.len() == elem_tys.len()
                    && elems.iter().zip(elem_tys).all(|(e, t)| e.conforms_to(t))
            }
            (Value::Record(r), Ty::Named(ident)) => r.ty == *ident,
            _ => false,
        }
    }

    /// Render with record type paths resolved through `interner`.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> ValueDisplay<'a> {
        ValueDisplay {
            value: self,
            interner,
        }
    }
}

/// `Display` adapter returned by [`Value::display`].
pub struct ValueDisplay<'a> {
    value: &'a Value,
    interner: &'a StringInterner,
}

impl ValueDisplay<'_> {
    fn seq(&self, f: &mut fmt::Formatter<'_>, elems: &[Value]) -> fmt::Result {
        for (i, elem) in elems.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", elem.display(self.interner))?;
        }
        Ok(())
    }
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Unit => f.write_str("()"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::List(elems) => {
                f.write_str("[")?;
                self.seq(f, elems)?;
                f.write_str("]")
            }
            Value::Tuple(elems) => {
                f.write_str("(")?;
                self.seq(f, elems)?;
                f.write_str(")")
            }
            Value::None => f.write_str("None"),
            Value::Some(inner) => write!(f, "Some({})", inner.display(self.interner)),
            Value::Record(r) => {
                write!(f, "{}(", r.ty.simple_name(self.interner))?;
                self.seq(f, &r.fields)?;
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conformance_follows_structure() {
        let interner = StringInterner::new();
        let point = TypeIdent::intern(&interner, "geom.Point");
        let other = TypeIdent::intern(&interner, "geom.Size");

        let p = Value::record(point, vec![Value::int(1), Value::int(2)]);
        assert!(p.conforms_to(&Ty::Named(point)));
        assert!(!p.conforms_to(&Ty::Named(other)));

        let list = Value::list(vec![Value::int(1), Value::int(2)]);
        assert!(list.conforms_to(&Ty::list(Ty::Int)));
        assert!(!list.conforms_to(&Ty::list(Ty::Str)));

        assert!(Value::None.conforms_to(&Ty::option(Ty::Bool)));
        assert!(Value::some(Value::Bool(true)).conforms_to(&Ty::option(Ty::Bool)));

        let pair = Value::tuple(vec![Value::int(1), Value::string("a")]);
        assert!(pair.conforms_to(&Ty::Tuple(vec![Ty::Int, Ty::Str])));
        assert!(!pair.conforms_to(&Ty::Tuple(vec![Ty::Int])));
    }

    #[test]
    fn display_uses_simple_type_names() {
        let interner = StringInterner::new();
        let point = TypeIdent::intern(&interner, "geom.Point");
        let p = Value::record(point, vec![Value::int(3), Value::int(4)]);
        assert_eq!(p.display(&interner).to_string(), "Point(3, 4)");
        let nested = Value::tuple(vec![p, Value::some(Value::string("x"))]);
        assert_eq!(
            nested.display(&interner).to_string(),
            "(Point(3, 4), Some(\"x\"))"
        );
    }
}
