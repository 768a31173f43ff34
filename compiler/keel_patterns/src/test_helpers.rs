//! Shared fixtures for binder and matcher tests.

use keel_ir::{MatchPattern, Name, SharedInterner, Span, Ty, TypeDecl, TypeIdent};
use keel_types::{ProductRegistry, Value};

use crate::{PatternUnit, SiteDecl};

/// A session with `geom.Point(x: int, y: int)`,
/// `geom.Line(start: Point, end: Point)` and `geom.Counter`, which has a
/// mutable component and is therefore not a structural product.
pub(crate) struct Fixture {
    pub interner: SharedInterner,
    pub registry: ProductRegistry,
    pub point: TypeIdent,
    pub line: TypeIdent,
}

impl Fixture {
    pub fn new() -> Self {
        let interner = SharedInterner::new();
        let mut registry = ProductRegistry::new(interner.clone());
        let point = TypeIdent::intern(&interner, "geom.Point");
        let line = TypeIdent::intern(&interner, "geom.Line");
        let counter = TypeIdent::intern(&interner, "geom.Counter");

        registry.declare(
            TypeDecl::record(
                point,
                [(interner.intern("x"), Ty::Int), (interner.intern("y"), Ty::Int)],
            )
            .with_span(Span::new(0, 30)),
        );
        registry.declare(TypeDecl::record(
            line,
            [
                (interner.intern("start"), Ty::Named(point)),
                (interner.intern("end"), Ty::Named(point)),
            ],
        ));
        let mut counter_decl = TypeDecl::record(counter, [(interner.intern("count"), Ty::Int)]);
        counter_decl.components[0].mutable = true;
        registry.declare(counter_decl);

        Fixture {
            interner,
            registry,
            point,
            line,
        }
    }

    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn bind(&self, s: &str) -> MatchPattern {
        MatchPattern::Binding(self.name(s))
    }

    pub fn de(&self, ty: &str, args: Vec<MatchPattern>, span: Span) -> MatchPattern {
        MatchPattern::deconstruct(self.name(ty), args, span)
    }

    pub fn unit(&self, sites: Vec<SiteDecl>) -> PatternUnit {
        PatternUnit {
            name: "demo".to_owned(),
            exports: vec!["demo.main".to_owned()],
            sites,
        }
    }

    pub fn point_value(&self, x: i64, y: i64) -> Value {
        Value::record(self.point, vec![Value::int(x), Value::int(y)])
    }

    pub fn line_value(&self, from: (i64, i64), to: (i64, i64)) -> Value {
        Value::record(
            self.line,
            vec![self.point_value(from.0, from.1), self.point_value(to.0, to.1)],
        )
    }
}
