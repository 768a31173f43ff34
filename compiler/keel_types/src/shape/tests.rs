#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use keel_diagnostic::ErrorCode;
use keel_ir::{AccessorDecl, CtorDecl, SharedInterner, Span, Ty, TypeDecl, TypeIdent};
use pretty_assertions::assert_eq;

use super::*;

fn point(interner: &SharedInterner) -> TypeDecl {
    TypeDecl::record(
        TypeIdent::intern(interner, "geom.Point"),
        [(interner.intern("x"), Ty::Int), (interner.intern("y"), Ty::Int)],
    )
}

#[test]
fn record_is_recognized() {
    let interner = SharedInterner::new();
    let shape = ProductShape::recognize(&point(&interner)).unwrap();
    assert_eq!(shape.arity(), 2);
    assert_eq!(
        shape.labels().collect::<Vec<_>>(),
        vec![interner.intern("x"), interner.intern("y")]
    );
}

#[test]
fn empty_record_is_a_product() {
    let interner = SharedInterner::new();
    let decl = TypeDecl::record(TypeIdent::intern(&interner, "Unit"), []);
    assert_eq!(ProductShape::recognize(&decl).unwrap().arity(), 0);
}

#[test]
fn mutable_component_is_rejected() {
    let interner = SharedInterner::new();
    let mut decl = point(&interner);
    decl.components[1].mutable = true;
    decl.components[1].span = Span::new(10, 11);

    let errors = ProductShape::recognize(&decl).unwrap_err();
    assert_eq!(
        errors,
        vec![ShapeError::MutableComponent {
            label: interner.intern("y"),
            span: Span::new(10, 11),
        }]
    );
    assert_eq!(errors[0].code(), ErrorCode::E2101);
}

#[test]
fn canonical_constructor_must_be_unique() {
    let interner = SharedInterner::new();
    let mut decl = point(&interner);
    decl.constructors[0].canonical = false;
    assert_eq!(
        ProductShape::recognize(&decl).unwrap_err(),
        vec![ShapeError::CanonicalConstructor { found: 0 }]
    );

    let mut decl = point(&interner);
    let extra = decl.constructors[0].clone();
    decl.constructors.push(extra);
    assert_eq!(
        ProductShape::recognize(&decl).unwrap_err(),
        vec![ShapeError::CanonicalConstructor { found: 2 }]
    );
}

#[test]
fn non_canonical_constructors_are_ignored() {
    let interner = SharedInterner::new();
    let mut decl = point(&interner);
    decl.constructors.push(CtorDecl {
        params: vec![interner.intern("x")],
        canonical: false,
        span: Span::DUMMY,
    });
    assert!(ProductShape::recognize(&decl).is_ok());
}

#[test]
fn constructor_must_follow_component_order() {
    let interner = SharedInterner::new();
    let mut decl = point(&interner);
    decl.constructors[0].params.reverse();

    let errors = ProductShape::recognize(&decl).unwrap_err();
    assert!(matches!(errors.as_slice(), [ShapeError::ConstructorOrder { .. }]));
}

#[test]
fn accessor_problems_are_reported_per_component() {
    let interner = SharedInterner::new();
    let mut decl = point(&interner);
    decl.accessors.retain(|a| a.name != interner.intern("x"));
    decl.accessors[0].param_count = 1;

    let errors = ProductShape::recognize(&decl).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], ShapeError::MissingAccessor { .. }));
    assert!(matches!(
        errors[1],
        ShapeError::AccessorTakesArguments { count: 1, .. }
    ));
    assert!(errors.iter().all(|e| e.code() == ErrorCode::E2104));
}

#[test]
fn overloaded_accessor_with_zero_args_is_accepted() {
    let interner = SharedInterner::new();
    let mut decl = point(&interner);
    decl.accessors.push(AccessorDecl {
        name: interner.intern("x"),
        param_count: 2,
        span: Span::DUMMY,
    });
    assert!(ProductShape::recognize(&decl).is_ok());
}

#[test]
fn duplicate_labels_are_rejected() {
    let interner = SharedInterner::new();
    let mut decl = point(&interner);
    let dup = decl.components[0].clone();
    decl.components.push(dup);

    let errors = ProductShape::recognize(&decl).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ShapeError::DuplicateComponent { .. })));
}

#[test]
fn diagnostic_names_the_type_and_component() {
    let interner = SharedInterner::new();
    let mut decl = point(&interner);
    decl.components[0].mutable = true;
    decl.components[0].span = Span::new(4, 5);

    let errors = ProductShape::recognize(&decl).unwrap_err();
    let diag = errors[0].to_diagnostic(decl.ident, decl.span, &interner);
    assert_eq!(diag.code, ErrorCode::E2101);
    assert_eq!(diag.message, "component `x` of `geom.Point` is mutable");
    assert_eq!(diag.primary_span(), Some(Span::new(4, 5)));
}

#[test]
fn order_diagnostic_lists_both_sides() {
    let interner = SharedInterner::new();
    let mut decl = point(&interner);
    decl.constructors[0].params.reverse();

    let errors = ProductShape::recognize(&decl).unwrap_err();
    let diag = errors[0].to_diagnostic(decl.ident, decl.span, &interner);
    assert_eq!(diag.labels[0].message, "parameters are (y, x)");
    assert_eq!(diag.notes, vec!["components are (x, y)".to_string()]);
}
