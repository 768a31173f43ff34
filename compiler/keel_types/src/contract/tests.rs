#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::sync::Arc;

use keel_ir::{SharedInterner, Ty, TypeDecl, TypeIdent};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn point_decl(interner: &SharedInterner) -> TypeDecl {
    TypeDecl::record(
        TypeIdent::intern(interner, "geom.Point"),
        [(interner.intern("x"), Ty::Int), (interner.intern("y"), Ty::Int)],
    )
}

#[test]
fn synthesized_contract_matches_descriptor() {
    let interner = SharedInterner::new();
    let synthesized = synthesize_contract(&point_decl(&interner), &interner).unwrap();
    let contract = &synthesized.contract;

    assert_eq!(contract.arity(), 2);
    assert_eq!(contract.path(), "geom.Point");
    assert_eq!(contract.origin(), ContractOrigin::Synthesized);
    assert_eq!(contract.component_types(), synthesized.metadata.types());
}

#[test]
fn bind_returns_components_in_canonical_order() {
    let interner = SharedInterner::new();
    let synthesized = synthesize_contract(&point_decl(&interner), &interner).unwrap();
    let p = synthesized
        .metadata
        .construct(&[Value::int(3), Value::int(4)])
        .unwrap();

    assert_eq!(
        synthesized.contract.bind(&p).unwrap(),
        vec![Value::int(3), Value::int(4)]
    );
}

#[test]
fn bind_rejects_foreign_values() {
    let interner = SharedInterner::new();
    let synthesized = synthesize_contract(&point_decl(&interner), &interner).unwrap();
    let other = Value::record(TypeIdent::intern(&interner, "geom.Size"), vec![]);

    assert!(matches!(
        synthesized.contract.bind(&other),
        Err(MirrorError::ComponentAccess { .. })
    ));
}

#[test]
fn non_products_are_not_synthesized() {
    let interner = SharedInterner::new();
    let mut decl = point_decl(&interner);
    decl.components[0].mutable = true;

    assert!(matches!(
        synthesize_contract(&decl, &interner),
        Err(SynthesisError::NotAProduct(errors)) if errors.len() == 1
    ));
}

#[test]
fn user_supplied_contract_is_checked_against_its_arity() {
    let interner = SharedInterner::new();
    let ident = TypeIdent::intern(&interner, "geom.Polar");
    let bind: BindFn = Arc::new(|_: &Value| Ok(vec![Value::int(1)]));
    let contract =
        DestructuringContract::user_supplied(ident, "geom.Polar", vec![Ty::Float, Ty::Float], bind);

    assert_eq!(contract.origin(), ContractOrigin::UserSupplied);
    assert!(matches!(
        contract.bind(&Value::Unit),
        Err(MirrorError::MalformedMetadata { .. })
    ));
}

#[test]
fn zero_arity_contract_binds_nothing() {
    let interner = SharedInterner::new();
    let decl = TypeDecl::record(TypeIdent::intern(&interner, "Marker"), []);
    let synthesized = synthesize_contract(&decl, &interner).unwrap();
    let marker = synthesized.metadata.construct(&[]).unwrap();

    assert_eq!(synthesized.contract.arity(), 0);
    assert_eq!(synthesized.contract.bind(&marker).unwrap(), Vec::<Value>::new());
}

proptest! {
    #[test]
    fn construct_after_bind_is_identity(
        x in any::<i64>(),
        label in "[a-z]{0,8}",
        flag in any::<bool>(),
    ) {
        let interner = SharedInterner::new();
        let decl = TypeDecl::record(
            TypeIdent::intern(&interner, "demo.Tagged"),
            [
                (interner.intern("x"), Ty::Int),
                (interner.intern("label"), Ty::Str),
                (interner.intern("flag"), Ty::Bool),
            ],
        );
        let synthesized = synthesize_contract(&decl, &interner).unwrap();
        let value = synthesized
            .metadata
            .construct(&[Value::int(x), Value::string(&label), Value::Bool(flag)])
            .unwrap();

        let parts = synthesized.contract.bind(&value).unwrap();
        prop_assert_eq!(synthesized.metadata.construct(&parts).unwrap(), value);
    }
}
