#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use keel_ir::{Literal, MatchPattern, Span, Ty};
use keel_types::{BindFn, DestructuringContract, MirrorError, Value};
use pretty_assertions::assert_eq;

use crate::test_helpers::Fixture;
use crate::{compile_unit, BinderConfig, CompiledUnit, SiteDecl};

fn compile(fx: &Fixture, sites: Vec<SiteDecl>) -> CompiledUnit {
    compile_unit(&fx.registry, &fx.unit(sites), BinderConfig::default()).unwrap()
}

#[test]
fn point_let_binds_components() {
    let fx = Fixture::new();
    let unit = compile(
        &fx,
        vec![SiteDecl::let_site(
            fx.de("Point", vec![fx.bind("a"), fx.bind("b")], Span::new(4, 14)),
            Some(Ty::Named(fx.point)),
            Span::new(0, 20),
        )],
    );
    let site = &unit.sites()[0];
    let value = fx.point_value(3, 4);

    let (arm, bindings) = unit.matcher().match_site(site, &value).unwrap().unwrap();
    assert_eq!(arm, 0);
    assert_eq!(
        bindings,
        vec![(fx.name("a"), Value::int(3)), (fx.name("b"), Value::int(4))]
    );

    // Paths reach the same values the walk bound.
    for (name, path) in &site.arms[0].bindings {
        let projected = unit.matcher().project(&value, path).unwrap();
        let bound = &bindings.iter().find(|(n, _)| n == name).unwrap().1;
        assert_eq!(&projected, bound);
    }
}

#[test]
fn first_matching_arm_wins() {
    let fx = Fixture::new();
    let zero = || MatchPattern::Literal(Literal::Int(0));
    let unit = compile(
        &fx,
        vec![SiteDecl::match_site(
            vec![
                fx.de("Point", vec![zero(), fx.bind("y")], Span::new(0, 10)),
                fx.de("Point", vec![fx.bind("x"), zero()], Span::new(20, 30)),
                fx.de("Point", vec![MatchPattern::Wildcard, MatchPattern::Wildcard], Span::new(40, 50)),
            ],
            Some(Ty::Named(fx.point)),
            Span::new(0, 60),
        )],
    );
    let site = &unit.sites()[0];
    let matcher = unit.matcher();

    let arm = |x, y| matcher.match_site(site, &fx.point_value(x, y)).unwrap().unwrap();
    assert_eq!(arm(0, 0), (0, vec![(fx.name("y"), Value::int(0))]));
    assert_eq!(arm(5, 0), (1, vec![(fx.name("x"), Value::int(5))]));
    assert_eq!(arm(5, 6), (2, vec![]));
}

#[test]
fn nested_line_pattern() {
    let fx = Fixture::new();
    let unit = compile(
        &fx,
        vec![SiteDecl::param(
            fx.de(
                "Line",
                vec![
                    fx.de("Point", vec![fx.bind("x0"), MatchPattern::Wildcard], Span::new(5, 15)),
                    MatchPattern::At {
                        name: fx.name("end"),
                        inner: Box::new(fx.de(
                            "Point",
                            vec![MatchPattern::Wildcard, fx.bind("y1")],
                            Span::new(17, 27),
                        )),
                    },
                ],
                Span::new(0, 28),
            ),
            Ty::Named(fx.line),
            Span::new(0, 30),
        )],
    );
    let value = fx.line_value((1, 2), (3, 4));

    let bindings = unit
        .matcher()
        .match_pattern(&unit.sites()[0].arms[0].pattern, &value)
        .unwrap()
        .unwrap();
    assert_eq!(
        bindings,
        vec![
            (fx.name("x0"), Value::int(1)),
            (fx.name("end"), fx.point_value(3, 4)),
            (fx.name("y1"), Value::int(4)),
        ]
    );
}

#[test]
fn tuples_literals_and_or_patterns() {
    let fx = Fixture::new();
    let pattern = MatchPattern::Tuple(vec![
        MatchPattern::Or(vec![
            MatchPattern::Literal(Literal::Str(fx.name("north"))),
            MatchPattern::Literal(Literal::Str(fx.name("south"))),
        ]),
        fx.de("Point", vec![fx.bind("a"), fx.bind("b")], Span::new(0, 10)),
    ]);
    let unit = compile(
        &fx,
        vec![SiteDecl::match_site(vec![pattern], None, Span::new(0, 30))],
    );
    let site = &unit.sites()[0];
    let matcher = unit.matcher();

    let hit = Value::tuple(vec![Value::string("south"), fx.point_value(1, 2)]);
    let miss = Value::tuple(vec![Value::string("east"), fx.point_value(1, 2)]);
    assert_eq!(
        matcher.match_site(site, &hit).unwrap(),
        Some((
            0,
            vec![(fx.name("a"), Value::int(1)), (fx.name("b"), Value::int(2))]
        ))
    );
    assert_eq!(matcher.match_site(site, &miss).unwrap(), None);
}

#[test]
fn bind_runs_once_per_deconstruction() {
    let mut fx = Fixture::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let bind: BindFn = Arc::new(move |value: &Value| {
        counter.fetch_add(1, Ordering::SeqCst);
        match value {
            Value::Record(r) => Ok(r.fields.to_vec()),
            other => Err(MirrorError::ComponentAccess {
                ty: "geom.Point".into(),
                detail: format!("not a point: {}", other.kind_name()),
            }),
        }
    });
    fx.registry.register_user_contract(DestructuringContract::user_supplied(
        fx.point,
        "geom.Point",
        vec![Ty::Int, Ty::Int],
        bind,
    ));
    let unit = compile(
        &fx,
        vec![SiteDecl::let_site(
            fx.de("Point", vec![fx.bind("a"), fx.bind("b")], Span::new(0, 10)),
            None,
            Span::new(0, 12),
        )],
    );

    let bindings = unit
        .matcher()
        .match_pattern(&unit.sites()[0].arms[0].pattern, &fx.point_value(7, 8))
        .unwrap()
        .unwrap();
    assert_eq!(bindings.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn bind_failure_propagates() {
    let fx = Fixture::new();
    let unit = compile(
        &fx,
        vec![SiteDecl::let_site(
            fx.de("Point", vec![fx.bind("a"), fx.bind("b")], Span::new(0, 10)),
            None,
            Span::new(0, 12),
        )],
    );
    let result = unit
        .matcher()
        .match_pattern(&unit.sites()[0].arms[0].pattern, &Value::int(1));
    assert!(matches!(result, Err(MirrorError::ComponentAccess { .. })));
}

#[test]
fn arms_of_different_types_fall_through() {
    let fx = Fixture::new();
    let unit = compile(
        &fx,
        vec![SiteDecl::match_site(
            vec![
                fx.de("Point", vec![fx.bind("a"), fx.bind("b")], Span::new(0, 10)),
                fx.de("geom.Line", vec![fx.bind("p"), fx.bind("q")], Span::new(20, 34)),
            ],
            None,
            Span::new(0, 40),
        )],
    );
    let site = &unit.sites()[0];

    let (arm, bindings) = unit
        .matcher()
        .match_site(site, &fx.line_value((1, 2), (3, 4)))
        .unwrap()
        .unwrap();
    assert_eq!(arm, 1);
    assert_eq!(
        bindings,
        vec![
            (fx.name("p"), fx.point_value(1, 2)),
            (fx.name("q"), fx.point_value(3, 4)),
        ]
    );

    let (arm, _) = unit.matcher().match_site(site, &fx.point_value(5, 6)).unwrap().unwrap();
    assert_eq!(arm, 0);
}
