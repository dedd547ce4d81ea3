use ember_base::Name;
use ember_core::{
    Branch, Def, DefGroup, EffectRow, Expr, Guard, Param, Pattern, PrettyEnv, Program, Type,
    TypeVar,
};
use ember_inline::{
    inline_program_observed, Arity, Decision, InlineDef, InlineOptions, Inlines, NoopSink,
    RecordingSink, RejectReason,
};
use proptest::prelude::*;

const STRANGERS: &[&str] = &["x", "y", "k", "g", "std/core/+"];
const MIXED: &[&str] = &[
    "x",
    "y",
    "g",
    "std/core/+",
    "main/double",
    "main/answer",
    "main/poly",
    "main/fib",
];
const BINDERS: &[&str] = &["x", "y", "k"];

fn int() -> Type {
    Type::con("int")
}

fn candidates(recursive: bool) -> Inlines {
    let double = Expr::lam(
        vec![Param::new("x", int())],
        EffectRow::total(),
        Expr::app(
            Expr::var("std/core/+", int()),
            vec![Expr::var("x", int()), Expr::var("x", int())],
        ),
    );
    let poly = Expr::type_lam(
        vec![TypeVar::star(1)],
        Expr::lam(
            vec![Param::new("v", Type::var(TypeVar::star(1)))],
            EffectRow::total(),
            Expr::var("v", Type::var(TypeVar::star(1))),
        ),
    );
    let fib = Expr::lam(
        vec![Param::new("n", int())],
        EffectRow::total(),
        Expr::app(Expr::var("main/fib", int()), vec![Expr::var("n", int())]),
    );
    vec![
        InlineDef::new("main/double", double, recursive),
        InlineDef::new("main/answer", Expr::int(42), recursive),
        InlineDef::new("main/poly", poly, recursive),
        InlineDef::new("main/fib", fib, true),
    ]
    .into()
}

/// Value binders in each candidate body above.
fn binder_count(name: &Name) -> u64 {
    match name.as_str() {
        "main/double" | "main/poly" | "main/fib" => 1,
        _ => 0,
    }
}

fn binder() -> impl Strategy<Value = &'static str> {
    prop::sample::select(BINDERS)
}

fn expr_strategy(names: &'static [&'static str]) -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        prop::sample::select(names).prop_map(|name| Expr::var(name, int())),
        (0i64..100).prop_map(Expr::int),
    ];
    leaf.prop_recursive(4, 48, 3, |inner| {
        prop_oneof![
            (inner.clone(), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(func, args)| Expr::app(func, args)),
            inner
                .clone()
                .prop_map(|e| Expr::type_app(e, vec![int()])),
            (binder(), inner.clone()).prop_map(|(x, body)| Expr::lam(
                vec![Param::new(x, int())],
                EffectRow::total(),
                body
            )),
            (binder(), inner.clone(), inner.clone()).prop_map(|(x, rhs, body)| {
                Expr::let_in(
                    vec![DefGroup::NonRec {
                        def: Def::new(x, int(), rhs),
                    }],
                    body,
                )
            }),
            (inner.clone(), binder(), inner.clone(), inner.clone()).prop_map(
                |(scrutinee, x, bound, fallback)| Expr::case(
                    vec![scrutinee],
                    vec![
                        Branch {
                            patterns: vec![Pattern::var(x, int())],
                            guards: vec![Guard::always(bound)],
                        },
                        Branch {
                            patterns: vec![Pattern::Wildcard],
                            guards: vec![Guard::always(fallback)],
                        },
                    ],
                )
            ),
            inner.prop_map(|e| Expr::open_effect(
                e,
                EffectRow::total(),
                EffectRow::open(Vec::<Name>::new(), TypeVar::effect(9)),
            )),
        ]
    })
}

fn program_strategy(names: &'static [&'static str]) -> impl Strategy<Value = Program> {
    prop::collection::vec(expr_strategy(names), 1..5).prop_map(|exprs| Program {
        module: Name::new("prop"),
        groups: exprs
            .into_iter()
            .enumerate()
            .map(|(index, expr)| DefGroup::NonRec {
                def: Def::new(format!("prop/value{index}"), int(), expr),
            })
            .collect(),
    })
}

fn run(
    program: Program,
    inlines: &Inlines,
    unique: u64,
    options: &InlineOptions,
) -> (Program, u64, RecordingSink) {
    let mut sink = RecordingSink::new();
    let (out, watermark) =
        inline_program_observed(program, inlines, unique, &PrettyEnv::new(), options, &mut sink);
    (out, watermark, sink)
}

fn freshening() -> InlineOptions {
    InlineOptions {
        freshen_binders: true,
        ..InlineOptions::default()
    }
}

proptest! {
    #[test]
    fn programs_without_candidates_are_unchanged(program in program_strategy(STRANGERS)) {
        let (out, watermark, sink) = run(program.clone(), &candidates(false), 7, &freshening());
        prop_assert_eq!(out, program);
        prop_assert_eq!(watermark, 7);
        prop_assert!(sink.events.iter().all(|e| e.decision == Decision::NotCandidate));
    }

    #[test]
    fn recursive_candidates_are_never_inlined(program in program_strategy(MIXED)) {
        let (out, _, sink) = run(program.clone(), &candidates(true), 0, &InlineOptions::default());
        prop_assert_eq!(out, program);
        prop_assert_eq!(sink.inlined().count(), 0);
    }

    #[test]
    fn observer_does_not_change_the_result(program in program_strategy(MIXED), fresh in any::<bool>()) {
        let inlines = candidates(false);
        let options = InlineOptions { freshen_binders: fresh, ..InlineOptions::default() };
        let (recorded, recorded_watermark, _) = run(program.clone(), &inlines, 100, &options);
        let (silent, silent_watermark) = inline_program_observed(
            program,
            &inlines,
            100,
            &PrettyEnv::new(),
            &options,
            &mut NoopSink,
        );
        prop_assert_eq!(recorded, silent);
        prop_assert_eq!(recorded_watermark, silent_watermark);
    }

    #[test]
    fn decisions_agree_with_candidate_arity(program in program_strategy(MIXED)) {
        let inlines = candidates(false);
        let (_, _, sink) = run(program, &inlines, 0, &InlineOptions::default());
        for event in &sink.events {
            prop_assert!(!event.current_def.is_empty());
            prop_assert!(event.current_def[0].as_str().starts_with("prop/value"));
            let candidate = inlines.lookup(&event.name);
            match &event.decision {
                Decision::NotCandidate => prop_assert!(candidate.is_none()),
                Decision::Inlined { arity } => {
                    let candidate = candidate.expect("inlined names are candidates");
                    prop_assert!(!candidate.recursive);
                    prop_assert_eq!(*arity, candidate.arity());
                    prop_assert!(arity.is_saturated_by(event.available));
                }
                Decision::Rejected { reason: RejectReason::Recursive } => {
                    prop_assert!(candidate.expect("rejected names are candidates").recursive);
                }
                Decision::Rejected { reason: RejectReason::UnderSaturated { required } } => {
                    let candidate = candidate.expect("rejected names are candidates");
                    prop_assert_eq!(*required, candidate.arity());
                    prop_assert!(!required.is_saturated_by(event.available));
                }
            }
        }
    }

    #[test]
    fn freshening_consumes_one_unique_per_spliced_binder(program in program_strategy(MIXED)) {
        let (_, watermark, sink) = run(program, &candidates(false), 1000, &freshening());
        let expected: u64 = sink.inlined().map(|e| binder_count(&e.name)).sum();
        prop_assert_eq!(watermark - 1000, expected);
    }

    #[test]
    fn verbatim_splicing_leaves_the_counter_alone(program in program_strategy(MIXED)) {
        let (_, watermark, _) = run(program, &candidates(false), 1000, &InlineOptions::default());
        prop_assert_eq!(watermark, 1000);
    }

    #[test]
    fn forwarding_calls_are_not_expanded(args in prop::collection::vec(prop::sample::select(STRANGERS), 1..4)) {
        let call = Expr::app(
            Expr::var("main/double", int()),
            args.iter().map(|name| Expr::var(*name, int())).collect(),
        );
        let program = Program {
            module: Name::new("prop"),
            groups: vec![DefGroup::NonRec { def: Def::new("prop/forward", int(), call) }],
        };
        let (out, _, sink) = run(program.clone(), &candidates(false), 0, &InlineOptions::default());
        prop_assert_eq!(out, program);
        let double = sink.events.iter().find(|e| e.name == "main/double").expect("double was looked up");
        prop_assert_eq!(double.available, Arity::ZERO);
    }
}
