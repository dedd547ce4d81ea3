#![no_main]
//! Fuzz target: inliner over structurally generated programs.
//!
//! Invariants checked:
//! - The pass never panics, including on nested effect-open wrappers.
//! - The installed observer has no influence on the rewritten program.
//! - Freshening consumes exactly one unique per spliced value binder.
//! - A program without candidate references is returned unchanged.

use arbitrary::{Arbitrary, Result, Unstructured};
use ember_base::Name;
use ember_core::{
    Branch, Def, DefGroup, EffectRow, Expr, Guard, Param, Pattern, PrettyEnv, Program, Type,
    TypeVar,
};
use ember_inline::{
    inline_program_observed, InlineDef, InlineOptions, Inlines, NoopSink, RecordingSink,
};
use libfuzzer_sys::fuzz_target;

const NAMES: &[&str] = &["x", "y", "g", "fuzz/id", "fuzz/const", "fuzz/loop", "fuzz/k"];
const MAX_DEPTH: usize = 6;

fn int() -> Type {
    Type::con("int")
}

fn pick(u: &mut Unstructured<'_>) -> Result<Name> {
    Ok(Name::new(*u.choose(NAMES)?))
}

fn expr(u: &mut Unstructured<'_>, depth: usize) -> Result<Expr> {
    if depth >= MAX_DEPTH || u.is_empty() {
        return Ok(if bool::arbitrary(u)? {
            Expr::var(pick(u)?, int())
        } else {
            Expr::int(i64::arbitrary(u)?)
        });
    }
    let depth = depth + 1;
    Ok(match u.int_in_range(0..=7u8)? {
        0 => Expr::var(pick(u)?, int()),
        1 => {
            let func = expr(u, depth)?;
            let count = u.int_in_range(0..=3usize)?;
            let args = (0..count).map(|_| expr(u, depth)).collect::<Result<_>>()?;
            Expr::app(func, args)
        }
        2 => Expr::type_app(expr(u, depth)?, vec![int()]),
        3 => Expr::lam(
            vec![Param::new(pick(u)?, int())],
            EffectRow::total(),
            expr(u, depth)?,
        ),
        4 => {
            let name = pick(u)?;
            let rhs = expr(u, depth)?;
            let group = if bool::arbitrary(u)? {
                DefGroup::NonRec {
                    def: Def::new(name, int(), rhs),
                }
            } else {
                DefGroup::Rec {
                    defs: vec![Def::new(name, int(), rhs)],
                }
            };
            Expr::let_in(vec![group], expr(u, depth)?)
        }
        5 => Expr::case(
            vec![expr(u, depth)?],
            vec![Branch {
                patterns: vec![Pattern::con(
                    "fuzz/Pair",
                    vec![Pattern::var(pick(u)?, int()), Pattern::Wildcard],
                )],
                guards: vec![Guard {
                    test: expr(u, depth)?,
                    expr: expr(u, depth)?,
                }],
            }],
        ),
        6 => Expr::open_effect(
            expr(u, depth)?,
            EffectRow::total(),
            EffectRow::open(Vec::<Name>::new(), TypeVar::effect(u64::from(u8::arbitrary(u)?))),
        ),
        _ => Expr::type_lam(vec![TypeVar::star(1)], expr(u, depth)?),
    })
}

fn candidates(u: &mut Unstructured<'_>) -> Result<Inlines> {
    let mut inlines = Inlines::new();
    for name in ["fuzz/id", "fuzz/const", "fuzz/loop"] {
        if bool::arbitrary(u)? {
            let body = expr(u, MAX_DEPTH - 2)?;
            inlines.insert(InlineDef::new(name, body, name == "fuzz/loop"));
        }
    }
    Ok(inlines)
}

fn program(u: &mut Unstructured<'_>) -> Result<Program> {
    let count = u.int_in_range(1..=4usize)?;
    let groups = (0..count)
        .map(|index| -> Result<DefGroup> {
            Ok(DefGroup::NonRec {
                def: Def::new(format!("fuzz/value{index}"), int(), expr(u, 0)?),
            })
        })
        .collect::<Result<_>>()?;
    Ok(Program {
        module: Name::new("fuzz"),
        groups,
    })
}

/// Lambda parameters, let binders and pattern variables.
fn value_binders(expr: &Expr) -> u64 {
    match expr {
        Expr::Var { .. } | Expr::Con { .. } | Expr::Lit { .. } => 0,
        Expr::App { func, args } => value_binders(func) + args.iter().map(value_binders).sum::<u64>(),
        Expr::TypeApp { expr, .. } | Expr::TypeLam { body: expr, .. } => value_binders(expr),
        Expr::Lam { params, body, .. } => params.len() as u64 + value_binders(body),
        Expr::Let { groups, body } => {
            groups
                .iter()
                .flat_map(|g| g.defs())
                .map(|d| 1 + value_binders(&d.expr))
                .sum::<u64>()
                + value_binders(body)
        }
        Expr::Case {
            scrutinees,
            branches,
        } => {
            scrutinees.iter().map(value_binders).sum::<u64>()
                + branches
                    .iter()
                    .map(|b| {
                        b.patterns.iter().map(|p| p.binders().len() as u64).sum::<u64>()
                            + b.guards
                                .iter()
                                .map(|g| value_binders(&g.test) + value_binders(&g.expr))
                                .sum::<u64>()
                    })
                    .sum::<u64>()
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(inlines) = candidates(&mut u) else {
        return;
    };
    let Ok(program) = program(&mut u) else {
        return;
    };
    let env = PrettyEnv::new();
    let options = InlineOptions {
        freshen_binders: true,
        ..InlineOptions::default()
    };

    let mut sink = RecordingSink::new();
    let (recorded, watermark) =
        inline_program_observed(program.clone(), &inlines, 0, &env, &options, &mut sink);
    let (silent, silent_watermark) =
        inline_program_observed(program.clone(), &inlines, 0, &env, &options, &mut NoopSink);
    assert_eq!(recorded, silent);
    assert_eq!(watermark, silent_watermark);

    let spliced: u64 = sink
        .inlined()
        .filter_map(|event| inlines.lookup(&event.name))
        .map(|def| value_binders(&def.body))
        .sum();
    assert_eq!(watermark, spliced);

    let (untouched, _) = inline_program_observed(
        program.clone(),
        &Inlines::new(),
        0,
        &env,
        &options,
        &mut NoopSink,
    );
    assert_eq!(untouched, program);
});
