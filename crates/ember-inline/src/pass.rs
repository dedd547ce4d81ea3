//! Call-site inlining over type-checked core programs.
//!
//! A reference to a known, non-recursive candidate is replaced by a copy of the
//! candidate's stored body when the call site supplies at least as many type
//! and value arguments as the body's leading binders consume. Arguments are
//! left applied to the copy; beta-reduction belongs to a later pass.

use ember_base::{Name, UniqueSupply};
use ember_core::{names, Branch, Def, DefGroup, Expr, Guard, PrettyEnv, Program};

use crate::arity::Arity;
use crate::candidates::{InlineDef, Inlines};
use crate::freshen::freshen_binders;
use crate::options::InlineOptions;
use crate::trace::{Decision, InlineEvent, InlineObserver, NoopSink, RejectReason, TracingSink};

/// Inline `program` against `inlines`, starting the unique supply at `unique`.
///
/// Returns the rewritten program and the advanced unique watermark. Decisions
/// are reported through `tracing` when `options.trace` is set.
pub fn inline_program(
    program: Program,
    inlines: &Inlines,
    unique: u64,
    options: &InlineOptions,
) -> (Program, u64) {
    let env = PrettyEnv::new();
    if options.trace {
        inline_program_observed(program, inlines, unique, &env, options, &mut TracingSink)
    } else {
        inline_program_observed(program, inlines, unique, &env, options, &mut NoopSink)
    }
}

/// Like [`inline_program`] but reports every decision to `observer`.
pub fn inline_program_observed(
    program: Program,
    inlines: &Inlines,
    unique: u64,
    env: &PrettyEnv,
    options: &InlineOptions,
    observer: &mut dyn InlineObserver,
) -> (Program, u64) {
    let mut inliner = Inliner {
        env,
        inlines,
        options,
        observer,
        unique: UniqueSupply::new(unique),
        current_defs: Vec::new(),
        stats: InlineStats::default(),
    };
    let Program { module, groups } = program;
    let groups = inliner.inline_groups(groups);
    debug_assert!(inliner.current_defs.is_empty());
    tracing::debug!(
        target: "ember::inline",
        module = %module,
        inlined = inliner.stats.inlined,
        rejected = inliner.stats.rejected,
        not_candidate = inliner.stats.not_candidate,
        "inline pass finished"
    );
    (Program { module, groups }, inliner.unique.watermark())
}

#[derive(Debug, Default)]
struct InlineStats {
    inlined: usize,
    rejected: usize,
    not_candidate: usize,
}

struct Inliner<'a, 'o> {
    env: &'a PrettyEnv,
    inlines: &'a Inlines,
    options: &'a InlineOptions,
    observer: &'o mut dyn InlineObserver,
    unique: UniqueSupply,
    /// Definitions whose bodies are being rewritten, outermost first.
    current_defs: Vec<Name>,
    stats: InlineStats,
}

impl Inliner<'_, '_> {
    fn inline_groups(&mut self, groups: Vec<DefGroup>) -> Vec<DefGroup> {
        groups.into_iter().map(|g| self.inline_group(g)).collect()
    }

    /// Members of a recursive group are rewritten independently, each against
    /// the same database.
    fn inline_group(&mut self, group: DefGroup) -> DefGroup {
        match group {
            DefGroup::NonRec { def } => DefGroup::NonRec {
                def: self.inline_def(def),
            },
            DefGroup::Rec { defs } => DefGroup::Rec {
                defs: defs.into_iter().map(|d| self.inline_def(d)).collect(),
            },
        }
    }

    fn inline_def(&mut self, def: Def) -> Def {
        let Def { name, ty, expr } = def;
        let expr = self.with_current_def(&name, |this| this.inline_expr(expr));
        Def { name, ty, expr }
    }

    fn with_current_def<T>(&mut self, name: &Name, f: impl FnOnce(&mut Self) -> T) -> T {
        self.current_defs.push(name.clone());
        let result = f(self);
        self.current_defs.pop();
        result
    }

    fn inline_expr(&mut self, expr: Expr) -> Expr {
        match expr {
            Expr::Lam {
                params,
                effect,
                body,
            } => Expr::Lam {
                params,
                effect,
                body: Box::new(self.inline_expr(*body)),
            },
            Expr::Let { groups, body } => {
                let groups = self.inline_groups(groups);
                Expr::Let {
                    groups,
                    body: Box::new(self.inline_expr(*body)),
                }
            }
            Expr::Case {
                scrutinees,
                branches,
            } => {
                let scrutinees = scrutinees
                    .into_iter()
                    .map(|s| self.inline_expr(s))
                    .collect();
                let branches = branches
                    .into_iter()
                    .map(|b| self.inline_branch(b))
                    .collect();
                Expr::Case {
                    scrutinees,
                    branches,
                }
            }
            Expr::TypeLam { vars, body } => Expr::TypeLam {
                vars,
                body: Box::new(self.inline_expr(*body)),
            },
            Expr::TypeApp { expr, types } => {
                let available = Arity::new(types.len(), 0);
                Expr::TypeApp {
                    expr: Box::new(self.inline_call_site(*expr, available)),
                    types,
                }
            }
            Expr::App { func, args } => match *func {
                Expr::TypeApp { expr, types } => {
                    let available = Arity::new(types.len(), effective_value_args(&args));
                    let callee = self.inline_call_site(*expr, available);
                    let args = self.inline_args(args);
                    Expr::App {
                        func: Box::new(Expr::TypeApp {
                            expr: Box::new(callee),
                            types,
                        }),
                        args,
                    }
                }
                func => {
                    let available = Arity::new(0, effective_value_args(&args));
                    let args = self.inline_args(args);
                    Expr::App {
                        func: Box::new(self.inline_call_site(func, available)),
                        args,
                    }
                }
            },
            e @ Expr::Var { .. } => self.inline_call_site(e, Arity::ZERO),
            e @ (Expr::Con { .. } | Expr::Lit { .. }) => e,
        }
    }

    fn inline_args(&mut self, args: Vec<Expr>) -> Vec<Expr> {
        args.into_iter().map(|a| self.inline_expr(a)).collect()
    }

    fn inline_branch(&mut self, branch: Branch) -> Branch {
        let Branch { patterns, guards } = branch;
        let guards = guards
            .into_iter()
            .map(|g| Guard {
                test: self.inline_expr(g.test),
                expr: self.inline_expr(g.expr),
            })
            .collect();
        Branch { patterns, guards }
    }

    /// Decide one call site whose callee is `callee` and which supplies
    /// `available` arguments.
    fn inline_call_site(&mut self, callee: Expr, available: Arity) -> Expr {
        let callee = match split_effect_open(callee) {
            Ok((open, inner)) => {
                let inner = self.inline_call_site(inner, available);
                return Expr::App {
                    func: open,
                    args: vec![inner],
                };
            }
            Err(callee) => callee,
        };

        let Expr::Var { name, ty } = callee else {
            return callee;
        };

        let inlines = self.inlines;
        let Some(candidate) = inlines.lookup(&name) else {
            self.stats.not_candidate += 1;
            self.report(&name, available, Decision::NotCandidate, None);
            return Expr::Var { name, ty };
        };

        if candidate.recursive {
            self.stats.rejected += 1;
            self.report(
                &name,
                available,
                Decision::Rejected {
                    reason: RejectReason::Recursive,
                },
                None,
            );
            return Expr::Var { name, ty };
        }

        let required = candidate.arity();
        if !required.is_saturated_by(available) {
            self.stats.rejected += 1;
            self.report(
                &name,
                available,
                Decision::Rejected {
                    reason: RejectReason::UnderSaturated { required },
                },
                None,
            );
            return Expr::Var { name, ty };
        }

        self.stats.inlined += 1;
        self.report(
            &name,
            available,
            Decision::Inlined { arity: required },
            Some(candidate),
        );
        let body = candidate.body.clone();
        if self.options.freshen_binders {
            freshen_binders(body, &mut self.unique)
        } else {
            body
        }
    }

    fn report(
        &mut self,
        name: &Name,
        available: Arity,
        decision: Decision,
        candidate: Option<&InlineDef>,
    ) {
        if !self.observer.enabled() {
            return;
        }
        let shown = self.env.name(name);
        let message = match (&decision, candidate) {
            (Decision::Inlined { .. }, Some(candidate)) => {
                format!("inlined: {shown} = {}", self.env.expr(&candidate.body))
            }
            (Decision::Inlined { .. }, None) => format!("inlined: {shown}"),
            (Decision::NotCandidate, _) => format!("not an inline candidate: {shown}"),
            (Decision::Rejected { reason }, _) => match reason {
                RejectReason::Recursive => {
                    format!("inline candidate rejected: {shown} is recursive")
                }
                RejectReason::UnderSaturated { required } => format!(
                    "inline candidate rejected: {shown} needs {required} arguments, call supplies {available}"
                ),
            },
        };
        let event = InlineEvent {
            name: name.clone(),
            current_def: self.current_defs.clone(),
            available,
            decision,
            message,
        };
        self.observer.observe(event);
    }
}

/// Value-argument count a call site offers. Calls that only forward variables
/// count as zero so pure eta-wrappers are not expanded.
fn effective_value_args(args: &[Expr]) -> usize {
    if args.iter().all(Expr::is_var) {
        0
    } else {
        args.len()
    }
}

/// Split `open[..](f)` into the coercion head and `f`; anything else is
/// handed back unchanged.
fn split_effect_open(expr: Expr) -> Result<(Box<Expr>, Expr), Expr> {
    match expr {
        Expr::App { func, mut args } if args.len() == 1 && is_effect_open_head(&func) => {
            match args.pop() {
                Some(inner) => Ok((func, inner)),
                None => Err(Expr::App { func, args }),
            }
        }
        other => Err(other),
    }
}

fn is_effect_open_head(expr: &Expr) -> bool {
    let head = match expr {
        Expr::TypeApp { expr, .. } => expr.as_ref(),
        other => other,
    };
    matches!(head, Expr::Var { name, .. } if names::is_effect_open(name))
}
