//! Alpha-renaming of the value binders in a spliced candidate body.
//!
//! Each binder gets `name.<unique>` with the unique drawn from the pass's
//! supply, in pre-order. Free variables and type variables are left alone.

use ember_base::{Name, UniqueSupply};
use ember_core::{Branch, Def, DefGroup, Expr, Guard, Param, Pattern};

pub fn freshen_binders(expr: Expr, unique: &mut UniqueSupply) -> Expr {
    let mut renamer = Renamer {
        unique,
        scope: Vec::new(),
    };
    renamer.expr(expr)
}

struct Renamer<'a> {
    unique: &'a mut UniqueSupply,
    scope: Vec<(Name, Name)>,
}

impl Renamer<'_> {
    fn bind(&mut self, name: Name) -> Name {
        let fresh = name.with_unique(self.unique.fresh());
        self.scope.push((name, fresh.clone()));
        fresh
    }

    fn resolve(&self, name: Name) -> Name {
        self.scope
            .iter()
            .rev()
            .find(|(old, _)| *old == name)
            .map(|(_, new)| new.clone())
            .unwrap_or(name)
    }

    fn expr(&mut self, expr: Expr) -> Expr {
        match expr {
            Expr::Var { name, ty } => Expr::Var {
                name: self.resolve(name),
                ty,
            },
            e @ (Expr::Con { .. } | Expr::Lit { .. }) => e,
            Expr::App { func, args } => Expr::App {
                func: Box::new(self.expr(*func)),
                args: args.into_iter().map(|a| self.expr(a)).collect(),
            },
            Expr::TypeApp { expr, types } => Expr::TypeApp {
                expr: Box::new(self.expr(*expr)),
                types,
            },
            Expr::TypeLam { vars, body } => Expr::TypeLam {
                vars,
                body: Box::new(self.expr(*body)),
            },
            Expr::Lam {
                params,
                effect,
                body,
            } => {
                let mark = self.scope.len();
                let params = params
                    .into_iter()
                    .map(|p| Param {
                        name: self.bind(p.name),
                        ty: p.ty,
                    })
                    .collect();
                let body = self.expr(*body);
                self.scope.truncate(mark);
                Expr::Lam {
                    params,
                    effect,
                    body: Box::new(body),
                }
            }
            Expr::Let { groups, body } => {
                let mark = self.scope.len();
                let groups = groups.into_iter().map(|g| self.group(g)).collect();
                let body = self.expr(*body);
                self.scope.truncate(mark);
                Expr::Let {
                    groups,
                    body: Box::new(body),
                }
            }
            Expr::Case {
                scrutinees,
                branches,
            } => Expr::Case {
                scrutinees: scrutinees.into_iter().map(|s| self.expr(s)).collect(),
                branches: branches.into_iter().map(|b| self.branch(b)).collect(),
            },
        }
    }

    /// Binds the group's names in the current scope; the caller truncates.
    fn group(&mut self, group: DefGroup) -> DefGroup {
        match group {
            DefGroup::NonRec { def } => {
                let expr = self.expr(def.expr);
                DefGroup::NonRec {
                    def: Def {
                        name: self.bind(def.name),
                        ty: def.ty,
                        expr,
                    },
                }
            }
            DefGroup::Rec { defs } => {
                let heads: Vec<_> = defs
                    .into_iter()
                    .map(|d| (self.bind(d.name), d.ty, d.expr))
                    .collect();
                DefGroup::Rec {
                    defs: heads
                        .into_iter()
                        .map(|(name, ty, expr)| Def {
                            name,
                            ty,
                            expr: self.expr(expr),
                        })
                        .collect(),
                }
            }
        }
    }

    fn branch(&mut self, branch: Branch) -> Branch {
        let mark = self.scope.len();
        let patterns = branch
            .patterns
            .into_iter()
            .map(|p| self.pattern(p))
            .collect();
        let guards = branch
            .guards
            .into_iter()
            .map(|g| Guard {
                test: self.expr(g.test),
                expr: self.expr(g.expr),
            })
            .collect();
        self.scope.truncate(mark);
        Branch { patterns, guards }
    }

    fn pattern(&mut self, pattern: Pattern) -> Pattern {
        match pattern {
            Pattern::Var { name, ty, pattern } => {
                let name = self.bind(name);
                Pattern::Var {
                    name,
                    ty,
                    pattern: Box::new(self.pattern(*pattern)),
                }
            }
            Pattern::Con { name, args } => Pattern::Con {
                name,
                args: args.into_iter().map(|a| self.pattern(a)).collect(),
            },
            p @ (Pattern::Wildcard | Pattern::Lit { .. }) => p,
        }
    }
}
