use ember_base::Name;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::names;
use crate::types::{EffectRow, Type, TypeVar};

/// A type-checked core module: definition groups in dependency order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub module: Name,
    pub groups: Vec<DefGroup>,
}

/// A strongly connected component of definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DefGroup {
    NonRec { def: Def },
    Rec { defs: Vec<Def> },
}

impl DefGroup {
    pub fn defs(&self) -> &[Def] {
        match self {
            DefGroup::NonRec { def } => std::slice::from_ref(def),
            DefGroup::Rec { defs } => defs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Def {
    pub name: Name,
    pub ty: Type,
    pub expr: Expr,
}

impl Def {
    pub fn new(name: impl Into<Name>, ty: Type, expr: Expr) -> Self {
        Self {
            name: name.into(),
            ty,
            expr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: Name,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<Name>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Char(char),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Expr {
    Var {
        name: Name,
        ty: Type,
    },
    Con {
        name: Name,
        ty: Type,
    },
    Lit {
        lit: Literal,
    },
    App {
        func: Box<Expr>,
        args: Vec<Expr>,
    },
    TypeApp {
        expr: Box<Expr>,
        types: Vec<Type>,
    },
    Lam {
        params: Vec<Param>,
        effect: EffectRow,
        body: Box<Expr>,
    },
    TypeLam {
        vars: Vec<TypeVar>,
        body: Box<Expr>,
    },
    Let {
        groups: Vec<DefGroup>,
        body: Box<Expr>,
    },
    Case {
        scrutinees: Vec<Expr>,
        branches: Vec<Branch>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub patterns: Vec<Pattern>,
    pub guards: Vec<Guard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guard {
    pub test: Expr,
    pub expr: Expr,
}

impl Guard {
    /// A guard whose test is the constant `True`.
    pub fn always(expr: Expr) -> Self {
        Self {
            test: Expr::true_(),
            expr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Pattern {
    Wildcard,
    Var {
        name: Name,
        ty: Type,
        pattern: Box<Pattern>,
    },
    Con {
        name: Name,
        args: Vec<Pattern>,
    },
    Lit {
        lit: Literal,
    },
}

impl Pattern {
    pub fn var(name: impl Into<Name>, ty: Type) -> Self {
        Pattern::Var {
            name: name.into(),
            ty,
            pattern: Box::new(Pattern::Wildcard),
        }
    }

    pub fn con(name: impl Into<Name>, args: Vec<Pattern>) -> Self {
        Pattern::Con {
            name: name.into(),
            args,
        }
    }

    /// Names bound by this pattern, left to right.
    pub fn binders(&self) -> Vec<&Name> {
        let mut out = Vec::new();
        collect_pattern_binders(self, &mut out);
        out
    }
}

fn collect_pattern_binders<'a>(pattern: &'a Pattern, out: &mut Vec<&'a Name>) {
    match pattern {
        Pattern::Wildcard | Pattern::Lit { .. } => {}
        Pattern::Var { name, pattern, .. } => {
            out.push(name);
            collect_pattern_binders(pattern, out);
        }
        Pattern::Con { args, .. } => {
            for arg in args {
                collect_pattern_binders(arg, out);
            }
        }
    }
}

impl Expr {
    pub fn var(name: impl Into<Name>, ty: Type) -> Self {
        Expr::Var {
            name: name.into(),
            ty,
        }
    }

    pub fn con(name: impl Into<Name>, ty: Type) -> Self {
        Expr::Con {
            name: name.into(),
            ty,
        }
    }

    pub fn int(value: i64) -> Self {
        Expr::Lit {
            lit: Literal::Int(value),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Lit {
            lit: Literal::String(value.into()),
        }
    }

    pub fn true_() -> Self {
        Expr::con(names::TRUE, Type::con(names::BOOL))
    }

    pub fn app(func: Expr, args: Vec<Expr>) -> Self {
        Expr::App {
            func: Box::new(func),
            args,
        }
    }

    pub fn type_app(expr: Expr, types: Vec<Type>) -> Self {
        Expr::TypeApp {
            expr: Box::new(expr),
            types,
        }
    }

    pub fn lam(params: Vec<Param>, effect: EffectRow, body: Expr) -> Self {
        Expr::Lam {
            params,
            effect,
            body: Box::new(body),
        }
    }

    pub fn type_lam(vars: Vec<TypeVar>, body: Expr) -> Self {
        Expr::TypeLam {
            vars,
            body: Box::new(body),
        }
    }

    pub fn let_in(groups: Vec<DefGroup>, body: Expr) -> Self {
        Expr::Let {
            groups,
            body: Box::new(body),
        }
    }

    pub fn case(scrutinees: Vec<Expr>, branches: Vec<Branch>) -> Self {
        Expr::Case {
            scrutinees,
            branches,
        }
    }

    /// `std/core/types/.open[from, to](func)`: widen the effect of `func`.
    pub fn open_effect(func: Expr, from: EffectRow, to: EffectRow) -> Self {
        let ty = Type::fun(vec![], EffectRow::total(), Type::con("std/core/types/.open-ty"));
        Expr::app(
            Expr::type_app(
                Expr::var(names::effect_open(), ty),
                vec![Type::effect(from), Type::effect(to)],
            ),
            vec![func],
        )
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Expr::Var { .. })
    }

    pub fn var_name(&self) -> Option<&Name> {
        match self {
            Expr::Var { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Variables occurring free in this expression.
    pub fn free_vars(&self) -> FxHashSet<Name> {
        let mut bound = Vec::new();
        let mut out = FxHashSet::default();
        collect_free_vars(self, &mut bound, &mut out);
        out
    }
}

fn collect_free_vars(expr: &Expr, bound: &mut Vec<Name>, out: &mut FxHashSet<Name>) {
    match expr {
        Expr::Var { name, .. } => {
            if !bound.iter().rev().any(|b| b == name) {
                out.insert(name.clone());
            }
        }
        Expr::Con { .. } | Expr::Lit { .. } => {}
        Expr::App { func, args } => {
            collect_free_vars(func, bound, out);
            for arg in args {
                collect_free_vars(arg, bound, out);
            }
        }
        Expr::TypeApp { expr, .. } | Expr::TypeLam { body: expr, .. } => {
            collect_free_vars(expr, bound, out);
        }
        Expr::Lam { params, body, .. } => {
            let mark = bound.len();
            bound.extend(params.iter().map(|p| p.name.clone()));
            collect_free_vars(body, bound, out);
            bound.truncate(mark);
        }
        Expr::Let { groups, body } => {
            let mark = bound.len();
            for group in groups {
                match group {
                    DefGroup::NonRec { def } => {
                        collect_free_vars(&def.expr, bound, out);
                        bound.push(def.name.clone());
                    }
                    DefGroup::Rec { defs } => {
                        bound.extend(defs.iter().map(|d| d.name.clone()));
                        for def in defs {
                            collect_free_vars(&def.expr, bound, out);
                        }
                    }
                }
            }
            collect_free_vars(body, bound, out);
            bound.truncate(mark);
        }
        Expr::Case {
            scrutinees,
            branches,
        } => {
            for scrutinee in scrutinees {
                collect_free_vars(scrutinee, bound, out);
            }
            for branch in branches {
                let mark = bound.len();
                for pattern in &branch.patterns {
                    bound.extend(pattern.binders().into_iter().cloned());
                }
                for guard in &branch.guards {
                    collect_free_vars(&guard.test, bound, out);
                    collect_free_vars(&guard.expr, bound, out);
                }
                bound.truncate(mark);
            }
        }
    }
}
