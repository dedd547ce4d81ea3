//! Human-readable rendering of core expressions, used by compiler traces.

use ember_base::Name;

use crate::expr::{Branch, DefGroup, Expr, Literal, Pattern};
use crate::names;
use crate::types::{EffectRow, Kind, Type, TypeVar};

/// Rendering settings shared by every diagnostic a pass produces.
#[derive(Debug, Clone, Default)]
pub struct PrettyEnv {
    /// Annotate binders and variables with their types.
    pub show_types: bool,
    /// Print names with their module qualifier.
    pub qualified: bool,
}

impl PrettyEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self, name: &Name) -> String {
        if self.qualified {
            name.as_str().to_string()
        } else {
            name.local().to_string()
        }
    }

    pub fn expr(&self, expr: &Expr) -> String {
        let mut out = String::new();
        self.write_expr(expr, &mut out);
        out
    }

    pub fn ty(&self, ty: &Type) -> String {
        let mut out = String::new();
        self.write_type(ty, &mut out);
        out
    }

    fn write_expr(&self, expr: &Expr, out: &mut String) {
        match expr {
            Expr::Var { name, ty } => {
                out.push_str(&self.name(name));
                if self.show_types {
                    out.push_str(" : ");
                    self.write_type(ty, out);
                }
            }
            Expr::Con { name, .. } => out.push_str(&self.name(name)),
            Expr::Lit { lit } => write_literal(lit, out),
            Expr::App { func, args } => {
                self.write_callee(func, out);
                out.push('(');
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    self.write_expr(arg, out);
                }
                out.push(')');
            }
            Expr::TypeApp { expr, types } => {
                self.write_callee(expr, out);
                out.push('[');
                for (index, ty) in types.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(ty, out);
                }
                out.push(']');
            }
            Expr::Lam {
                params,
                effect,
                body,
            } => {
                out.push_str("fn");
                if self.show_types && !effect.is_total() {
                    self.write_row(effect, out);
                }
                out.push('(');
                for (index, param) in params.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&self.name(&param.name));
                    if self.show_types {
                        out.push_str(" : ");
                        self.write_type(&param.ty, out);
                    }
                }
                out.push_str(") ");
                self.write_expr(body, out);
            }
            Expr::TypeLam { vars, body } => {
                out.push_str("forall<");
                write_type_vars(vars, out);
                out.push_str("> ");
                self.write_expr(body, out);
            }
            Expr::Let { groups, body } => {
                out.push('{');
                for group in groups {
                    out.push(' ');
                    self.write_group(group, out);
                    out.push(';');
                }
                out.push(' ');
                self.write_expr(body, out);
                out.push_str(" }");
            }
            Expr::Case {
                scrutinees,
                branches,
            } => {
                out.push_str("match(");
                for (index, scrutinee) in scrutinees.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    self.write_expr(scrutinee, out);
                }
                out.push_str(") {");
                for (index, branch) in branches.iter().enumerate() {
                    if index > 0 {
                        out.push(';');
                    }
                    out.push(' ');
                    self.write_branch(branch, out);
                }
                out.push_str(" }");
            }
        }
    }

    /// Binder-headed callees are parenthesized so `(fn(x) x)(y)` stays readable.
    fn write_callee(&self, expr: &Expr, out: &mut String) {
        match expr {
            Expr::Lam { .. } | Expr::TypeLam { .. } => {
                out.push('(');
                self.write_expr(expr, out);
                out.push(')');
            }
            _ => self.write_expr(expr, out),
        }
    }

    fn write_group(&self, group: &DefGroup, out: &mut String) {
        match group {
            DefGroup::NonRec { def } => {
                out.push_str("val ");
                out.push_str(&self.name(&def.name));
                out.push_str(" = ");
                self.write_expr(&def.expr, out);
            }
            DefGroup::Rec { defs } => {
                out.push_str("rec {");
                for (index, def) in defs.iter().enumerate() {
                    if index > 0 {
                        out.push(';');
                    }
                    out.push_str(" fun ");
                    out.push_str(&self.name(&def.name));
                    out.push_str(" = ");
                    self.write_expr(&def.expr, out);
                }
                out.push_str(" }");
            }
        }
    }

    fn write_branch(&self, branch: &Branch, out: &mut String) {
        for (index, pattern) in branch.patterns.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            self.write_pattern(pattern, out);
        }
        for guard in &branch.guards {
            if !is_true(&guard.test) {
                out.push_str(" | ");
                self.write_expr(&guard.test, out);
            }
            out.push_str(" -> ");
            self.write_expr(&guard.expr, out);
        }
    }

    fn write_pattern(&self, pattern: &Pattern, out: &mut String) {
        match pattern {
            Pattern::Wildcard => out.push('_'),
            Pattern::Var { name, pattern, .. } => {
                out.push_str(&self.name(name));
                if !matches!(pattern.as_ref(), Pattern::Wildcard) {
                    out.push_str(" as ");
                    self.write_pattern(pattern, out);
                }
            }
            Pattern::Con { name, args } => {
                out.push_str(&self.name(name));
                if !args.is_empty() {
                    out.push('(');
                    for (index, arg) in args.iter().enumerate() {
                        if index > 0 {
                            out.push_str(", ");
                        }
                        self.write_pattern(arg, out);
                    }
                    out.push(')');
                }
            }
            Pattern::Lit { lit } => write_literal(lit, out),
        }
    }

    fn write_type(&self, ty: &Type, out: &mut String) {
        match ty {
            Type::Var { var } => write_type_var(var, out),
            Type::Con { name } => out.push_str(&self.name(name)),
            Type::App { head, args } => {
                self.write_type(head, out);
                out.push('<');
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(arg, out);
                }
                out.push('>');
            }
            Type::Fun {
                params,
                effect,
                result,
            } => {
                out.push('(');
                for (index, param) in params.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(param, out);
                }
                out.push_str(") -> ");
                if !effect.is_total() {
                    self.write_row(effect, out);
                    out.push(' ');
                }
                self.write_type(result, out);
            }
            Type::Forall { vars, body } => {
                out.push_str("forall<");
                write_type_vars(vars, out);
                out.push_str("> ");
                self.write_type(body, out);
            }
            Type::Effect { row } => self.write_row(row, out),
        }
    }

    fn write_row(&self, row: &EffectRow, out: &mut String) {
        out.push('<');
        for (index, label) in row.labels.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.name(label));
        }
        if let Some(tail) = &row.tail {
            out.push('|');
            write_type_var(tail, out);
        }
        out.push('>');
    }
}

fn is_true(expr: &Expr) -> bool {
    matches!(expr, Expr::Con { name, .. } if name.as_str() == names::TRUE)
}

fn write_literal(lit: &Literal, out: &mut String) {
    match lit {
        Literal::Int(value) => out.push_str(&value.to_string()),
        Literal::Float(value) => out.push_str(&format!("{value:?}")),
        Literal::Char(value) => out.push_str(&format!("{value:?}")),
        Literal::String(value) => out.push_str(&format!("{value:?}")),
    }
}

fn write_type_vars(vars: &[TypeVar], out: &mut String) {
    for (index, var) in vars.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        write_type_var(var, out);
    }
}

fn write_type_var(var: &TypeVar, out: &mut String) {
    let prefix = match var.kind {
        Kind::Star => 'a',
        Kind::Effect => 'e',
        Kind::Label => 'l',
    };
    out.push(prefix);
    out.push_str(&var.id.to_string());
}
