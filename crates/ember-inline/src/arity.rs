use std::fmt;

use ember_core::Expr;
use serde::{Deserialize, Serialize};

/// Leading type-parameter and value-parameter counts of a function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Arity {
    pub types: usize,
    pub values: usize,
}

impl Arity {
    pub const ZERO: Arity = Arity {
        types: 0,
        values: 0,
    };

    pub fn new(types: usize, values: usize) -> Self {
        Self { types, values }
    }

    /// Whether a call supplying `available` arguments consumes this arity
    /// without a new lambda being needed (exactly or over-saturated).
    pub fn is_saturated_by(self, available: Arity) -> bool {
        available.types >= self.types && available.values >= self.values
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.types, self.values)
    }
}

/// Arity of `body` read off its outermost binder chain only: a type
/// abstraction, a lambda, or a type abstraction directly around a lambda.
pub fn derive_arity(body: &Expr) -> Arity {
    match body {
        Expr::TypeLam { vars, body } => match body.as_ref() {
            Expr::Lam { params, .. } => Arity::new(vars.len(), params.len()),
            _ => Arity::new(vars.len(), 0),
        },
        Expr::Lam { params, .. } => Arity::new(0, params.len()),
        _ => Arity::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{EffectRow, Param, Type, TypeVar};

    fn a(id: u64) -> Type {
        Type::var(TypeVar::star(id))
    }

    fn lam(arity: usize, body: Expr) -> Expr {
        let params = (0..arity)
            .map(|i| Param::new(format!("p{i}"), a(1)))
            .collect();
        Expr::lam(params, EffectRow::total(), body)
    }

    #[test]
    fn type_lambda_around_lambda() {
        let body = Expr::type_lam(
            vec![TypeVar::star(1), TypeVar::effect(2)],
            lam(3, Expr::var("p0", a(1))),
        );
        assert_eq!(derive_arity(&body), Arity::new(2, 3));
    }

    #[test]
    fn type_lambda_alone() {
        let body = Expr::type_lam(vec![TypeVar::star(1)], Expr::var("x", a(1)));
        assert_eq!(derive_arity(&body), Arity::new(1, 0));
    }

    #[test]
    fn bare_lambda() {
        assert_eq!(derive_arity(&lam(2, Expr::int(0))), Arity::new(0, 2));
    }

    #[test]
    fn only_the_outermost_binders_count() {
        // fn(p0) fn(p0, p1) ... : the nested lambda is not part of the chain
        let curried = lam(1, lam(2, Expr::int(0)));
        assert_eq!(derive_arity(&curried), Arity::new(0, 1));

        // A lambda returning a type abstraction does not gain type arity.
        let inner_forall = lam(1, Expr::type_lam(vec![TypeVar::star(1)], Expr::int(0)));
        assert_eq!(derive_arity(&inner_forall), Arity::new(0, 1));

        // Nested type abstractions stop after the first.
        let nested = Expr::type_lam(
            vec![TypeVar::star(1)],
            Expr::type_lam(vec![TypeVar::star(2)], lam(1, Expr::int(0))),
        );
        assert_eq!(derive_arity(&nested), Arity::new(1, 0));
    }

    #[test]
    fn non_binders_have_zero_arity() {
        assert_eq!(derive_arity(&Expr::int(1)), Arity::ZERO);
        assert_eq!(derive_arity(&Expr::var("f", a(1))), Arity::ZERO);
        let app = Expr::app(Expr::var("f", a(1)), vec![Expr::int(1)]);
        assert_eq!(derive_arity(&app), Arity::ZERO);
    }

    #[test]
    fn saturation() {
        let arity = Arity::new(1, 2);
        assert!(arity.is_saturated_by(Arity::new(1, 2)));
        assert!(arity.is_saturated_by(Arity::new(2, 3)));
        assert!(!arity.is_saturated_by(Arity::new(1, 1)));
        assert!(!arity.is_saturated_by(Arity::new(0, 2)));
        assert!(Arity::ZERO.is_saturated_by(Arity::ZERO));
    }
}
