use ember_base::Name;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Star,
    Effect,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeVar {
    pub id: u64,
    pub kind: Kind,
}

impl TypeVar {
    pub fn star(id: u64) -> Self {
        Self {
            id,
            kind: Kind::Star,
        }
    }

    pub fn effect(id: u64) -> Self {
        Self {
            id,
            kind: Kind::Effect,
        }
    }
}

/// An effect row `<l1, l2 | tail>`. A row without labels or tail is total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EffectRow {
    pub labels: Vec<Name>,
    pub tail: Option<TypeVar>,
}

impl EffectRow {
    pub fn total() -> Self {
        Self::default()
    }

    pub fn closed(labels: impl IntoIterator<Item = Name>) -> Self {
        Self {
            labels: labels.into_iter().collect(),
            tail: None,
        }
    }

    pub fn open(labels: impl IntoIterator<Item = Name>, tail: TypeVar) -> Self {
        Self {
            labels: labels.into_iter().collect(),
            tail: Some(tail),
        }
    }

    pub fn is_total(&self) -> bool {
        self.labels.is_empty() && self.tail.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Type {
    Var {
        var: TypeVar,
    },
    Con {
        name: Name,
    },
    App {
        head: Box<Type>,
        args: Vec<Type>,
    },
    Fun {
        params: Vec<Type>,
        effect: EffectRow,
        result: Box<Type>,
    },
    Forall {
        vars: Vec<TypeVar>,
        body: Box<Type>,
    },
    Effect {
        row: EffectRow,
    },
}

impl Type {
    pub fn con(name: impl Into<Name>) -> Self {
        Type::Con { name: name.into() }
    }

    pub fn var(var: TypeVar) -> Self {
        Type::Var { var }
    }

    pub fn app(head: Type, args: Vec<Type>) -> Self {
        Type::App {
            head: Box::new(head),
            args,
        }
    }

    pub fn fun(params: Vec<Type>, effect: EffectRow, result: Type) -> Self {
        Type::Fun {
            params,
            effect,
            result: Box::new(result),
        }
    }

    pub fn forall(vars: Vec<TypeVar>, body: Type) -> Self {
        if vars.is_empty() {
            return body;
        }
        Type::Forall {
            vars,
            body: Box::new(body),
        }
    }

    pub fn effect(row: EffectRow) -> Self {
        Type::Effect { row }
    }
}
