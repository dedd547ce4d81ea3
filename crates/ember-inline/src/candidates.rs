use ember_base::Name;
use ember_core::{Def, Expr};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::arity::{derive_arity, Arity};

/// A definition registered for literal substitution at call sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineDef {
    pub name: Name,
    pub body: Expr,
    /// Part of a recursive binding group; never substituted.
    pub recursive: bool,
}

impl InlineDef {
    pub fn new(name: impl Into<Name>, body: Expr, recursive: bool) -> Self {
        Self {
            name: name.into(),
            body,
            recursive,
        }
    }

    pub fn from_def(def: &Def, recursive: bool) -> Self {
        Self::new(def.name.clone(), def.expr.clone(), recursive)
    }

    pub fn arity(&self) -> Arity {
        derive_arity(&self.body)
    }
}

/// Read-only inline candidate database, keyed by fully qualified name.
///
/// Which definitions end up here is decided by the selection pass that builds
/// it; the inliner only looks names up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<InlineDef>", into = "Vec<InlineDef>")]
pub struct Inlines {
    defs: FxHashMap<Name, InlineDef>,
}

impl Inlines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate, replacing and returning any previous entry.
    pub fn insert(&mut self, def: InlineDef) -> Option<InlineDef> {
        self.defs.insert(def.name.clone(), def)
    }

    pub fn lookup(&self, name: &Name) -> Option<&InlineDef> {
        self.defs.get(name)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InlineDef> {
        self.defs.values()
    }
}

impl Extend<InlineDef> for Inlines {
    fn extend<I: IntoIterator<Item = InlineDef>>(&mut self, iter: I) {
        for def in iter {
            self.insert(def);
        }
    }
}

impl FromIterator<InlineDef> for Inlines {
    fn from_iter<I: IntoIterator<Item = InlineDef>>(iter: I) -> Self {
        let mut inlines = Inlines::new();
        inlines.extend(iter);
        inlines
    }
}

impl From<Vec<InlineDef>> for Inlines {
    fn from(defs: Vec<InlineDef>) -> Self {
        defs.into_iter().collect()
    }
}

impl From<Inlines> for Vec<InlineDef> {
    fn from(inlines: Inlines) -> Self {
        let mut defs: Vec<InlineDef> = inlines.defs.into_values().collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }
}
