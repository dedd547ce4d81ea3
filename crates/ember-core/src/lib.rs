//! The explicitly typed core IR produced by the type checker and consumed by
//! the optimizer passes.

mod expr;
pub mod names;
mod pretty;
mod types;

pub use expr::{Branch, Def, DefGroup, Expr, Guard, Literal, Param, Pattern, Program};
pub use pretty::PrettyEnv;
pub use types::{EffectRow, Kind, Type, TypeVar};
