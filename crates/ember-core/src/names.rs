//! Names the compiler itself introduces into core programs.

use ember_base::Name;

/// The effect-widening coercion inserted by the type checker wherever a
/// function crosses an effect-polymorphism boundary.
pub const EFFECT_OPEN: &str = "std/core/types/.open";

pub const BOOL: &str = "std/core/types/bool";
pub const TRUE: &str = "std/core/types/True";
pub const FALSE: &str = "std/core/types/False";

pub fn effect_open() -> Name {
    Name::new(EFFECT_OPEN)
}

pub fn is_effect_open(name: &Name) -> bool {
    name.as_str() == EFFECT_OPEN
}
