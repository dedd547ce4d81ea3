//! Identifiers shared by every ember compiler pass.

mod name;
mod unique;

pub use name::Name;
pub use unique::UniqueSupply;
