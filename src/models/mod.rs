//! Domain models for Molecule Finder.
//!
//! # Lifecycle
//!
//! Nothing here outlives a single lookup:
//!
//! - [`DescriptorSet`]: molecular weight and logP computed locally.
//! - [`EncyclopediaEntry`]: lead section of the encyclopedia page, if any.
//! - [`DatabaseEntry`]: the first matching compound record, if any.
//! - [`ResolutionResult`]: the three merged, plus the input string.
//!
//! [`Page`] and [`CompoundRecord`] are what the external clients hand back
//! before the resolver shapes them into entries.

mod compound;
mod descriptor;
mod encyclopedia;
mod resolution;

pub use compound::*;
pub use descriptor::*;
pub use encyclopedia::*;
pub use resolution::*;
