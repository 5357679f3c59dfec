//! Molecule Finder: descriptors for a SMILES string plus what Wikipedia and
//! PubChem know about the compound.

pub mod api;
pub mod chem;
pub mod config;
pub mod lookup;
pub mod models;
pub mod render;
pub mod resolver;
