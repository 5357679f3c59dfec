//! Local chemistry engine.
//!
//! Parses SMILES into a [`Molecule`] and computes the two descriptors the
//! finder reports: average molecular weight and Wildman–Crippen logP.

mod aromaticity;
pub mod crippen;
mod element;
mod molecule;
pub mod smiles;

pub use crippen::crippen_logp;
pub use element::{isotope_mass, Element, ParseElementError};
pub use molecule::{Atom, Bond, BondOrder, Molecule};
pub use smiles::SmilesError;

use crate::models::DescriptorSet;

/// Average molecular weight in g/mol, hydrogens included.
pub fn molecular_weight(mol: &Molecule) -> f64 {
    let hydrogen = Element::H.atomic_mass();
    mol.atoms()
        .iter()
        .map(|atom| {
            let mass = match atom.isotope {
                Some(mass_number) => isotope_mass(atom.element, mass_number),
                None => atom.element.atomic_mass(),
            };
            mass + f64::from(atom.hydrogens) * hydrogen
        })
        .sum()
}

/// Both descriptors for a parsed molecule. Infallible once parsing succeeded.
pub fn descriptors(mol: &Molecule) -> DescriptorSet {
    DescriptorSet {
        molecular_weight: molecular_weight(mol),
        logp: crippen_logp(mol),
    }
}
