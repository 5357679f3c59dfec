//! Hückel aromaticity perception for rings written in Kekulé form.

use super::element::Element;
use super::molecule::{BondOrder, Molecule};

const MIN_RING: usize = 5;
const MAX_RING: usize = 7;

/// Mark 5-7 membered rings with 4n+2 pi electrons as aromatic.
///
/// Runs to a fixed point so that fused systems whose Kekulé structure puts
/// the shared double bond in one ring (naphthalene, indole) are perceived
/// ring by ring. Atoms written in lowercase are already aromatic and stay so.
pub fn perceive(mol: &mut Molecule) {
    let rings: Vec<Vec<usize>> = mol
        .small_rings(MAX_RING)
        .into_iter()
        .filter(|r| r.len() >= MIN_RING)
        .collect();
    if rings.is_empty() {
        return;
    }

    let mut done = vec![false; rings.len()];
    loop {
        let mut changed = false;
        for (ring_idx, ring) in rings.iter().enumerate() {
            if done[ring_idx] {
                continue;
            }
            if ring_is_aromatic(mol, ring) {
                mark_aromatic(mol, ring);
                done[ring_idx] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

fn ring_is_aromatic(mol: &Molecule, ring: &[usize]) -> bool {
    let mut electrons = 0u32;
    for &atom in ring {
        match pi_electrons(mol, atom, ring) {
            Some(e) => electrons += e,
            None => return false,
        }
    }
    electrons % 4 == 2
}

fn mark_aromatic(mol: &mut Molecule, ring: &[usize]) {
    for (i, &atom) in ring.iter().enumerate() {
        mol.atoms[atom].aromatic = true;
        let next = ring[(i + 1) % ring.len()];
        if let Some(bond) = mol.bond_between_mut(atom, next) {
            bond.order = BondOrder::Aromatic;
        }
    }
}

/// Pi electrons an atom donates to `ring`, or `None` if it breaks conjugation.
fn pi_electrons(mol: &Molecule, idx: usize, ring: &[usize]) -> Option<u32> {
    let atom = mol.atom(idx);
    if !atom.element.can_be_aromatic() {
        return None;
    }

    let mut in_ring_double = false;
    let mut exocyclic_double: Option<usize> = None;
    for (nbr, order) in mol.neighbors(idx) {
        match order {
            BondOrder::Triple | BondOrder::Quadruple => return None,
            BondOrder::Double if ring.contains(&nbr) => in_ring_double = true,
            BondOrder::Double => exocyclic_double = Some(nbr),
            _ => {}
        }
    }

    if atom.aromatic || in_ring_double {
        // Already conjugated: carbons (and pyridine-like N) give one electron,
        // lone-pair donors in five-membered positions give two.
        return Some(match atom.element {
            Element::C | Element::B => {
                if exocyclic_double.is_some() {
                    0
                } else {
                    1
                }
            }
            Element::N | Element::P | Element::As => {
                if !in_ring_double && donates_lone_pair(mol, idx) {
                    2
                } else {
                    1
                }
            }
            Element::O | Element::S | Element::Se => {
                if in_ring_double || atom.charge > 0 {
                    1
                } else {
                    2
                }
            }
            _ => 1,
        });
    }

    if let Some(partner) = exocyclic_double {
        // Ring carbon double bonded to a heteroatom outside the ring, as in
        // pyridone or the caffeine pyrimidinedione, contributes nothing.
        return match (atom.element, mol.atom(partner).element) {
            (Element::C, Element::O | Element::N | Element::S) => Some(0),
            _ => None,
        };
    }

    match atom.element {
        Element::N | Element::P | Element::As if donates_lone_pair(mol, idx) => Some(2),
        Element::O | Element::S | Element::Se if atom.charge == 0 => Some(2),
        Element::C if atom.charge < 0 => Some(2),
        Element::C | Element::B if atom.charge > 0 || atom.element == Element::B => Some(0),
        _ => None,
    }
}

/// Trivalent, neutral pnictogen with a lone pair to share (pyrrole-type).
fn donates_lone_pair(mol: &Molecule, idx: usize) -> bool {
    let atom = mol.atom(idx);
    let connections = mol.degree(idx) + atom.hydrogens as usize;
    atom.charge == 0 && connections == 3
}
