//! Wildman–Crippen logP.
//!
//! Atom-additive octanol/water partition coefficient from
//! S. A. Wildman and G. M. Crippen, J. Chem. Inf. Comput. Sci. 1999, 39, 868.
//! Every heavy atom and every hydrogen is assigned one of the published atom
//! types; the estimate is the sum of the per-type contributions.

use super::element::Element;
use super::molecule::{BondOrder, Molecule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrippenType {
    C1,
    C2,
    C3,
    C4,
    C5,
    C6,
    C7,
    C8,
    C9,
    C10,
    C11,
    C12,
    C13,
    C14,
    C15,
    C16,
    C17,
    C18,
    C19,
    C20,
    C21,
    C22,
    C23,
    C24,
    C25,
    C26,
    C27,
    CS,
    H1,
    H2,
    H3,
    H4,
    HS,
    N1,
    N2,
    N3,
    N4,
    N5,
    N6,
    N7,
    N8,
    N9,
    N10,
    N11,
    N12,
    N13,
    N14,
    NS,
    O1,
    O2,
    O3,
    O4,
    O5,
    O6,
    O7,
    O8,
    O9,
    O10,
    O11,
    O12,
    OS,
    F,
    Cl,
    Br,
    I,
    /// Halide ion.
    Hal,
    P,
    S1,
    S2,
    S3,
    /// Elements without a published contribution.
    Unclassified,
}

impl CrippenType {
    pub fn logp(self) -> f64 {
        use CrippenType::*;
        match self {
            C1 => 0.1441,
            C2 => 0.0,
            C3 => -0.2035,
            C4 => -0.2051,
            C5 => -0.2783,
            C6 => 0.1551,
            C7 => 0.0017,
            C8 => 0.08452,
            C9 => -0.1444,
            C10 => -0.0516,
            C11 => 0.1193,
            C12 => -0.0967,
            C13 => -0.5443,
            C14 => 0.0,
            C15 => 0.245,
            C16 => 0.198,
            C17 => 0.0,
            C18 => 0.1581,
            C19 => 0.2955,
            C20 => 0.2713,
            C21 => 0.136,
            C22 => 0.4619,
            C23 => 0.5437,
            C24 => 0.1893,
            C25 => -0.8186,
            C26 => 0.264,
            C27 => 0.2148,
            CS => 0.08129,
            H1 => 0.123,
            H2 => -0.2677,
            H3 => 0.2142,
            H4 => 0.298,
            HS => 0.1125,
            N1 => -1.019,
            N2 => -0.7096,
            N3 => -1.027,
            N4 => -0.5188,
            N5 => 0.08387,
            N6 => 0.1836,
            N7 => -0.3187,
            N8 => -0.4458,
            N9 => 0.01508,
            N10 => -1.95,
            N11 => -0.3239,
            N12 => -1.119,
            N13 => -0.3396,
            N14 => 0.2887,
            NS => -0.4806,
            O1 => 0.1552,
            O2 => -0.2893,
            O3 => -0.0684,
            O4 => -0.4195,
            O5 => 0.0335,
            O6 => -0.3339,
            O7 => -1.189,
            O8 => 0.1788,
            O9 => -0.1526,
            O10 => 0.1129,
            O11 => 0.4833,
            O12 => -1.326,
            OS => -0.1188,
            F => 0.4202,
            Cl => 0.6895,
            Br => 0.8456,
            I => 0.8857,
            Hal => -2.996,
            P => 0.8612,
            S1 => 0.6482,
            S2 => -0.0024,
            S3 => 0.6237,
            Unclassified => 0.0,
        }
    }
}

/// Estimated logP of the whole molecule.
pub fn crippen_logp(mol: &Molecule) -> f64 {
    let mut total = 0.0;
    for idx in 0..mol.num_atoms() {
        let atom = mol.atom(idx);
        if atom.element == Element::H {
            total += explicit_hydrogen_type(mol, idx).logp();
            continue;
        }
        total += atom_type(mol, idx).logp();
        if atom.hydrogens > 0 {
            total += f64::from(atom.hydrogens) * hydrogen_type(mol, idx).logp();
        }
    }
    total
}

/// Type of a heavy atom.
pub fn atom_type(mol: &Molecule, idx: usize) -> CrippenType {
    let atom = mol.atom(idx);
    match atom.element {
        Element::C => carbon_type(mol, idx),
        Element::N => nitrogen_type(mol, idx),
        Element::O => oxygen_type(mol, idx),
        Element::F | Element::Cl | Element::Br | Element::I if atom.charge < 0 => {
            CrippenType::Hal
        }
        Element::F => CrippenType::F,
        Element::Cl => CrippenType::Cl,
        Element::Br => CrippenType::Br,
        Element::I => CrippenType::I,
        Element::P => CrippenType::P,
        Element::S if atom.aromatic => CrippenType::S3,
        Element::S if atom.charge != 0 => CrippenType::S2,
        Element::S => CrippenType::S1,
        _ => CrippenType::Unclassified,
    }
}

fn is_common_organic(element: Element) -> bool {
    matches!(
        element,
        Element::C
            | Element::N
            | Element::O
            | Element::S
            | Element::F
            | Element::Cl
            | Element::Br
            | Element::I
    )
}

fn is_aliphatic_heteroatom(element: Element) -> bool {
    matches!(
        element,
        Element::N
            | Element::O
            | Element::P
            | Element::S
            | Element::F
            | Element::Cl
            | Element::Br
            | Element::I
    )
}

fn carbon_type(mol: &Molecule, idx: usize) -> CrippenType {
    if mol.atom(idx).aromatic {
        aromatic_carbon_type(mol, idx)
    } else {
        aliphatic_carbon_type(mol, idx)
    }
}

fn aromatic_carbon_type(mol: &Molecule, idx: usize) -> CrippenType {
    let heavy: Vec<(usize, BondOrder)> = mol.heavy_neighbors(idx).collect();
    let ring_bonds = heavy
        .iter()
        .filter(|(_, order)| *order == BondOrder::Aromatic)
        .count();
    let substituent = heavy
        .iter()
        .find(|(_, order)| *order != BondOrder::Aromatic)
        .copied();

    if heavy
        .iter()
        .any(|(n, _)| !is_common_organic(mol.atom(*n).element))
    {
        return CrippenType::C13;
    }

    if let Some((nbr, order)) = substituent {
        let other = mol.atom(nbr);
        if order == BondOrder::Double {
            return match other.element {
                Element::C | Element::N | Element::O => CrippenType::C25,
                _ => CrippenType::CS,
            };
        }
        return match other.element {
            Element::F => CrippenType::C14,
            Element::Cl => CrippenType::C15,
            Element::Br => CrippenType::C16,
            Element::I => CrippenType::C17,
            _ if other.aromatic => CrippenType::C20,
            Element::C => CrippenType::C21,
            Element::N => CrippenType::C22,
            Element::O => CrippenType::C23,
            Element::S => CrippenType::C24,
            _ => CrippenType::CS,
        };
    }

    if mol.total_hydrogens(idx) > 0 {
        CrippenType::C18
    } else if ring_bonds >= 3 {
        CrippenType::C19
    } else {
        CrippenType::CS
    }
}

fn aliphatic_carbon_type(mol: &Molecule, idx: usize) -> CrippenType {
    let heavy: Vec<(usize, BondOrder)> = mol.heavy_neighbors(idx).collect();
    let hydrogens = mol.total_hydrogens(idx);

    if heavy.iter().any(|(_, order)| *order == BondOrder::Triple) {
        return CrippenType::C7;
    }

    let doubles: Vec<usize> = heavy
        .iter()
        .filter(|(_, order)| *order == BondOrder::Double)
        .map(|(n, _)| *n)
        .collect();
    let aromatic_neighbor = heavy.iter().any(|(n, _)| mol.atom(*n).aromatic);

    if !doubles.is_empty() {
        if doubles
            .iter()
            .any(|n| mol.atom(*n).element != Element::C && !mol.atom(*n).aromatic)
        {
            return CrippenType::C5;
        }
        return if aromatic_neighbor {
            CrippenType::C26
        } else {
            CrippenType::C6
        };
    }

    // sp3 from here on.
    if heavy
        .iter()
        .any(|(n, _)| !is_common_organic(mol.atom(*n).element) && mol.atom(*n).element != Element::P)
    {
        return CrippenType::C27;
    }

    if aromatic_neighbor {
        return match hydrogens {
            3 => {
                let on_carbon = heavy
                    .iter()
                    .any(|(n, _)| mol.atom(*n).aromatic && mol.atom(*n).element == Element::C);
                if on_carbon {
                    CrippenType::C8
                } else {
                    CrippenType::C9
                }
            }
            2 => CrippenType::C10,
            1 => CrippenType::C11,
            _ => CrippenType::C12,
        };
    }

    let hetero = heavy
        .iter()
        .any(|(n, _)| is_aliphatic_heteroatom(mol.atom(*n).element));
    match (hetero, hydrogens >= 2) {
        (false, true) => CrippenType::C1,
        (false, false) => CrippenType::C2,
        (true, true) => CrippenType::C3,
        (true, false) => CrippenType::C4,
    }
}

fn nitrogen_type(mol: &Molecule, idx: usize) -> CrippenType {
    let atom = mol.atom(idx);
    if atom.aromatic {
        return if atom.charge > 0 {
            CrippenType::N12
        } else {
            CrippenType::N11
        };
    }

    let heavy: Vec<(usize, BondOrder)> = mol.heavy_neighbors(idx).collect();
    let hydrogens = mol.total_hydrogens(idx);
    let has = |wanted: BondOrder| heavy.iter().any(|(_, order)| *order == wanted);

    if atom.charge > 0 {
        return if hydrogens > 0 {
            CrippenType::N10
        } else if has(BondOrder::Triple) {
            CrippenType::N14
        } else {
            CrippenType::N13
        };
    }
    if atom.charge < 0 {
        return CrippenType::N14;
    }

    if has(BondOrder::Triple) {
        return CrippenType::N9;
    }
    if has(BondOrder::Double) {
        return if hydrogens > 0 {
            CrippenType::N5
        } else {
            CrippenType::N6
        };
    }

    let aromatic_neighbor = heavy.iter().any(|(n, _)| mol.atom(*n).aromatic);
    match (hydrogens, heavy.len(), aromatic_neighbor) {
        (2, 1, false) => CrippenType::N1,
        (2, 1, true) => CrippenType::N3,
        (1, 2, false) => CrippenType::N2,
        (1, 2, true) => CrippenType::N4,
        (0, 3, false) => CrippenType::N7,
        (0, 3, true) => CrippenType::N8,
        _ => CrippenType::NS,
    }
}

fn oxygen_type(mol: &Molecule, idx: usize) -> CrippenType {
    let atom = mol.atom(idx);
    if atom.aromatic {
        return CrippenType::O1;
    }

    let heavy: Vec<(usize, BondOrder)> = mol.heavy_neighbors(idx).collect();
    let hydrogens = mol.total_hydrogens(idx);
    if hydrogens > 0 {
        return CrippenType::O2;
    }

    if atom.charge < 0 {
        let Some(&(nbr, _)) = heavy.first() else {
            return CrippenType::O7;
        };
        return match mol.atom(nbr).element {
            Element::N => CrippenType::O5,
            Element::S => CrippenType::O6,
            Element::C if is_carboxylate_carbon(mol, nbr, idx) => CrippenType::O12,
            _ => CrippenType::O7,
        };
    }

    if let Some(&(partner, _)) = heavy.iter().find(|(_, order)| *order == BondOrder::Double) {
        let other = mol.atom(partner);
        return match other.element {
            Element::N | Element::O => CrippenType::O5,
            Element::C if other.aromatic => CrippenType::O8,
            Element::C => carbonyl_oxygen_type(mol, partner, idx),
            _ => CrippenType::OS,
        };
    }

    if heavy.len() == 2 {
        if heavy.iter().any(|(n, _)| mol.atom(*n).aromatic) {
            CrippenType::O4
        } else {
            CrippenType::O3
        }
    } else {
        CrippenType::OS
    }
}

/// O= on a carbonyl carbon, classified by the carbon's other substituents.
fn carbonyl_oxygen_type(mol: &Molecule, carbon: usize, oxygen: usize) -> CrippenType {
    let others: Vec<usize> = mol
        .heavy_neighbors(carbon)
        .map(|(n, _)| n)
        .filter(|n| *n != oxygen)
        .collect();
    if others.iter().any(|n| mol.atom(*n).aromatic) {
        CrippenType::O10
    } else if others.len() == 2 && others.iter().all(|n| mol.atom(*n).element != Element::C) {
        CrippenType::O11
    } else {
        CrippenType::O9
    }
}

fn is_carboxylate_carbon(mol: &Molecule, carbon: usize, oxygen: usize) -> bool {
    mol.heavy_neighbors(carbon).any(|(n, order)| {
        n != oxygen && order == BondOrder::Double && mol.atom(n).element == Element::O
    })
}

/// Type shared by every hydrogen attached to heavy atom `parent`.
pub fn hydrogen_type(mol: &Molecule, parent: usize) -> CrippenType {
    match mol.atom(parent).element {
        Element::C => CrippenType::H1,
        Element::N => CrippenType::H3,
        Element::O => {
            let Some((nbr, _)) = mol.heavy_neighbors(parent).next() else {
                return CrippenType::H2;
            };
            let other = mol.atom(nbr);
            match other.element {
                Element::N => CrippenType::H3,
                Element::O | Element::S => CrippenType::H4,
                Element::C if other.aromatic => CrippenType::H2,
                Element::C => {
                    let orders: Vec<BondOrder> =
                        mol.heavy_neighbors(nbr).map(|(_, order)| order).collect();
                    if orders.contains(&BondOrder::Double) {
                        CrippenType::H4
                    } else if orders.contains(&BondOrder::Triple) {
                        CrippenType::HS
                    } else {
                        CrippenType::H2
                    }
                }
                _ => CrippenType::H2,
            }
        }
        Element::H => CrippenType::H1,
        _ => CrippenType::H2,
    }
}

fn explicit_hydrogen_type(mol: &Molecule, idx: usize) -> CrippenType {
    let mut neighbors = mol.neighbors(idx);
    match (neighbors.next(), neighbors.next()) {
        (Some((parent, _)), None) => hydrogen_type(mol, parent),
        _ => CrippenType::HS,
    }
}
