use super::element::Element;
use super::smiles::{self, SmilesError};

/// Bond multiplicity after parsing. Kekulé rings are rewritten to
/// [`BondOrder::Aromatic`] by aromaticity perception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    /// Contribution to an atom's valence, counting aromatic bonds as one.
    pub fn valence_contribution(&self) -> i32 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub aromatic: bool,
    pub isotope: Option<u16>,
    pub charge: i8,
    /// Hydrogens not present as graph nodes: implicit for organic-subset
    /// atoms, the written count for bracket atoms.
    pub hydrogens: u8,
    /// Written inside `[...]`.
    pub bracket: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub begin: usize,
    pub end: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn other(&self, atom: usize) -> usize {
        if self.begin == atom {
            self.end
        } else {
            self.begin
        }
    }

    pub fn connects(&self, a: usize, b: usize) -> bool {
        (self.begin == a && self.end == b) || (self.begin == b && self.end == a)
    }
}

/// A parsed molecular graph.
///
/// Lives only for the duration of a lookup; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Molecule {
    pub(crate) atoms: Vec<Atom>,
    pub(crate) bonds: Vec<Bond>,
}

impl Molecule {
    /// Parse a SMILES string into a sanitized molecule.
    pub fn from_smiles(input: &str) -> Result<Self, SmilesError> {
        smiles::parse(input)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom(&self, idx: usize) -> &Atom {
        &self.atoms[idx]
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn num_heavy_atoms(&self) -> usize {
        self.atoms
            .iter()
            .filter(|a| a.element != Element::H)
            .count()
    }

    /// Bonds incident to `idx`.
    pub fn bonds_of(&self, idx: usize) -> impl Iterator<Item = &Bond> + '_ {
        self.bonds
            .iter()
            .filter(move |b| b.begin == idx || b.end == idx)
    }

    /// `(neighbor, order)` pairs for `idx`.
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, BondOrder)> + '_ {
        self.bonds_of(idx).map(move |b| (b.other(idx), b.order))
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.bonds.iter().find(|bond| bond.connects(a, b))
    }

    pub(crate) fn bond_between_mut(&mut self, a: usize, b: usize) -> Option<&mut Bond> {
        self.bonds.iter_mut().find(|bond| bond.connects(a, b))
    }

    pub fn degree(&self, idx: usize) -> usize {
        self.bonds_of(idx).count()
    }

    /// Neighbors that are not hydrogen graph nodes.
    pub fn heavy_neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, BondOrder)> + '_ {
        self.neighbors(idx)
            .filter(move |(n, _)| self.atoms[*n].element != Element::H)
    }

    /// Hydrogen count including explicit `[H]` neighbors.
    pub fn total_hydrogens(&self, idx: usize) -> u32 {
        let explicit = self
            .neighbors(idx)
            .filter(|(n, _)| self.atoms[*n].element == Element::H)
            .count() as u32;
        u32::from(self.atoms[idx].hydrogens) + explicit
    }

    /// Sum of bond valence contributions, aromatic bonds counted as one.
    pub fn bond_valence(&self, idx: usize) -> i32 {
        self.bonds_of(idx).map(|b| b.order.valence_contribution()).sum()
    }

    /// Ring membership of every bond, indexed like [`Molecule::bonds`].
    ///
    /// A bond lies on a cycle unless it is a bridge. Bridges are found with
    /// one iterative depth-first search, so the cost is linear in the size of
    /// the graph.
    pub fn ring_bonds(&self) -> Vec<bool> {
        const UNSEEN: usize = usize::MAX;

        let n = self.atoms.len();
        let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
        for (i, bond) in self.bonds.iter().enumerate() {
            adjacency[bond.begin].push((bond.end, i));
            adjacency[bond.end].push((bond.begin, i));
        }

        let mut ring = vec![true; self.bonds.len()];
        let mut order = vec![UNSEEN; n];
        let mut low = vec![0usize; n];
        let mut counter = 0;

        for root in 0..n {
            if order[root] != UNSEEN {
                continue;
            }
            order[root] = counter;
            low[root] = counter;
            counter += 1;

            // (atom, bond it was entered through, next adjacency slot)
            let mut stack = vec![(root, UNSEEN, 0usize)];
            while let Some(top) = stack.len().checked_sub(1) {
                let (atom, via, next) = stack[top];
                if next < adjacency[atom].len() {
                    stack[top].2 += 1;
                    let (nbr, bond) = adjacency[atom][next];
                    if bond == via {
                        continue;
                    }
                    if order[nbr] == UNSEEN {
                        order[nbr] = counter;
                        low[nbr] = counter;
                        counter += 1;
                        stack.push((nbr, bond, 0));
                    } else {
                        low[atom] = low[atom].min(order[nbr]);
                    }
                } else {
                    stack.pop();
                    if let Some(&(parent, _, _)) = stack.last() {
                        low[parent] = low[parent].min(low[atom]);
                        if low[atom] > order[parent] {
                            ring[via] = false;
                        }
                    }
                }
            }
        }
        ring
    }

    /// Ring membership of every atom, indexed like [`Molecule::atoms`].
    pub fn ring_atoms(&self) -> Vec<bool> {
        let mut atoms = vec![false; self.atoms.len()];
        for (bond, in_ring) in self.bonds.iter().zip(self.ring_bonds()) {
            if in_ring {
                atoms[bond.begin] = true;
                atoms[bond.end] = true;
            }
        }
        atoms
    }

    /// Simple cycles with between 3 and `max_size` atoms, each listed once in
    /// traversal order.
    pub fn small_rings(&self, max_size: usize) -> Vec<Vec<usize>> {
        const MAX_RINGS: usize = 10_000;

        let n = self.atoms.len();
        let adjacency: Vec<Vec<usize>> = (0..n)
            .map(|i| self.neighbors(i).map(|(j, _)| j).collect())
            .collect();

        let mut rings = Vec::new();
        for start in 0..n {
            let mut path = vec![start];
            let mut on_path = vec![false; n];
            on_path[start] = true;
            extend_ring_path(
                &adjacency,
                start,
                &mut path,
                &mut on_path,
                max_size,
                &mut rings,
                MAX_RINGS,
            );
            if rings.len() >= MAX_RINGS {
                break;
            }
        }
        rings
    }
}

fn extend_ring_path(
    adjacency: &[Vec<usize>],
    start: usize,
    path: &mut Vec<usize>,
    on_path: &mut [bool],
    max_size: usize,
    rings: &mut Vec<Vec<usize>>,
    limit: usize,
) {
    if rings.len() >= limit {
        return;
    }
    let last = path[path.len() - 1];
    for &next in &adjacency[last] {
        if next == start && path.len() >= 3 {
            // Each cycle is seen in two directions; keep the one whose
            // second atom is smaller than its last.
            if path[1] < path[path.len() - 1] {
                rings.push(path.clone());
            }
            continue;
        }
        if next <= start || on_path[next] || path.len() >= max_size {
            continue;
        }
        path.push(next);
        on_path[next] = true;
        extend_ring_path(adjacency, start, path, on_path, max_size, rings, limit);
        on_path[next] = false;
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_ring_in_cyclohexane() {
        let mol = Molecule::from_smiles("C1CCCCC1").unwrap();
        let rings = mol.small_rings(7);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 6);
    }

    #[test]
    fn finds_both_rings_of_naphthalene() {
        let mol = Molecule::from_smiles("c1ccc2ccccc2c1").unwrap();
        let rings = mol.small_rings(7);
        // Two six-membered rings; the ten-membered envelope is out of range.
        assert_eq!(rings.len(), 2);
        assert!(rings.iter().all(|r| r.len() == 6));
    }

    #[test]
    fn ring_membership_excludes_substituents() {
        let mol = Molecule::from_smiles("Cc1ccccc1").unwrap();
        let ring_atoms = mol.ring_atoms();
        assert!(!ring_atoms[0]);
        assert!(ring_atoms[1..].iter().all(|r| *r));
    }

    #[test]
    fn bond_linking_two_rings_is_not_a_ring_bond() {
        // Biphenyl: bond 6 joins the rings.
        let mol = Molecule::from_smiles("c1ccccc1-c1ccccc1").unwrap();
        let ring_bonds = mol.ring_bonds();
        assert_eq!(ring_bonds.iter().filter(|r| !**r).count(), 1);
        let bridge = mol.bonds().iter().position(|b| b.connects(5, 6)).unwrap();
        assert!(!ring_bonds[bridge]);
    }

    #[test]
    fn fused_and_spiro_bonds_are_ring_bonds() {
        let naphthalene = Molecule::from_smiles("c1ccc2ccccc2c1").unwrap();
        assert!(naphthalene.ring_bonds().iter().all(|r| *r));
        let spiro = Molecule::from_smiles("C1CCC12CCC2").unwrap();
        assert!(spiro.ring_bonds().iter().all(|r| *r));
    }

    #[test]
    fn long_chain_ring_membership_does_not_recurse() {
        let chain = "C".repeat(2_000);
        let mol = Molecule::from_smiles(&chain).unwrap();
        assert!(mol.ring_bonds().iter().all(|r| !*r));
    }

    #[test]
    fn total_hydrogens_counts_explicit_hydrogen_atoms() {
        let mol = Molecule::from_smiles("[H]C([H])([H])[H]").unwrap();
        let carbon = mol
            .atoms()
            .iter()
            .position(|a| a.element == Element::C)
            .unwrap();
        assert_eq!(mol.total_hydrogens(carbon), 4);
        assert_eq!(mol.num_heavy_atoms(), 1);
    }
}
