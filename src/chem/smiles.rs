//! SMILES reader.
//!
//! Follows the OpenSMILES grammar for everything that affects composition:
//! organic-subset and bracket atoms, bond symbols, branches, ring closures
//! (including `%nn`) and dot-disconnected components. Stereo marks are
//! accepted and discarded.
//!
//! A parse ends with sanitization: implicit hydrogens, a Kekulé check for
//! lowercase aromatic systems, valence checks and aromaticity perception.
//! Anything that fails there is reported as a [`SmilesError`], matching what
//! a cheminformatics toolkit would refuse to build.

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

use super::aromaticity;
use super::element::Element;
use super::molecule::{Atom, Bond, BondOrder, Molecule};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    #[error("empty SMILES string")]
    Empty,

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedCharacter { ch: char, pos: usize },

    #[error("unknown element '{symbol}' at position {pos}")]
    UnknownElement { symbol: String, pos: usize },

    #[error("malformed bracket atom at position {pos}: {reason}")]
    BadBracketAtom { pos: usize, reason: String },

    #[error("bond at position {pos} is not between two atoms")]
    DanglingBond { pos: usize },

    #[error("unbalanced ')' at position {pos}")]
    UnbalancedBranch { pos: usize },

    #[error("branch opened without a preceding atom at position {pos}")]
    BranchWithoutAtom { pos: usize },

    #[error("{count} branch(es) left open")]
    UnclosedBranch { count: usize },

    #[error("ring bond {label} opened but never closed")]
    UnclosedRing { label: u16 },

    #[error("ring bond {label} at position {pos} closes onto an invalid atom")]
    InvalidRingClosure { label: u16, pos: usize },

    #[error("ring bond {label} has conflicting bond symbols")]
    RingBondMismatch { label: u16 },

    #[error("atom {atom} ({symbol}) is marked aromatic but is not in a ring")]
    NonRingAromatic { atom: usize, symbol: String },

    #[error("cannot kekulize aromatic system containing atom {atom}")]
    Kekulize { atom: usize },

    #[error("explicit valence {valence} for atom {atom} ({symbol}) exceeds the permitted {max}")]
    Valence {
        atom: usize,
        symbol: String,
        valence: i32,
        max: i32,
    },
}

/// Bond symbols as written, before defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BondSymbol {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
    Directional,
}

impl BondSymbol {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'-' => Some(BondSymbol::Single),
            b'=' => Some(BondSymbol::Double),
            b'#' => Some(BondSymbol::Triple),
            b'$' => Some(BondSymbol::Quadruple),
            b':' => Some(BondSymbol::Aromatic),
            b'/' | b'\\' => Some(BondSymbol::Directional),
            _ => None,
        }
    }

    fn order(self) -> BondOrder {
        match self {
            BondSymbol::Single | BondSymbol::Directional => BondOrder::Single,
            BondSymbol::Double => BondOrder::Double,
            BondSymbol::Triple => BondOrder::Triple,
            BondSymbol::Quadruple => BondOrder::Quadruple,
            BondSymbol::Aromatic => BondOrder::Aromatic,
        }
    }
}

struct OpenRing {
    atom: usize,
    bond: Option<BondSymbol>,
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    mol: Molecule,
    prev: Option<usize>,
    branches: Vec<usize>,
    pending: Option<(BondSymbol, usize)>,
    rings: BTreeMap<u16, OpenRing>,
}

/// Parse and sanitize a SMILES string.
///
/// Leading and trailing whitespace is ignored; anything after internal
/// whitespace is treated as a title and skipped.
pub fn parse(input: &str) -> Result<Molecule, SmilesError> {
    let trimmed = input.trim();
    let end = trimmed
        .find(char::is_whitespace)
        .unwrap_or(trimmed.len());
    let smiles = &trimmed[..end];
    if smiles.is_empty() {
        return Err(SmilesError::Empty);
    }

    let mut parser = Parser {
        bytes: smiles.as_bytes(),
        pos: 0,
        mol: Molecule::default(),
        prev: None,
        branches: Vec::new(),
        pending: None,
        rings: BTreeMap::new(),
    };
    parser.run()?;
    let mut mol = parser.mol;
    sanitize(&mut mol)?;
    Ok(mol)
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn unexpected(&self) -> SmilesError {
        let ch = std::str::from_utf8(&self.bytes[self.pos..])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or('\u{FFFD}');
        SmilesError::UnexpectedCharacter { ch, pos: self.pos }
    }

    fn run(&mut self) -> Result<(), SmilesError> {
        while let Some(b) = self.peek() {
            match b {
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.add_atom(atom);
                }
                b'(' => {
                    let prev = self
                        .prev
                        .ok_or(SmilesError::BranchWithoutAtom { pos: self.pos })?;
                    if let Some((_, pos)) = self.pending {
                        return Err(SmilesError::DanglingBond { pos });
                    }
                    self.branches.push(prev);
                    self.pos += 1;
                }
                b')' => {
                    if let Some((_, pos)) = self.pending {
                        return Err(SmilesError::DanglingBond { pos });
                    }
                    let back = self
                        .branches
                        .pop()
                        .ok_or(SmilesError::UnbalancedBranch { pos: self.pos })?;
                    self.prev = Some(back);
                    self.pos += 1;
                }
                b'.' => {
                    if let Some((_, pos)) = self.pending {
                        return Err(SmilesError::DanglingBond { pos });
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                b'0'..=b'9' | b'%' => self.ring_bond()?,
                _ => {
                    if let Some(symbol) = BondSymbol::from_byte(b) {
                        if self.prev.is_none() || self.pending.is_some() {
                            return Err(SmilesError::DanglingBond { pos: self.pos });
                        }
                        self.pending = Some((symbol, self.pos));
                        self.pos += 1;
                    } else {
                        let atom = self.organic_atom()?;
                        self.add_atom(atom);
                    }
                }
            }
        }

        if let Some((_, pos)) = self.pending {
            return Err(SmilesError::DanglingBond { pos });
        }
        if !self.branches.is_empty() {
            return Err(SmilesError::UnclosedBranch {
                count: self.branches.len(),
            });
        }
        if let Some(label) = self.rings.keys().next() {
            return Err(SmilesError::UnclosedRing { label: *label });
        }
        if self.mol.atoms.is_empty() {
            return Err(SmilesError::Empty);
        }
        Ok(())
    }

    fn add_atom(&mut self, atom: Atom) {
        let idx = self.mol.atoms.len();
        self.mol.atoms.push(atom);
        if let Some(prev) = self.prev {
            let symbol = self.pending.take().map(|(s, _)| s);
            let order = self.resolve_order(symbol, prev, idx);
            self.mol.bonds.push(Bond {
                begin: prev,
                end: idx,
                order,
            });
        }
        self.prev = Some(idx);
    }

    /// Unmarked bonds between two aromatic atoms are aromatic.
    fn resolve_order(&self, symbol: Option<BondSymbol>, a: usize, b: usize) -> BondOrder {
        match symbol {
            Some(s) => s.order(),
            None if self.mol.atoms[a].aromatic && self.mol.atoms[b].aromatic => {
                BondOrder::Aromatic
            }
            None => BondOrder::Single,
        }
    }

    fn organic_atom(&mut self) -> Result<Atom, SmilesError> {
        let start = self.pos;
        let b = self.peek().ok_or(SmilesError::Empty)?;
        let (element, aromatic, len) = match b {
            b'B' if self.peek_at(1) == Some(b'r') => (Element::Br, false, 2),
            b'C' if self.peek_at(1) == Some(b'l') => (Element::Cl, false, 2),
            b'B' => (Element::B, false, 1),
            b'C' => (Element::C, false, 1),
            b'N' => (Element::N, false, 1),
            b'O' => (Element::O, false, 1),
            b'P' => (Element::P, false, 1),
            b'S' => (Element::S, false, 1),
            b'F' => (Element::F, false, 1),
            b'I' => (Element::I, false, 1),
            b'b' => (Element::B, true, 1),
            b'c' => (Element::C, true, 1),
            b'n' => (Element::N, true, 1),
            b'o' => (Element::O, true, 1),
            b'p' => (Element::P, true, 1),
            b's' => (Element::S, true, 1),
            _ => return Err(self.unexpected()),
        };
        self.pos = start + len;
        Ok(Atom {
            element,
            aromatic,
            isotope: None,
            charge: 0,
            hydrogens: 0,
            bracket: false,
        })
    }

    /// Digits at the cursor. `Ok(None)` when none are written; digits that
    /// overflow are an error rather than an absent number.
    fn read_number(&mut self, open: usize) -> Result<Option<u32>, SmilesError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if self.pos == start {
            return Ok(None);
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Some)
            .ok_or_else(|| SmilesError::BadBracketAtom {
                pos: open,
                reason: "number out of range".to_string(),
            })
    }

    fn bracket_atom(&mut self) -> Result<Atom, SmilesError> {
        let open = self.pos;
        let bad = |reason: &str| SmilesError::BadBracketAtom {
            pos: open,
            reason: reason.to_string(),
        };
        self.pos += 1;

        let isotope = match self.read_number(open)? {
            Some(n) => Some(u16::try_from(n).map_err(|_| bad("isotope out of range"))?),
            None => None,
        };

        let (element, aromatic) = self.bracket_symbol(open)?;

        // Chirality: @, @@, @TH1, @AL2, @SP3, @TB10, @OH25 ...
        while self.peek() == Some(b'@') {
            self.pos += 1;
        }
        if let (Some(a), Some(b)) = (self.peek(), self.peek_at(1)) {
            if matches!(&[a, b], b"TH" | b"AL" | b"SP" | b"TB" | b"OH")
                && self.bytes[..self.pos].ends_with(b"@")
            {
                self.pos += 2;
                self.read_number(open)?;
            }
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some(b'H') {
            self.pos += 1;
            hydrogens = match self.read_number(open)? {
                Some(n) => u8::try_from(n).map_err(|_| bad("hydrogen count out of range"))?,
                None => 1,
            };
        }

        let mut charge: i32 = 0;
        if let Some(sign @ (b'+' | b'-')) = self.peek() {
            let unit = if sign == b'+' { 1 } else { -1 };
            self.pos += 1;
            if let Some(n) = self.read_number(open)? {
                charge = i32::try_from(n)
                    .ok()
                    .and_then(|n| n.checked_mul(unit))
                    .ok_or_else(|| bad("charge out of range"))?;
            } else {
                charge = unit;
                while self.peek() == Some(sign) {
                    charge += unit;
                    self.pos += 1;
                }
            }
        }
        let charge = i8::try_from(charge)
            .ok()
            .filter(|c| (-15..=15).contains(c))
            .ok_or_else(|| bad("charge out of range"))?;

        if self.peek() == Some(b':') {
            self.pos += 1;
            self.read_number(open)?
                .ok_or_else(|| bad("missing atom class"))?;
        }

        if self.peek() != Some(b']') {
            return Err(bad("expected ']'"));
        }
        self.pos += 1;

        Ok(Atom {
            element,
            aromatic,
            isotope,
            charge,
            hydrogens,
            bracket: true,
        })
    }

    fn bracket_symbol(&mut self, open: usize) -> Result<(Element, bool), SmilesError> {
        let start = self.pos;
        let first = self.peek().ok_or_else(|| SmilesError::BadBracketAtom {
            pos: open,
            reason: "missing element symbol".to_string(),
        })?;

        if first.is_ascii_lowercase() {
            for (text, element) in [
                ("se", Element::Se),
                ("as", Element::As),
                ("c", Element::C),
                ("n", Element::N),
                ("o", Element::O),
                ("p", Element::P),
                ("s", Element::S),
                ("b", Element::B),
            ] {
                if self.bytes[start..].starts_with(text.as_bytes()) {
                    self.pos += text.len();
                    return Ok((element, true));
                }
            }
            return Err(SmilesError::UnknownElement {
                symbol: (first as char).to_string(),
                pos: start,
            });
        }

        if !first.is_ascii_uppercase() {
            return Err(SmilesError::BadBracketAtom {
                pos: open,
                reason: "missing element symbol".to_string(),
            });
        }

        if let Some(second) = self.peek_at(1).filter(u8::is_ascii_lowercase) {
            let two = format!("{}{}", first as char, second as char);
            if let Ok(element) = Element::from_str(&two) {
                self.pos += 2;
                return Ok((element, false));
            }
        }

        let one = (first as char).to_string();
        match Element::from_str(&one) {
            Ok(element) => {
                self.pos += 1;
                Ok((element, false))
            }
            Err(_) => Err(SmilesError::UnknownElement {
                symbol: one,
                pos: start,
            }),
        }
    }

    fn ring_bond(&mut self) -> Result<(), SmilesError> {
        let pos = self.pos;
        let label = if self.peek() == Some(b'%') {
            let digits = (self.peek_at(1), self.peek_at(2));
            match digits {
                (Some(a @ b'0'..=b'9'), Some(b @ b'0'..=b'9')) => {
                    self.pos += 3;
                    u16::from(a - b'0') * 10 + u16::from(b - b'0')
                }
                _ => return Err(self.unexpected()),
            }
        } else {
            let d = self.peek().unwrap_or(b'0');
            self.pos += 1;
            u16::from(d - b'0')
        };

        let current = self.prev.ok_or(SmilesError::DanglingBond { pos })?;
        let symbol = self.pending.take().map(|(s, _)| s);

        match self.rings.remove(&label) {
            Some(open) => {
                if open.atom == current || self.mol.bond_between(open.atom, current).is_some() {
                    return Err(SmilesError::InvalidRingClosure { label, pos });
                }
                let symbol = match (open.bond, symbol) {
                    (Some(a), Some(b)) if a.order() != b.order() => {
                        return Err(SmilesError::RingBondMismatch { label })
                    }
                    (Some(a), _) => Some(a),
                    (None, b) => b,
                };
                let order = self.resolve_order(symbol, open.atom, current);
                self.mol.bonds.push(Bond {
                    begin: open.atom,
                    end: current,
                    order,
                });
            }
            None => {
                self.rings.insert(
                    label,
                    OpenRing {
                        atom: current,
                        bond: symbol,
                    },
                );
            }
        }
        Ok(())
    }
}

/// Implicit hydrogens, aromatic sanity, valence limits, then perception.
fn sanitize(mol: &mut Molecule) -> Result<(), SmilesError> {
    assign_implicit_hydrogens(mol);

    let ring_atoms = mol.ring_atoms();
    for idx in 0..mol.atoms.len() {
        let atom = &mol.atoms[idx];
        if atom.aromatic && (!atom.element.can_be_aromatic() || !ring_atoms[idx]) {
            return Err(SmilesError::NonRingAromatic {
                atom: idx,
                symbol: atom.element.symbol().to_lowercase(),
            });
        }
    }

    check_kekulizable(mol)?;
    check_valences(mol)?;
    aromaticity::perceive(mol);
    Ok(())
}

fn assign_implicit_hydrogens(mol: &mut Molecule) {
    for idx in 0..mol.atoms.len() {
        let atom = &mol.atoms[idx];
        if atom.bracket {
            continue;
        }
        let used = mol.bond_valence(idx);
        let hydrogens = if atom.aromatic {
            atom.element
                .lowest_valence(0)
                .map(|v| (v - used - 1).max(0))
                .unwrap_or(0)
        } else {
            atom.element
                .default_valences()
                .iter()
                .find(|v| **v >= used)
                .map(|v| v - used)
                .unwrap_or(0)
        };
        mol.atoms[idx].hydrogens = hydrogens as u8;
    }
}

/// Atoms written aromatic that still need a pi bond from a neighbor.
fn needs_pi_bond(mol: &Molecule, idx: usize) -> bool {
    let atom = &mol.atoms[idx];
    if !atom.aromatic {
        return false;
    }
    let Some(valence) = atom.element.lowest_valence(atom.charge) else {
        return false;
    };
    let free = valence - mol.bond_valence(idx) - mol.atoms[idx].hydrogens as i32;
    free >= 1
}

/// Every aromatic atom that needs a double bond must be pairable with an
/// aromatic neighbor that needs one too (a perfect matching).
fn check_kekulizable(mol: &Molecule) -> Result<(), SmilesError> {
    let needy: Vec<bool> = (0..mol.atoms.len())
        .map(|i| needs_pi_bond(mol, i))
        .collect();
    if !needy.iter().any(|n| *n) {
        return Ok(());
    }

    let partners: Vec<Vec<usize>> = (0..mol.atoms.len())
        .map(|i| {
            mol.neighbors(i)
                .filter(|(j, order)| *order == BondOrder::Aromatic && needy[*j])
                .map(|(j, _)| j)
                .collect()
        })
        .collect();

    let mut matched = vec![false; mol.atoms.len()];
    let mut budget = 200_000usize;
    if match_all(&needy, &partners, &mut matched, 0, &mut budget) {
        return Ok(());
    }
    let atom = needy.iter().position(|n| *n).unwrap_or(0);
    Err(SmilesError::Kekulize { atom })
}

fn match_all(
    needy: &[bool],
    partners: &[Vec<usize>],
    matched: &mut [bool],
    from: usize,
    budget: &mut usize,
) -> bool {
    let Some(first) = (from..needy.len()).find(|&i| needy[i] && !matched[i]) else {
        return true;
    };
    if *budget == 0 {
        return false;
    }
    *budget -= 1;

    matched[first] = true;
    for &partner in &partners[first] {
        if matched[partner] {
            continue;
        }
        matched[partner] = true;
        if match_all(needy, partners, matched, first + 1, budget) {
            return true;
        }
        matched[partner] = false;
    }
    matched[first] = false;
    false
}

fn check_valences(mol: &Molecule) -> Result<(), SmilesError> {
    for (idx, atom) in mol.atoms.iter().enumerate() {
        if atom.aromatic {
            continue;
        }
        let Some(max) = atom.element.max_valence(atom.charge) else {
            continue;
        };
        let valence = mol.bond_valence(idx) + i32::from(atom.hydrogens);
        if valence > max {
            return Err(SmilesError::Valence {
                atom: idx,
                symbol: atom.element.symbol().to_string(),
                valence,
                max,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hydrogens(smiles: &str) -> Vec<u8> {
        parse(smiles)
            .unwrap()
            .atoms()
            .iter()
            .map(|a| a.hydrogens)
            .collect()
    }

    #[test]
    fn organic_subset_gets_implicit_hydrogens() {
        assert_eq!(hydrogens("CCO"), vec![3, 2, 1]);
        assert_eq!(hydrogens("C=O"), vec![2, 0]);
        assert_eq!(hydrogens("C#N"), vec![1, 0]);
    }

    #[test]
    fn aromatic_atoms_get_one_less_hydrogen() {
        assert_eq!(hydrogens("c1ccccc1"), vec![1; 6]);
        assert_eq!(hydrogens("c1ccncc1"), vec![1, 1, 1, 0, 1, 1]);
        assert_eq!(hydrogens("c1cc[nH]c1")[3], 1);
    }

    #[test]
    fn bracket_atoms_keep_written_hydrogens() {
        let mol = parse("[NH4+]").unwrap();
        assert_eq!(mol.atoms()[0].hydrogens, 4);
        assert_eq!(mol.atoms()[0].charge, 1);
        let mol = parse("[CH2]").unwrap();
        assert_eq!(mol.atoms()[0].hydrogens, 2);
    }

    #[test]
    fn parses_isotope_chirality_and_class() {
        let mol = parse("[13C@@H:7](F)(Cl)Br").unwrap();
        let c = &mol.atoms()[0];
        assert_eq!(c.isotope, Some(13));
        assert_eq!(c.hydrogens, 1);
        assert_eq!(mol.num_atoms(), 4);
    }

    #[test]
    fn parses_multi_charges() {
        assert_eq!(parse("[Fe+++]").unwrap().atoms()[0].charge, 3);
        assert_eq!(parse("[O-2]").unwrap().atoms()[0].charge, -2);
    }

    #[test]
    fn ring_closure_with_percent_label() {
        let mol = parse("C%12CCCCC%12").unwrap();
        assert_eq!(mol.bonds().len(), 6);
    }

    #[test]
    fn ring_closure_bond_symbol_applies() {
        let mol = parse("C=1CCCCC1").unwrap();
        let closing = mol.bond_between(0, 5).unwrap();
        assert_eq!(closing.order, BondOrder::Double);
    }

    #[test]
    fn dot_separates_components() {
        let mol = parse("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.num_atoms(), 2);
        assert!(mol.bonds().is_empty());
    }

    #[test]
    fn trailing_title_is_ignored() {
        let mol = parse("CCO ethanol").unwrap();
        assert_eq!(mol.num_atoms(), 3);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse(""), Err(SmilesError::Empty));
        assert_eq!(parse("   "), Err(SmilesError::Empty));
        assert!(matches!(parse("C(C"), Err(SmilesError::UnclosedBranch { .. })));
        assert!(matches!(parse("CC)"), Err(SmilesError::UnbalancedBranch { .. })));
        assert!(matches!(parse("C1CC"), Err(SmilesError::UnclosedRing { label: 1 })));
        assert!(matches!(parse("CC="), Err(SmilesError::DanglingBond { .. })));
        assert!(matches!(parse("=CC"), Err(SmilesError::DanglingBond { .. })));
        assert!(matches!(parse("[Xx]"), Err(SmilesError::UnknownElement { .. })));
        assert!(matches!(parse("[C"), Err(SmilesError::BadBracketAtom { .. })));
        assert!(matches!(
            parse("not a smiles"),
            Err(SmilesError::UnexpectedCharacter { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_bracket_numbers() {
        for input in [
            "[C-2147483648]",
            "[C+2147483648]",
            "[C+99999999999]",
            "[99999999999C]",
            "[CH99999999999]",
            "[CH4:99999999999]",
        ] {
            assert!(
                matches!(parse(input), Err(SmilesError::BadBracketAtom { .. })),
                "{} should be rejected",
                input
            );
        }
    }

    #[test]
    fn rejects_aromatic_atoms_outside_rings() {
        assert!(matches!(parse("cc"), Err(SmilesError::NonRingAromatic { .. })));
    }

    #[test]
    fn rejects_unkekulizable_rings() {
        assert!(matches!(parse("c1cccc1"), Err(SmilesError::Kekulize { .. })));
    }

    #[test]
    fn rejects_pentavalent_carbon() {
        assert!(matches!(
            parse("C(C)(C)(C)(C)C"),
            Err(SmilesError::Valence { valence: 5, max: 4, .. })
        ));
    }

    #[test]
    fn rejects_ring_closure_onto_bonded_atom() {
        assert!(matches!(
            parse("C12CC12"),
            Err(SmilesError::InvalidRingClosure { .. })
        ));
    }
}
