use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

/// Chemical elements accepted in SMILES input.
///
/// Covers the first five periods plus the heavy main-group and coinage metals
/// that show up in drug-like and inorganic records on PubChem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1,
    He,
    Li,
    Be,
    B,
    C,
    N,
    O,
    F,
    Ne,
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    Ar,
    K,
    Ca,
    Sc,
    Ti,
    V,
    Cr,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Ga,
    Ge,
    As,
    Se,
    Br,
    Kr,
    Rb,
    Sr,
    Y,
    Zr,
    Nb,
    Mo,
    Tc,
    Ru,
    Rh,
    Pd,
    Ag,
    Cd,
    In,
    Sn,
    Sb,
    Te,
    I,
    Xe,
    Cs = 55,
    Ba = 56,
    Pt = 78,
    Au = 79,
    Hg = 80,
    Tl = 81,
    Pb = 82,
    Bi = 83,
}

impl Element {
    /// Standard atomic weight (IUPAC, conventional values).
    pub fn atomic_mass(&self) -> f64 {
        match self {
            Element::H => 1.008,
            Element::He => 4.003,
            Element::Li => 6.941,
            Element::Be => 9.012,
            Element::B => 10.812,
            Element::C => 12.011,
            Element::N => 14.007,
            Element::O => 15.999,
            Element::F => 18.998,
            Element::Ne => 20.18,
            Element::Na => 22.99,
            Element::Mg => 24.305,
            Element::Al => 26.982,
            Element::Si => 28.086,
            Element::P => 30.974,
            Element::S => 32.067,
            Element::Cl => 35.453,
            Element::Ar => 39.948,
            Element::K => 39.098,
            Element::Ca => 40.078,
            Element::Sc => 44.956,
            Element::Ti => 47.867,
            Element::V => 50.942,
            Element::Cr => 51.996,
            Element::Mn => 54.938,
            Element::Fe => 55.845,
            Element::Co => 58.933,
            Element::Ni => 58.693,
            Element::Cu => 63.546,
            Element::Zn => 65.39,
            Element::Ga => 69.723,
            Element::Ge => 72.61,
            Element::As => 74.922,
            Element::Se => 78.96,
            Element::Br => 79.904,
            Element::Kr => 83.8,
            Element::Rb => 85.468,
            Element::Sr => 87.62,
            Element::Y => 88.906,
            Element::Zr => 91.224,
            Element::Nb => 92.906,
            Element::Mo => 95.94,
            Element::Tc => 98.0,
            Element::Ru => 101.07,
            Element::Rh => 102.906,
            Element::Pd => 106.42,
            Element::Ag => 107.868,
            Element::Cd => 112.411,
            Element::In => 114.818,
            Element::Sn => 118.71,
            Element::Sb => 121.76,
            Element::Te => 127.6,
            Element::I => 126.904,
            Element::Xe => 131.29,
            Element::Cs => 132.905,
            Element::Ba => 137.328,
            Element::Pt => 195.078,
            Element::Au => 196.967,
            Element::Hg => 200.59,
            Element::Tl => 204.383,
            Element::Pb => 207.2,
            Element::Bi => 208.98,
        }
    }

    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::He => "He",
            Element::Li => "Li",
            Element::Be => "Be",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Ne => "Ne",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::Al => "Al",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Ar => "Ar",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Sc => "Sc",
            Element::Ti => "Ti",
            Element::V => "V",
            Element::Cr => "Cr",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Co => "Co",
            Element::Ni => "Ni",
            Element::Cu => "Cu",
            Element::Zn => "Zn",
            Element::Ga => "Ga",
            Element::Ge => "Ge",
            Element::As => "As",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::Kr => "Kr",
            Element::Rb => "Rb",
            Element::Sr => "Sr",
            Element::Y => "Y",
            Element::Zr => "Zr",
            Element::Nb => "Nb",
            Element::Mo => "Mo",
            Element::Tc => "Tc",
            Element::Ru => "Ru",
            Element::Rh => "Rh",
            Element::Pd => "Pd",
            Element::Ag => "Ag",
            Element::Cd => "Cd",
            Element::In => "In",
            Element::Sn => "Sn",
            Element::Sb => "Sb",
            Element::Te => "Te",
            Element::I => "I",
            Element::Xe => "Xe",
            Element::Cs => "Cs",
            Element::Ba => "Ba",
            Element::Pt => "Pt",
            Element::Au => "Au",
            Element::Hg => "Hg",
            Element::Tl => "Tl",
            Element::Pb => "Pb",
            Element::Bi => "Bi",
        }
    }

    /// Lowest normal valence for elements with implicit-hydrogen semantics,
    /// shifted by formal charge the way isoelectronic atoms behave
    /// (N+ acts like C, O- like F, C+ and C- like B).
    pub fn lowest_valence(&self, charge: i8) -> Option<i32> {
        let charge = i32::from(charge);
        match self {
            Element::C => Some(4 - charge.abs()),
            Element::B => Some(3 - charge),
            Element::N | Element::P | Element::As => Some(3 + charge),
            Element::O | Element::S | Element::Se => Some(2 + charge),
            Element::F | Element::Cl | Element::Br | Element::I => Some(1 + charge),
            _ => None,
        }
        .filter(|v| *v >= 0)
    }

    /// Allowed valences for atoms written outside brackets.
    pub fn default_valences(&self) -> &'static [i32] {
        match self {
            Element::B => &[3],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::P => &[3, 5],
            Element::S => &[2, 4, 6],
            Element::F | Element::Cl | Element::Br | Element::I => &[1],
            _ => &[],
        }
    }

    /// Upper bound on explicit valence for the elements we validate.
    pub fn max_valence(&self, charge: i8) -> Option<i32> {
        let charge = i32::from(charge);
        match self {
            Element::C => Some(4 - charge.abs()),
            Element::N => Some(3 + charge),
            Element::O => Some(2 + charge),
            Element::F => Some(1 + charge),
            _ => None,
        }
    }

    /// Whether the element may be written in lowercase as an aromatic atom.
    pub fn can_be_aromatic(&self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::As
                | Element::Se
        )
    }

    pub fn is_halogen(&self) -> bool {
        matches!(self, Element::F | Element::Cl | Element::Br | Element::I)
    }
}

/// Approximate mass of a specific isotope. Common labels use measured masses;
/// anything else falls back to the mass number.
pub fn isotope_mass(element: Element, mass_number: u16) -> f64 {
    match (element, mass_number) {
        (Element::H, 1) => 1.007825,
        (Element::H, 2) => 2.014102,
        (Element::H, 3) => 3.016049,
        (Element::C, 12) => 12.0,
        (Element::C, 13) => 13.003355,
        (Element::C, 14) => 14.003242,
        (Element::N, 15) => 15.000109,
        (Element::O, 17) => 16.999132,
        (Element::O, 18) => 17.99916,
        (Element::F, 18) => 18.000938,
        (Element::S, 34) => 33.967867,
        (Element::Cl, 37) => 36.965903,
        (Element::I, 125) => 124.904630,
        (Element::I, 131) => 130.906124,
        _ => f64::from(mass_number),
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "H" => Ok(Element::H),
            "He" => Ok(Element::He),
            "Li" => Ok(Element::Li),
            "Be" => Ok(Element::Be),
            "B" => Ok(Element::B),
            "C" => Ok(Element::C),
            "N" => Ok(Element::N),
            "O" => Ok(Element::O),
            "F" => Ok(Element::F),
            "Ne" => Ok(Element::Ne),
            "Na" => Ok(Element::Na),
            "Mg" => Ok(Element::Mg),
            "Al" => Ok(Element::Al),
            "Si" => Ok(Element::Si),
            "P" => Ok(Element::P),
            "S" => Ok(Element::S),
            "Cl" => Ok(Element::Cl),
            "Ar" => Ok(Element::Ar),
            "K" => Ok(Element::K),
            "Ca" => Ok(Element::Ca),
            "Sc" => Ok(Element::Sc),
            "Ti" => Ok(Element::Ti),
            "V" => Ok(Element::V),
            "Cr" => Ok(Element::Cr),
            "Mn" => Ok(Element::Mn),
            "Fe" => Ok(Element::Fe),
            "Co" => Ok(Element::Co),
            "Ni" => Ok(Element::Ni),
            "Cu" => Ok(Element::Cu),
            "Zn" => Ok(Element::Zn),
            "Ga" => Ok(Element::Ga),
            "Ge" => Ok(Element::Ge),
            "As" => Ok(Element::As),
            "Se" => Ok(Element::Se),
            "Br" => Ok(Element::Br),
            "Kr" => Ok(Element::Kr),
            "Rb" => Ok(Element::Rb),
            "Sr" => Ok(Element::Sr),
            "Y" => Ok(Element::Y),
            "Zr" => Ok(Element::Zr),
            "Nb" => Ok(Element::Nb),
            "Mo" => Ok(Element::Mo),
            "Tc" => Ok(Element::Tc),
            "Ru" => Ok(Element::Ru),
            "Rh" => Ok(Element::Rh),
            "Pd" => Ok(Element::Pd),
            "Ag" => Ok(Element::Ag),
            "Cd" => Ok(Element::Cd),
            "In" => Ok(Element::In),
            "Sn" => Ok(Element::Sn),
            "Sb" => Ok(Element::Sb),
            "Te" => Ok(Element::Te),
            "I" => Ok(Element::I),
            "Xe" => Ok(Element::Xe),
            "Cs" => Ok(Element::Cs),
            "Ba" => Ok(Element::Ba),
            "Pt" => Ok(Element::Pt),
            "Au" => Ok(Element::Au),
            "Hg" => Ok(Element::Hg),
            "Tl" => Ok(Element::Tl),
            "Pb" => Ok(Element::Pb),
            "Bi" => Ok(Element::Bi),
            _ => Err(ParseElementError(s.to_string())),
        }
    }
}
