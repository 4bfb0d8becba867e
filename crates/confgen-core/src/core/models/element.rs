use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(pub String);

/// Chemical elements understood by the toolkit.
///
/// The set covers the organic subset plus the heavier halogens and chalcogens
/// commonly found in drug-like molecules. Anything outside it is rejected at
/// parse time rather than silently embedded with made-up parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    Se = 34,
    Br = 35,
    I = 53,
}

static SYMBOLS: Map<&'static str, Element> = phf_map! {
    "H" => Element::H,
    "D" => Element::H,
    "T" => Element::H,
    "B" => Element::B,
    "C" => Element::C,
    "N" => Element::N,
    "O" => Element::O,
    "F" => Element::F,
    "Si" => Element::Si,
    "P" => Element::P,
    "S" => Element::S,
    "Cl" => Element::Cl,
    "Se" => Element::Se,
    "Br" => Element::Br,
    "I" => Element::I,
};

/// How a formal charge shifts the allowed valences of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChargeShift {
    /// Group 13: an extra electron behaves like carbon (B⁻ is tetravalent).
    Acceptor,
    /// Group 14 and hydrogen: any charge removes one bond.
    Neutral,
    /// Groups 15-17: a positive charge adds a bond (N⁺, O⁺), a negative removes one.
    Donor,
}

impl Element {
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::I => "I",
        }
    }

    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    pub fn is_hydrogen(&self) -> bool {
        matches!(self, Element::H)
    }

    /// Single-bond covalent radius in Angstroms.
    pub fn covalent_radius(&self) -> f64 {
        match self {
            Element::H => 0.32,
            Element::B => 0.82,
            Element::C => 0.77,
            Element::N => 0.71,
            Element::O => 0.66,
            Element::F => 0.57,
            Element::Si => 1.11,
            Element::P => 1.06,
            Element::S => 1.04,
            Element::Cl => 0.99,
            Element::Se => 1.17,
            Element::Br => 1.14,
            Element::I => 1.33,
        }
    }

    /// Bondi van der Waals radius in Angstroms.
    pub fn vdw_radius(&self) -> f64 {
        match self {
            Element::H => 1.20,
            Element::B => 1.92,
            Element::C => 1.70,
            Element::N => 1.55,
            Element::O => 1.52,
            Element::F => 1.47,
            Element::Si => 2.10,
            Element::P => 1.80,
            Element::S => 1.80,
            Element::Cl => 1.75,
            Element::Se => 1.90,
            Element::Br => 1.85,
            Element::I => 1.98,
        }
    }

    pub fn valence_electrons(&self) -> u8 {
        match self {
            Element::H => 1,
            Element::B => 3,
            Element::C | Element::Si => 4,
            Element::N | Element::P => 5,
            Element::O | Element::S | Element::Se => 6,
            Element::F | Element::Cl | Element::Br | Element::I => 7,
        }
    }

    /// Allowed valences of the neutral atom, in ascending order.
    pub fn allowed_valences(&self) -> &'static [u8] {
        match self {
            Element::H => &[1],
            Element::B => &[3],
            Element::C | Element::Si => &[4],
            Element::N => &[3],
            Element::O => &[2],
            Element::F | Element::Cl | Element::Br => &[1],
            Element::P => &[3, 5],
            Element::S | Element::Se => &[2, 4, 6],
            Element::I => &[1, 3, 5],
        }
    }

    fn charge_shift(&self) -> ChargeShift {
        match self {
            Element::B => ChargeShift::Acceptor,
            Element::H | Element::C | Element::Si => ChargeShift::Neutral,
            _ => ChargeShift::Donor,
        }
    }

    /// Allowed valences once the formal charge is taken into account.
    pub fn charged_valences(&self, formal_charge: i8) -> Vec<u8> {
        let charge = i16::from(formal_charge);
        self.allowed_valences()
            .iter()
            .map(|&v| {
                let v = i16::from(v);
                let shifted = match self.charge_shift() {
                    ChargeShift::Acceptor => v - charge,
                    ChargeShift::Neutral => v - charge.abs(),
                    ChargeShift::Donor => v + charge,
                };
                shifted.clamp(0, i16::from(u8::MAX)) as u8
            })
            .collect()
    }

    /// The largest valence this element may show at the given formal charge.
    pub fn max_valence(&self, formal_charge: i8) -> u8 {
        self.charged_valences(formal_charge)
            .into_iter()
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    /// Parses an element symbol, tolerating upper-case CTfile spellings such as `CL`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let normalized: String = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(|c| c.to_lowercase()))
                .collect(),
            None => return Err(ParseElementError(s.to_string())),
        };
        SYMBOLS
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_accepts_ctfile_spellings() {
        assert_eq!(Element::from_str("C"), Ok(Element::C));
        assert_eq!(Element::from_str("CL"), Ok(Element::Cl));
        assert_eq!(Element::from_str("br"), Ok(Element::Br));
        assert_eq!(Element::from_str(" Se "), Ok(Element::Se));
        assert_eq!(Element::from_str("D"), Ok(Element::H));
    }

    #[test]
    fn from_str_rejects_unknown_symbols() {
        assert!(Element::from_str("Xx").is_err());
        assert!(Element::from_str("Fe").is_err());
        assert!(Element::from_str("").is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for element in [Element::H, Element::C, Element::Cl, Element::Si, Element::I] {
            assert_eq!(Element::from_str(&element.to_string()), Ok(element));
        }
    }

    #[test]
    fn atomic_numbers_match_discriminants() {
        assert_eq!(Element::C.atomic_number(), 6);
        assert_eq!(Element::Br.atomic_number(), 35);
    }

    #[test]
    fn charged_valences_follow_isoelectronic_rules() {
        assert_eq!(Element::N.charged_valences(1), vec![4]);
        assert_eq!(Element::O.charged_valences(-1), vec![1]);
        assert_eq!(Element::C.charged_valences(-1), vec![3]);
        assert_eq!(Element::C.charged_valences(1), vec![3]);
        assert_eq!(Element::B.charged_valences(-1), vec![4]);
        assert_eq!(Element::S.charged_valences(0), vec![2, 4, 6]);
    }

    #[test]
    fn max_valence_never_underflows() {
        assert_eq!(Element::H.max_valence(1), 0);
        assert_eq!(Element::F.max_valence(-3), 0);
    }
}
