//! The International Morse alphabet.
//!
//! A static table maps each symbolic unit (a single character or a named
//! prosign) to its marks. The table carries no audio; rendering picks a
//! tone or silence from the [`Mark`] kind.

use std::fmt;

/// A single mark of a Morse symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Short mark, one unit long.
    Dot,
    /// Long mark, three units long.
    Dash,
}

use Mark::{Dash, Dot};

/// The marks that make up one symbolic unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkSequence {
    /// Ordered dots and dashes, never empty.
    Marks(&'static [Mark]),
    /// The literal space: a word gap with no tone.
    WordSpace,
}

/// Procedural signals sent as one unbroken symbol.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prosign {
    AA,
    AR,
    AS,
    VE,
    INT,
    HH,
    BT,
    KA,
    CT,
    KN,
    NJ,
    SK,
    SN,
}

impl Prosign {
    /// Every prosign the alphabet knows.
    pub const ALL: [Prosign; 13] = [
        Prosign::AA,
        Prosign::AR,
        Prosign::AS,
        Prosign::VE,
        Prosign::INT,
        Prosign::HH,
        Prosign::BT,
        Prosign::KA,
        Prosign::CT,
        Prosign::KN,
        Prosign::NJ,
        Prosign::SK,
        Prosign::SN,
    ];

    /// The conventional name, e.g. `"BT"`.
    pub fn name(self) -> &'static str {
        match self {
            Prosign::AA => "AA",
            Prosign::AR => "AR",
            Prosign::AS => "AS",
            Prosign::VE => "VE",
            Prosign::INT => "INT",
            Prosign::HH => "HH",
            Prosign::BT => "BT",
            Prosign::KA => "KA",
            Prosign::CT => "CT",
            Prosign::KN => "KN",
            Prosign::NJ => "NJ",
            Prosign::SK => "SK",
            Prosign::SN => "SN",
        }
    }

    /// Finds a prosign by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    fn marks(self) -> &'static [Mark] {
        match self {
            Prosign::AA => &[Dot, Dash, Dot, Dash],
            Prosign::AR => &[Dot, Dash, Dot, Dash, Dot],
            Prosign::AS => &[Dot, Dash, Dot, Dot, Dot],
            Prosign::VE => &[Dot, Dot, Dot, Dash, Dot],
            Prosign::INT => &[Dot, Dot, Dash, Dot, Dash],
            Prosign::HH => &[Dot, Dot, Dot, Dot, Dot, Dot, Dot, Dot],
            Prosign::BT => &[Dash, Dot, Dot, Dot, Dash],
            Prosign::KA => &[Dash, Dot, Dash, Dot, Dash],
            Prosign::CT => &[Dash, Dot, Dash, Dot, Dash],
            Prosign::KN => &[Dash, Dot, Dash, Dash, Dot],
            Prosign::NJ => &[Dash, Dot, Dot, Dash, Dash, Dash],
            Prosign::SK => &[Dot, Dot, Dot, Dash, Dot, Dash],
            Prosign::SN => &[Dot, Dot, Dot, Dash, Dot],
        }
    }
}

/// One symbol of a message: a character or a prosign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolicUnit {
    /// A single character. `' '` is the word space.
    Char(char),
    /// A named prosign.
    Prosign(Prosign),
}

impl SymbolicUnit {
    /// The word-space unit.
    pub const SPACE: SymbolicUnit = SymbolicUnit::Char(' ');

    /// Returns true for the word-space unit.
    pub fn is_space(&self) -> bool {
        *self == Self::SPACE
    }
}

impl From<char> for SymbolicUnit {
    fn from(c: char) -> Self {
        SymbolicUnit::Char(c.to_ascii_uppercase())
    }
}

impl From<Prosign> for SymbolicUnit {
    fn from(p: Prosign) -> Self {
        SymbolicUnit::Prosign(p)
    }
}

/// Prosigns are written in angle brackets so they read back unambiguously.
impl fmt::Display for SymbolicUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolicUnit::Char(c) => write!(f, "{}", c),
            SymbolicUnit::Prosign(p) => write!(f, "<{}>", p.name()),
        }
    }
}

/// Looks up the marks for a unit, or `None` if it has no Morse code.
pub fn lookup(unit: SymbolicUnit) -> Option<MarkSequence> {
    match unit {
        SymbolicUnit::Prosign(p) => Some(MarkSequence::Marks(p.marks())),
        SymbolicUnit::Char(c) => char_marks(c),
    }
}

/// Resolves a bare token to a unit.
///
/// Prosign names are tried first, so `"BT"` is the prosign and not the
/// letters B and T. Otherwise the token must be exactly one character
/// with an entry in the alphabet.
pub fn lookup_token(token: &str) -> Option<SymbolicUnit> {
    if let Some(prosign) = Prosign::from_name(token) {
        return Some(SymbolicUnit::Prosign(prosign));
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            let unit = SymbolicUnit::from(c);
            lookup(unit).map(|_| unit)
        }
        _ => None,
    }
}

fn char_marks(c: char) -> Option<MarkSequence> {
    let marks: &'static [Mark] = match c.to_ascii_uppercase() {
        ' ' => return Some(MarkSequence::WordSpace),
        'A' => &[Dot, Dash],
        'B' => &[Dash, Dot, Dot, Dot],
        'C' => &[Dash, Dot, Dash, Dot],
        'D' => &[Dash, Dot, Dot],
        'E' => &[Dot],
        'F' => &[Dot, Dot, Dash, Dot],
        'G' => &[Dash, Dash, Dot],
        'H' => &[Dot, Dot, Dot, Dot],
        'I' => &[Dot, Dot],
        'J' => &[Dot, Dash, Dash, Dash],
        'K' => &[Dash, Dot, Dash],
        'L' => &[Dot, Dash, Dot, Dot],
        'M' => &[Dash, Dash],
        'N' => &[Dash, Dot],
        'O' => &[Dash, Dash, Dash],
        'P' => &[Dot, Dash, Dash, Dot],
        'Q' => &[Dash, Dash, Dot, Dash],
        'R' => &[Dot, Dash, Dot],
        'S' => &[Dot, Dot, Dot],
        'T' => &[Dash],
        'U' => &[Dot, Dot, Dash],
        'V' => &[Dot, Dot, Dot, Dash],
        'W' => &[Dot, Dash, Dash],
        'X' => &[Dash, Dot, Dot, Dash],
        'Y' => &[Dash, Dot, Dash, Dash],
        'Z' => &[Dash, Dash, Dot, Dot],
        '1' => &[Dot, Dash, Dash, Dash, Dash],
        '2' => &[Dot, Dot, Dash, Dash, Dash],
        '3' => &[Dot, Dot, Dot, Dash, Dash],
        '4' => &[Dot, Dot, Dot, Dot, Dash],
        '5' => &[Dot, Dot, Dot, Dot, Dot],
        '6' => &[Dash, Dot, Dot, Dot, Dot],
        '7' => &[Dash, Dash, Dot, Dot, Dot],
        '8' => &[Dash, Dash, Dash, Dot, Dot],
        '9' => &[Dash, Dash, Dash, Dash, Dot],
        '0' => &[Dash, Dash, Dash, Dash, Dash],
        '/' => &[Dash, Dot, Dot, Dash, Dot],
        '.' => &[Dot, Dash, Dot, Dash, Dot, Dash],
        ',' => &[Dash, Dash, Dot, Dot, Dash, Dash],
        '?' => &[Dot, Dot, Dash, Dash, Dot, Dot],
        _ => return None,
    };

    Some(MarkSequence::Marks(marks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_and_digits_present() {
        for c in ('A'..='Z').chain('0'..='9').chain(['.', ',', '?', '/']) {
            match lookup(SymbolicUnit::from(c)) {
                Some(MarkSequence::Marks(marks)) => assert!(!marks.is_empty(), "{}", c),
                other => panic!("{} resolved to {:?}", c, other),
            }
        }
    }

    #[test]
    fn test_space_is_word_gap() {
        assert_eq!(lookup(SymbolicUnit::SPACE), Some(MarkSequence::WordSpace));
        assert!(SymbolicUnit::from(' ').is_space());
    }

    #[test]
    fn test_lowercase_resolves() {
        assert_eq!(lookup(SymbolicUnit::Char('k')), lookup(SymbolicUnit::Char('K')));
    }

    #[test]
    fn test_unknown_character() {
        assert_eq!(lookup(SymbolicUnit::Char('@')), None);
        assert_eq!(lookup(SymbolicUnit::Char('é')), None);
    }

    #[test]
    fn test_prosign_takes_precedence_over_letters() {
        assert_eq!(
            lookup_token("BT"),
            Some(SymbolicUnit::Prosign(Prosign::BT))
        );
        assert_eq!(
            lookup_token("int"),
            Some(SymbolicUnit::Prosign(Prosign::INT))
        );
        assert_eq!(lookup_token("E"), Some(SymbolicUnit::Char('E')));
        assert_eq!(lookup_token("XY"), None);
        assert_eq!(lookup_token(""), None);
    }

    #[test]
    fn test_prosign_marks() {
        assert_eq!(
            lookup(Prosign::AR.into()),
            Some(MarkSequence::Marks(&[Dot, Dash, Dot, Dash, Dot]))
        );
        assert_eq!(
            lookup(Prosign::HH.into()),
            Some(MarkSequence::Marks(&[Dot; 8]))
        );
        for prosign in Prosign::ALL {
            assert_eq!(Prosign::from_name(prosign.name()), Some(prosign));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(SymbolicUnit::Char('K').to_string(), "K");
        assert_eq!(SymbolicUnit::Prosign(Prosign::SK).to_string(), "<SK>");
    }
}
