//! Ahnentafel ascendancy numbers and relationship labels.
//!
//! An ascendancy number encodes an ancestor's position in a binary
//! pedigree: the root person is 1, and any ancestor n has father 2n
//! and mother 2n+1. The relationship label is a pure function of that
//! number.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;
use thiserror::Error;

/// Error for malformed ascendancy numbers.
///
/// The tree API encodes ascendancy numbers as decimal text; anything
/// that is not a positive integer is rejected rather than mapped to a
/// fallback label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid ascendancy number: {value:?}")]
pub struct AscendancyError {
    /// The text that failed to parse.
    pub value: String,
}

/// A validated Ahnentafel position (always >= 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AscendancyNumber(NonZeroU64);

impl AscendancyNumber {
    /// Create an ascendancy number, rejecting zero.
    pub fn new(n: u64) -> Result<Self, AscendancyError> {
        NonZeroU64::new(n)
            .map(Self)
            .ok_or_else(|| AscendancyError {
                value: n.to_string(),
            })
    }

    /// The raw position value.
    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// Derive the relationship of this ancestor to the root person.
    pub fn relationship(self) -> Relationship {
        match self.0.get() {
            1 => Relationship::Root,
            2 => Relationship::Father,
            3 => Relationship::Mother,
            n => {
                let generation = n.ilog2();
                // Odd positions are mothers, so odd lineage is maternal.
                let side = if n % 2 == 1 {
                    Side::Maternal
                } else {
                    Side::Paternal
                };
                match generation {
                    2 => Relationship::Grandparent(side),
                    3 => Relationship::GreatGrandparent(side),
                    g => Relationship::DistantGrandparent {
                        side,
                        greats: g - 2,
                    },
                }
            }
        }
    }
}

impl FromStr for AscendancyNumber {
    type Err = AscendancyError;

    fn from_str(s: &str) -> Result<Self, AscendancyError> {
        s.parse::<NonZeroU64>()
            .map(Self)
            .map_err(|_| AscendancyError {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for AscendancyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which lineage an ancestor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Paternal,
    Maternal,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Paternal => write!(f, "Paternal"),
            Side::Maternal => write!(f, "Maternal"),
        }
    }
}

/// Relationship of an ancestor to the root person.
///
/// The `Display` impl produces the human labels used in the export:
/// "Self", "Father", "Mother", "Paternal Grandparent",
/// "Maternal 2x Great-Grandparent", and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// The root person themselves (position 1).
    Root,
    Father,
    Mother,
    Grandparent(Side),
    GreatGrandparent(Side),
    /// Generations beyond great-grandparents; `greats` is the
    /// multiplier in "{n}x Great-Grandparent" (generation - 2).
    DistantGrandparent { side: Side, greats: u32 },
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relationship::Root => write!(f, "Self"),
            Relationship::Father => write!(f, "Father"),
            Relationship::Mother => write!(f, "Mother"),
            Relationship::Grandparent(side) => write!(f, "{side} Grandparent"),
            Relationship::GreatGrandparent(side) => write!(f, "{side} Great-Grandparent"),
            Relationship::DistantGrandparent { side, greats } => {
                write!(f, "{side} {greats}x Great-Grandparent")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(n: u64) -> String {
        AscendancyNumber::new(n)
            .unwrap()
            .relationship()
            .to_string()
    }

    #[test]
    fn test_immediate_family() {
        assert_eq!(label(1), "Self");
        assert_eq!(label(2), "Father");
        assert_eq!(label(3), "Mother");
    }

    #[test]
    fn test_grandparents() {
        assert_eq!(label(4), "Paternal Grandparent");
        assert_eq!(label(5), "Maternal Grandparent");
        assert_eq!(label(6), "Paternal Grandparent");
        assert_eq!(label(7), "Maternal Grandparent");
    }

    #[test]
    fn test_great_grandparents() {
        assert_eq!(label(8), "Paternal Great-Grandparent");
        assert_eq!(label(9), "Maternal Great-Grandparent");
        assert_eq!(label(15), "Maternal Great-Grandparent");
    }

    #[test]
    fn test_distant_grandparents() {
        assert_eq!(label(16), "Paternal 2x Great-Grandparent");
        assert_eq!(label(17), "Maternal 2x Great-Grandparent");
        assert_eq!(label(32), "Paternal 3x Great-Grandparent");
        assert_eq!(label(127), "Maternal 4x Great-Grandparent");
    }

    #[test]
    fn test_parity_determines_side() {
        for n in 4..64u64 {
            let text = label(n);
            if n % 2 == 0 {
                assert!(text.starts_with("Paternal"), "{n} -> {text}");
            } else {
                assert!(text.starts_with("Maternal"), "{n} -> {text}");
            }
        }
    }

    #[test]
    fn test_parse_valid() {
        let n: AscendancyNumber = "12".parse().unwrap();
        assert_eq!(n.get(), 12);
        assert_eq!(n.to_string(), "12");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("0".parse::<AscendancyNumber>().is_err());
        assert!("-3".parse::<AscendancyNumber>().is_err());
        assert!("2.5".parse::<AscendancyNumber>().is_err());
        assert!("abc".parse::<AscendancyNumber>().is_err());
        assert!("".parse::<AscendancyNumber>().is_err());
    }

    #[test]
    fn test_new_rejects_zero() {
        assert!(AscendancyNumber::new(0).is_err());
        assert!(AscendancyNumber::new(1).is_ok());
    }
}
