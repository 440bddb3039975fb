use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How rigidly a bond network may move during simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondMobility {
    Rigid,
    Torsion,
    Free,
}

#[derive(Debug, Error)]
#[error("Invalid bond mobility string: '{0}'")]
pub struct ParseBondMobilityError(String);

impl FromStr for BondMobility {
    type Err = ParseBondMobilityError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Rigid" => Ok(BondMobility::Rigid),
            "Torsion" => Ok(BondMobility::Torsion),
            "Free" => Ok(BondMobility::Free),
            other => Err(ParseBondMobilityError(other.to_string())),
        }
    }
}

impl fmt::Display for BondMobility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BondMobility::Rigid => "Rigid",
                BondMobility::Torsion => "Torsion",
                BondMobility::Free => "Free",
            }
        )
    }
}

/// An inclusive internal-residue-number span, `first <= last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidueSpan {
    pub first: isize,
    pub last: isize,
}

/// A mobility constraint scoped to the whole structure, one chain, or one
/// span of a chain.
///
/// A span is only meaningful when a chain is given; a chain without a span
/// covers that whole chain, and no chain at all covers the whole structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mobilizer {
    pub bond_mobility: BondMobility,
    pub chain_name: Option<char>,
    pub residues: Option<ResidueSpan>,
}

impl Mobilizer {
    pub fn whole_structure(bond_mobility: BondMobility) -> Self {
        Self {
            bond_mobility,
            chain_name: None,
            residues: None,
        }
    }

    pub fn for_chain(bond_mobility: BondMobility, chain_name: char) -> Self {
        Self {
            bond_mobility,
            chain_name: Some(chain_name),
            residues: None,
        }
    }

    pub fn for_span(bond_mobility: BondMobility, chain_name: char, first: isize, last: isize) -> Self {
        Self {
            bond_mobility,
            chain_name: Some(chain_name),
            residues: Some(ResidueSpan { first, last }),
        }
    }

    pub fn is_whole_structure(&self) -> bool {
        self.chain_name.is_none()
    }
}
