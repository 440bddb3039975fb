use super::chain::Chain;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DNA_SYMBOLS: &str = "ACGT";
const RNA_SYMBOLS: &str = "ACGU";
const PROTEIN_SYMBOLS: &str = "ACDEFGHIKLMNPQRSTVWY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundType {
    DNA,
    RNA,
    #[serde(rename = "protein")]
    Protein,
}

impl CompoundType {
    /// Checks whether `symbol` is a legal residue code for this compound type.
    pub fn is_valid_symbol(&self, symbol: char) -> bool {
        let allowed = match self {
            CompoundType::DNA => DNA_SYMBOLS,
            CompoundType::RNA => RNA_SYMBOLS,
            CompoundType::Protein => PROTEIN_SYMBOLS,
        };
        allowed.contains(symbol)
    }
}

#[derive(Debug, Error)]
#[error("Invalid compound type string: '{0}'")]
pub struct ParseCompoundTypeError(String);

impl FromStr for CompoundType {
    type Err = ParseCompoundTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DNA" => Ok(CompoundType::DNA),
            "RNA" => Ok(CompoundType::RNA),
            "protein" => Ok(CompoundType::Protein),
            other => Err(ParseCompoundTypeError(other.to_string())),
        }
    }
}

impl fmt::Display for CompoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CompoundType::DNA => "DNA",
                CompoundType::RNA => "RNA",
                CompoundType::Protein => "protein",
            }
        )
    }
}

/// One residue of a compound, carrying both numbering schemes.
///
/// `number` is the internal, 1-based sequential index every structural entity
/// refers to. `auth_number` is the depositor-supplied number used only for
/// display and wire output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,
    pub auth_number: isize,
}

/// A chain's full residue sequence plus its numbering.
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    pub chain: Chain,
    pub ctype: CompoundType,
    pub sequence: Vec<char>,
    pub residues: Vec<Residue>,
}

impl Compound {
    /// Builds a compound whose residues are numbered `1..=n` internally with
    /// contiguous author numbers starting at `first_auth_number`.
    pub fn new(
        chain: Chain,
        ctype: CompoundType,
        sequence: impl IntoIterator<Item = char>,
        first_auth_number: isize,
    ) -> Self {
        let sequence: Vec<char> = sequence.into_iter().collect();
        let residues = sequence
            .iter()
            .enumerate()
            .map(|(i, _)| Residue {
                number: i as isize + 1,
                auth_number: first_auth_number + i as isize,
            })
            .collect();
        Self {
            chain,
            ctype,
            sequence,
            residues,
        }
    }

    /// First and last internal residue numbers, or `None` for an empty
    /// (not yet validated) compound.
    pub fn residue_span(&self) -> Option<(isize, isize)> {
        match (self.residues.first(), self.residues.last()) {
            (Some(first), Some(last)) => Some((first.number, last.number)),
            _ => None,
        }
    }

    pub fn has_residue(&self, number: isize) -> bool {
        self.residue_span()
            .is_some_and(|(first, last)| number >= first && number <= last)
    }

    /// Translates an internal residue number into its author number.
    pub fn auth_number_of(&self, number: isize) -> Option<isize> {
        self.residues
            .iter()
            .find(|r| r.number == number)
            .map(|r| r.auth_number)
    }

    /// Translates an author number back into the internal residue number.
    pub fn number_of_auth(&self, auth_number: isize) -> Option<isize> {
        self.residues
            .iter()
            .find(|r| r.auth_number == auth_number)
            .map(|r| r.number)
    }

    pub fn sequence_string(&self) -> String {
        self.sequence.iter().collect()
    }
}
