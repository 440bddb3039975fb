use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The base edge participating in an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    WatsonCrick,
    Hoogsteen,
    SugarEdge,
}

#[derive(Debug, Error)]
#[error("Invalid edge string: '{0}'")]
pub struct ParseEdgeError(String);

impl FromStr for Edge {
    type Err = ParseEdgeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WatsonCrick" => Ok(Edge::WatsonCrick),
            "Hoogsteen" => Ok(Edge::Hoogsteen),
            "SugarEdge" => Ok(Edge::SugarEdge),
            other => Err(ParseEdgeError(other.to_string())),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Edge::WatsonCrick => "WatsonCrick",
                Edge::Hoogsteen => "Hoogsteen",
                Edge::SugarEdge => "SugarEdge",
            }
        )
    }
}

/// Relative glycosidic-bond orientation of the paired bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Cis,
    Trans,
}

#[derive(Debug, Error)]
#[error("Invalid orientation string: '{0}'")]
pub struct ParseOrientationError(String);

impl FromStr for Orientation {
    type Err = ParseOrientationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cis" => Ok(Orientation::Cis),
            "Trans" => Ok(Orientation::Trans),
            other => Err(ParseOrientationError(other.to_string())),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Orientation::Cis => "Cis",
                Orientation::Trans => "Trans",
            }
        )
    }
}

/// A pairwise edge/orientation constraint between two specific residues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseInteraction {
    pub chain_name_a: char,
    pub res_no_a: isize,
    pub edge_a: Edge,
    pub chain_name_b: char,
    pub res_no_b: isize,
    pub edge_b: Edge,
    pub orientation: Orientation,
}

impl BaseInteraction {
    /// True when both ends name the same residue, which is never a valid
    /// interaction.
    pub fn is_self_interaction(&self) -> bool {
        self.chain_name_a == self.chain_name_b && self.res_no_a == self.res_no_b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_interaction_requires_same_chain_and_residue() {
        let mut interaction = BaseInteraction {
            chain_name_a: 'A',
            res_no_a: 1,
            edge_a: Edge::WatsonCrick,
            chain_name_b: 'A',
            res_no_b: 1,
            edge_b: Edge::SugarEdge,
            orientation: Orientation::Cis,
        };
        assert!(interaction.is_self_interaction());

        interaction.res_no_b = 2;
        assert!(!interaction.is_self_interaction());

        interaction.res_no_b = 1;
        interaction.chain_name_b = 'B';
        assert!(!interaction.is_self_interaction());
    }

    #[test]
    fn edge_and_orientation_reject_unknown_tokens() {
        assert!("WatsonCrick".parse::<Edge>().is_ok());
        assert!("watsoncrick".parse::<Edge>().is_err());
        assert!("Cis".parse::<Orientation>().is_ok());
        assert!("cis".parse::<Orientation>().is_err());
    }
}
