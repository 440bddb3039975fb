//! Converts a validated setup model to and from the two external protocols.
//!
//! [`script`] renders the line-oriented MMB command script (output only);
//! [`json`] serializes and strictly parses the JSON job-description object.
//! Both render residue numbers in the author numbering of the owning
//! compound, resolving each side of a paired constraint against its own
//! chain.

pub mod json;
pub mod script;
