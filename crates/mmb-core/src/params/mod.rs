//! # Parameter Module
//!
//! Typed descriptors for MMB's "advanced parameters" — the optional, named
//! overrides a job may pass straight to the simulation engine.
//!
//! A [`descriptor::ParameterDescriptor`] couples a parameter name with either
//! a fixed argument specification (*static*) or one computed from the current
//! model state (*dynamic*; today that means "pick one of the uploaded file
//! names"). Values are carried as a [`value::ParamValue`] tagged union with
//! one variant per descriptor kind, so exhaustiveness is checked at compile
//! time instead of by runtime type sniffing.

pub mod catalog;
pub mod descriptor;
pub mod value;

use std::collections::BTreeMap;
use value::ParamValue;

/// The set of advanced-parameter assignments of a job.
///
/// Iteration order is the parameter name order, which keeps serialized output
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvancedParameters {
    values: BTreeMap<String, ParamValue>,
}

impl AdvancedParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    /// Removes an assignment, returning the previous value if there was one.
    pub fn unset(&mut self, name: &str) -> Option<ParamValue> {
        self.values.remove(name)
    }

    pub fn is_assigned(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for AdvancedParameters {
    fn from_iter<T: IntoIterator<Item = (String, ParamValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
