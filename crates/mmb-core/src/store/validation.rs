//! Validation rules for every field of the setup model.
//!
//! Validators are pure functions of the shape `(candidate, rest_of_model,
//! siblings) -> Vec<String>`; an empty vector means the candidate is
//! acceptable. They always run against the provisional state a mutation
//! would produce, so cross-references resolve against the data the candidate
//! will actually live in.

use super::SetupData;
use crate::model::compound::Compound;
use crate::model::config::{GlobalConfig, Reporting, Stage, StageSpan};
use crate::model::files::{AdditionalFile, DensityFitFiles};
use crate::model::helix::{DoubleHelix, ranges_overlap};
use crate::model::interaction::BaseInteraction;
use crate::model::mobilizer::Mobilizer;
use crate::model::ntc::{NtcConformation, NtcForceScaleFactor, is_known_ntc_class};
use crate::params::AdvancedParameters;
use crate::params::catalog;
use crate::params::descriptor::DynamicContext;

fn compound_for_chain<'a>(data: &'a SetupData, chain_name: char) -> Option<&'a Compound> {
    data.compounds.iter().find(|c| c.chain.name == chain_name)
}

/// Checks one `(chain, residue)` reference, reporting a missing chain or an
/// out-of-range residue number.
fn check_residue_reference(data: &SetupData, chain_name: char, res_no: isize) -> Vec<String> {
    match compound_for_chain(data, chain_name) {
        None => vec![format!("Chain {} does not exist", chain_name)],
        Some(compound) if !compound.has_residue(res_no) => vec![format!(
            "Residue {} is out of range for chain {}",
            res_no, chain_name
        )],
        Some(_) => Vec::new(),
    }
}

pub fn validate_compound(
    candidate: &Compound,
    _data: &SetupData,
    siblings: &[Compound],
) -> Vec<String> {
    let mut errors = Vec::new();
    let chain = candidate.chain.name;

    if siblings.iter().any(|c| c.chain.name == chain) {
        errors.push(format!("Chain {} is already used by another compound", chain));
    }
    if candidate.sequence.is_empty() {
        errors.push(format!("Sequence of chain {} must not be empty", chain));
    }
    for &symbol in &candidate.sequence {
        if !candidate.ctype.is_valid_symbol(symbol) {
            errors.push(format!(
                "Symbol '{}' is not a valid {} residue",
                symbol, candidate.ctype
            ));
        }
    }
    if candidate.residues.len() != candidate.sequence.len() {
        errors.push(format!(
            "Residue numbering of chain {} does not match its sequence",
            chain
        ));
    } else if candidate
        .residues
        .iter()
        .enumerate()
        .any(|(i, r)| r.number != i as isize + 1)
    {
        errors.push(format!(
            "Residues of chain {} must be numbered sequentially from 1",
            chain
        ));
    }

    errors
}

pub fn validate_double_helix(
    candidate: &DoubleHelix,
    data: &SetupData,
    siblings: &[DoubleHelix],
) -> Vec<String> {
    let mut errors = Vec::new();

    for &(chain, first, last) in &[
        (candidate.chain_name_a, candidate.first_a, candidate.last_a),
        (candidate.chain_name_b, candidate.last_b, candidate.first_b),
    ] {
        errors.extend(check_residue_reference(data, chain, first));
        errors.extend(check_residue_reference(data, chain, last));
    }

    if candidate.first_a > candidate.last_a {
        errors.push("Double helix side A must run in ascending order".to_string());
    }
    if candidate.first_b < candidate.last_b {
        errors.push("Double helix side B must run in descending order".to_string());
    }
    errors.dedup();
    if !errors.is_empty() {
        return errors;
    }

    if candidate.strand_length_a() != candidate.strand_length_b() {
        errors.push("Double helix strands pair different numbers of residues".to_string());
    }

    if candidate.chain_name_a == candidate.chain_name_b
        && ranges_overlap(candidate.side_a(), candidate.side_b_ascending())
    {
        errors.push(format!(
            "Double helix sides on chain {} overlap",
            candidate.chain_name_a
        ));
    }

    if siblings.contains(candidate) {
        errors.push("Such double helix already exists".to_string());
    } else if siblings
        .iter()
        .any(|existing| helices_overlap(candidate, existing))
    {
        errors.push("Double helix overlaps an already existing double helix".to_string());
    }

    errors
}

/// Cross-helix overlap: each side of `x` against each side of `y`, tested only
/// where the chain names match, with side B normalized to ascending order.
pub(crate) fn helices_overlap(x: &DoubleHelix, y: &DoubleHelix) -> bool {
    let sides_x = [
        (x.chain_name_a, x.side_a()),
        (x.chain_name_b, x.side_b_ascending()),
    ];
    let sides_y = [
        (y.chain_name_a, y.side_a()),
        (y.chain_name_b, y.side_b_ascending()),
    ];
    sides_x.iter().any(|(chain_x, range_x)| {
        sides_y
            .iter()
            .any(|(chain_y, range_y)| chain_x == chain_y && ranges_overlap(*range_x, *range_y))
    })
}

pub fn validate_base_interaction(
    candidate: &BaseInteraction,
    data: &SetupData,
    siblings: &[BaseInteraction],
) -> Vec<String> {
    let mut errors = Vec::new();

    errors.extend(check_residue_reference(
        data,
        candidate.chain_name_a,
        candidate.res_no_a,
    ));
    errors.extend(check_residue_reference(
        data,
        candidate.chain_name_b,
        candidate.res_no_b,
    ));

    errors.dedup();
    if candidate.is_self_interaction() {
        errors.push("A residue cannot interact with itself".to_string());
    }
    if siblings.contains(candidate) {
        errors.push("Such base interaction already exists".to_string());
    }

    errors
}

pub fn validate_mobilizer(
    candidate: &Mobilizer,
    data: &SetupData,
    siblings: &[Mobilizer],
) -> Vec<String> {
    let mut errors = Vec::new();

    match (candidate.chain_name, candidate.residues) {
        (None, Some(_)) => {
            errors.push("Mobilizer residue span requires a chain".to_string());
        }
        (Some(chain), span) => {
            if let Some(span) = span {
                if span.first > span.last {
                    errors.push("Mobilizer residue span is inverted".to_string());
                }
                errors.extend(check_residue_reference(data, chain, span.first));
                errors.extend(check_residue_reference(data, chain, span.last));
            } else if compound_for_chain(data, chain).is_none() {
                errors.push(format!("Chain {} does not exist", chain));
            }
        }
        (None, None) => {}
    }
    if !errors.is_empty() {
        return errors;
    }

    // The first committed mobilizer discriminates between the two mutually
    // exclusive scoping regimes.
    if let Some(first) = siblings.first() {
        if candidate.is_whole_structure() {
            errors.push(
                "A whole-structure mobilizer cannot coexist with other mobilizers".to_string(),
            );
        } else if first.is_whole_structure() {
            errors.push("A whole-structure mobilizer already exists".to_string());
        }
    }

    if siblings.contains(candidate) {
        errors.push("Such mobilizer already exists".to_string());
    } else if let Some(chain) = candidate.chain_name {
        let candidate_span = mobilizer_coverage(candidate, data);
        for existing in siblings.iter().filter(|m| m.chain_name == Some(chain)) {
            if let (Some(x), Some(y)) = (candidate_span, mobilizer_coverage(existing, data)) {
                if ranges_overlap(x, y) {
                    errors.push(format!("Mobilizers on chain {} overlap", chain));
                    break;
                }
            }
        }
    }

    errors
}

/// The residue range a chain-scoped mobilizer covers; a mobilizer without a
/// span covers its whole chain.
fn mobilizer_coverage(mobilizer: &Mobilizer, data: &SetupData) -> Option<(isize, isize)> {
    match (mobilizer.chain_name, mobilizer.residues) {
        (Some(_), Some(span)) => Some((span.first, span.last)),
        (Some(chain), None) => compound_for_chain(data, chain)?.residue_span(),
        (None, _) => None,
    }
}

pub fn validate_ntc(
    candidate: &NtcConformation,
    data: &SetupData,
    siblings: &[NtcConformation],
) -> Vec<String> {
    let mut errors = Vec::new();

    errors.extend(check_residue_reference(
        data,
        candidate.chain_name,
        candidate.first_res_no,
    ));
    errors.extend(check_residue_reference(
        data,
        candidate.chain_name,
        candidate.last_res_no,
    ));
    if candidate.last_res_no <= candidate.first_res_no {
        errors.push("NtC conformation must span at least two residues".to_string());
    }
    if !is_known_ntc_class(&candidate.ntc) {
        errors.push(format!("Unknown NtC class '{}'", candidate.ntc));
    }
    if siblings.contains(candidate) {
        errors.push("Such NtC conformation already exists".to_string());
    }

    errors
}

pub fn validate_additional_file(
    candidate: &AdditionalFile,
    _data: &SetupData,
    siblings: &[AdditionalFile],
) -> Vec<String> {
    let mut errors = Vec::new();
    if candidate.name.is_empty() {
        errors.push("File name must not be empty".to_string());
    }
    if siblings.iter().any(|f| f.name == candidate.name) {
        errors.push(format!("File {} is already present", candidate.name));
    }
    errors
}

pub fn validate_global_config(candidate: &GlobalConfig, _data: &SetupData) -> Vec<String> {
    let mut errors = Vec::new();
    if !(candidate.base_interaction_scale_factor >= 0.0)
        || !candidate.base_interaction_scale_factor.is_finite()
    {
        errors.push("baseInteractionScaleFactor must be non-negative".to_string());
    }
    if !(candidate.temperature > 0.0) || !candidate.temperature.is_finite() {
        errors.push("temperature must be positive".to_string());
    }
    errors
}

pub fn validate_reporting(candidate: &Reporting, _data: &SetupData) -> Vec<String> {
    let mut errors = Vec::new();
    if !(candidate.interval > 0.0) || !candidate.interval.is_finite() {
        errors.push("reportingInterval must be positive".to_string());
    }
    if candidate.count < 1 {
        errors.push("numReportingIntervals must be at least 1".to_string());
    }
    errors
}

pub fn validate_stage_span(candidate: &StageSpan, data: &SetupData) -> Vec<String> {
    let mut errors = Vec::new();
    if candidate.first < 1 {
        errors.push("firstStage must be at least 1".to_string());
    }
    if candidate.first > candidate.last {
        errors.push("firstStage must not be past lastStage".to_string());
    }
    let stage = data.stage.0;
    if errors.is_empty() && (stage < candidate.first || stage > candidate.last + 1) {
        errors.push(format!(
            "stage {} falls outside the new stage span",
            stage
        ));
    }
    errors
}

pub fn validate_stage(candidate: &Stage, data: &SetupData) -> Vec<String> {
    let span = data.stages;
    if candidate.0 < span.first || candidate.0 > span.last + 1 {
        vec![format!(
            "stage must lie between firstStage and lastStage + 1, got {}",
            candidate.0
        )]
    } else {
        Vec::new()
    }
}

pub fn validate_ntc_force_scale(candidate: &NtcForceScaleFactor, _data: &SetupData) -> Vec<String> {
    if !(candidate.0 >= 0.0) || !candidate.0.is_finite() {
        vec!["NtC force scale factor must be non-negative".to_string()]
    } else {
        Vec::new()
    }
}

pub fn validate_density_fit_files(candidate: &DensityFitFiles, _data: &SetupData) -> Vec<String> {
    let mut errors = Vec::new();
    for (label, file) in [
        ("structure", &candidate.structure_file),
        ("density map", &candidate.density_map_file),
    ] {
        if let Some(file) = file {
            if file.name.is_empty() {
                errors.push(format!("Density-fit {} file name must not be empty", label));
            }
        }
    }
    errors
}

pub fn validate_advanced_parameters(
    candidate: &AdvancedParameters,
    data: &SetupData,
) -> Vec<String> {
    let mut errors = Vec::new();
    let ctx = DynamicContext {
        additional_files: &data.additional_files,
    };

    for (name, value) in candidate.iter() {
        let Some(descriptor) = catalog::descriptor(name) else {
            errors.push(format!("{} is not a known parameter", name));
            continue;
        };
        let spec = descriptor.resolve(&ctx);
        if !spec.type_checks(value) || !spec.validates(value) {
            errors.push(format!("{} is invalid", name));
        }
    }

    errors
}

/// Validates a complete data set, element by element and scalar by scalar.
/// Used by the all-or-nothing `reset`.
pub fn validate_all(data: &SetupData) -> Vec<String> {
    let mut errors = Vec::new();

    errors.extend(validate_each(&data.compounds, data, validate_compound));
    errors.extend(validate_each(&data.double_helices, data, validate_double_helix));
    errors.extend(validate_each(
        &data.base_interactions,
        data,
        validate_base_interaction,
    ));
    errors.extend(validate_each(&data.ntcs, data, validate_ntc));
    errors.extend(validate_each(&data.mobilizers, data, validate_mobilizer));
    errors.extend(validate_each(
        &data.additional_files,
        data,
        validate_additional_file,
    ));

    errors.extend(validate_global_config(&data.global, data));
    errors.extend(validate_reporting(&data.reporting, data));
    errors.extend(validate_stage_span(&data.stages, data));
    errors.extend(validate_stage(&data.stage, data));
    errors.extend(validate_ntc_force_scale(&data.ntc_force_scale_factor, data));
    errors.extend(validate_density_fit_files(&data.density_fit_files, data));
    errors.extend(validate_advanced_parameters(&data.advanced_parameters, data));

    errors
}

/// Runs one element validator over a whole collection, presenting every other
/// element as the sibling set.
fn validate_each<T: Clone>(
    collection: &[T],
    data: &SetupData,
    validator: fn(&T, &SetupData, &[T]) -> Vec<String>,
) -> Vec<String> {
    let mut errors = Vec::new();
    for (index, item) in collection.iter().enumerate() {
        let mut siblings = collection.to_vec();
        siblings.remove(index);
        errors.extend(validator(item, data, &siblings));
    }
    errors
}
