use crate::model::chain::Chain;
use crate::model::compound::{Compound, CompoundType};
use crate::model::config::{GlobalConfig, JobType, MdParameters, Reporting, Stage, StageSpan};
use crate::model::files::AdditionalFile;
use crate::model::helix::DoubleHelix;
use crate::model::interaction::{BaseInteraction, Edge, Orientation};
use crate::model::mobilizer::{BondMobility, Mobilizer, ResidueSpan};
use crate::model::ntc::{NtcConformation, NtcForceScaleFactor};
use crate::params::catalog;
use crate::params::value::{ParamKind, ParamValue, parse_integral, parse_real};
use crate::store::SetupData;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobParseError {
    #[error("Malformed job JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Job object is missing the job_type field")]
    MissingJobType,
    #[error("Unknown job_type '{0}'")]
    UnknownJobType(String),
    #[error("Chain {chain} is referenced but was not defined")]
    UnknownChain { chain: char },
    #[error("Author residue {auth_number} does not exist on chain {chain}")]
    UnknownResidue { chain: char, auth_number: isize },
    #[error("Mobilizer record is malformed: {0}")]
    MalformedMobilizer(&'static str),
    #[error("{name} is not a known parameter")]
    UnknownParameter { name: String },
    #[error("Value of parameter {name} does not match its declared {kind} type")]
    InvalidParameterValue { name: String, kind: ParamKind },
}

#[derive(Debug, Error)]
pub enum JobWriteError {
    #[error("Chain {chain} is referenced but does not exist")]
    UnknownChain { chain: char },
    #[error("Residue {number} is out of range for chain {chain}")]
    ResidueOutOfRange { chain: char, number: isize },
    #[error("Compound of chain {chain} has no residues")]
    EmptyCompound { chain: char },
    #[error("Parameter {name} holds a non-finite value")]
    NonFiniteParameter { name: String },
    #[error("Density-fit job is missing its {0} file")]
    MissingDensityFitFile(&'static str),
    #[error("Failed to encode job JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// --- Wire shapes ---------------------------------------------------------
//
// The wire structs mirror the job-description object verbatim: snake_case
// fields, residue numbers in author numbering, and strict (unknown fields
// rejected) parsing.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireChain {
    name: char,
    auth_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireCompound {
    chain: WireChain,
    ctype: CompoundType,
    sequence: String,
    first_residue_no: isize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireDoubleHelix {
    chain_name_a: char,
    first_res_no_a: isize,
    last_res_no_a: isize,
    chain_name_b: char,
    first_res_no_b: isize,
    last_res_no_b: isize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireBaseInteraction {
    chain_name_a: char,
    res_no_a: isize,
    edge_a: Edge,
    chain_name_b: char,
    res_no_b: isize,
    edge_b: Edge,
    orientation: Orientation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireNtc {
    chain_name: char,
    first_res_no: isize,
    last_res_no: isize,
    ntc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireNtcs {
    conformations: Vec<WireNtc>,
    force_scale_factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireMobilizer {
    bond_mobility: BondMobility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chain_name: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    first_res_no: Option<isize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_res_no: Option<isize>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StandardJob {
    job_type: JobType,
    reporting_interval: f64,
    num_reporting_intervals: u32,
    base_interaction_scale_factor: f64,
    temperature: f64,
    first_stage: u32,
    last_stage: u32,
    compounds: Vec<WireCompound>,
    double_helices: Vec<WireDoubleHelix>,
    base_interactions: Vec<WireBaseInteraction>,
    ntcs: WireNtcs,
    mobilizers: Vec<WireMobilizer>,
    adv_params: BTreeMap<String, Value>,
    #[serde(rename = "set_default_MD_parameters")]
    set_default_md_parameters: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DensityFitJob {
    job_type: JobType,
    reporting_interval: f64,
    num_reporting_intervals: u32,
    base_interaction_scale_factor: f64,
    temperature: f64,
    first_stage: u32,
    last_stage: u32,
    structure_file_name: String,
    density_map_file_name: String,
    compounds: Vec<WireCompound>,
    mobilizers: Vec<WireMobilizer>,
    ntcs: WireNtcs,
}

// --- Parsing -------------------------------------------------------------

/// Parses a job-description object into a fresh [`SetupData`].
///
/// The returned value has not been committed anywhere; feed it to
/// [`SetupStore::reset`](crate::store::SetupStore::reset) so the full
/// validation pass gates it like any other mutation.
pub fn parse_job(text: &str) -> Result<SetupData, JobParseError> {
    let value: Value = serde_json::from_str(text)?;
    let job_type = value
        .get("job_type")
        .and_then(Value::as_str)
        .ok_or(JobParseError::MissingJobType)?;

    match job_type {
        "Standard" => {
            let job: StandardJob = serde_json::from_value(value)?;
            standard_to_data(job)
        }
        "DensityFit" => {
            let job: DensityFitJob = serde_json::from_value(value)?;
            density_fit_to_data(job)
        }
        other => Err(JobParseError::UnknownJobType(other.to_string())),
    }
}

fn compounds_from_wire(wire: Vec<WireCompound>) -> Vec<Compound> {
    wire.into_iter()
        .map(|c| {
            Compound::new(
                Chain::with_auth_name(c.chain.name, c.chain.auth_name),
                c.ctype,
                c.sequence.chars(),
                c.first_residue_no,
            )
        })
        .collect()
}

/// Translates one wire `(chain, author residue)` reference into the internal
/// residue number.
fn internal_res_no(
    compounds: &[Compound],
    chain: char,
    auth_number: isize,
) -> Result<isize, JobParseError> {
    let compound = compounds
        .iter()
        .find(|c| c.chain.name == chain)
        .ok_or(JobParseError::UnknownChain { chain })?;
    compound
        .number_of_auth(auth_number)
        .ok_or(JobParseError::UnknownResidue { chain, auth_number })
}

fn mobilizers_from_wire(
    compounds: &[Compound],
    wire: Vec<WireMobilizer>,
) -> Result<Vec<Mobilizer>, JobParseError> {
    wire.into_iter()
        .map(|m| {
            let residues = match (m.chain_name, m.first_res_no, m.last_res_no) {
                (_, None, None) => None,
                (None, _, _) => {
                    return Err(JobParseError::MalformedMobilizer(
                        "a residue span requires a chain",
                    ));
                }
                (Some(chain), Some(first), Some(last)) => Some(ResidueSpan {
                    first: internal_res_no(compounds, chain, first)?,
                    last: internal_res_no(compounds, chain, last)?,
                }),
                _ => {
                    return Err(JobParseError::MalformedMobilizer(
                        "a residue span needs both its first and last residue",
                    ));
                }
            };
            Ok(Mobilizer {
                bond_mobility: m.bond_mobility,
                chain_name: m.chain_name,
                residues,
            })
        })
        .collect()
}

fn ntcs_from_wire(
    compounds: &[Compound],
    wire: Vec<WireNtc>,
) -> Result<Vec<NtcConformation>, JobParseError> {
    wire.into_iter()
        .map(|n| {
            Ok(NtcConformation {
                chain_name: n.chain_name,
                first_res_no: internal_res_no(compounds, n.chain_name, n.first_res_no)?,
                last_res_no: internal_res_no(compounds, n.chain_name, n.last_res_no)?,
                ntc: n.ntc,
            })
        })
        .collect()
}

/// Decodes one advanced-parameter value according to the declared type of its
/// descriptor.
fn decode_parameter(name: &str, value: &Value) -> Result<ParamValue, JobParseError> {
    let descriptor = catalog::descriptor(name).ok_or_else(|| JobParseError::UnknownParameter {
        name: name.to_string(),
    })?;
    let ctx = crate::params::descriptor::DynamicContext {
        additional_files: &[],
    };
    let kind = descriptor.resolve(&ctx).kind();
    let mismatch = || JobParseError::InvalidParameterValue {
        name: name.to_string(),
        kind,
    };

    match kind {
        ParamKind::Integral => match value {
            Value::Number(n) => n.as_i64().map(ParamValue::Integral).ok_or_else(mismatch),
            Value::String(s) => parse_integral(s).map(ParamValue::Integral).ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        ParamKind::Real => match value {
            Value::Number(n) => n.as_f64().map(ParamValue::Real).ok_or_else(mismatch),
            Value::String(s) => parse_real(s).map(ParamValue::Real).ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        ParamKind::Boolean => match value {
            Value::Bool(b) => Ok(ParamValue::Boolean(*b)),
            Value::String(s) if s == "True" => Ok(ParamValue::Boolean(true)),
            Value::String(s) if s == "False" => Ok(ParamValue::Boolean(false)),
            _ => Err(mismatch()),
        },
        ParamKind::Textual => match value {
            Value::String(s) => Ok(ParamValue::Textual(s.clone())),
            _ => Err(mismatch()),
        },
        ParamKind::Options => match value {
            Value::String(s) => Ok(ParamValue::Option(s.clone())),
            _ => Err(mismatch()),
        },
    }
}

fn shared_scalars(
    data: &mut SetupData,
    reporting_interval: f64,
    num_reporting_intervals: u32,
    base_interaction_scale_factor: f64,
    temperature: f64,
    first_stage: u32,
    last_stage: u32,
) {
    data.reporting = Reporting {
        interval: reporting_interval,
        count: num_reporting_intervals,
    };
    data.global = GlobalConfig {
        base_interaction_scale_factor,
        temperature,
    };
    data.stages = StageSpan {
        first: first_stage,
        last: last_stage,
    };
    // A freshly parsed job starts from the first stage of its span.
    data.stage = Stage(first_stage);
}

fn standard_to_data(job: StandardJob) -> Result<SetupData, JobParseError> {
    let mut data = SetupData::default();
    data.job_type = JobType::Standard;
    data.compounds = compounds_from_wire(job.compounds);

    data.double_helices = job
        .double_helices
        .into_iter()
        .map(|h| {
            Ok(DoubleHelix {
                chain_name_a: h.chain_name_a,
                first_a: internal_res_no(&data.compounds, h.chain_name_a, h.first_res_no_a)?,
                last_a: internal_res_no(&data.compounds, h.chain_name_a, h.last_res_no_a)?,
                chain_name_b: h.chain_name_b,
                first_b: internal_res_no(&data.compounds, h.chain_name_b, h.first_res_no_b)?,
                last_b: internal_res_no(&data.compounds, h.chain_name_b, h.last_res_no_b)?,
            })
        })
        .collect::<Result<_, JobParseError>>()?;

    data.base_interactions = job
        .base_interactions
        .into_iter()
        .map(|i| {
            Ok(BaseInteraction {
                chain_name_a: i.chain_name_a,
                res_no_a: internal_res_no(&data.compounds, i.chain_name_a, i.res_no_a)?,
                edge_a: i.edge_a,
                chain_name_b: i.chain_name_b,
                res_no_b: internal_res_no(&data.compounds, i.chain_name_b, i.res_no_b)?,
                edge_b: i.edge_b,
                orientation: i.orientation,
            })
        })
        .collect::<Result<_, JobParseError>>()?;

    data.ntcs = ntcs_from_wire(&data.compounds, job.ntcs.conformations)?;
    data.ntc_force_scale_factor = NtcForceScaleFactor(job.ntcs.force_scale_factor);
    data.mobilizers = mobilizers_from_wire(&data.compounds, job.mobilizers)?;

    data.advanced_parameters = job
        .adv_params
        .iter()
        .map(|(name, value)| Ok((name.clone(), decode_parameter(name, value)?)))
        .collect::<Result<_, JobParseError>>()?;

    data.md_parameters = MdParameters {
        use_defaults: job.set_default_md_parameters,
    };
    shared_scalars(
        &mut data,
        job.reporting_interval,
        job.num_reporting_intervals,
        job.base_interaction_scale_factor,
        job.temperature,
        job.first_stage,
        job.last_stage,
    );
    Ok(data)
}

fn density_fit_to_data(job: DensityFitJob) -> Result<SetupData, JobParseError> {
    let mut data = SetupData::default();
    data.job_type = JobType::DensityFit;
    data.compounds = compounds_from_wire(job.compounds);
    data.ntcs = ntcs_from_wire(&data.compounds, job.ntcs.conformations)?;
    data.ntc_force_scale_factor = NtcForceScaleFactor(job.ntcs.force_scale_factor);
    data.mobilizers = mobilizers_from_wire(&data.compounds, job.mobilizers)?;
    data.density_fit_files.structure_file = Some(AdditionalFile::new(job.structure_file_name));
    data.density_fit_files.density_map_file = Some(AdditionalFile::new(job.density_map_file_name));
    shared_scalars(
        &mut data,
        job.reporting_interval,
        job.num_reporting_intervals,
        job.base_interaction_scale_factor,
        job.temperature,
        job.first_stage,
        job.last_stage,
    );
    Ok(data)
}

// --- Serialization -------------------------------------------------------

/// Resolves an internal residue number into its author number for output.
fn auth_res_no(data: &SetupData, chain: char, number: isize) -> Result<isize, JobWriteError> {
    let compound = data
        .compounds
        .iter()
        .find(|c| c.chain.name == chain)
        .ok_or(JobWriteError::UnknownChain { chain })?;
    compound
        .auth_number_of(number)
        .ok_or(JobWriteError::ResidueOutOfRange { chain, number })
}

fn compounds_to_wire(data: &SetupData) -> Result<Vec<WireCompound>, JobWriteError> {
    data.compounds
        .iter()
        .map(|c| {
            let first = c
                .residues
                .first()
                .ok_or(JobWriteError::EmptyCompound {
                    chain: c.chain.name,
                })?;
            Ok(WireCompound {
                chain: WireChain {
                    name: c.chain.name,
                    auth_name: c.chain.auth_name.clone(),
                },
                ctype: c.ctype,
                sequence: c.sequence_string(),
                first_residue_no: first.auth_number,
            })
        })
        .collect()
}

fn ntcs_to_wire(data: &SetupData) -> Result<WireNtcs, JobWriteError> {
    Ok(WireNtcs {
        conformations: data
            .ntcs
            .iter()
            .map(|n| {
                Ok(WireNtc {
                    chain_name: n.chain_name,
                    first_res_no: auth_res_no(data, n.chain_name, n.first_res_no)?,
                    last_res_no: auth_res_no(data, n.chain_name, n.last_res_no)?,
                    ntc: n.ntc.clone(),
                })
            })
            .collect::<Result<_, JobWriteError>>()?,
        force_scale_factor: data.ntc_force_scale_factor.0,
    })
}

fn mobilizers_to_wire(data: &SetupData) -> Result<Vec<WireMobilizer>, JobWriteError> {
    data.mobilizers
        .iter()
        .map(|m| {
            let (first, last) = match (m.chain_name, m.residues) {
                (Some(chain), Some(span)) => (
                    Some(auth_res_no(data, chain, span.first)?),
                    Some(auth_res_no(data, chain, span.last)?),
                ),
                _ => (None, None),
            };
            Ok(WireMobilizer {
                bond_mobility: m.bond_mobility,
                chain_name: m.chain_name,
                first_res_no: first,
                last_res_no: last,
            })
        })
        .collect()
}

fn encode_parameter(name: &str, value: &ParamValue) -> Result<Value, JobWriteError> {
    Ok(match value {
        ParamValue::Integral(v) => Value::from(*v),
        ParamValue::Real(v) => serde_json::Number::from_f64(*v)
            .map(Value::Number)
            .ok_or_else(|| JobWriteError::NonFiniteParameter {
                name: name.to_string(),
            })?,
        ParamValue::Boolean(v) => Value::from(*v),
        ParamValue::Textual(v) | ParamValue::Option(v) => Value::from(v.clone()),
    })
}

/// Serializes a model into the JSON job-description value, shaped according
/// to the model's job type.
pub fn job_value(data: &SetupData) -> Result<Value, JobWriteError> {
    match data.job_type {
        JobType::Standard => {
            let job = StandardJob {
                job_type: JobType::Standard,
                reporting_interval: data.reporting.interval,
                num_reporting_intervals: data.reporting.count,
                base_interaction_scale_factor: data.global.base_interaction_scale_factor,
                temperature: data.global.temperature,
                first_stage: data.stages.first,
                last_stage: data.stages.last,
                compounds: compounds_to_wire(data)?,
                double_helices: data
                    .double_helices
                    .iter()
                    .map(|h| {
                        Ok(WireDoubleHelix {
                            chain_name_a: h.chain_name_a,
                            first_res_no_a: auth_res_no(data, h.chain_name_a, h.first_a)?,
                            last_res_no_a: auth_res_no(data, h.chain_name_a, h.last_a)?,
                            chain_name_b: h.chain_name_b,
                            first_res_no_b: auth_res_no(data, h.chain_name_b, h.first_b)?,
                            last_res_no_b: auth_res_no(data, h.chain_name_b, h.last_b)?,
                        })
                    })
                    .collect::<Result<_, JobWriteError>>()?,
                base_interactions: data
                    .base_interactions
                    .iter()
                    .map(|i| {
                        Ok(WireBaseInteraction {
                            chain_name_a: i.chain_name_a,
                            res_no_a: auth_res_no(data, i.chain_name_a, i.res_no_a)?,
                            edge_a: i.edge_a,
                            chain_name_b: i.chain_name_b,
                            res_no_b: auth_res_no(data, i.chain_name_b, i.res_no_b)?,
                            edge_b: i.edge_b,
                            orientation: i.orientation,
                        })
                    })
                    .collect::<Result<_, JobWriteError>>()?,
                ntcs: ntcs_to_wire(data)?,
                mobilizers: mobilizers_to_wire(data)?,
                adv_params: data
                    .advanced_parameters
                    .iter()
                    .map(|(name, value)| Ok((name.to_string(), encode_parameter(name, value)?)))
                    .collect::<Result<_, JobWriteError>>()?,
                set_default_md_parameters: data.md_parameters.use_defaults,
            };
            Ok(serde_json::to_value(job)?)
        }
        JobType::DensityFit => {
            let structure = data
                .density_fit_files
                .structure_file
                .as_ref()
                .ok_or(JobWriteError::MissingDensityFitFile("structure"))?;
            let density_map = data
                .density_fit_files
                .density_map_file
                .as_ref()
                .ok_or(JobWriteError::MissingDensityFitFile("density map"))?;
            let job = DensityFitJob {
                job_type: JobType::DensityFit,
                reporting_interval: data.reporting.interval,
                num_reporting_intervals: data.reporting.count,
                base_interaction_scale_factor: data.global.base_interaction_scale_factor,
                temperature: data.global.temperature,
                first_stage: data.stages.first,
                last_stage: data.stages.last,
                structure_file_name: structure.name.clone(),
                density_map_file_name: density_map.name.clone(),
                compounds: compounds_to_wire(data)?,
                mobilizers: mobilizers_to_wire(data)?,
                ntcs: ntcs_to_wire(data)?,
            };
            Ok(serde_json::to_value(job)?)
        }
    }
}

/// Serializes a model into a pretty-printed JSON job description.
pub fn job_string(data: &SetupData) -> Result<String, JobWriteError> {
    Ok(serde_json::to_string_pretty(&job_value(data)?)?)
}

/// Writes the JSON job description to a writer.
pub fn write_job(data: &SetupData, writer: &mut impl Write) -> Result<(), JobWriteError> {
    let value = job_value(data)?;
    serde_json::to_writer_pretty(writer, &value).map_err(JobWriteError::from)
}
