use crate::model::config::JobType;
use crate::store::SetupData;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Chain {chain} is referenced but does not exist")]
    UnknownChain { chain: char },
    #[error("Residue {number} is out of range for chain {chain}")]
    ResidueOutOfRange { chain: char, number: isize },
    #[error("Density-fit job is missing its {0} file")]
    MissingDensityFitFile(&'static str),
}

/// Resolves an internal residue number into the author number of its owning
/// compound.
fn auth_number(data: &SetupData, chain: char, number: isize) -> Result<isize, ScriptError> {
    let compound = data
        .compounds
        .iter()
        .find(|c| c.chain.name == chain)
        .ok_or(ScriptError::UnknownChain { chain })?;
    compound
        .auth_number_of(number)
        .ok_or(ScriptError::ResidueOutOfRange { chain, number })
}

/// Writes the MMB command script for the given model.
///
/// Sections appear in the fixed order the engine expects; every record is one
/// line of space-separated tokens and booleans are rendered as the literal
/// tokens `True`/`False`.
pub fn write_commands(data: &SetupData, writer: &mut impl Write) -> Result<(), ScriptError> {
    writeln!(writer, "# Stages")?;
    writeln!(writer, "firstStage {}", data.stages.first)?;
    writeln!(writer, "lastStage {}", data.stages.last)?;

    writeln!(writer, "# Reporting")?;
    writeln!(writer, "reportingInterval {}", data.reporting.interval)?;
    writeln!(writer, "numReportingIntervals {}", data.reporting.count)?;

    writeln!(writer, "# Common configuration")?;
    writeln!(
        writer,
        "baseInteractionScaleFactor {}",
        data.global.base_interaction_scale_factor
    )?;
    writeln!(writer, "temperature {}", data.global.temperature)?;

    if data.job_type == JobType::DensityFit {
        let structure = data
            .density_fit_files
            .structure_file
            .as_ref()
            .ok_or(ScriptError::MissingDensityFitFile("structure"))?;
        let density_map = data
            .density_fit_files
            .density_map_file
            .as_ref()
            .ok_or(ScriptError::MissingDensityFitFile("density map"))?;
        writeln!(writer, "# Density fit")?;
        writeln!(writer, "loadSequencesFromPdb {}", structure.name)?;
        writeln!(writer, "densityFileName {}", density_map.name)?;
    }

    writeln!(writer, "# MD Parameters")?;
    if data.md_parameters.use_defaults {
        writeln!(writer, "setDefaultMDParameters")?;
    }

    writeln!(writer, "# Advanced parameters")?;
    for (name, value) in data.advanced_parameters.iter() {
        writeln!(writer, "{} {}", name, value)?;
    }

    writeln!(writer, "# Sequences")?;
    for compound in &data.compounds {
        let first_auth = compound
            .residues
            .first()
            .map(|r| r.auth_number)
            .ok_or(ScriptError::ResidueOutOfRange {
                chain: compound.chain.name,
                number: 1,
            })?;
        writeln!(
            writer,
            "{} {} {} {}",
            compound.ctype,
            compound.chain.name,
            first_auth,
            compound.sequence_string()
        )?;
    }

    writeln!(writer, "# Double helices")?;
    for helix in &data.double_helices {
        writeln!(
            writer,
            "nucleicAcidDuplex {} {} {} {} {} {}",
            helix.chain_name_a,
            auth_number(data, helix.chain_name_a, helix.first_a)?,
            auth_number(data, helix.chain_name_a, helix.last_a)?,
            helix.chain_name_b,
            auth_number(data, helix.chain_name_b, helix.first_b)?,
            auth_number(data, helix.chain_name_b, helix.last_b)?,
        )?;
    }

    writeln!(writer, "# Base interactions")?;
    for interaction in &data.base_interactions {
        writeln!(
            writer,
            "baseInteraction {} {} {} {} {} {} {}",
            interaction.chain_name_a,
            auth_number(data, interaction.chain_name_a, interaction.res_no_a)?,
            interaction.edge_a,
            interaction.chain_name_b,
            auth_number(data, interaction.chain_name_b, interaction.res_no_b)?,
            interaction.edge_b,
            interaction.orientation,
        )?;
    }

    writeln!(writer, "# NtCs")?;
    for ntc in &data.ntcs {
        writeln!(
            writer,
            "NtC {} {} {} {} {}",
            ntc.chain_name,
            auth_number(data, ntc.chain_name, ntc.first_res_no)?,
            auth_number(data, ntc.chain_name, ntc.last_res_no)?,
            ntc.ntc,
            data.ntc_force_scale_factor.0,
        )?;
    }

    writeln!(writer, "# Mobilizers")?;
    for mobilizer in &data.mobilizers {
        match (mobilizer.chain_name, mobilizer.residues) {
            (None, _) => writeln!(writer, "mobilizer {}", mobilizer.bond_mobility)?,
            (Some(chain), None) => {
                writeln!(writer, "mobilizer {} {}", mobilizer.bond_mobility, chain)?
            }
            (Some(chain), Some(span)) => writeln!(
                writer,
                "mobilizer {} {} {} {}",
                mobilizer.bond_mobility,
                chain,
                auth_number(data, chain, span.first)?,
                auth_number(data, chain, span.last)?,
            )?,
        }
    }

    Ok(())
}

/// Renders the command script into a string.
pub fn commands_string(data: &SetupData) -> Result<String, ScriptError> {
    let mut buffer = Vec::new();
    write_commands(data, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes the command script to a file path.
pub fn write_commands_to_path<P: AsRef<Path>>(data: &SetupData, path: P) -> Result<(), ScriptError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_commands(data, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::chain::Chain;
    use crate::model::compound::{Compound, CompoundType};
    use crate::model::files::AdditionalFile;
    use crate::model::interaction::{BaseInteraction, Edge, Orientation};
    use crate::model::mobilizer::{BondMobility, Mobilizer};
    use crate::model::ntc::NtcConformation;
    use std::fs;
    use tempfile::tempdir;

    fn sample_data() -> SetupData {
        let mut data = SetupData::default();
        data.compounds.push(Compound::new(
            Chain::new('A'),
            CompoundType::RNA,
            "ACGUACGU".chars(),
            11,
        ));
        data
    }

    #[test]
    fn default_configuration_renders_the_engine_preset_lines() {
        let script = commands_string(&SetupData::default()).unwrap();
        let lines: Vec<&str> = script.lines().collect();

        assert!(lines.contains(&"firstStage 1"));
        assert!(lines.contains(&"lastStage 1"));
        assert!(lines.contains(&"reportingInterval 3"));
        assert!(lines.contains(&"numReportingIntervals 5"));
        assert!(lines.contains(&"baseInteractionScaleFactor 200"));
        assert!(lines.contains(&"temperature 10"));
        assert!(lines.contains(&"setDefaultMDParameters"));
    }

    #[test]
    fn sections_appear_in_the_fixed_order() {
        let script = commands_string(&sample_data()).unwrap();
        let headers: Vec<&str> = script
            .lines()
            .filter(|line| line.starts_with('#'))
            .collect();
        assert_eq!(
            headers,
            vec![
                "# Stages",
                "# Reporting",
                "# Common configuration",
                "# MD Parameters",
                "# Advanced parameters",
                "# Sequences",
                "# Double helices",
                "# Base interactions",
                "# NtCs",
                "# Mobilizers",
            ]
        );
    }

    #[test]
    fn records_are_rendered_in_author_numbering() {
        let mut data = sample_data();
        data.base_interactions.push(BaseInteraction {
            chain_name_a: 'A',
            res_no_a: 1,
            edge_a: Edge::WatsonCrick,
            chain_name_b: 'A',
            res_no_b: 8,
            edge_b: Edge::SugarEdge,
            orientation: Orientation::Trans,
        });
        data.ntcs.push(NtcConformation {
            chain_name: 'A',
            first_res_no: 2,
            last_res_no: 4,
            ntc: "BB00".to_string(),
        });
        data.mobilizers
            .push(Mobilizer::for_span(BondMobility::Torsion, 'A', 3, 5));

        let script = commands_string(&data).unwrap();
        assert!(script.contains("RNA A 11 ACGUACGU\n"));
        assert!(
            script.contains("baseInteraction A 11 WatsonCrick A 18 SugarEdge Trans\n"),
            "{}",
            script
        );
        assert!(script.contains("NtC A 12 14 BB00 1\n"));
        assert!(script.contains("mobilizer Torsion A 13 15\n"));
    }

    #[test]
    fn boolean_parameters_use_the_literal_tokens() {
        let mut data = SetupData::default();
        data.advanced_parameters
            .set("minimize", crate::params::value::ParamValue::Boolean(true));
        data.advanced_parameters.set(
            "proteinCapping",
            crate::params::value::ParamValue::Boolean(false),
        );

        let script = commands_string(&data).unwrap();
        assert!(script.contains("minimize True\n"));
        assert!(script.contains("proteinCapping False\n"));
    }

    #[test]
    fn density_fit_jobs_name_their_files() {
        let mut data = sample_data();
        data.job_type = JobType::DensityFit;
        data.density_fit_files.structure_file = Some(AdditionalFile::uploaded("model.pdb", 100));
        data.density_fit_files.density_map_file = Some(AdditionalFile::uploaded("map.ccp4", 200));

        let script = commands_string(&data).unwrap();
        assert!(script.contains("# Density fit\n"));
        assert!(script.contains("loadSequencesFromPdb model.pdb\n"));
        assert!(script.contains("densityFileName map.ccp4\n"));
    }

    #[test]
    fn density_fit_without_files_is_an_error() {
        let mut data = sample_data();
        data.job_type = JobType::DensityFit;
        let result = commands_string(&data);
        assert!(matches!(
            result,
            Err(ScriptError::MissingDensityFitFile("structure"))
        ));
    }

    #[test]
    fn unknown_chain_reference_is_an_error() {
        let mut data = sample_data();
        data.mobilizers
            .push(Mobilizer::for_span(BondMobility::Rigid, 'Q', 1, 2));
        let result = commands_string(&data);
        assert!(matches!(
            result,
            Err(ScriptError::UnknownChain { chain: 'Q' })
        ));
    }

    #[test]
    fn script_can_be_written_to_a_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("commands.mmb");
        write_commands_to_path(&sample_data(), &path).unwrap();
        let script = fs::read_to_string(&path).unwrap();
        assert!(script.contains("RNA A 11 ACGUACGU"));
    }
}
