pub mod script;
pub mod skeleton;
pub mod validate;

use crate::error::{CliError, Result};
use mmbsetup::io::json;
use mmbsetup::store::SetupData;
use std::fs;
use std::path::Path;

/// Reads and parses a job-description file, tagging parse failures with the
/// offending path.
pub(crate) fn load_job(path: &Path) -> Result<SetupData> {
    let text = fs::read_to_string(path)?;
    json::parse_job(&text).map_err(|source| CliError::JobParsing {
        path: path.to_path_buf(),
        source,
    })
}
