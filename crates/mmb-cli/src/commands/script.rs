use super::load_job;
use crate::cli::ScriptArgs;
use crate::error::Result;
use mmbsetup::io::script;
use mmbsetup::store::SetupStore;
use std::io::Write;
use tracing::{info, warn};

pub fn run(args: ScriptArgs) -> Result<()> {
    let data = load_job(&args.input)?;

    let data = if args.no_validate {
        warn!("Skipping the validation pass on request.");
        data
    } else {
        let mut store = SetupStore::new();
        store.reset(data)?;
        store.snapshot()
    };

    match &args.output {
        Some(path) => {
            script::write_commands_to_path(&data, path)?;
            info!("Command script written to '{}'.", path.display());
        }
        None => {
            let rendered = script::commands_string(&data)?;
            std::io::stdout().write_all(rendered.as_bytes())?;
        }
    }
    Ok(())
}
