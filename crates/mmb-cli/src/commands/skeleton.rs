use crate::cli::SkeletonArgs;
use crate::error::Result;
use mmbsetup::io::json;
use mmbsetup::store::SetupData;
use std::fs;
use tracing::info;

pub fn run(args: SkeletonArgs) -> Result<()> {
    let rendered = json::job_string(&SetupData::default())?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!("Skeleton job written to '{}'.", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
