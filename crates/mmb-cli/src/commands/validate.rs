use super::load_job;
use crate::cli::ValidateArgs;
use crate::error::Result;
use mmbsetup::store::SetupStore;
use tracing::info;

pub fn run(args: ValidateArgs) -> Result<()> {
    let data = load_job(&args.input)?;
    let job_type = data.job_type;

    let mut store = SetupStore::new();
    match store.reset(data) {
        Ok(()) => {
            info!("Job passed the full validation pass.");
            println!(
                "{}: valid {:?} job ({} compound(s), {} base interaction(s), {} mobilizer(s))",
                args.input.display(),
                job_type,
                store.compounds().len(),
                store.base_interactions().len(),
                store.mobilizers().len(),
            );
            Ok(())
        }
        Err(errors) => {
            eprintln!("{}: job is invalid:", args.input.display());
            for error in &errors.errors {
                eprintln!("  - {}", error);
            }
            Err(errors.into())
        }
    }
}
