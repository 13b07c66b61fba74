use anyhow::{bail, Result};
use campstats::{init_tracing_once, run_job, set_global_multiprogress, JobSpec};
use indicatif::MultiProgress;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<()> {
    init_tracing_once();

    let mut args = std::env::args().skip(1);
    let job_path = match (args.next(), args.next()) {
        (Some(p), None) => PathBuf::from(p),
        _ => bail!("usage: campstats <job.json>"),
    };

    // Tweet and user bars stack instead of overwriting each other.
    set_global_multiprogress(Arc::new(MultiProgress::new()));

    let job = JobSpec::from_path(&job_path)?;
    let summary = run_job(&job)?;
    println!("{}", summary);
    Ok(())
}
