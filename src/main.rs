use clap::Parser;
use fdic_probe::utils::{logger, validation::Validate};
use fdic_probe::{CliArgs, LocalStorage, ProbeError, ProbeJob, ProbePipeline, ReportOutcome};

fn fail(e: &ProbeError) -> ! {
    tracing::error!(
        "❌ FDIC.gov probe failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);
    tracing::debug!("CLI args: {:?}", args);

    let settings = match args.resolve() {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };
    if let Err(e) = settings.validate() {
        fail(&e);
    }
    tracing::debug!("Resolved settings: {:?}", settings);

    let storage = LocalStorage::new(settings.data_dir.clone());
    let pipeline = ProbePipeline::new(storage, settings);
    let job = ProbeJob::new(pipeline);

    match job.run().await {
        Ok(ReportOutcome::Written(path)) => {
            println!();
            println!("Finished FDIC.gov probe. Results written to {}", path.display());
        }
        Ok(ReportOutcome::NoFilersFound) => {
            println!("No Filers Found");
        }
        Err(e) => fail(&e),
    }

    Ok(())
}
