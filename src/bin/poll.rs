use summaries::{logger, run_election, PipelineConfig};

fn main() -> Result<(), anyhow::Error> {
    logger::init_logger();
    run_election(&PipelineConfig::election(), std::io::stdout())?;
    Ok(())
}
