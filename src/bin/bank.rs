use summaries::{logger, run_budget, PipelineConfig};

fn main() -> Result<(), anyhow::Error> {
    logger::init_logger();
    run_budget(&PipelineConfig::budget(), std::io::stdout())?;
    Ok(())
}
