use crate::{
    compute::{BudgetAggregator, ElectionAggregator},
    config::PipelineConfig,
    data::{Ballot, BudgetRecord, ElectionSummary, Error, FinancialSummary},
    read::read_records,
    write::write_report,
};
use std::{fs::File, io::Write};

fn open_input(config: &PipelineConfig) -> Result<File, Error> {
    File::open(&config.input).map_err(|e| Error::unavailable(config.input.display(), e))
}

/// Budget run: source → aggregator → report sink.
pub fn run_budget<W: Write>(
    config: &PipelineConfig,
    console: W,
) -> Result<FinancialSummary, Error> {
    tracing::debug!(input = %config.input.display(), "summarizing budget");
    let mut aggregator = BudgetAggregator::new();
    read_records::<_, BudgetRecord, _>(open_input(config)?, &mut aggregator)?;
    let summary = aggregator.finish()?;
    write_report(&summary, console, &config.output)?;
    tracing::info!(
        records = summary.total_records,
        net_total = summary.net_total,
        "budget summary done"
    );
    Ok(summary)
}

/// Election run: source → aggregator → report sink.
pub fn run_election<W: Write>(
    config: &PipelineConfig,
    console: W,
) -> Result<ElectionSummary, Error> {
    tracing::debug!(input = %config.input.display(), "summarizing election");
    let mut aggregator = ElectionAggregator::new();
    read_records::<_, Ballot, _>(open_input(config)?, &mut aggregator)?;
    let summary = aggregator.finish()?;
    write_report(&summary, console, &config.output)?;
    tracing::info!(
        votes = summary.total_votes,
        winner = %summary.winner,
        "election summary done"
    );
    Ok(summary)
}
