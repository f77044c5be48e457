//! Single-pass summaries of two fixed CSV datasets: a monthly profit/loss
//! series and an election ballot list. Each run reads its dataset once,
//! aggregates it and prints the same report to the console and a text file.

pub mod compute;
pub mod config;
pub mod data;
pub mod logger;
pub mod pipeline;
pub mod read;
pub mod write;

pub use config::PipelineConfig;
pub use data::{
    Ballot, BudgetRecord, CandidateEntry, ElectionSummary, Error, FinancialSummary,
    PeriodChange, Winner, TIE_MESSAGE,
};
pub use pipeline::{run_budget, run_election};
