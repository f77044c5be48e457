use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Fixed `winner` text when two or more candidates share the top count.
pub const TIE_MESSAGE: &str = "There is no winner: the election is a tie!";

/// One row of the budget dataset. Columns are matched by position, so the
/// header names of the file don't matter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BudgetRecord {
    pub date: String,
    pub profit_loss: i64,
}

/// One row of the election dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ballot {
    pub ballot_id: String,
    pub county: String,
    pub candidate: String,
}

/// A period-over-period delta and the date of the period that produced it.
/// The default (`""`, `0`) is what the trackers start from, so a dataset
/// that never rises keeps an empty greatest increase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PeriodChange {
    pub date: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialSummary {
    pub total_records: usize,
    pub net_total: i64,
    /// Mean of the deltas, rounded half-to-even to 2 places.
    pub average_change: Decimal,
    pub greatest_increase: PeriodChange,
    pub greatest_decrease: PeriodChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry {
    pub name: String,
    pub vote_count: u64,
    /// Share of all votes in percent, rounded half-to-even to 3 places.
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Winner {
    Candidate(String),
    Tie,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Candidate(name) => f.write_str(name),
            Winner::Tie => f.write_str(TIE_MESSAGE),
        }
    }
}

/// Candidates are listed in order of first appearance in the input, never
/// by vote count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionSummary {
    pub total_votes: u64,
    pub candidates: Vec<CandidateEntry>,
    pub winner: Winner,
}

/// Everything that can abort a run. None of these are recovered from.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed record at data row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },
    #[error("Insufficient data (needed at least {needed} rows, found {found})")]
    InsufficientData { needed: usize, found: usize },
    #[error("Cannot access {resource}: {source}")]
    ResourceUnavailable {
        resource: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn unavailable(resource: impl fmt::Display, source: std::io::Error) -> Self {
        Error::ResourceUnavailable {
            resource: resource.to_string(),
            source,
        }
    }
}
