use std::path::PathBuf;

pub const BUDGET_INPUT: &str = "resources/budget_data.csv";
pub const BUDGET_OUTPUT: &str = "analysis/budget_data.txt";
pub const ELECTION_INPUT: &str = "resources/election_data.csv";
pub const ELECTION_OUTPUT: &str = "analysis/election_data.txt";

/// Where a run reads its dataset from and where it saves the report.
/// Relative paths resolve against the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn budget() -> Self {
        Self::new(BUDGET_INPUT, BUDGET_OUTPUT)
    }

    pub fn election() -> Self {
        Self::new(ELECTION_INPUT, ELECTION_OUTPUT)
    }
}
