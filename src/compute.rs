use crate::{
    data::{
        Ballot, BudgetRecord, CandidateEntry, ElectionSummary, Error, FinancialSummary,
        PeriodChange, Winner,
    },
    read::RecordUser,
};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::collections::HashMap;

const AVERAGE_DP: u32 = 2;
const PERCENT_DP: u32 = 3;

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
}

/// Running state of the budget pass. Each row only needs the previous row's
/// value, so nothing but the trackers is kept around.
#[derive(Debug, Default)]
pub struct BudgetAggregator {
    total_records: usize,
    last_value: Option<i64>,
    net_total: i64,
    net_change_sum: i64,
    greatest_increase: PeriodChange,
    greatest_decrease: PeriodChange,
}

impl BudgetAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Averaging needs at least one delta, i.e. two rows.
    pub fn finish(self) -> Result<FinancialSummary, Error> {
        if self.total_records < 2 {
            return Err(Error::InsufficientData {
                needed: 2,
                found: self.total_records,
            });
        }
        let periods = Decimal::from(self.total_records - 1);
        let average_change = round(Decimal::from(self.net_change_sum) / periods, AVERAGE_DP);
        Ok(FinancialSummary {
            total_records: self.total_records,
            net_total: self.net_total,
            average_change,
            greatest_increase: self.greatest_increase,
            greatest_decrease: self.greatest_decrease,
        })
    }
}

fn overflow(row: usize, what: &str) -> Error {
    Error::MalformedRecord {
        row,
        reason: format!("{what} overflows a 64-bit integer"),
    }
}

impl RecordUser<BudgetRecord> for BudgetAggregator {
    fn use_record(&mut self, record: BudgetRecord) -> Result<(), Error> {
        self.total_records += 1;
        let row = self.total_records;
        self.net_total = self
            .net_total
            .checked_add(record.profit_loss)
            .ok_or_else(|| overflow(row, "net total"))?;
        if let Some(last) = self.last_value {
            let delta = record
                .profit_loss
                .checked_sub(last)
                .ok_or_else(|| overflow(row, "change from previous period"))?;
            self.net_change_sum = self
                .net_change_sum
                .checked_add(delta)
                .ok_or_else(|| overflow(row, "sum of changes"))?;
            // strict comparisons: the first extreme delta is kept on ties
            if delta > self.greatest_increase.value {
                self.greatest_increase = PeriodChange {
                    date: record.date.clone(),
                    value: delta,
                };
            }
            if delta < self.greatest_decrease.value {
                self.greatest_decrease = PeriodChange {
                    date: record.date,
                    value: delta,
                };
            }
        }
        self.last_value = Some(record.profit_loss);
        Ok(())
    }
}

/// Vote tally that remembers the order in which candidates first showed up.
/// The map only points into `tally`; `tally` is the source of truth.
#[derive(Debug, Default)]
pub struct ElectionAggregator {
    total_votes: u64,
    tally: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl ElectionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Result<ElectionSummary, Error> {
        if self.total_votes == 0 {
            return Err(Error::InsufficientData {
                needed: 1,
                found: 0,
            });
        }
        let total = Decimal::from(self.total_votes);
        let candidates: Vec<CandidateEntry> = self
            .tally
            .into_iter()
            .map(|(name, vote_count)| CandidateEntry {
                percent: round(Decimal::from(vote_count) * dec!(100) / total, PERCENT_DP),
                name,
                vote_count,
            })
            .collect();
        let winner = determine_winner(&candidates).ok_or(Error::InsufficientData {
            needed: 1,
            found: 0,
        })?;
        Ok(ElectionSummary {
            total_votes: self.total_votes,
            candidates,
            winner,
        })
    }
}

impl RecordUser<Ballot> for ElectionAggregator {
    fn use_record(&mut self, ballot: Ballot) -> Result<(), Error> {
        self.total_votes += 1;
        match self.index.get(&ballot.candidate).copied() {
            Some(i) => self.tally[i].1 += 1,
            None => {
                tracing::trace!(candidate = %ballot.candidate, "new candidate");
                self.index.insert(ballot.candidate.clone(), self.tally.len());
                self.tally.push((ballot.candidate, 1));
            }
        }
        Ok(())
    }
}

/// The leader is the first candidate to reach the highest count. A second
/// scan over every candidate, including those listed before the leader,
/// turns any other candidate holding that count into a tie.
/// Returns `None` only when there are no candidates at all.
fn determine_winner(candidates: &[CandidateEntry]) -> Option<Winner> {
    let (first, rest) = candidates.split_first()?;
    let mut leader = 0;
    let mut leading_count = first.vote_count;
    for (i, candidate) in rest.iter().enumerate() {
        if candidate.vote_count > leading_count {
            leader = i + 1;
            leading_count = candidate.vote_count;
        }
    }
    let tied = candidates
        .iter()
        .enumerate()
        .any(|(i, c)| i != leader && c.vote_count == leading_count);
    Some(if tied {
        Winner::Tie
    } else {
        Winner::Candidate(candidates[leader].name.clone())
    })
}

/// Runs the whole budget pass over an in-memory sequence of records.
pub fn summarize_budget<I>(records: I) -> Result<FinancialSummary, Error>
where
    I: IntoIterator<Item = BudgetRecord>,
{
    let mut aggregator = BudgetAggregator::new();
    for record in records {
        aggregator.use_record(record)?;
    }
    aggregator.finish()
}

/// Runs the whole election pass over an in-memory sequence of ballots.
pub fn summarize_election<I>(ballots: I) -> Result<ElectionSummary, Error>
where
    I: IntoIterator<Item = Ballot>,
{
    let mut aggregator = ElectionAggregator::new();
    for ballot in ballots {
        aggregator.use_record(ballot)?;
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use crate::data::{
        Ballot, BudgetRecord, CandidateEntry, Error, FinancialSummary, PeriodChange, Winner,
        TIE_MESSAGE,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{summarize_budget, summarize_election};

    fn budget(rows: &[(&str, i64)]) -> Vec<BudgetRecord> {
        rows.iter()
            .map(|&(date, profit_loss)| BudgetRecord {
                date: date.to_string(),
                profit_loss,
            })
            .collect()
    }

    fn ballots(candidates: &[&str]) -> Vec<Ballot> {
        candidates
            .iter()
            .enumerate()
            .map(|(i, &candidate)| Ballot {
                ballot_id: (1000 + i).to_string(),
                county: "Denver".to_string(),
                candidate: candidate.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_budget_scenario() {
        let summary =
            summarize_budget(budget(&[("2023-01", 100), ("2023-02", 300), ("2023-03", 50)]))
                .unwrap();
        assert_eq!(
            summary,
            FinancialSummary {
                total_records: 3,
                net_total: 450,
                average_change: dec!(-25.00),
                greatest_increase: PeriodChange {
                    date: "2023-02".into(),
                    value: 200,
                },
                greatest_decrease: PeriodChange {
                    date: "2023-03".into(),
                    value: -250,
                },
            }
        );
    }

    #[test]
    fn test_two_rows_average_is_the_delta() {
        let summary = summarize_budget(budget(&[("Jan", 10), ("Feb", -7)])).unwrap();
        assert_eq!(summary.average_change, dec!(-17));
        assert_eq!(summary.greatest_decrease.value, -17);
        assert_eq!(summary.greatest_increase, PeriodChange::default());
    }

    #[test]
    fn test_net_total_is_plain_sum() {
        let rows = [
            ("Jan-10", 867884),
            ("Feb-10", 984655),
            ("Mar-10", 322013),
            ("Apr-10", -69417),
            ("May-10", 310503),
            ("Jun-10", 522857),
        ];
        let summary = summarize_budget(budget(&rows)).unwrap();
        assert_eq!(summary.total_records, 6);
        assert_eq!(summary.net_total, rows.iter().map(|r| r.1).sum::<i64>());
        // (522857 - 867884) / 5
        assert_eq!(summary.average_change, dec!(-69005.40));
        assert_eq!(summary.greatest_increase.date, "May-10");
        assert_eq!(summary.greatest_decrease.date, "Mar-10");
    }

    #[test]
    fn test_first_extreme_delta_wins() {
        let summary = summarize_budget(budget(&[
            ("a", 0),
            ("b", 5),
            ("c", 0),
            ("d", 5),
            ("e", 0),
        ]))
        .unwrap();
        assert_eq!(
            summary.greatest_increase,
            PeriodChange {
                date: "b".into(),
                value: 5
            }
        );
        assert_eq!(
            summary.greatest_decrease,
            PeriodChange {
                date: "c".into(),
                value: -5
            }
        );
    }

    #[test]
    fn test_average_rounds_half_to_even() {
        // deltas sum to 1 over 8 periods: 0.125
        let mut rows = vec![("p0", 0)];
        rows.extend(std::iter::repeat(("p", 0)).take(7));
        rows.push(("p8", 1));
        let summary = summarize_budget(budget(&rows)).unwrap();
        assert_eq!(summary.average_change, dec!(0.12));
    }

    #[test]
    fn test_net_total_overflow() {
        assert!(matches!(
            summarize_budget(budget(&[("a", i64::MAX), ("b", 1)])),
            Err(Error::MalformedRecord { row: 2, .. })
        ));
    }

    #[test]
    fn test_delta_overflow() {
        let err = summarize_budget(budget(&[("a", i64::MAX), ("b", i64::MIN + 1)])).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { row: 2, .. }), "{err}");
    }

    #[test]
    fn test_change_sum_overflow() {
        // each delta fits, their running sum doesn't
        let err = summarize_budget(budget(&[("a", i64::MIN / 2), ("b", 0), ("c", i64::MAX)]))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { row: 3, .. }), "{err}");
    }

    #[test]
    fn test_extreme_values_within_range() {
        let summary = summarize_budget(budget(&[("a", 0), ("b", i64::MAX), ("c", 0)])).unwrap();
        assert_eq!(summary.net_total, i64::MAX);
        assert_eq!(summary.greatest_increase.value, i64::MAX);
        assert_eq!(summary.greatest_decrease.value, -i64::MAX);
        assert_eq!(summary.average_change, dec!(0));
    }

    #[test]
    fn test_budget_insufficient_data() {
        assert!(matches!(
            summarize_budget(budget(&[("Jan", 10)])),
            Err(Error::InsufficientData {
                needed: 2,
                found: 1
            })
        ));
        assert!(matches!(
            summarize_budget(Vec::new()),
            Err(Error::InsufficientData {
                needed: 2,
                found: 0
            })
        ));
    }

    #[test]
    fn test_election_tie() {
        let summary = summarize_election(ballots(&["A", "B", "A", "B"])).unwrap();
        assert_eq!(summary.total_votes, 4);
        assert_eq!(
            summary.candidates,
            [
                CandidateEntry {
                    name: "A".into(),
                    vote_count: 2,
                    percent: dec!(50.0),
                },
                CandidateEntry {
                    name: "B".into(),
                    vote_count: 2,
                    percent: dec!(50.0),
                },
            ]
        );
        assert_eq!(summary.winner, Winner::Tie);
        assert_eq!(summary.winner.to_string(), TIE_MESSAGE);
    }

    #[test]
    fn test_election_winner() {
        let summary = summarize_election(ballots(&["A", "B", "A", "A"])).unwrap();
        assert_eq!(summary.winner, Winner::Candidate("A".into()));
        assert_eq!(summary.candidates[0].percent, dec!(75.0));
        assert_eq!(summary.candidates[1].percent, dec!(25.0));
    }

    #[test]
    fn test_first_seen_order_kept() {
        let summary = summarize_election(ballots(&["A", "B", "C", "C", "B", "C"])).unwrap();
        let names: Vec<_> = summary.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(summary.winner, Winner::Candidate("C".into()));
    }

    #[test]
    fn test_tie_between_later_candidates() {
        // neither tied candidate is the first one listed
        let summary = summarize_election(ballots(&["A", "B", "C", "C", "B"])).unwrap();
        assert_eq!(summary.winner, Winner::Tie);
    }

    #[test]
    fn test_tie_below_top_is_not_a_tie() {
        let summary = summarize_election(ballots(&["A", "B", "C", "A"])).unwrap();
        assert_eq!(summary.winner, Winner::Candidate("A".into()));
    }

    #[test]
    fn test_single_candidate() {
        let summary = summarize_election(ballots(&["Solo"])).unwrap();
        assert_eq!(summary.candidates[0].percent, dec!(100));
        assert_eq!(summary.winner, Winner::Candidate("Solo".into()));
    }

    #[test]
    fn test_votes_and_percents_add_up() {
        let summary =
            summarize_election(ballots(&["A", "B", "C", "A", "B", "A", "C"])).unwrap();
        let votes: u64 = summary.candidates.iter().map(|c| c.vote_count).sum();
        assert_eq!(votes, summary.total_votes);
        let percents: Decimal = summary.candidates.iter().map(|c| c.percent).sum();
        assert!((percents - dec!(100)).abs() <= dec!(0.01), "{percents}");
        // 3/7 = 42.857142...
        assert_eq!(summary.candidates[0].percent, dec!(42.857));
    }

    #[test]
    fn test_election_insufficient_data() {
        assert!(matches!(
            summarize_election(Vec::new()),
            Err(Error::InsufficientData { found: 0, .. })
        ));
    }

    #[test]
    fn test_idempotent() {
        let rows = budget(&[("Jan", 3), ("Feb", 9), ("Mar", -4), ("Apr", 2)]);
        assert_eq!(
            summarize_budget(rows.clone()).unwrap(),
            summarize_budget(rows).unwrap()
        );
        let votes = ballots(&["X", "Y", "Y", "Z"]);
        assert_eq!(
            summarize_election(votes.clone()).unwrap(),
            summarize_election(votes).unwrap()
        );
    }
}
