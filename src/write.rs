use crate::data::{ElectionSummary, Error, FinancialSummary};
use rust_decimal::Decimal;
use std::{fmt, fs, io::Write, path::Path};

const SEPARATOR: &str = "----------------------------";

/// Inserts `,` every three digits of the integer part of a plain number.
fn group_thousands(number: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let mut out = String::with_capacity(number.len() + int.len() / 3);
    out.push_str(sign);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn count(n: impl fmt::Display) -> String {
    group_thousands(&n.to_string())
}

fn amount(value: Decimal) -> String {
    group_thousands(&format!("{:.2}", value.round_dp(2)))
}

impl fmt::Display for FinancialSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Financial Analysis\n")?;
        writeln!(f, "{SEPARATOR}\n")?;
        writeln!(f, "Total Records: {}\n", count(self.total_records))?;
        writeln!(
            f,
            "Total Profits: {} USD\n",
            amount(Decimal::from(self.net_total))
        )?;
        writeln!(f, "Average Change: {} USD\n", amount(self.average_change))?;
        writeln!(
            f,
            "Greatest Increase in Profits: {} ({} USD)\n",
            self.greatest_increase.date,
            amount(Decimal::from(self.greatest_increase.value))
        )?;
        writeln!(
            f,
            "Greatest Decrease in Profits: {} ({} USD)",
            self.greatest_decrease.date,
            amount(Decimal::from(self.greatest_decrease.value))
        )
    }
}

impl fmt::Display for ElectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Election Results\n")?;
        writeln!(f, "{SEPARATOR}\n")?;
        writeln!(f, "Total Votes: {}\n", count(self.total_votes))?;
        writeln!(f, "{SEPARATOR}\n")?;
        for candidate in &self.candidates {
            writeln!(
                f,
                "{}: {}% ({})\n",
                candidate.name,
                amount(candidate.percent),
                count(candidate.vote_count)
            )?;
        }
        writeln!(f, "{SEPARATOR}\n")?;
        writeln!(f, "Winner: {}\n", self.winner)?;
        writeln!(f, "{SEPARATOR}")
    }
}

/// Renders a finished summary to the console and to the text file at `path`.
/// Both destinations get the same text. The file's parent directory is
/// created when missing.
pub fn write_report<S, W>(summary: &S, mut console: W, path: &Path) -> Result<(), Error>
where
    S: fmt::Display,
    W: Write,
{
    let report = summary.to_string();
    console
        .write_all(report.as_bytes())
        .and_then(|()| console.flush())
        .map_err(|e| Error::unavailable("console", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::unavailable(parent.display(), e))?;
    }
    fs::write(path, &report).map_err(|e| Error::unavailable(path.display(), e))?;
    tracing::debug!(path = %path.display(), bytes = report.len(), "report written");
    Ok(())
}
