use crate::data::Error;
use serde::de::DeserializeOwned;

/// Trait for doing something with a record read from a CSV file (or received
/// from elsewhere). Implemented by the aggregators, but also by mock storages
/// in tests to check we get the correct records out of a CSV stream.
pub trait RecordUser<T> {
    fn use_record(&mut self, record: T) -> Result<(), Error>;
}

/// Simple CSV importer. The header row is skipped and fields are mapped to
/// `T` by position. Stops at the first bad row: there's no partial summary.
pub fn read_records<R, T, U>(reader: R, user: &mut U) -> Result<usize, Error>
where
    R: std::io::Read,
    T: DeserializeOwned,
    U: RecordUser<T>,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = 0;
    for (index, result) in rdr.records().enumerate() {
        let row = index + 1;
        let record = result.map_err(|e| classify(row, e))?;
        let record: T = record.deserialize(None).map_err(|e| classify(row, e))?;
        user.use_record(record)?;
        rows = row;
    }
    tracing::debug!(rows, "finished reading records");
    Ok(rows)
}

fn classify(row: usize, err: csv::Error) -> Error {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => Error::unavailable("input stream", source),
        _ => Error::MalformedRecord { row, reason },
    }
}
