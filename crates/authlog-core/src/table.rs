//! CSV table codec for the security event table

use std::path::Path;

use tracing::info;

use crate::SecurityEventRecord;

/// Fixed column order of the event table
pub const CSV_HEADER: [&str; 6] = [
    "timestamp",
    "ip_address",
    "username",
    "event_type",
    "repetition_count",
    "raw_message",
];

/// Serialize records to a CSV file with the fixed header row.
///
/// The header is written even when the record sequence is empty, so a run
/// over entirely unparseable input still produces a valid (header-only)
/// table. Write failures propagate; the caller decides whether to remove a
/// partial file. Returns the number of records written.
pub fn write_csv<P, I>(path: P, records: I) -> csv::Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = SecurityEventRecord>,
{
    // header is written by hand so it appears even for zero records
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())?;
    writer.write_record(CSV_HEADER)?;

    let mut count = 0usize;
    for record in records {
        writer.serialize(&record)?;
        count += 1;
    }
    writer.flush()?;

    info!(path = %path.as_ref().display(), records = count, "csv write complete");
    Ok(count)
}

/// Read a previously written event table back into records.
///
/// String fields come back byte-for-byte; `repetition_count` is parsed back
/// to an integer.
pub fn read_csv<P: AsRef<Path>>(path: P) -> csv::Result<Vec<SecurityEventRecord>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}
