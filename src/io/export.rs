//! CSV export for ranked entries and scenario history.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::calc::RankedEntry;
use crate::scenario::StoredScenario;

/// Column header for the ranking export.
const RANKING_HEADER: &str = "rank,appliance,name,watts,hours_per_day,quantity,kwh,cost,severity";

/// Column header for the scenario history export.
const HISTORY_HEADER: &str = "id,name,region,created_at,kwh,cost,co2";

/// Exports a ranking to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_ranking_csv(ranked: &[RankedEntry], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_ranking_csv(ranked, io::BufWriter::new(file))
}

/// Writes a ranking as CSV, one row per entry in rank order.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_ranking_csv(ranked: &[RankedEntry], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(RANKING_HEADER.split(','))?;

    for (rank, r) in ranked.iter().enumerate() {
        wtr.write_record(&[
            (rank + 1).to_string(),
            r.entry.key().to_string(),
            r.entry.name().to_string(),
            format!("{:.1}", r.entry.watts()),
            format!("{:.2}", r.entry.hours_per_day()),
            r.entry.quantity().to_string(),
            format!("{:.4}", r.kwh),
            format!("{:.2}", r.cost),
            r.severity.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes scenario history as CSV (monthly totals per scenario).
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_history_csv(history: &[StoredScenario], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HISTORY_HEADER.split(','))?;

    for doc in history {
        let s = &doc.scenario;
        wtr.write_record(&[
            doc.id.clone(),
            s.name.clone(),
            s.region.to_string(),
            s.created_at.to_rfc3339(),
            format!("{:.4}", s.totals.kwh),
            format!("{:.2}", s.totals.cost),
            format!("{:.4}", s.totals.co2),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
