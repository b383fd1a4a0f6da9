use chrono::{DateTime, Utc};
use roulette_core::{HistoryEntry, SpinOutcome};
use serde::Serialize;
use std::path::Path;

/// One settled spin, as written to the CSV export.
#[derive(Debug, Clone, Serialize)]
pub struct SpinRecord {
    pub seq: u64,
    pub item: String,
    pub index: usize,
    pub rotation: f64,
    pub ts: DateTime<Utc>,
}

impl SpinRecord {
    pub fn new(outcome: &SpinOutcome, entry: &HistoryEntry) -> Self {
        Self {
            seq: entry.index,
            item: entry.item.clone(),
            index: outcome.index,
            rotation: outcome.rotation,
            ts: Utc::now(),
        }
    }
}

pub fn write_csv(path: &Path, records: &[SpinRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}
