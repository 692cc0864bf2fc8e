//! CSV output backend.
//!
//! Creates in the configured output directory:
//! - `events.csv`
//! - `vehicles.csv`
//! - `network_edges.csv`
//! - `metrics.json` (written by [`OutputWriter::write_metrics`])

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::Writer;
use rd_sim::Metrics;

use crate::writer::OutputWriter;
use crate::{EdgeRow, EventRow, OutputResult, VehicleRow};

fn opt(v: Option<impl ToString>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes simulation output to CSV files plus one JSON metrics file.
pub struct CsvWriter {
    events:   Writer<File>,
    vehicles: Writer<File>,
    edges:    Writer<File>,
    metrics:  PathBuf,
    finished: bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the CSV files, and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record([
            "time", "seq", "kind", "rider_id", "vehicle_id", "outcome", "pickup_at", "dropoff_at",
        ])?;

        let mut vehicles = Writer::from_path(dir.join("vehicles.csv"))?;
        vehicles.write_record(["vehicle_id", "x", "y", "state", "completed_trips"])?;

        let mut edges = Writer::from_path(dir.join("network_edges.csv"))?;
        edges.write_record(["a_label", "a_x", "a_y", "b_label", "b_x", "b_y", "weight"])?;

        Ok(Self {
            events,
            vehicles,
            edges,
            metrics: dir.join("metrics.json"),
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.time.to_string(),
                row.seq.to_string(),
                row.kind.to_owned(),
                row.rider_id.to_string(),
                opt(row.vehicle_id),
                row.outcome.to_owned(),
                opt(row.pickup_at),
                opt(row.dropoff_at),
            ])?;
        }
        Ok(())
    }

    fn write_vehicles(&mut self, rows: &[VehicleRow]) -> OutputResult<()> {
        for row in rows {
            self.vehicles.write_record(&[
                row.vehicle_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.state.to_owned(),
                row.completed_trips.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_edges(&mut self, rows: &[EdgeRow]) -> OutputResult<()> {
        for row in rows {
            self.edges.write_record(&[
                row.a_label.clone(),
                row.a.x.to_string(),
                row.a.y.to_string(),
                row.b_label.clone(),
                row.b.x.to_string(),
                row.b.y.to_string(),
                row.weight.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_metrics(&mut self, metrics: &Metrics) -> OutputResult<()> {
        let mut out = BufWriter::new(File::create(&self.metrics)?);
        serde_json::to_writer_pretty(&mut out, metrics)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.vehicles.flush()?;
        self.edges.flush()?;
        Ok(())
    }
}
