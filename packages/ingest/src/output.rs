//! Artifact writers.
//!
//! Writes the combined dataset as CSV, the topic report as JSON, and
//! optionally the combined records as a JSON array for the web front-end.

use std::io::Write;
use std::path::{Path, PathBuf};

use disc_clinic_ingest_models::TopicReport;
use disc_clinic_source_models::VideoRecord;

use crate::IngestError;
use crate::base::{CHANNEL_COLUMN, DURATION_COLUMN, TITLE_COLUMN, VIEWS_COLUMN};
use crate::merge::CombinedDataset;

/// Combined dataset file name.
pub const COMBINED_CSV: &str = "combined_video_dataset.csv";

/// Topic report file name.
pub const REPORT_JSON: &str = "topic_analysis_results.json";

/// Records export file name.
pub const RECORDS_JSON: &str = "video_records.json";

/// Columns appended after the input columns. Input columns with these
/// names are dropped on read.
pub const APPENDED_COLUMNS: [&str; 8] = [
    "id",
    "processed_title",
    "topics",
    "source",
    "viewCount",
    "durationSeconds",
    "isShort",
    "thumbnailUrl",
];

/// Paths of the files written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    /// Combined dataset CSV.
    pub combined_csv: PathBuf,
    /// Topic report JSON.
    pub report_json: PathBuf,
    /// Records JSON, if requested.
    pub records_json: Option<PathBuf>,
}

/// Writes every artifact into `output_dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`IngestError`] if the directory cannot be created or any file
/// cannot be written.
pub fn write_artifacts(
    output_dir: &Path,
    dataset: &CombinedDataset,
    report: &TopicReport,
    records_json: bool,
) -> Result<WrittenArtifacts, IngestError> {
    std::fs::create_dir_all(output_dir)?;

    let combined_csv = output_dir.join(COMBINED_CSV);
    write_combined_csv(&combined_csv, dataset)?;
    log::info!(
        "Wrote {} records to {}",
        dataset.records.len(),
        combined_csv.display()
    );

    let report_json = output_dir.join(REPORT_JSON);
    write_report(&report_json, report)?;
    log::info!("Wrote topic report to {}", report_json.display());

    let records_json = if records_json {
        let path = output_dir.join(RECORDS_JSON);
        write_records_json(&path, &dataset.records)?;
        log::info!("Wrote records export to {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok(WrittenArtifacts {
        combined_csv,
        report_json,
        records_json,
    })
}

/// Writes the combined dataset to a CSV file.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be created or written.
pub fn write_combined_csv(path: &Path, dataset: &CombinedDataset) -> Result<(), IngestError> {
    let file = std::fs::File::create(path)?;
    write_combined(file, dataset)
}

/// Writes the combined dataset as CSV to any writer.
///
/// Columns are the input columns in order followed by
/// [`APPENDED_COLUMNS`]. Missing values are empty cells.
///
/// # Errors
///
/// Returns [`IngestError`] if writing or serializing topics fails.
pub fn write_combined(writer: impl Write, dataset: &CombinedDataset) -> Result<(), IngestError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(
        dataset
            .headers
            .iter()
            .map(String::as_str)
            .chain(APPENDED_COLUMNS),
    )?;

    for record in &dataset.records {
        let mut row: Vec<String> = dataset
            .headers
            .iter()
            .map(|header| input_cell(record, header))
            .collect();

        row.push(record.id.clone());
        row.push(record.processed_title.clone());
        row.push(serde_json::to_string(&record.topics)?);
        row.push(record.source.to_string());
        row.push(optional_cell(record.view_count));
        row.push(optional_cell(record.duration_seconds));
        row.push(record.is_short.to_string());
        row.push(record.thumbnail_url.clone().unwrap_or_default());

        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes the topic report as pretty JSON.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be created or written.
pub fn write_report(path: &Path, report: &TopicReport) -> Result<(), IngestError> {
    write_json(path, report)
}

/// Writes records as a camelCase JSON array.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be created or written.
pub fn write_records_json(path: &Path, records: &[VideoRecord]) -> Result<(), IngestError> {
    write_json(path, records)
}

/// Serializes `value` as pretty JSON and flushes before returning, so a
/// failed write is reported instead of lost when the buffer drops.
fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IngestError> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

fn input_cell(record: &VideoRecord, header: &str) -> String {
    match header {
        TITLE_COLUMN => record.title.clone(),
        CHANNEL_COLUMN => record.channel.clone().unwrap_or_default(),
        DURATION_COLUMN => record.duration.clone().unwrap_or_default(),
        VIEWS_COLUMN => record.views.clone().unwrap_or_default(),
        other => record.extra_value(other).unwrap_or_default().to_string(),
    }
}

fn optional_cell(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
