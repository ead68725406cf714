//! Base dataset loading.
//!
//! Reads the input CSV, checks for the required columns, and turns each row
//! into a [`VideoRecord`] tagged [`SourceTag::Base`]. Columns without a
//! dedicated field pass through in their original order.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use disc_clinic_source::parsing::{
    extract_video_id, is_short, is_shorts_marker, parse_display_duration, parse_display_views,
    thumbnail_url,
};
use disc_clinic_source_models::{SourceTag, VideoRecord};
use disc_clinic_topic::normalize::normalize;
use disc_clinic_topic::tagger::TopicTagger;

use crate::IngestError;
use crate::output::APPENDED_COLUMNS;

/// Title column.
pub const TITLE_COLUMN: &str = "Title";
/// Channel column.
pub const CHANNEL_COLUMN: &str = "Channel";
/// Display duration column.
pub const DURATION_COLUMN: &str = "Duration";
/// Display view count column.
pub const VIEWS_COLUMN: &str = "Views";

/// Columns every input file must have.
pub const REQUIRED_COLUMNS: [&str; 4] =
    [TITLE_COLUMN, CHANNEL_COLUMN, DURATION_COLUMN, VIEWS_COLUMN];

/// Columns searched, in order, for a video URL.
pub const URL_COLUMNS: [&str; 4] = ["url", "URL", "Link", "link"];

/// Length of a native video id, and of a title slug.
const ID_LEN: usize = 11;

/// One input row, before tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRow {
    /// Video title.
    pub title: String,
    /// Channel name; empty when the cell is blank.
    pub channel: String,
    /// Display duration (`"12:38"` or `"SHORTS"`).
    pub duration: String,
    /// Display view count (`"1.3M views"`).
    pub views: String,
    /// Every other column, in input order.
    pub extra: Vec<(String, String)>,
}

/// The parsed input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseDataset {
    /// Input column names in order, without reserved output columns.
    pub headers: Vec<String>,
    /// Rows in input order.
    pub rows: Vec<BaseRow>,
}

impl BaseDataset {
    /// Raw titles in row order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.title.as_str())
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the file had no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Normalizes and tags every row.
    #[must_use]
    pub fn to_records(&self, tagger: &dyn TopicTagger) -> Vec<VideoRecord> {
        let records: Vec<VideoRecord> = self
            .rows
            .iter()
            .map(|row| base_record(row, tagger))
            .collect();

        let distinct = records
            .iter()
            .map(|record| record.id.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        if distinct < records.len() {
            log::warn!(
                "Base dataset has {} rows sharing an identifier with an earlier row",
                records.len() - distinct
            );
        }

        records
    }
}

/// Reads the base dataset from a CSV file.
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the file cannot be opened,
/// [`IngestError::Csv`] if it cannot be parsed, or
/// [`IngestError::MissingColumns`] if a required column is absent.
pub fn read_base_csv(path: &Path) -> Result<BaseDataset, IngestError> {
    log::info!("Reading base dataset from {}", path.display());
    let file = std::fs::File::open(path)?;
    let dataset = read_base(file)?;
    log::info!(
        "Loaded {} base videos ({} columns)",
        dataset.len(),
        dataset.headers.len()
    );
    Ok(dataset)
}

/// Reads the base dataset from any CSV source.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] if parsing fails, or
/// [`IngestError::MissingColumns`] if a required column is absent.
pub fn read_base(reader: impl Read) -> Result<BaseDataset, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let csv_headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !csv_headers.iter().any(|h| h == *required))
        .map(|required| (*required).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns { missing });
    }

    // (column index, header) pairs that survive into the output
    let kept: Vec<(usize, &String)> = csv_headers
        .iter()
        .enumerate()
        .filter(|(_, header)| {
            let reserved = APPENDED_COLUMNS.contains(&header.as_str());
            if reserved {
                log::debug!("Dropping reserved input column '{header}'");
            }
            !reserved
        })
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;

        let mut row = BaseRow {
            title: String::new(),
            channel: String::new(),
            duration: String::new(),
            views: String::new(),
            extra: Vec::new(),
        };

        for &(i, header) in &kept {
            let value = record.get(i).unwrap_or("").trim().to_owned();
            match header.as_str() {
                TITLE_COLUMN => row.title = value,
                CHANNEL_COLUMN => row.channel = value,
                DURATION_COLUMN => row.duration = value,
                VIEWS_COLUMN => row.views = value,
                _ => row.extra.push((header.clone(), value)),
            }
        }

        rows.push(row);
    }

    Ok(BaseDataset {
        headers: kept.into_iter().map(|(_, header)| header.clone()).collect(),
        rows,
    })
}

/// Builds a base record from a row.
///
/// The identifier is the native id from a URL column when one parses,
/// otherwise the title slug. A `"SHORTS"` duration marks the record short
/// with an unknown length; an unparseable duration leaves both unknown.
#[must_use]
pub fn base_record(row: &BaseRow, tagger: &dyn TopicTagger) -> VideoRecord {
    let native_id = URL_COLUMNS.iter().find_map(|column| {
        row.extra
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| extract_video_id(value))
    });

    let duration_seconds = parse_display_duration(&row.duration);
    let short = is_shorts_marker(&row.duration) || duration_seconds.is_some_and(is_short);

    VideoRecord {
        id: native_id.clone().unwrap_or_else(|| title_slug(&row.title)),
        title: row.title.clone(),
        channel: non_empty(&row.channel),
        duration: non_empty(&row.duration),
        duration_seconds,
        views: non_empty(&row.views),
        view_count: parse_display_views(&row.views),
        is_short: short,
        thumbnail_url: native_id.as_deref().map(thumbnail_url),
        processed_title: normalize(&row.title),
        topics: tagger.assign_topics(&row.title),
        source: SourceTag::Base,
        extra: row.extra.clone(),
    }
}

/// Derives an identifier from a title: lowercase ASCII alphanumerics only,
/// truncated to 11 characters.
#[must_use]
pub fn title_slug(title: &str) -> String {
    title
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(ID_LEN)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use disc_clinic_topic::registry::default_taxonomy;
    use disc_clinic_topic::tagger::KeywordTagger;

    use super::*;

    const CSV: &str = "\
Title,Channel,Duration,Views,Rank
How to Putt with Confidence,Coach A,12:38,1.3M views,1
Quick Flick Tip,Coach B,SHORTS,850 views,2
\"Hyzer, Anhyzer, Flat\",Coach C,1:02:03,4.5K views,3
";

    fn tagger() -> KeywordTagger {
        KeywordTagger::new(default_taxonomy())
    }

    #[test]
    fn reads_rows_and_passthrough_columns() {
        let dataset = read_base(CSV.as_bytes()).unwrap();

        assert_eq!(dataset.headers, vec!["Title", "Channel", "Duration", "Views", "Rank"]);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.rows[2].title, "Hyzer, Anhyzer, Flat");
        assert_eq!(dataset.rows[0].extra, vec![("Rank".to_string(), "1".to_string())]);
    }

    #[test]
    fn reports_every_missing_column() {
        let err = read_base("Title,Views\nA,1 views\n".as_bytes()).unwrap_err();
        match err {
            IngestError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["Channel", "Duration"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn drops_reserved_output_columns() {
        let csv = "Title,Channel,Duration,Views,id,topics,source\nA,B,1:00,1 views,x,[],fetched\n";
        let dataset = read_base(csv.as_bytes()).unwrap();

        assert_eq!(dataset.headers, vec!["Title", "Channel", "Duration", "Views"]);
        assert!(dataset.rows[0].extra.is_empty());
    }

    #[test]
    fn derives_record_fields() {
        let dataset = read_base(CSV.as_bytes()).unwrap();
        let records = dataset.to_records(&tagger());

        let putt = &records[0];
        assert_eq!(putt.id, "howtoputtwi");
        assert_eq!(putt.duration_seconds, Some(758));
        assert_eq!(putt.view_count, Some(1_300_000));
        assert!(!putt.is_short);
        assert_eq!(putt.processed_title, "putt confidence");
        assert_eq!(putt.topics, vec!["putting", "mindset"]);
        assert_eq!(putt.source, SourceTag::Base);
        assert_eq!(putt.thumbnail_url, None);

        let short = &records[1];
        assert!(short.is_short);
        assert_eq!(short.duration.as_deref(), Some("SHORTS"));
        assert_eq!(short.duration_seconds, None);
    }

    #[test]
    fn prefers_native_id_from_url_column() {
        let csv = "Title,Channel,Duration,Views,URL\n\
                   Backhand Basics,Coach,0:45,10 views,https://www.youtube.com/watch?v=abcDEF12345\n\
                   Forehand Basics,Coach,0:45,10 views,not a link\n";
        let records = read_base(csv.as_bytes()).unwrap().to_records(&tagger());

        assert_eq!(records[0].id, "abcDEF12345");
        assert_eq!(
            records[0].thumbnail_url.as_deref(),
            Some("https://img.youtube.com/vi/abcDEF12345/mqdefault.jpg")
        );
        assert!(records[0].is_short);
        assert_eq!(records[1].id, "forehandbas");
    }

    #[test]
    fn unparseable_values_stay_missing() {
        let csv = "Title,Channel,Duration,Views\nSomething,,live,\n";
        let records = read_base(csv.as_bytes()).unwrap().to_records(&tagger());

        assert_eq!(records[0].channel, None);
        assert_eq!(records[0].duration_seconds, None);
        assert!(!records[0].is_short);
        assert_eq!(records[0].views, None);
        assert_eq!(records[0].view_count, None);
    }

    #[test]
    fn oversized_duration_is_treated_as_missing() {
        let csv = "Title,Channel,Duration,Views\nMarathon,Coach,999999999999999999:00,5 views\n";
        let records = read_base(csv.as_bytes()).unwrap().to_records(&tagger());

        assert_eq!(records[0].duration_seconds, None);
        assert!(!records[0].is_short);
        assert_eq!(records[0].duration.as_deref(), Some("999999999999999999:00"));
    }

    #[test]
    fn slugs_titles() {
        assert_eq!(title_slug("The 360-Shot! Explained"), "the360shote");
        assert_eq!(title_slug("Técnica"), "tcnica");
        assert_eq!(title_slug(""), "");
    }

    #[test]
    fn reads_from_file() {
        let path = std::env::temp_dir().join("disc_clinic_base_test.csv");
        std::fs::write(&path, CSV).unwrap();

        let dataset = read_base_csv(&path).unwrap();
        assert_eq!(dataset.len(), 3);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("disc_clinic_definitely_missing.csv");
        assert!(matches!(read_base_csv(&path), Err(IngestError::Io(_))));
    }
}
