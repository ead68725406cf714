//! Plain-text tables for the command line.

use disc_clinic_ingest_models::TopicReport;
use disc_clinic_source_models::VideoRecord;
use disc_clinic_topic::TopicTaxonomy;

use crate::output::WrittenArtifacts;

/// Widest title shown in the video table before truncation.
const TITLE_WIDTH: usize = 50;

/// Prints topic counts and where the artifacts went.
pub fn print_report(report: &TopicReport, artifacts: &WrittenArtifacts) {
    println!(
        "{} videos ({} base + {} fetched), {} topics",
        report.video_count, report.base_count, report.fetched_count, report.topic_count
    );
    println!(
        "Fetch: {} after {} pages",
        report.fetch.stop_reason, report.fetch.pages_fetched
    );
    if let Some(warning) = &report.fetch.warning {
        println!("Warning: {warning}");
    }

    println!();
    println!("{:<20} COUNT", "TOPIC");
    println!("{}", "-".repeat(30));
    for (topic, count) in report.topics.entries() {
        println!("{topic:<20} {count}");
    }

    println!();
    println!("Combined dataset: {}", artifacts.combined_csv.display());
    println!("Topic report:     {}", artifacts.report_json.display());
    if let Some(path) = &artifacts.records_json {
        println!("Records export:   {}", path.display());
    }
}

/// Prints every topic and its keywords.
pub fn print_taxonomy(taxonomy: &TopicTaxonomy) {
    println!("{:<12} KEYWORDS", "TOPIC");
    println!("{}", "-".repeat(60));
    for topic in &taxonomy.topics {
        println!("{:<12} {}", topic.name, topic.keywords.join(", "));
    }
}

/// Prints one line per video.
pub fn print_videos(records: &[&VideoRecord]) {
    println!(
        "{:<TITLE_WIDTH$} {:<24} {:>8} {:>12}  TOPICS",
        "TITLE", "CHANNEL", "DURATION", "VIEWS"
    );
    println!("{}", "-".repeat(TITLE_WIDTH + 70));
    for record in records {
        println!(
            "{:<TITLE_WIDTH$} {:<24} {:>8} {:>12}  {}",
            truncate(&record.title, TITLE_WIDTH),
            truncate(record.channel.as_deref().unwrap_or("-"), 24),
            record.duration.as_deref().unwrap_or("-"),
            record.views.as_deref().unwrap_or("-"),
            record.topics.join(", ")
        );
    }
    println!("{} videos", records.len());
}

/// Prints one channel per line.
pub fn print_channels(channels: &[String]) {
    for channel in channels {
        println!("{channel}");
    }
    println!("{} channels", channels.len());
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_text_on_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Técnica de lanzamiento", 10), "Técnica...");
    }
}
