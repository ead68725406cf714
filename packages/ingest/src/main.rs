#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the disc golf clinic dataset tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use disc_clinic_cli_utils::FetchBar;
use disc_clinic_ingest::display::{print_channels, print_report, print_taxonomy, print_videos};
use disc_clinic_ingest::query::{
    FilterOptions, SortDirection, SortOption, extract_channels, filter_videos, sort_videos,
};
use disc_clinic_ingest::{RunOptions, load_catalog};
use disc_clinic_ingest_models::{
    DEFAULT_CLUSTERS, DEFAULT_DELAY_MS, DEFAULT_PAGE_SIZE, DEFAULT_QUERY, DEFAULT_TARGET,
    ExpandConfig, TaggerKind,
};
use disc_clinic_source::youtube::YouTubeClient;
use disc_clinic_topic::registry::resolve_taxonomy;

#[derive(Parser)]
#[command(
    name = "disc_clinic_ingest",
    about = "Disc golf clinic video dataset enrichment tool"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Taxonomy and tagger selection shared by every dataset command.
#[derive(Args)]
struct TaggingArgs {
    /// Taxonomy TOML replacing the built-in disc golf topics
    #[arg(long)]
    taxonomy: Option<PathBuf>,
    /// Tagging strategy (`keyword` or `cluster`)
    #[arg(long, default_value = "keyword")]
    tagger: TaggerKind,
    /// Number of clusters for the cluster tagger
    #[arg(long, default_value_t = DEFAULT_CLUSTERS)]
    clusters: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Tag the base dataset, top it up from YouTube, and write the results
    Expand {
        /// Base dataset CSV (needs Title, Channel, Duration, Views columns)
        #[arg(long)]
        input: PathBuf,
        /// Directory for the combined CSV and report JSON
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Search query
        #[arg(long, default_value = DEFAULT_QUERY)]
        query: String,
        /// Combined dataset size to stop at
        #[arg(long, default_value_t = DEFAULT_TARGET)]
        target: usize,
        /// Results per search page (at most 50)
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,
        /// Pause between search pages, in milliseconds
        #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
        delay_ms: u64,
        /// YouTube Data API key (defaults to `YOUTUBE_API_KEY`)
        #[arg(long)]
        api_key: Option<String>,
        /// Also write the combined records as JSON
        #[arg(long)]
        records_json: bool,
        /// Skip fetching and analyze the base dataset only
        #[arg(long)]
        offline: bool,
        #[command(flatten)]
        tagging: TaggingArgs,
    },
    /// Tag the base dataset and write the results without fetching
    Analyze {
        /// Base dataset CSV
        #[arg(long)]
        input: PathBuf,
        /// Directory for the combined CSV and report JSON
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Also write the combined records as JSON
        #[arg(long)]
        records_json: bool,
        #[command(flatten)]
        tagging: TaggingArgs,
    },
    /// List the taxonomy topics and their keywords
    Topics {
        /// Taxonomy TOML replacing the built-in disc golf topics
        #[arg(long)]
        taxonomy: Option<PathBuf>,
    },
    /// Filter and sort the videos of a dataset
    List {
        /// Dataset CSV (a base file or a previous combined output)
        #[arg(long)]
        input: PathBuf,
        /// Case-insensitive text to find in title or channel
        #[arg(long)]
        search: Option<String>,
        /// Channel to include (repeatable)
        #[arg(long)]
        channel: Vec<String>,
        /// Only shorts
        #[arg(long, conflicts_with = "no_shorts")]
        shorts: bool,
        /// Exclude shorts
        #[arg(long)]
        no_shorts: bool,
        /// Minimum duration in seconds
        #[arg(long)]
        min_duration: Option<u64>,
        /// Maximum duration in seconds
        #[arg(long)]
        max_duration: Option<u64>,
        /// Topic to include (repeatable; any match passes)
        #[arg(long)]
        topic: Vec<String>,
        /// Sort key (`views`, `duration`, `title`, `channel`)
        #[arg(long, default_value = "views")]
        sort: SortOption,
        /// Sort direction (`asc` or `desc`)
        #[arg(long, default_value = "desc")]
        direction: SortDirection,
        /// Maximum number of videos to print
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        tagging: TaggingArgs,
    },
    /// List the distinct channels of a dataset
    Channels {
        /// Dataset CSV
        #[arg(long)]
        input: PathBuf,
    },
}

#[allow(clippy::too_many_lines)]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = disc_clinic_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return disc_clinic_ingest::interactive::run(&multi).await;
    };

    match command {
        Commands::Expand {
            input,
            output_dir,
            query,
            target,
            page_size,
            delay_ms,
            api_key,
            records_json,
            offline,
            tagging,
        } => {
            let options = RunOptions {
                input,
                output_dir,
                taxonomy: tagging.taxonomy,
                records_json,
                config: ExpandConfig {
                    query,
                    target,
                    page_size,
                    delay_ms,
                    tagger: tagging.tagger,
                    clusters: tagging.clusters,
                },
            };

            let outcome = if offline {
                disc_clinic_ingest::run(&options, None, None).await?
            } else {
                let client = YouTubeClient::from_key_or_env(api_key.as_deref(), page_size)?;
                let progress = FetchBar::new(&multi, &options.config.query);
                disc_clinic_ingest::run(&options, Some(&client), Some(progress)).await?
            };

            print_report(&outcome.report, &outcome.artifacts);
        }
        Commands::Analyze {
            input,
            output_dir,
            records_json,
            tagging,
        } => {
            let options = RunOptions {
                input,
                output_dir,
                taxonomy: tagging.taxonomy,
                records_json,
                config: ExpandConfig {
                    tagger: tagging.tagger,
                    clusters: tagging.clusters,
                    ..ExpandConfig::default()
                },
            };

            let outcome = disc_clinic_ingest::run(&options, None, None).await?;
            print_report(&outcome.report, &outcome.artifacts);
        }
        Commands::Topics { taxonomy } => {
            let taxonomy = resolve_taxonomy(taxonomy.as_deref())?;
            print_taxonomy(&taxonomy);
        }
        Commands::List {
            input,
            search,
            channel,
            shorts,
            no_shorts,
            min_duration,
            max_duration,
            topic,
            sort,
            direction,
            limit,
            tagging,
        } => {
            let (_, records) = load_catalog(
                &input,
                tagging.taxonomy.as_deref(),
                tagging.tagger,
                tagging.clusters,
            )?;

            let filters = FilterOptions {
                search,
                channels: channel,
                shorts: match (shorts, no_shorts) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                min_duration,
                max_duration,
                topics: topic,
            };

            let mut matches = filter_videos(&records, &filters);
            sort_videos(&mut matches, sort, direction);
            if let Some(limit) = limit {
                matches.truncate(limit);
            }
            print_videos(&matches);
        }
        Commands::Channels { input } => {
            let (_, records) = load_catalog(&input, None, TaggerKind::Keyword, DEFAULT_CLUSTERS)?;
            print_channels(&extract_channels(&records));
        }
    }

    Ok(())
}
