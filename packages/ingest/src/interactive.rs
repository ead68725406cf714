#![allow(clippy::module_name_repetitions)]

//! Interactive menu for the dataset tool.
//!
//! Provides a menu-driven interface using `dialoguer` for running the
//! pipeline and catalog queries without memorizing CLI flags.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, MultiSelect, Select};
use disc_clinic_cli_utils::{FetchBar, MultiProgress};
use disc_clinic_ingest_models::{ExpandConfig, TaggerKind};
use disc_clinic_source::youtube::YouTubeClient;
use disc_clinic_topic::registry::default_taxonomy;

use crate::display::{print_channels, print_report, print_taxonomy, print_videos};
use crate::query::{FilterOptions, SortDirection, SortOption, extract_channels, filter_videos};
use crate::{RunOptions, load_catalog};

/// Top-level actions available in the interactive menu.
enum Action {
    Expand,
    Analyze,
    ListVideos,
    ListChannels,
    ShowTopics,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Expand,
        Self::Analyze,
        Self::ListVideos,
        Self::ListChannels,
        Self::ShowTopics,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Expand => "Expand dataset from YouTube",
            Self::Analyze => "Analyze base dataset only",
            Self::ListVideos => "Browse videos",
            Self::ListChannels => "List channels",
            Self::ShowTopics => "Show topic taxonomy",
        }
    }
}

/// Runs the interactive menu, prompting the user to select and configure
/// one operation.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected operation fails.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Expand => expand(multi).await?,
        Action::Analyze => analyze().await?,
        Action::ListVideos => list_videos()?,
        Action::ListChannels => {
            let input = prompt_path("Dataset CSV")?;
            let (_, records) = load_catalog(&input, None, TaggerKind::Keyword, 0)?;
            print_channels(&extract_channels(&records));
        }
        Action::ShowTopics => print_taxonomy(&default_taxonomy()),
    }

    Ok(())
}

/// Prompts for fetch settings and runs the full pipeline.
async fn expand(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let input = prompt_path("Base dataset CSV")?;
    let output_dir = prompt_output_dir()?;

    let defaults = ExpandConfig::default();
    let query: String = Input::new()
        .with_prompt("Search query")
        .default(defaults.query.clone())
        .interact_text()?;
    let target = prompt_optional_u64("Target dataset size (empty for 500)")?
        .map_or(defaults.target, |t| usize::try_from(t).unwrap_or(usize::MAX));
    let tagger = prompt_tagger()?;

    let api_key: String = Input::new()
        .with_prompt("YouTube API key (empty to use YOUTUBE_API_KEY)")
        .allow_empty(true)
        .interact_text()?;
    let api_key = Some(api_key.trim()).filter(|key| !key.is_empty());

    let records_json = Confirm::new()
        .with_prompt("Also write the records JSON export?")
        .default(false)
        .interact()?;

    let options = RunOptions {
        input,
        output_dir,
        taxonomy: None,
        records_json,
        config: ExpandConfig {
            query,
            target,
            tagger,
            ..defaults
        },
    };

    let client = YouTubeClient::from_key_or_env(api_key, options.config.page_size)?;
    let progress = FetchBar::new(multi, &options.config.query);
    let outcome = crate::run(&options, Some(&client), Some(progress)).await?;
    print_report(&outcome.report, &outcome.artifacts);

    Ok(())
}

/// Prompts for paths and tags the base dataset without fetching.
async fn analyze() -> Result<(), Box<dyn std::error::Error>> {
    let input = prompt_path("Base dataset CSV")?;
    let output_dir = prompt_output_dir()?;
    let tagger = prompt_tagger()?;

    let options = RunOptions {
        input,
        output_dir,
        taxonomy: None,
        records_json: false,
        config: ExpandConfig {
            tagger,
            ..ExpandConfig::default()
        },
    };

    let outcome = crate::run(&options, None, None).await?;
    print_report(&outcome.report, &outcome.artifacts);

    Ok(())
}

/// Prompts for filters and a sort order, then prints matching videos.
fn list_videos() -> Result<(), Box<dyn std::error::Error>> {
    let input = prompt_path("Dataset CSV")?;
    let (_, records) = load_catalog(&input, None, TaggerKind::Keyword, 0)?;

    let search: String = Input::new()
        .with_prompt("Search text (empty for none)")
        .allow_empty(true)
        .interact_text()?;

    let taxonomy = default_taxonomy();
    let topic_names = taxonomy.names();
    let selected_topics = MultiSelect::new()
        .with_prompt("Topics (space=toggle, enter=confirm, none for all)")
        .items(&topic_names)
        .max_length(20)
        .interact()?;

    let shorts_choices = &["Include shorts", "Shorts only", "Exclude shorts"];
    let shorts = match Select::new()
        .with_prompt("Shorts")
        .items(shorts_choices)
        .default(0)
        .interact()?
    {
        1 => Some(true),
        2 => Some(false),
        _ => None,
    };

    let sort_choices = [
        SortOption::Views,
        SortOption::Duration,
        SortOption::Title,
        SortOption::Channel,
    ];
    let sort_labels: Vec<String> = sort_choices.iter().map(ToString::to_string).collect();
    let sort = sort_choices[Select::new()
        .with_prompt("Sort by")
        .items(&sort_labels)
        .default(0)
        .interact()?];

    let direction = if Confirm::new()
        .with_prompt("Largest first?")
        .default(true)
        .interact()?
    {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };

    let filters = FilterOptions {
        search: Some(search.trim().to_string()).filter(|s| !s.is_empty()),
        shorts,
        topics: selected_topics
            .iter()
            .map(|&i| topic_names[i].to_string())
            .collect(),
        ..FilterOptions::default()
    };

    let mut matches = filter_videos(&records, &filters);
    crate::query::sort_videos(&mut matches, sort, direction);
    print_videos(&matches);

    Ok(())
}

fn prompt_path(prompt: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let input: String = Input::new().with_prompt(prompt).interact_text()?;
    let path = PathBuf::from(input.trim());
    if !path.is_file() {
        return Err(format!("Not a file: {}", path.display()).into());
    }
    Ok(path)
}

fn prompt_output_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir: String = Input::new()
        .with_prompt("Output directory")
        .default(".".to_string())
        .interact_text()?;
    Ok(PathBuf::from(dir.trim()))
}

fn prompt_tagger() -> Result<TaggerKind, Box<dyn std::error::Error>> {
    let choices = [TaggerKind::Keyword, TaggerKind::Cluster];
    let labels: Vec<String> = choices.iter().map(ToString::to_string).collect();
    let idx = Select::new()
        .with_prompt("Tagger")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(choices[idx])
}

/// Prompts the user for an optional `u64` value. Returns `None` if the
/// input is empty.
fn prompt_optional_u64(prompt: &str) -> Result<Option<u64>, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    if input.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.trim().parse()?))
    }
}
