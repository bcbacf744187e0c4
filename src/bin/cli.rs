//! hn-comments CLI
//!
//! Fetches Hacker News threads and prints them as ordered comment trees.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hn_comments::{
    error::{AppError, Result},
    models::{CommentNode, Config, SearchParams, SearchType, StoryCategory, Tag},
    pipeline::PostPipeline,
    services::{AlgoliaClient, HackerNewsClient},
    utils::http,
};

/// hn-comments - Hacker News thread reader
#[derive(Parser, Debug)]
#[command(
    name = "hn-comments",
    version,
    about = "Ordered Hacker News comment trees"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a story or comment with its full reply tree
    Post {
        id: u64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search stories
    Search {
        query: String,

        /// Extra tag filter (story, comment, show_hn, author_<name>, ...)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Rank by relevance instead of date
        #[arg(long)]
        best: bool,
    },

    /// List a front-page category
    Top {
        /// top, new, best, ask or show
        #[arg(long, default_value = "top")]
        category: String,

        #[arg(long, default_value_t = 30)]
        limit: usize,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_tree(nodes: &[CommentNode], depth: usize) {
    for node in nodes {
        let text = node.text.as_deref().unwrap_or("[deleted]");
        println!("{}{}: {}", "  ".repeat(depth), node.author, text);
        print_tree(&node.children, depth + 1);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Logging level comes from the config, so load it before the logger exists.
    let loaded = Config::load(&cli.config);
    let level = loaded
        .as_ref()
        .map_or("info", |config| config.logging.level.as_str())
        .to_string();
    init_logging(cli.verbose, &level);
    let config = Config::or_default(&cli.config, loaded);

    match cli.command {
        Command::Post { id, json } => {
            let pipeline = PostPipeline::from_config(&config)?;
            let post = pipeline.fetch_post(id).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&post)?);
            } else {
                match &post.title {
                    Some(title) => println!("{} ({})", title, post.linked_url()),
                    None => println!("Comment by {} ({})", post.author, post.post_url()),
                }
                println!("{} comments", post.comment_count());
                println!();
                print_tree(&post.children, 0);
            }
        }

        Command::Search { query, tags, best } => {
            let mut parsed = vec![Tag::Story];
            for raw in &tags {
                let tag = Tag::parse(raw)
                    .ok_or_else(|| AppError::validation(format!("Unknown tag '{raw}'")))?;
                parsed.push(tag);
            }
            let search_type = if best {
                SearchType::Best
            } else {
                SearchType::Recent
            };
            let params = SearchParams::with_tags(parsed)
                .query(query)
                .search_type(search_type)
                .hits_per_page(config.api.hits_per_page);

            let client = http::create_async_client(&config.client)?;
            let response = AlgoliaClient::new(client, &config.api)?
                .search(&params)
                .await?;

            log::info!("{} hits", response.nb_hits);
            for story in response.stories() {
                println!(
                    "{:>9}  {:>5} pts  {}",
                    story.id,
                    story.points.unwrap_or(0),
                    story.title.as_deref().unwrap_or("(untitled)")
                );
            }
        }

        Command::Top { category, limit } => {
            let category = StoryCategory::from_name(&category).ok_or_else(|| {
                AppError::validation(format!("Unknown category '{category}'"))
            })?;

            let client = http::create_async_client(&config.client)?;
            let ids = HackerNewsClient::new(client, &config.api)?
                .fetch_story_ids(category)
                .await?;

            log::info!("{}: {} stories", category.label(), ids.len());
            for id in ids.into_iter().take(limit) {
                println!("{id}");
            }
        }

        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Config OK");
        }
    }

    Ok(())
}
