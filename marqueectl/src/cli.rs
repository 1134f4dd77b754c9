use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use marquee_model::{ListType, PersonId, SourceId};

#[derive(Parser, Debug)]
#[command(name = "marqueectl")]
#[command(
    about = "Mirror provider movie metadata into the local Marquee catalog"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to marquee.toml (overrides MARQUEE_CONFIG and default locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to a .env file loaded before reading the environment
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Run against a throwaway in-memory catalog instead of PostgreSQL
    #[arg(long, global = true, default_value_t = false)]
    pub in_memory: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Refresh one movie's details, cast, genres and videos
    Movie {
        /// Local source-system id of the movie
        source_id: SourceId,
    },
    /// Refresh details for every provider-linked movie, resumable by id
    DetailsBulk(BatchArgs),
    /// Fill in missing biography and profile data for known people
    People {
        /// Maximum number of people to enrich
        /// (defaults to sync.people_batch_max)
        #[arg(long)]
        max: Option<usize>,
    },
    /// Enrich a single person by provider id
    Person {
        /// Provider id of the person
        person_id: PersonId,
    },
    /// Import ranked list pages (popular, top_rated, now_playing, upcoming)
    List {
        list_type: ListType,
        /// Number of pages to import (defaults to sync.list_pages)
        #[arg(long)]
        pages: Option<u32>,
    },
    /// Import movies known only through the mapping table
    Backfill {
        /// Maximum number of movies to import
        #[arg(long, default_value_t = 1000)]
        max: usize,
        /// Movies per transaction (defaults to sync.backfill_batch_size)
        #[arg(long, default_value_t = 0)]
        batch_size: usize,
    },
    /// Refresh the genre reference table
    Genres,
    /// Copy curated mapping fields onto movies, resumable by id
    FromMappings(BatchArgs),
    /// Fetch one page of an account movie list and print it as JSON
    Account {
        #[arg(long)]
        account_id: i64,
        /// favorite, watchlist or rated
        #[arg(long)]
        list: String,
        #[arg(long, env = "TMDB_SESSION_ID", hide_env_values = true)]
        session_id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Apply catalog schema migrations and exit
    Migrate,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct BatchArgs {
    /// Resume after this source-system id
    #[arg(long)]
    pub start_after: Option<SourceId>,
    /// Maximum number of movies to process
    #[arg(long, default_value_t = 1000)]
    pub max: usize,
    /// Items per checkpoint or commit (defaults to sync.bulk_batch_size)
    #[arg(long, default_value_t = 0)]
    pub batch_size: usize,
}
