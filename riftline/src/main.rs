mod config;
mod persistence;
mod staticdata;
mod sync;

use anyhow::Context;
use clap::{Parser, Subcommand};

use persistence::{Database, SqlStore};
use riot_client::{HttpRiotClient, MatchFilters};
use sync::Syncer;

#[derive(Parser)]
#[command(name = "riftline", about = "Incremental match-history sync into a local store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync one player's new matches into the store
    Sync {
        /// Summoner name to sync
        name: String,

        /// Maximum number of match summaries to fetch
        #[arg(long, default_value_t = sync::DEFAULT_MATCH_LIMIT)]
        limit: u32,

        /// Restrict to matches played on one champion id
        #[arg(long)]
        champion: Option<i64>,

        /// Restrict to one season id
        #[arg(long)]
        season: Option<i64>,

        /// Restrict to one game patch
        #[arg(long)]
        patch: Option<String>,

        /// Only matches starting at or after this unix timestamp (ms)
        #[arg(long)]
        begin_time: Option<i64>,

        /// Restrict to one queue id
        #[arg(long)]
        queue: Option<i64>,
    },
    /// Refresh the static reference tables (leaderboards, champions, queues)
    RefreshStatic,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing();

    let api_key = config::get_api_key().context("RIOT_API_KEY is not set")?;
    let region = config::get_region();
    let client = HttpRiotClient::new(&region, api_key)?;

    let db_path = config::get_db_path();
    tracing::info!("Using database at {}", db_path.display());
    let db = Database::open(&db_path).await?;
    let store = SqlStore::new(db.pool().clone());

    match cli.command {
        Command::Sync {
            name,
            limit,
            champion,
            season,
            patch,
            begin_time,
            queue,
        } => {
            let filters = MatchFilters {
                champion,
                season,
                patch,
                begin_time,
                queue,
            };
            let syncer = Syncer::new(client, store);
            let report = syncer.sync_player(&name, limit, &filters).await?;

            tracing::info!(
                candidates = report.candidates,
                already_loaded = report.already_loaded,
                ingested = report.ingested,
                failed = report.failed.len(),
                "sync finished"
            );
            for (game_id, reason) in &report.failed {
                tracing::warn!(
                    game_id = *game_id,
                    reason = %reason,
                    "match skipped this run"
                );
            }
        }
        Command::RefreshStatic => {
            staticdata::refresh_static_data(&client, &store).await?;
        }
    }

    Ok(())
}

/// Initialize tracing: stdout by default, a daily-rolling file when a log
/// directory is configured. The guard must stay alive for the process
/// lifetime so buffered log lines are flushed.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match config::get_log_dir() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "riftline.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}
