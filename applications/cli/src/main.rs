/// Earshot - resumable listening sessions from the command line
use clap::{Parser, Subcommand};
use earshot_catalog::CatalogClient;
use earshot_cli::{listen, EarshotConfig, ListenOptions};
use earshot_core::{format_time, BookmarkId, CatalogFilter, StorageAdapter};
use earshot_playback::{BookmarkCapacity, BookmarkStore, ProgressStore, Speed};
use earshot_storage::FileStorage;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "earshot")]
#[command(about = "Resumable, bookmarkable audio sessions", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./earshot.toml when present)
    #[arg(short, long, global = true, env = "EARSHOT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog with saved progress
    Tracks,
    /// Run a simulated listening session
    Listen {
        /// Track slug or id; the full catalog when omitted
        #[arg(short, long)]
        track: Option<String>,
        /// Seconds to listen
        #[arg(short, long, default_value_t = 30.0)]
        seconds: f64,
        /// Seek to this position before playing
        #[arg(long)]
        seek: Option<f64>,
        /// Playback speed (1, 1.25, 1.5 or 2)
        #[arg(long)]
        speed: Option<f64>,
        /// Save a bookmark when done, optionally with a label
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        bookmark: Option<String>,
        /// Length of every simulated track in seconds
        #[arg(long, default_value_t = 600.0)]
        track_length: f64,
        /// Run in real time instead of as fast as possible
        #[arg(long)]
        realtime: bool,
    },
    /// Show or clear saved progress
    Progress {
        /// Clear progress for one track
        #[arg(long, conflicts_with = "clear_all")]
        clear: Option<String>,
        /// Clear all saved progress
        #[arg(long)]
        clear_all: bool,
    },
    /// Manage bookmarks
    Bookmarks {
        /// Bookmark scope: "all" or a single track key
        #[arg(long, default_value = "all")]
        scope: String,
        #[command(subcommand)]
        action: Option<BookmarkAction>,
    },
}

#[derive(Subcommand)]
enum BookmarkAction {
    /// List bookmarks (default)
    List,
    /// Delete one bookmark by id
    Delete { id: String },
    /// Delete every bookmark in the scope
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "earshot=info,earshot_cli=info,earshot_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = EarshotConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let storage = Arc::new(FileStorage::open(&config.storage.path)?);
    tracing::debug!(path = %storage.path().display(), "Opened state file");
    let storage: Arc<dyn StorageAdapter> = storage;

    match cli.command {
        Commands::Tracks => list_tracks(&config, storage).await?,
        Commands::Listen {
            track,
            seconds,
            seek,
            speed,
            bookmark,
            track_length,
            realtime,
        } => {
            let speed = speed
                .map(Speed::try_from)
                .transpose()
                .map_err(anyhow::Error::msg)?;
            let options = ListenOptions {
                track,
                seconds,
                seek,
                speed,
                bookmark,
                track_length,
                realtime,
                ..ListenOptions::default()
            };
            run_listen(&config, storage, &options).await?;
        }
        Commands::Progress { clear, clear_all } => {
            show_progress(&config, storage, clear.as_deref(), clear_all);
        }
        Commands::Bookmarks { scope, action } => {
            manage_bookmarks(&config, storage, &scope, action.unwrap_or(BookmarkAction::List))?;
        }
    }

    Ok(())
}

async fn list_tracks(config: &EarshotConfig, storage: Arc<dyn StorageAdapter>) -> anyhow::Result<()> {
    let client = CatalogClient::new(config.catalog.clone())?;
    let tracks = client.fetch(&CatalogFilter::All).await?;
    let progress = ProgressStore::new(storage, config.playback.end_window_secs);

    if tracks.is_empty() {
        println!("No tracks available");
        return Ok(());
    }

    for (index, track) in tracks.iter().enumerate() {
        let saved = progress
            .load(track.key())
            .map(|t| format!("resume at {}", format_time(t)))
            .unwrap_or_default();
        let availability = if track.is_playable() { "" } else { "(unavailable)" };
        println!(
            "{:>3}  {:<24} {:<32} {} {}",
            index + 1,
            track.key(),
            track.title,
            availability,
            saved
        );
    }

    Ok(())
}

async fn run_listen(
    config: &EarshotConfig,
    storage: Arc<dyn StorageAdapter>,
    options: &ListenOptions,
) -> anyhow::Result<()> {
    let client = CatalogClient::new(config.catalog.clone())?;
    let summary = listen(storage, &client, &config.playback, options).await?;

    let position = format_time(summary.position);
    let duration = summary
        .duration
        .map_or_else(|| "?".to_string(), format_time);
    println!(
        "{} [{}] {} / {} ({:?})",
        summary.title.as_deref().unwrap_or("-"),
        summary.track_key.as_deref().unwrap_or("-"),
        position,
        duration,
        summary.status
    );
    if summary.tracks_started > 1 {
        println!("Tracks started: {}", summary.tracks_started);
    }
    if let Some(bookmark) = &summary.bookmark {
        println!("Bookmark saved: {} ({})", bookmark.label, bookmark.id);
    }
    if let Some(error) = &summary.error {
        println!("Error: {error}");
    }

    Ok(())
}

fn show_progress(
    config: &EarshotConfig,
    storage: Arc<dyn StorageAdapter>,
    clear: Option<&str>,
    clear_all: bool,
) {
    let progress = ProgressStore::new(storage, config.playback.end_window_secs);

    if let Some(key) = clear {
        if progress.clear(key) {
            println!("Cleared progress for {key}");
        }
        return;
    }

    let records = progress.records();
    if clear_all {
        let cleared = records.iter().filter(|r| progress.clear(&r.track_key)).count();
        println!("Cleared {cleared} progress record(s)");
        return;
    }

    if records.is_empty() {
        println!("No saved progress");
    }
    for record in records {
        println!("{:<24} {}", record.track_key, format_time(record.time_seconds));
    }
}

fn manage_bookmarks(
    config: &EarshotConfig,
    storage: Arc<dyn StorageAdapter>,
    scope: &str,
    action: BookmarkAction,
) -> anyhow::Result<()> {
    let filter = CatalogFilter::from_key(Some(scope).filter(|s| *s != "all"));
    let capacity = config
        .playback
        .bookmark_capacity
        .unwrap_or_else(|| BookmarkCapacity::for_filter(&filter));
    let mut store = BookmarkStore::open(storage, filter.scope_name(), capacity);

    match action {
        BookmarkAction::List => {
            if store.is_empty() {
                println!("No bookmarks in scope {}", store.scope());
            }
            for bookmark in store.all() {
                println!(
                    "{}  {:<24} {:>8}  {}",
                    bookmark.id,
                    bookmark.track_key,
                    format_time(bookmark.time_seconds),
                    bookmark.label
                );
            }
        }
        BookmarkAction::Delete { id } => {
            if store.delete(&BookmarkId::new(id.clone()))? {
                println!("Deleted bookmark {id}");
            } else {
                println!("No bookmark {id} in scope {}", store.scope());
            }
        }
        BookmarkAction::Clear => {
            store.clear()?;
            println!("Cleared bookmarks in scope {}", store.scope());
        }
    }

    Ok(())
}
