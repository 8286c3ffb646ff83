use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock, PoemFetchService, PoemService, PracticeService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn poem_service(&self) -> Arc<PoemService> {
        self.services.poems()
    }

    fn practice_service(&self) -> Arc<PracticeService> {
        self.services.practice()
    }

    fn fetch_service(&self) -> Arc<PoemFetchService> {
        self.services.fetch()
    }
}

/// Where the poem collection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StorageTarget {
    Sqlite(String),
    Json(std::path::PathBuf),
}

impl StorageTarget {
    fn describe(&self) -> String {
        match self {
            StorageTarget::Sqlite(url) => url.clone(),
            StorageTarget::Json(path) => path.display().to_string(),
        }
    }
}

struct Args {
    target: StorageTarget,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--db <sqlite_url|file.json>]");
    eprintln!("  cargo run -p app -- list [--db <sqlite_url|file.json>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://poems.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  POEM_DB_URL");
    eprintln!("  POEM_AI_API_KEY, POEM_AI_BASE_URL, POEM_AI_MODEL  (poem lookup)");
    eprintln!("  RUST_LOG  (default: app=info,services=info,storage=info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    List,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut raw_db =
            std::env::var("POEM_DB_URL").unwrap_or_else(|_| "sqlite://poems.sqlite3".into());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    raw_db = value;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            target: storage_target(raw_db),
        })
    }
}

fn storage_target(raw: String) -> StorageTarget {
    let trimmed = raw.trim();
    if trimmed.ends_with(".json") {
        return StorageTarget::Json(std::path::PathBuf::from(trimmed));
    }
    StorageTarget::Sqlite(normalize_sqlite_url(trimmed))
}

fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_string();
    }

    let path_str = raw.strip_prefix("sqlite:").unwrap_or(raw);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app=info,services=info,storage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn open_services(
    target: &StorageTarget,
    clock: Clock,
) -> Result<AppServices, Box<dyn std::error::Error>> {
    match target {
        StorageTarget::Sqlite(url) => {
            // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
            prepare_sqlite_file(url)?;
            Ok(AppServices::new_sqlite(url, clock).await?)
        }
        StorageTarget::Json(path) => Ok(AppServices::new_json(path.clone(), clock)),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();
    tracing::info!(storage = %parsed.target.describe(), ?cmd, "starting");

    let services = open_services(&parsed.target, Clock::default_clock()).await?;

    match cmd {
        Command::Ui => {
            if !services.fetch().enabled() {
                tracing::warn!("POEM_AI_API_KEY is not set; poem lookup is disabled");
            }
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            // Explicitly disable it so the app doesn't behave like a modal window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Poem Memoriser")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::List => {
            let poems = services.poems().list_poems().await?;
            if poems.is_empty() {
                println!("No poems yet.");
            }
            for poem in &poems {
                let latest = poem.latest_session().map_or_else(
                    || "not practised".to_string(),
                    |s| format!("{}/{} ({}%) on {}", s.correct(), s.total(), s.percentage(), s.date()),
                );
                println!(
                    "{}  {} by {}  [{} lines, {} sessions, latest {}]",
                    poem.id(),
                    poem.title(),
                    poem.author(),
                    poem.content_line_count(),
                    poem.sessions().len(),
                    latest
                );
            }
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_paths_select_the_json_store() {
        assert_eq!(
            storage_target("backup/poems.json".into()),
            StorageTarget::Json("backup/poems.json".into())
        );
    }

    #[test]
    fn sqlite_urls_are_made_absolute() {
        let StorageTarget::Sqlite(url) = storage_target("sqlite:poems.sqlite3".into()) else {
            panic!("expected sqlite target");
        };
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("poems.sqlite3"), "{url}");
        assert_eq!(
            storage_target("sqlite::memory:".into()),
            StorageTarget::Sqlite("sqlite::memory:".into())
        );
    }

    #[test]
    fn prepare_rejects_non_sqlite_urls() {
        assert!(prepare_sqlite_file("postgres://x").is_err());
    }
}
