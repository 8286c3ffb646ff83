use std::fmt;

use chrono::{Duration, NaiveDate, Utc};
use recite_core::model::{PoemDraft, Session};
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    sessions: u32,
    today: Option<NaiveDate>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSessions { raw: String },
    InvalidDbUrl { raw: String },
    InvalidToday { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSessions { raw } => write!(f, "invalid --sessions value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidToday { raw } => {
                write!(f, "invalid --today value (expected YYYY-MM-DD): {raw}")
            }
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("POEM_DB_URL").unwrap_or_else(|_| "sqlite:poems.sqlite3?mode=rwc".into());
        let mut sessions = std::env::var("POEM_SEED_SESSIONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(3);
        let mut today = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--sessions" => {
                    let value = require_value(&mut args, "--sessions")?;
                    sessions = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidSessions { raw: value.clone() })?;
                }
                "--today" => {
                    let value = require_value(&mut args, "--today")?;
                    let parsed = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                        .map_err(|_| ArgsError::InvalidToday { raw: value.clone() })?;
                    today = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            sessions,
            today,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <url>           SQLite URL or .json path (default: sqlite:poems.sqlite3?mode=rwc)");
    eprintln!("  --sessions <n>       Practice sessions to append per poem (default: 3)");
    eprintln!("  --today <date>       Date of the most recent session (YYYY-MM-DD)");
    eprintln!("  -h, --help           Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  POEM_DB_URL, POEM_SEED_SESSIONS");
}

fn sample_poems() -> Vec<PoemDraft> {
    let hope = [
        "\"Hope\" is the thing with feathers -",
        "That perches in the soul -",
        "And sings the tune without the words -",
        "And never stops - at all -",
        "",
        "And sweetest - in the Gale - is heard -",
        "And sore must be the storm -",
        "That could abash the little Bird",
        "That kept so many warm -",
        "",
        "I've heard it in the chillest land -",
        "And on the strangest Sea -",
        "Yet - never - in Extremity,",
        "It asked a crumb - of me.",
    ];
    let dust = [
        "The way a crow",
        "Shook down on me",
        "The dust of snow",
        "From a hemlock tree",
        "",
        "Has given my heart",
        "A change of mood",
        "And saved some part",
        "Of a day I had rued.",
    ];
    vec![
        PoemDraft::new(
            "\"Hope\" is the thing with feathers",
            "Emily Dickinson",
            hope.iter().map(ToString::to_string).collect(),
        ),
        PoemDraft::new(
            "Dust of Snow",
            "Robert Frost",
            dust.iter().map(ToString::to_string).collect(),
        ),
    ]
}

async fn open_storage(db_url: &str) -> Result<Storage, Box<dyn std::error::Error>> {
    if db_url.ends_with(".json") {
        return Ok(Storage::json(db_url));
    }
    Ok(Storage::sqlite(db_url).await?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = open_storage(&args.db_url).await?;
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());

    let mut seeded = 0_u32;
    for draft in sample_poems() {
        let poem = storage.poems.insert_poem(draft.validate()?).await?;
        let total = u32::try_from(poem.content_line_count())?;

        // Oldest first, improving by one line each time.
        for i in (0..args.sessions).rev() {
            let date = today - Duration::days(i64::from(i) * 2);
            let correct = total.saturating_sub(i + 1);
            let session = Session::new(date, correct, total)?;
            storage.poems.append_session(poem.id(), &session).await?;
        }
        seeded += 1;
    }

    println!(
        "Seeded {} poems with {} sessions each into {}",
        seeded, args.sessions, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
