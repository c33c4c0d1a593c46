use std::fmt;
use std::sync::Arc;

use services::{Clock, GoalService, SessionService, StatsService};
use storage::goal_store::GoalStore;
use storage::kv::KvStore;
use storage::session_store::SessionStore;
use storage::sqlite::SqliteKvStore;
use study_core::model::SessionId;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw}")
            }
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- today                          # today's sessions + goal progress");
    eprintln!("  cargo run -p app -- log --subject <s> --minutes <m>");
    eprintln!("  cargo run -p app -- history");
    eprintln!("  cargo run -p app -- stats [--week <n>]             # weekly chart, 0 = this week");
    eprintln!("  cargo run -p app -- goal [--set <hours>]");
    eprintln!("  cargo run -p app -- delete --id <id>");
    eprintln!();
    eprintln!("Common flags:");
    eprintln!("  --db <sqlite_url>   (default sqlite:study.sqlite3)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_DB_URL");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Today,
    Log { subject: String, minutes: u32 },
    History,
    Stats { week_offset: u32 },
    Goal { set: Option<String> },
    Delete { id: i64 },
}

#[derive(Debug)]
struct Args {
    db_url: String,
    action: Action,
}

impl Args {
    #[allow(clippy::too_many_lines)]
    fn parse(mut argv: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("STUDY_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://study.sqlite3".into(), normalize_sqlite_url);

        let command = argv.next().unwrap_or_else(|| "today".into());
        let args = &mut argv;

        let mut subject: Option<String> = None;
        let mut minutes: Option<u32> = None;
        let mut week_offset: u32 = 0;
        let mut set_goal: Option<String> = None;
        let mut delete_id: Option<i64> = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--subject" => subject = Some(require_value(args, "--subject")?),
                "--minutes" => {
                    let value = require_value(args, "--minutes")?;
                    minutes = Some(value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--minutes",
                        raw: value.clone(),
                    })?);
                }
                "--week" => {
                    let value = require_value(args, "--week")?;
                    week_offset = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--week",
                        raw: value.clone(),
                    })?;
                }
                "--set" => set_goal = Some(require_value(args, "--set")?),
                "--id" => {
                    let value = require_value(args, "--id")?;
                    delete_id = Some(value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--id",
                        raw: value.clone(),
                    })?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let action = match command.as_str() {
            "today" => Action::Today,
            "log" => Action::Log {
                subject: subject.ok_or(ArgsError::MissingValue { flag: "--subject" })?,
                minutes: minutes.ok_or(ArgsError::MissingValue { flag: "--minutes" })?,
            },
            "history" => Action::History,
            "stats" => Action::Stats { week_offset },
            "goal" => Action::Goal { set: set_goal },
            "delete" => Action::Delete {
                id: delete_id.ok_or(ArgsError::MissingValue { flag: "--id" })?,
            },
            other => return Err(ArgsError::UnknownArg(other.to_owned())),
        };

        Ok(Self { db_url, action })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
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

struct TrackerApp {
    sessions: SessionService,
    stats: StatsService,
    goals: GoalService,
}

impl TrackerApp {
    fn new(clock: Clock, kv: Arc<dyn KvStore>) -> Self {
        let store = SessionStore::new(Arc::clone(&kv));
        Self {
            sessions: SessionService::new(clock, store.clone()),
            stats: StatsService::new(clock, store),
            goals: GoalService::new(GoalStore::new(kv)),
        }
    }
}

fn format_minutes(duration_secs: u32) -> String {
    format!("{} min", duration_secs / 60)
}

fn progress_bar(ratio: f64, width: usize) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = (ratio * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn week_label(week_offset: u32) -> String {
    match week_offset {
        0 => "This Week".to_string(),
        1 => "Last Week".to_string(),
        n => format!("{n} Weeks Ago"),
    }
}

async fn show_today(app: &TrackerApp) -> Result<(), Box<dyn std::error::Error>> {
    let overview = app.stats.overview().await?;
    let goal = app.goals.load().await?;
    let progress = goal.progress(overview.today_secs);

    #[allow(clippy::cast_precision_loss)]
    let hours_today = overview.today_secs as f64 / 3600.0;
    println!(
        "Today: {hours_today:.1} h of {:.1} h goal  {} {:.0}%",
        goal.hours(),
        progress_bar(progress, 20),
        progress * 100.0
    );

    let sessions = app.sessions.list_today().await?;
    if sessions.is_empty() {
        println!("No sessions yet today.");
        return Ok(());
    }
    println!();
    for session in sessions {
        println!(
            "  {}  {:<20} {:>8}  (id {})",
            session.recorded_at(),
            session.subject(),
            format_minutes(session.duration_secs()),
            session.id()
        );
    }
    Ok(())
}

async fn show_history(app: &TrackerApp) -> Result<(), Box<dyn std::error::Error>> {
    let sessions = app.sessions.list_all().await?;
    let overview = app.stats.overview().await?;
    println!(
        "{} sessions, {:.1} h total",
        overview.session_count, overview.total_hours
    );
    // Most recent first, matching the history screen.
    for session in sessions.iter().rev() {
        println!(
            "  {}  {}  {:<20} {:>8}  (id {})",
            session.date(),
            session.recorded_at(),
            session.subject(),
            format_minutes(session.duration_secs()),
            session.id()
        );
    }
    Ok(())
}

async fn show_stats(app: &TrackerApp, week_offset: u32) -> Result<(), Box<dyn std::error::Error>> {
    let overview = app.stats.overview().await?;
    println!(
        "Total: {:.1} h   Daily avg: {:.1} h   Sessions: {}",
        overview.total_hours, overview.average_daily_hours, overview.session_count
    );
    println!();
    println!("{}", week_label(week_offset));
    for bucket in app.stats.weekly_chart(week_offset).await? {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bar = "#".repeat((bucket.hours * 4.0).round() as usize);
        println!("  {}  {:>6.2} h  {bar}", bucket.label, bucket.hours);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    if argv.first().is_some_and(|first| first == "--help" || first == "-h") {
        print_usage();
        return Ok(());
    }

    let parsed = Args::parse(argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let kv = SqliteKvStore::connect(&parsed.db_url).await?;
    kv.migrate().await?;
    log::debug!("opened blob store at {}", parsed.db_url);

    let app = TrackerApp::new(Clock::default_clock(), Arc::new(kv));

    match parsed.action {
        Action::Today => show_today(&app).await?,
        Action::Log { subject, minutes } => {
            match app.sessions.record(&subject, minutes * 60).await? {
                Some(session) => println!(
                    "Recorded {} for {} (id {}).",
                    format_minutes(session.duration_secs()),
                    session.subject(),
                    session.id()
                ),
                None => println!("Nothing to record: duration was zero."),
            }
        }
        Action::History => show_history(&app).await?,
        Action::Stats { week_offset } => show_stats(&app, week_offset).await?,
        Action::Goal { set } => {
            if let Some(input) = set {
                let goal = app.goals.save_input(&input).await?;
                println!("Daily goal set to {:.1} h.", goal.hours());
            } else {
                let goal = app.goals.load().await?;
                println!("Daily goal: {:.1} h.", goal.hours());
            }
        }
        Action::Delete { id } => {
            app.sessions.delete(SessionId::new(id)).await?;
            println!("Deleted session {id} (if it existed).");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
