use std::fmt;
use std::path::PathBuf;

use course_core::model::{CourseCatalog, ExamCatalog, ItemKey};
use course_core::progression::ItemStatus;
use services::{AppServices, ItemAction, ServicesConfig, load_content};

const SAMPLE_CATALOG: &str = include_str!("../data/course.json");
const SAMPLE_EXAMS: &str = include_str!("../data/exams.json");

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingPosition { command: &'static str },
    UnknownArg(String),
    InvalidIndex { raw: String },
    InvalidAnswers { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingPosition { command } => {
                write!(f, "{command} requires <section> <item>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidIndex { raw } => write!(f, "invalid index: {raw}"),
            ArgsError::InvalidAnswers { raw } => write!(f, "invalid --answers value: {raw}"),
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
    eprintln!("  cargo run -p app -- status   [options]");
    eprintln!("  cargo run -p app -- open     <section> <item> [options]");
    eprintln!("  cargo run -p app -- complete <section> <item> [options]");
    eprintln!("  cargo run -p app -- exam     <section> <item> --answers <i,j,...> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>      (default sqlite://course.sqlite3)");
    eprintln!("  --catalog <json_file>  (default: bundled sample course)");
    eprintln!("  --exams <json_file>    (default: bundled sample exams)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COURSE_DB_URL, COURSE_PROGRESS_KEY, COURSE_TICK_MILLIS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Status,
    Open,
    Complete,
    Exam,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "status" => Some(Self::Status),
            "open" => Some(Self::Open),
            "complete" => Some(Self::Complete),
            "exam" => Some(Self::Exam),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Open => "open",
            Self::Complete => "complete",
            Self::Exam => "exam",
        }
    }

    fn takes_position(self) -> bool {
        !matches!(self, Self::Status)
    }
}

struct Args {
    config: ServicesConfig,
    catalog: Option<PathBuf>,
    exams: Option<PathBuf>,
    position: Option<ItemKey>,
    answers: Vec<usize>,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut config = ServicesConfig::from_env();
        config.database_url = normalize_sqlite_url(config.database_url);
        let mut catalog = None;
        let mut exams = None;
        let mut answers = Vec::new();
        let mut indices = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    config.database_url = normalize_sqlite_url(value);
                }
                "--catalog" => catalog = Some(PathBuf::from(require_value(args, "--catalog")?)),
                "--exams" => exams = Some(PathBuf::from(require_value(args, "--exams")?)),
                "--answers" => answers = parse_answers(&require_value(args, "--answers")?)?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if cmd.takes_position() && !arg.starts_with("--") && indices.len() < 2 => {
                    let index = arg
                        .parse::<usize>()
                        .map_err(|_| ArgsError::InvalidIndex { raw: arg.clone() })?;
                    indices.push(index);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let position = match (cmd.takes_position(), indices.as_slice()) {
            (false, _) => None,
            (true, [section, item]) => Some(ItemKey::new(*section, *item)),
            (true, _) => {
                return Err(ArgsError::MissingPosition {
                    command: cmd.name(),
                });
            }
        };

        Ok(Self {
            config,
            catalog,
            exams,
            position,
            answers,
        })
    }
}

fn parse_answers(raw: &str) -> Result<Vec<usize>, ArgsError> {
    raw.split(',')
        .map(|part| part.trim().parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|_| ArgsError::InvalidAnswers {
            raw: raw.to_string(),
        })
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
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn load_datasets(args: &Args) -> Result<(CourseCatalog, ExamCatalog), Box<dyn std::error::Error>> {
    let catalog_json = match &args.catalog {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE_CATALOG.to_string(),
    };
    let exams_json = match &args.exams {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE_EXAMS.to_string(),
    };
    Ok(load_content(&catalog_json, &exams_json)?)
}

async fn print_status(app: &AppServices) {
    let progress = app.progress();
    let catalog = progress.catalog();
    for (s, section) in catalog.sections().iter().enumerate() {
        println!("{s}. {}", section.title);
        for (i, item) in section.items.iter().enumerate() {
            let marker = match progress.status(ItemKey::new(s, i)).await {
                ItemStatus::Completed => "[x]",
                ItemStatus::Unlocked => "[ ]",
                ItemStatus::Locked => "[-]",
            };
            println!("   {marker} {s}.{i} {}", item.title);
        }
    }
    let counts = progress.counts().await;
    let completed = progress.snapshot().await.completed_count();
    println!(
        "{}/{} unlocked ({}%), {completed} completed",
        counts.unlocked,
        counts.total,
        counts.percentage()
    );
}

async fn take_exam(
    app: &AppServices,
    key: ItemKey,
    answers: &[usize],
) -> Result<(), Box<dyn std::error::Error>> {
    let progress = app.progress();
    let exam_id = match progress.open_item(key).await {
        ItemAction::OpenExam { exam_id } => exam_id,
        ItemAction::Locked => {
            println!("{key} is locked");
            return Ok(());
        }
        other => {
            println!("{key} is not an exam ({other:?})");
            return Ok(());
        }
    };

    let handle = app.exams().open(key, &exam_id, None)?;
    for (index, option) in answers.iter().enumerate() {
        handle.go_to_question(index)?;
        handle.select_answer(*option)?;
    }
    let result = handle.submit()?;
    println!(
        "{exam_id}: {}/{} correct, score {}%",
        result.correct, result.total, result.score
    );

    if result.passed {
        progress.finish_exam(&handle).await?;
        println!("passed, {key} completed");
    } else {
        println!("not passed, retry to continue");
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let (cmd, rest) = match argv.split_first() {
        None => (Command::Status, &argv[..]),
        Some((first, _)) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some((first, _)) if first.starts_with("--") => (Command::Status, &argv[..]),
        Some((first, rest)) => {
            let cmd = Command::from_arg(first).ok_or_else(|| {
                eprintln!("unknown subcommand: {first}");
                print_usage();
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
            })?;
            (cmd, rest)
        }
    };

    let mut iter = rest.iter().cloned();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let (catalog, exams) = load_datasets(&parsed)?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.config.database_url)?;
    let app = AppServices::new_sqlite(&parsed.config, catalog, exams).await?;
    log::debug!("using {}", parsed.config.database_url);

    match (cmd, parsed.position) {
        (Command::Status, _) => print_status(&app).await,
        (Command::Open, Some(key)) => match app.progress().open_item(key).await {
            ItemAction::Locked => println!("{key} is locked"),
            ItemAction::Missing => println!("{key} does not exist"),
            ItemAction::PlayVideo => {
                println!("playing {key}; run `complete` once it has been watched");
            }
            ItemAction::Document { source, .. } => println!("opened {source}"),
            ItemAction::OpenExam { exam_id } => {
                println!("{key} is exam {exam_id}; run `exam` with --answers");
            }
        },
        (Command::Complete, Some(key)) => {
            if app.progress().is_locked(key).await {
                println!("{key} is locked");
            } else {
                app.progress().complete_item(key).await;
                print_status(&app).await;
            }
        }
        (Command::Exam, Some(key)) => take_exam(&app, key, &parsed.answers).await?,
        (_, None) => print_usage(),
    }
    Ok(())
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
    env_logger::init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
