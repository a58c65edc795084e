use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use std::{path::PathBuf, process::ExitCode};
use termquiz::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    console::{Console, TerminalConsole},
    dataset::Dataset,
    runner, session,
    session::SessionOptions,
    stats::Direction,
    store::{FileSessionStore, SessionStore},
    QuizError,
};
use tracing::debug;

/// flashcard quiz runner that remembers what you missed
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Quizzes you on a two-column CSV dataset, keeps per-item correct/incorrect counts across runs, and on resume asks the items you missed most first."
)]
pub struct Cli {
    /// path to the two-column CSV dataset
    #[clap(short = 'd', long)]
    data: Option<PathBuf>,

    /// number of questions to ask (clamped to the dataset size)
    #[clap(short = 'n', long)]
    num_questions: Option<usize>,

    /// show the second column and expect the first
    #[clap(short = 'r', long, conflicts_with = "forward")]
    reverse: bool,

    /// show the first column and expect the second, without asking
    #[clap(long)]
    forward: bool,

    /// resume the stored session without asking
    #[clap(long, conflicts_with = "fresh")]
    resume: bool,

    /// ignore the stored session without asking
    #[clap(long)]
    fresh: bool,

    /// if the stored session no longer matches the dataset, delete it and start over
    #[clap(long)]
    discard_stale: bool,

    /// zero all stored statistics before this run
    #[clap(long)]
    reset: bool,

    /// where the session is stored (default: ~/.local/state/termquiz/session.json)
    #[clap(long)]
    store: Option<PathBuf>,

    /// seed for question selection, for reproducible runs
    #[clap(long)]
    seed: Option<u64>,

    /// log debug output to stderr
    #[clap(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    /// only log errors
    #[clap(long)]
    quiet: bool,

    /// write the effective data path, question count and store path to the config file
    #[clap(long)]
    save_config: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("warning: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<(), String> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("TERMQUIZ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| format!("failed to initialize tracing subscriber: {error}"))
}

fn run(cli: Cli) -> Result<(), QuizError> {
    let config_store = FileConfigStore::new();
    let config = config_store.load();

    let data_path = cli.data.clone().unwrap_or_else(|| config.data_path.clone());
    let store_path = cli
        .store
        .clone()
        .or_else(|| config.store_path.clone())
        .unwrap_or_else(AppDirs::session_path);
    debug!(data = %data_path.display(), store = %store_path.display(), "resolved paths");

    let dataset = Dataset::load_csv(&data_path)?;
    let store = FileSessionStore::with_path(&store_path);
    let mut console = TerminalConsole::new();

    let options = ask_options(&cli, &config, &dataset, &store, &mut console)?;

    if cli.save_config {
        let cfg = Config {
            data_path: data_path.clone(),
            default_questions: cli.num_questions.unwrap_or(config.default_questions),
            store_path: cli.store.clone().or(config.store_path.clone()),
        };
        config_store.save(&cfg)?;
        debug!(path = %config_store.path().display(), "config saved");
    }

    let mut state = session::prepare(&dataset, &store, &options)?;
    if state.resumed {
        console.say("Resuming previous session.")?;
    } else {
        console.say("Starting a new session.")?;
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let report = runner::play(&mut state, &mut console, &mut rng)?;

    state.persist(&store)?;
    console.say(report.to_string().trim_end())?;
    Ok(())
}

/// Fill in every choice the command line left open by asking the user
fn ask_options(
    cli: &Cli,
    config: &Config,
    dataset: &Dataset,
    store: &dyn SessionStore,
    console: &mut impl Console,
) -> Result<SessionOptions, QuizError> {
    let (a, b) = &dataset.headers;
    console.say(&format!("Pattern: {a} -> {b}"))?;

    let direction = if cli.reverse {
        Direction::Reverse
    } else if cli.forward {
        Direction::Forward
    } else {
        let answer = console.prompt("Reverse? (y/n): ")?;
        Direction::from_reverse_flag(is_yes(answer.as_deref()))
    };
    if direction == Direction::Reverse {
        console.say(&format!("Pattern: {b} -> {a}"))?;
    }

    let requested_questions = match cli.num_questions {
        Some(n) => n,
        None => match console.prompt("Number of questions: ")? {
            Some(text) if !text.trim().is_empty() => text.trim().parse::<usize>().map_err(|_| {
                QuizError::InvalidInput(format!("'{}' is not a number of questions", text.trim()))
            })?,
            _ => config.default_questions,
        },
    };

    let resume = if !store.exists() {
        console.say("No previous session found.")?;
        false
    } else if cli.resume {
        true
    } else if cli.fresh {
        false
    } else {
        let answer = console.prompt("Resume previous session? (y/n): ")?;
        is_yes(answer.as_deref())
    };

    Ok(SessionOptions {
        direction,
        requested_questions,
        resume,
        discard_stale: cli.discard_stale,
        reset_statistics: cli.reset,
    })
}

/// Only an exact `y` counts as yes
fn is_yes(answer: Option<&str>) -> bool {
    answer == Some("y")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use termquiz::console::ScriptedConsole;
    use termquiz::store::MemorySessionStore;

    fn dataset() -> Dataset {
        Dataset::from_columns(vec!["hond".into()], vec!["dog".into()])
            .unwrap()
            .with_headers("dutch", "english")
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("termquiz").chain(args.iter().copied()))
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn only_exact_y_is_yes() {
        assert!(is_yes(Some("y")));
        assert!(!is_yes(Some("Y")));
        assert!(!is_yes(Some("yes")));
        assert!(!is_yes(Some("")));
        assert!(!is_yes(None));
    }

    #[test]
    fn asks_for_everything_the_flags_leave_open() {
        let store = MemorySessionStore::new();
        store
            .save(&session::SessionState::new(&dataset(), Direction::Forward, 1).to_persisted())
            .unwrap();
        let mut console = ScriptedConsole::new(["y", "", "y"]);

        let options =
            ask_options(&cli(&[]), &Config::default(), &dataset(), &store, &mut console).unwrap();

        assert_eq!(options.direction, Direction::Reverse);
        assert_eq!(options.requested_questions, 30);
        assert!(options.resume);
        assert_eq!(
            console.output,
            vec!["Pattern: dutch -> english", "Pattern: english -> dutch"]
        );
    }

    #[test]
    fn flags_skip_the_questions() {
        let mut console = ScriptedConsole::default();
        let options = ask_options(
            &cli(&["--forward", "-n", "7", "--fresh"]),
            &Config::default(),
            &dataset(),
            &MemorySessionStore::new(),
            &mut console,
        )
        .unwrap();

        assert_eq!(options.direction, Direction::Forward);
        assert_eq!(options.requested_questions, 7);
        assert!(!options.resume);
        assert!(console.prompts.is_empty());
    }

    #[test]
    fn non_numeric_question_count_is_rejected() {
        let mut console = ScriptedConsole::new(["n", "lots"]);
        let err = ask_options(
            &cli(&[]),
            &Config::default(),
            &dataset(),
            &MemorySessionStore::new(),
            &mut console,
        )
        .unwrap_err();
        assert!(matches!(err, QuizError::InvalidInput(_)));
    }
}
