use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use logmon::commands::{check, state};
use logmon::completions::{generate_completions, Shell};
use logmon::logging::init_logging;
use logmon::{Config, Status};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "logmon")]
#[command(
    about = "Incremental log severity check for monitoring supervisors",
    long_about = "Scans only the lines appended to a log since the previous invocation, \
                  follows log rotation and transparently reads gzip/bzip2 files. \
                  Exit status: 0 OK, 2 WARNING, 3 CRITICAL or UNKNOWN."
)]
#[command(version)]
struct Cli {
    /// Increase diagnostic output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LogArgs {
    /// The log file to monitor
    #[arg(long)]
    log: Option<PathBuf>,

    /// Directory where per-log state is stored (default: system temp dir)
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// TOML file providing any of the options; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args, Default)]
struct PatternArgs {
    /// Regex for warning lines, anchored at line start
    #[arg(short, long)]
    warning: Option<String>,

    /// Regex for critical lines, anchored at line start
    #[arg(short = 'C', long)]
    critical: Option<String>,

    /// Regex for recovery lines; clears outstanding findings when seen
    #[arg(short, long)]
    ok: Option<String>,

    /// Glob matching the files the log gets rotated into
    #[arg(short, long)]
    rotation: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan newly appended lines and report a status
    Check {
        #[command(flatten)]
        log: LogArgs,

        #[command(flatten)]
        patterns: PatternArgs,
    },

    /// Inspect or reset persisted scan state
    State {
        #[command(subcommand)]
        command: StateCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish)
        shell: String,
    },
}

#[derive(Subcommand)]
enum StateCommands {
    /// Show offset, checksum and carried findings
    Show {
        #[command(flatten)]
        log: LogArgs,
    },

    /// Delete state so the next check starts from the beginning
    Reset {
        #[command(flatten)]
        log: LogArgs,
    },
}

fn resolve_config(log: LogArgs, patterns: Option<PatternArgs>) -> Result<Config> {
    let base = match &log.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let patterns = patterns.unwrap_or_default();
    Ok(base.merge(Config {
        log: log.log,
        state_dir: log.state_dir,
        warning: patterns.warning,
        critical: patterns.critical,
        ok: patterns.ok,
        rotation: patterns.rotation,
    }))
}

fn run(cli: Cli) -> Result<Status> {
    match cli.command {
        Commands::Check { log, patterns } => check::execute(resolve_config(log, Some(patterns))?),
        Commands::State { command } => {
            match command {
                StateCommands::Show { log } => state::show(resolve_config(log, None)?)?,
                StateCommands::Reset { log } => state::reset(resolve_config(log, None)?)?,
            }
            Ok(Status::Ok)
        }
        Commands::Completions { shell } => {
            let shell = Shell::from_str(&shell)?;
            let mut cmd = Cli::command();
            generate_completions(&mut cmd, shell, &mut std::io::stdout());
            Ok(Status::Ok)
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered.lines().next().unwrap_or_default();
            println!(
                "{} - {}",
                Status::Unknown,
                message.trim_start_matches("error: ")
            );
            return ExitCode::from(Status::Unknown.exit_code());
        }
    };
    init_logging(cli.verbose);

    match run(cli) {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            tracing::debug!(error = ?e, "check aborted");
            println!("{} - {e:#}", Status::Unknown);
            ExitCode::from(Status::Unknown.exit_code())
        }
    }
}
