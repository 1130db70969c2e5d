use std::path::{Path, PathBuf};

use chasm_runner::{api, constraints, Error, Level, LevelConfig, LevelGenerator, Result, SeededRng};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chasm-runner", version, about = "Generate platformer levels")]
struct Cli {
    /// Level config JSON (defaults to $CHASM_LEVEL_CONFIG, then ./level.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a generated level as JSON.
    Generate {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        pretty: bool,
        /// Print the level together with its generation metrics.
        #[arg(long)]
        metrics: bool,
    },
    /// Check a level JSON file against every constraint.
    Validate { file: PathBuf },
    /// Serve levels over HTTP.
    Serve {
        #[arg(long, default_value = api::DEFAULT_ADDR)]
        addr: String,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            error!(error = %err, "chasm-runner failed");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let config = LevelConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Generate {
            seed,
            pretty,
            metrics,
        } => {
            let generator = LevelGenerator::new(config)?;
            let mut rng = seed.map_or_else(SeededRng::from_entropy, SeededRng::new);
            info!(seed = rng.seed(), "generating level");
            let result = generator.generate(&mut rng);
            let json = match (metrics, pretty) {
                (true, true) => serde_json::to_string_pretty(&result)?,
                (true, false) => serde_json::to_string(&result)?,
                (false, true) => serde_json::to_string_pretty(&result.level)?,
                (false, false) => serde_json::to_string(&result.level)?,
            };
            println!("{json}");
            Ok(0)
        }
        Command::Validate { file } => {
            let level = read_level(&file)?;
            let report = constraints::validate_all(&level, &config);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.valid {
                info!(file = %file.display(), "level is valid");
                Ok(0)
            } else {
                error!(
                    file = %file.display(),
                    violations = report.violations.len(),
                    "level failed validation"
                );
                Ok(2)
            }
        }
        Command::Serve { addr } => {
            let runtime = tokio::runtime::Runtime::new().map_err(Error::Serve)?;
            runtime.block_on(api::serve(config, &addr))?;
            Ok(0)
        }
    }
}

fn read_level(path: &Path) -> Result<Level> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}
