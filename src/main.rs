use clap::{Parser, Subcommand, builder::styling};
use etl_runner::registry::{self, StageKind};
use etl_runner::settings::{self, ENV_PREFIX, Settings};
use etl_runner::{RunState, Runner};
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::Path;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// ETL Runner: stream records from an extractor, through a transformer, into a loader
#[derive(Parser)]
#[command(name = "etlr", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source ETL_* settings from (skipped when missing)
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// A YAML or JSON5 settings file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Debug logging, overrides LOGLEVEL
    #[arg(long, global = true)]
    debug: bool,

    /// Include module paths in log lines
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured pipeline once
    Run {
        /// Extractor plugin name, overrides EXTRACTOR_NAME
        #[arg(long)]
        extractor: Option<String>,

        /// Transformer plugin name, overrides TRANSFORMER_NAME
        #[arg(long)]
        transformer: Option<String>,

        /// Loader plugin name, overrides LOADER_NAME
        #[arg(long)]
        loader: Option<String>,

        /// Stop after this many records, overrides MAX_RECORDS
        #[arg(long)]
        limit: Option<usize>,

        /// Additional KEY=VALUE settings, may be repeated
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// List the registered plugins by namespace
    Plugins,

    /// Print the resolved settings
    Settings,
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut builder = Settings::builder().with_defaults();
    if let Some(config) = &cli.config {
        builder = builder.file(config)?;
    }
    builder = builder.env(ENV_PREFIX);

    if let Commands::Run {
        extractor,
        transformer,
        loader,
        limit,
        set,
    } = &cli.command
    {
        for assignment in set {
            builder = builder.assignment(assignment)?;
        }
        let stages = [
            (StageKind::Extractor, extractor),
            (StageKind::Transformer, transformer),
            (StageKind::Loader, loader),
        ];
        for (kind, name) in stages {
            if let Some(name) = name {
                builder = builder.set(kind.name_key(), name.as_str());
            }
        }
        if let Some(limit) = limit {
            builder = builder.set(settings::MAX_RECORDS, limit.to_string());
        }
    }

    if cli.debug {
        builder = builder.set(settings::DEBUG, "true");
    }
    if cli.verbose {
        builder = builder.set(settings::VERBOSE, "true");
    }
    Ok(builder.build())
}

fn init_logging(settings: &Settings) -> Result<()> {
    let log_level = match settings.get_bool(settings::DEBUG)? {
        true => "debug",
        false => settings.get_or(settings::LOGLEVEL, "info"),
    };
    let verbose = settings.get_bool(settings::VERBOSE)?;

    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level.to_lowercase());
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .format_module_path(verbose)
        .format_target(verbose)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let dotenv_loaded = Path::new(&cli.env).exists();
    if dotenv_loaded {
        dotenvy::from_filename(&cli.env)?;
    }

    let settings = load_settings(&cli)?;
    init_logging(&settings)?;
    if dotenv_loaded {
        log::debug!("Sourced settings from {}", cli.env.bright_black());
    }

    match cli.command {
        Commands::Run { .. } => {
            let runner = Runner::new(&settings, registry::global())?;
            for descriptor in runner.descriptors() {
                log::info!(
                    "Using {} {} from {}",
                    descriptor.kind,
                    descriptor.name.cyan(),
                    descriptor.namespace.bright_black()
                );
            }
            let report = runner.run()?;
            log::info!(
                "Pipeline {}: {} records",
                RunState::Completed.green(),
                report.records
            );
        }
        Commands::Plugins => {
            for (kind, namespace, name) in registry::global().entries() {
                println!("{}\t{}\t{}", kind, namespace.bright_black(), name.green());
            }
        }
        Commands::Settings => {
            for (key, value) in settings.iter() {
                println!("{}={}", key.cyan(), value);
            }
        }
    }

    log::info!("Exit etlr.");
    Ok(())
}
