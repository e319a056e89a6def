use clap::{Parser, Subcommand};
use garden_tools::clock::SystemClock;
use garden_tools::config::{self, ConfigError, GardenConfig, Overrides};
use garden_tools::flowcard::{self, FlowcardError};
use garden_tools::regen::{self, RegenError};
use garden_tools::scan::{self, ScanError};
use garden_tools::{output, template};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "garden")]
#[command(about = "Flowcards and world trees from Garden metadata")]
#[command(long_about = "\
Flowcards and world trees from Garden metadata

Reads a directory of JSON metadata files, one per entity:

  {\"title\": \"My Card!\", \"world\": \"Eldenwood\", \"type\": \"lore\",
   \"author\": {\"name\": \"Shay Na\", \"role\": \"keeper\"},
   \"metadata\": {\"summary\": \"...\", \"tags\": [\"river\"]},
   \"links\": {\"notion_url\": \"...\", \"github_url\": \"...\"}}

and produces either:

  flowcards   docs/flowcards/My_Card_.md
  regen       garden_597/Eldenwood/Shay_Na/lore/My_Card_.txt
              garden_597/manifest_<timestamp>.log

Names are sanitized to [A-Za-z0-9_-], at most 64 characters. Files that
fail to parse are reported and skipped.

Run 'garden gen-config' to generate a documented garden.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Metadata directory
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Flowcard output directory
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// World-tree target directory
    #[arg(long, global = true)]
    target: Option<PathBuf>,

    /// Flowcard template override
    #[arg(long, global = true)]
    template: Option<PathBuf>,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a Markdown flowcard for every metadata file
    Flowcards,
    /// Rebuild the world/author/type tree of placeholder files
    Regen,
    /// Run flowcards, then regen
    All,
    /// Parse every metadata file and report problems, writing nothing
    Check,
    /// Print a stock garden.toml with all options documented
    GenConfig,
    /// Print the built-in flowcard template
    PrintTemplate,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Flowcards => {
            run_flowcards(&load_config(&cli)?)?;
        }
        Command::Regen => {
            run_regen(&load_config(&cli)?)?;
        }
        Command::All => {
            let config = load_config(&cli)?;
            println!("==> Flowcards");
            if run_flowcards(&config)? {
                println!("==> Regen");
                run_regen(&config)?;
            }
        }
        Command::Check => {
            let config = load_config(&cli)?;
            match scan::check(&config.source_dir, &config.extension) {
                Ok(report) => output::print_check_output(&report),
                Err(ScanError::SourceMissing(dir)) => output::print_source_missing(&dir),
                Err(e) => return Err(e.into()),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::PrintTemplate => {
            print!("{}", template::DEFAULT_TEMPLATE);
        }
    }

    Ok(())
}

/// Resolve the effective config: stock defaults, config file, then flags.
fn load_config(cli: &Cli) -> Result<GardenConfig, ConfigError> {
    let overrides = Overrides {
        source_dir: cli.source.clone(),
        output_dir: cli.output.clone(),
        target_dir: cli.target.clone(),
        template: cli.template.clone(),
    };
    config::load_config(&cli.config, &overrides)
}

/// Returns `false` when the source directory was missing.
fn run_flowcards(config: &GardenConfig) -> Result<bool, FlowcardError> {
    match flowcard::generate_flowcards(config, &SystemClock, output::print_record_event) {
        Ok(summary) => {
            output::print_flowcard_summary(&summary);
            Ok(true)
        }
        Err(FlowcardError::Scan(ScanError::SourceMissing(dir))) => {
            output::print_source_missing(&dir);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Returns `false` when the source directory was missing.
fn run_regen(config: &GardenConfig) -> Result<bool, RegenError> {
    match regen::regenerate(config, &SystemClock, output::print_record_event) {
        Ok(summary) => {
            output::print_regen_summary(&summary);
            Ok(true)
        }
        Err(RegenError::Scan(ScanError::SourceMissing(dir))) => {
            output::print_source_missing(&dir);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
