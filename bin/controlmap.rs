use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use controlmap::render::{
    control_json, control_table, coverage_block, coverage_json, framework_json, framework_table,
};
use controlmap::{build_mapper, ControlMapper, CoverageMode, DatasetConfig, MapperConfig};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "controlmap")]
#[command(about = "Map security controls across compliance frameworks", long_about = None)]
struct Args {
    /// JSON config file listing datasets and the mappings file
    #[arg(long, env = "CONTROLMAP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory holding the standard NIST 800-53 / ISO 27001 / SOC 2 files
    #[arg(long, env = "CONTROLMAP_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Extra or replacement control dataset as FRAMEWORK=PATH (repeatable)
    #[arg(long = "dataset", value_name = "FRAMEWORK=PATH", global = true)]
    datasets: Vec<String>,

    /// Mappings CSV file
    #[arg(long, env = "CONTROLMAP_MAPPINGS", global = true)]
    mappings: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Map a single control
    MapControl {
        /// Source framework (e.g., NIST800-53)
        #[arg(long)]
        framework: String,

        /// Control ID (e.g., AC-2)
        #[arg(long)]
        control_id: String,
    },

    /// Map an entire framework to another
    MapFramework {
        /// Source framework
        #[arg(long)]
        source_framework: String,

        /// Target framework
        #[arg(long)]
        target_framework: String,
    },

    /// Show mapping coverage statistics
    Coverage {
        /// Source framework
        #[arg(long)]
        source_framework: String,

        /// Target framework
        #[arg(long)]
        target_framework: String,

        /// Only count mappings whose target control is loaded
        #[arg(long)]
        resolved_coverage: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn resolve_config(args: &Args) -> Result<MapperConfig> {
    let mut config = match (&args.config, &args.data_dir) {
        (Some(path), _) => MapperConfig::from_json_file(path)?,
        (None, Some(dir)) => MapperConfig::with_data_dir(dir),
        (None, None) => MapperConfig::default(),
    };

    for pair in &args.datasets {
        config = config.with_dataset(DatasetConfig::parse_pair(pair)?);
    }
    if let Some(path) = &args.mappings {
        config = config.with_mappings_path(path);
    }
    if let Command::Coverage {
        resolved_coverage: true,
        ..
    } = args.command
    {
        config = config.with_coverage_mode(CoverageMode::ResolvedTargets);
    }

    Ok(config)
}

fn cmd_map_control(
    mapper: &ControlMapper,
    format: OutputFormat,
    framework: &str,
    control_id: &str,
) -> Result<()> {
    let results = mapper.map_control(framework, control_id);

    match format {
        OutputFormat::Json => println!("{}", control_json(&results)?),
        OutputFormat::Table if results.is_empty() => {
            println!("No mappings found for {} {}", framework, control_id)
        }
        OutputFormat::Table => print!("{}", control_table(&results)),
    }
    Ok(())
}

fn cmd_map_framework(
    mapper: &ControlMapper,
    format: OutputFormat,
    source: &str,
    target: &str,
) -> Result<()> {
    let results = mapper.map_framework(source, target);

    match format {
        OutputFormat::Json => println!("{}", framework_json(&results)?),
        OutputFormat::Table if results.is_empty() => {
            println!("No mappings found between {} and {}", source, target)
        }
        OutputFormat::Table => print!("{}", framework_table(&results)),
    }
    Ok(())
}

fn cmd_coverage(
    mapper: &ControlMapper,
    format: OutputFormat,
    source: &str,
    target: &str,
) -> Result<()> {
    let report = mapper.get_coverage(source, target);

    match format {
        OutputFormat::Json => println!("{}", coverage_json(&report)?),
        OutputFormat::Table => println!("{}", coverage_block(&report)),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    debug!("controlmap v{}", controlmap::VERSION);

    let config = resolve_config(&args)?;
    let mapper = build_mapper(&config)?;
    info!("Mapper ready: {:?}", mapper.stats());

    match &args.command {
        Command::MapControl {
            framework,
            control_id,
        } => cmd_map_control(&mapper, args.format, framework, control_id),
        Command::MapFramework {
            source_framework,
            target_framework,
        } => cmd_map_framework(&mapper, args.format, source_framework, target_framework),
        Command::Coverage {
            source_framework,
            target_framework,
            ..
        } => cmd_coverage(&mapper, args.format, source_framework, target_framework),
    }
}
