use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::extractor::NamingPolicy;
use crate::montage::GridSize;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output directory used when `--output` is not given.
pub const DEFAULT_OUTPUT_DIR: &str = "thumbnails";

#[derive(Parser, Debug)]
#[command(name = "varthumb")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract preview thumbnails from .var archives")]
#[command(
    long_about = "VarThumb copies the preview image embedded in each .var archive into an \
                  output directory and, for whole directories, builds one contact-sheet \
                  montage per creator."
)]
#[command(before_help = "🖼  VarThumb - Thumbnail Extraction Tool")]
#[command(after_help = "EXAMPLES:\n  \
    varthumb ~/AddonPackages\n  \
    varthumb ~/AddonPackages --output previews --grid 4x5\n  \
    varthumb alice.hub.1.var --naming scene\n  \
    varthumb ~/AddonPackages --no-montage --output-format json")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Archive file or directory to scan for archives
    #[arg(required_unless_present = "generate_config")]
    pub source: Option<PathBuf>,

    /// Output directory for thumbnails and montages
    #[arg(short, long, help = "Output directory (default: ./thumbnails)")]
    pub output: Option<PathBuf>,

    /// Skip building per-creator montages
    #[arg(long)]
    pub no_montage: bool,

    /// Montage grid as ROWSxCOLS (default: near-square)
    #[arg(long, value_name = "ROWSxCOLS")]
    pub grid: Option<GridSize>,

    /// Thumbnail naming policy: archive or scene
    #[arg(long, value_name = "POLICY")]
    pub naming: Option<NamingPolicy>,

    /// TTF/OTF font used for montage captions
    #[arg(long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Montage resolution in dots per inch
    #[arg(long)]
    pub dpi: Option<u16>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "List the archives that would be processed without extracting")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_naming(self.naming)
            .with_no_montage(self.no_montage)
            .with_font(self.font.clone())
            .with_dpi(self.dpi)
    }

    pub fn output_directory(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
