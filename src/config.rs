use crate::error::{Result, VarThumbError};
use crate::extractor::NamingPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub extract: ExtractConfig,
    pub grouping: GroupingConfig,
    pub montage: MontageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Suffix (without the dot) an archive file name must end with
    pub archive_extension: String,
    pub follow_links: bool,
    /// Unbounded when absent
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub naming: NamingPolicy,
    pub preserve_mtime: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GroupingConfig {
    pub separator: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MontageConfig {
    pub enabled: bool,
    pub dpi: u16,
    pub cell_inches: f32,
    pub title_font_pt: f32,
    pub caption_font_pt: f32,
    pub jpeg_quality: u8,
    pub font_path: Option<PathBuf>,
    pub background: [u8; 3],
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            archive_extension: "var".to_string(),
            follow_links: false,
            max_depth: None,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            naming: NamingPolicy::ArchiveName,
            preserve_mtime: false,
        }
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            separator: ".".to_string(),
        }
    }
}

impl Default for MontageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dpi: 300,
            cell_inches: 4.0,
            title_font_pt: 14.0,
            caption_font_pt: 8.0,
            jpeg_quality: 95,
            font_path: None,
            background: [255, 255, 255],
        }
    }
}

impl ScanConfig {
    /// The suffix matched against file names, e.g. `.var`.
    pub fn archive_suffix(&self) -> String {
        format!(".{}", self.archive_extension.trim_start_matches('.'))
    }
}

impl GroupingConfig {
    pub fn separator_char(&self) -> char {
        self.separator.chars().next().unwrap_or('.')
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(VarThumbError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| VarThumbError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| VarThumbError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["varthumb.toml", ".varthumb.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(naming) = cli_args.naming {
            self.extract.naming = naming;
        }

        if cli_args.no_montage {
            self.montage.enabled = false;
        }

        if let Some(ref font) = cli_args.font {
            self.montage.font_path = Some(font.clone());
        }

        if let Some(dpi) = cli_args.dpi {
            self.montage.dpi = dpi;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.archive_extension.trim_start_matches('.').is_empty() {
            return Err(VarThumbError::Config {
                message: "Archive extension must not be empty".to_string(),
            });
        }

        if self.grouping.separator.chars().count() != 1 {
            return Err(VarThumbError::Config {
                message: format!(
                    "Grouping separator must be exactly one character (got {:?})",
                    self.grouping.separator
                ),
            });
        }

        if self.montage.dpi == 0 {
            return Err(VarThumbError::Config {
                message: "Montage DPI must be greater than 0".to_string(),
            });
        }

        if self.montage.cell_inches.is_nan() || self.montage.cell_inches <= 0.0 {
            return Err(VarThumbError::Config {
                message: "Montage cell size must be greater than 0 inches".to_string(),
            });
        }

        if !(1..=100).contains(&self.montage.jpeg_quality) {
            return Err(VarThumbError::Config {
                message: format!(
                    "JPEG quality must be between 1 and 100 (got {})",
                    self.montage.jpeg_quality
                ),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub naming: Option<NamingPolicy>,
    pub no_montage: bool,
    pub font: Option<PathBuf>,
    pub dpi: Option<u16>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_naming(mut self, naming: Option<NamingPolicy>) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_no_montage(mut self, no_montage: bool) -> Self {
        self.no_montage = no_montage;
        self
    }

    pub fn with_font(mut self, font: Option<PathBuf>) -> Self {
        self.font = font;
        self
    }

    pub fn with_dpi(mut self, dpi: Option<u16>) -> Self {
        self.dpi = dpi;
        self
    }
}
