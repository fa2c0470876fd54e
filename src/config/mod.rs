pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{DEFAULT_ALPHA, DEFAULT_CONFIDENCE_LEVEL};
#[cfg(feature = "cli")]
use crate::utils::{error::Result, validation::Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use toml_config::{TomlConfig, DEFAULT_OUTPUT_PATH};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "ab-compare")]
#[command(about = "Compare a control and a treatment sample with a two-sample t-test")]
pub struct CliConfig {
    /// CSV file with the control group's observations
    #[arg(long)]
    pub control: Option<String>,

    /// CSV file with the treatment group's observations
    #[arg(long)]
    pub treatment: Option<String>,

    /// Significance level for the t-test [default: 0.05]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Confidence level for the per-group intervals [default: 0.95]
    #[arg(long)]
    pub confidence_level: Option<f64>,

    /// Compare only this column
    #[arg(long)]
    pub column: Option<String>,

    /// Directory for written reports [default: ./output]
    #[arg(long)]
    pub output_path: Option<String>,

    /// Report files to write: text, json, svg
    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,

    /// TOML configuration file; command line flags take precedence
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Emit log lines as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Do not print the report to stdout")]
    pub quiet: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 以設定檔補上命令列未指定的欄位
    pub fn with_file_defaults(mut self, file: TomlConfig) -> Self {
        self.control = self.control.or(file.input.control);
        self.treatment = self.treatment.or(file.input.treatment);
        self.alpha = self.alpha.or(file.analysis.alpha);
        self.confidence_level = self.confidence_level.or(file.analysis.confidence_level);
        self.column = self.column.or(file.analysis.column);
        self.output_path = self.output_path.or(file.output.path);
        if self.formats.is_empty() {
            self.formats = file.output.formats;
        }
        self
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn control_path(&self) -> Option<&str> {
        self.control.as_deref()
    }

    fn treatment_path(&self) -> Option<&str> {
        self.treatment.as_deref()
    }

    fn alpha(&self) -> f64 {
        self.alpha.unwrap_or(DEFAULT_ALPHA)
    }

    fn confidence_level(&self) -> f64 {
        self.confidence_level.unwrap_or(DEFAULT_CONFIDENCE_LEVEL)
    }

    fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        toml_config::validate_provider(self)
    }
}
