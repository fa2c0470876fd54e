use crate::core::ConfigProvider;
use crate::domain::model::{DEFAULT_ALPHA, DEFAULT_CONFIDENCE_LEVEL};
use crate::utils::error::{AbError, Result};
use crate::utils::validation::{
    validate_allowed_values, validate_file_extension, validate_non_empty_string, validate_path,
    validate_probability, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const OUTPUT_FORMATS: [&str; 3] = ["text", "json", "svg"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub analysis: AnalysisConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub alpha: Option<f64>,
    pub confidence_level: Option<f64>,
    pub column: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub control: Option<String>,
    pub treatment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    #[serde(default)]
    pub formats: Vec<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AbError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

/// Checks shared by every configuration source.
pub(crate) fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_probability("analysis.alpha", config.alpha())?;
    validate_probability("analysis.confidence_level", config.confidence_level())?;

    if let Some(column) = config.column() {
        validate_non_empty_string("analysis.column", column)?;
    }
    if let Some(control) = config.control_path() {
        validate_path("input.control", control)?;
        validate_file_extension("input.control", control, &["csv"])?;
    }
    if let Some(treatment) = config.treatment_path() {
        validate_path("input.treatment", treatment)?;
        validate_file_extension("input.treatment", treatment, &["csv"])?;
    }

    validate_path("output.path", config.output_path())?;
    validate_allowed_values("output.formats", config.output_formats(), &OUTPUT_FORMATS)?;

    Ok(())
}

impl ConfigProvider for TomlConfig {
    fn control_path(&self) -> Option<&str> {
        self.input.control.as_deref()
    }

    fn treatment_path(&self) -> Option<&str> {
        self.input.treatment.as_deref()
    }

    fn alpha(&self) -> f64 {
        self.analysis.alpha.unwrap_or(DEFAULT_ALPHA)
    }

    fn confidence_level(&self) -> f64 {
        self.analysis.confidence_level.unwrap_or(DEFAULT_CONFIDENCE_LEVEL)
    }

    fn column(&self) -> Option<&str> {
        self.analysis.column.as_deref()
    }

    fn output_path(&self) -> &str {
        self.output.path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
