pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{
    comparator::{compare, compare_tables, confidence_interval},
    engine::AnalysisEngine,
    pipeline::AbTestPipeline,
};
pub use domain::model::{
    AnalysisReport, ColumnComparison, ComparisonResult, ConfidenceInterval, Sample, Table,
};
pub use utils::error::{AbError, Result};
