pub mod comparator;
pub mod engine;
pub mod loader;
pub mod pipeline;

pub use crate::domain::model::{
    AnalysisReport, ColumnComparison, ComparisonResult, ConfidenceInterval, RunOutput, Sample,
    SamplePair, Table,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
