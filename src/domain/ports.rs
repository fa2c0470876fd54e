use crate::domain::model::{AnalysisReport, RunOutput, SamplePair};
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn control_path(&self) -> Option<&str>;
    fn treatment_path(&self) -> Option<&str>;
    fn alpha(&self) -> f64;
    fn confidence_level(&self) -> f64;
    fn column(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
}

pub trait Pipeline {
    fn extract(&self) -> Result<SamplePair>;
    fn transform(&self, data: SamplePair) -> Result<AnalysisReport>;
    fn load(&self, report: AnalysisReport) -> Result<RunOutput>;
}
