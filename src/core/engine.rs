use crate::core::{Pipeline, RunOutput};
use crate::utils::error::Result;

pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<RunOutput> {
        tracing::info!("Starting A/B comparison...");

        // Extract
        tracing::info!("Loading samples...");
        let samples = self.pipeline.extract()?;
        tracing::info!(
            "Loaded control ({} rows) and treatment ({} rows)",
            samples.control.row_count,
            samples.treatment.row_count
        );

        // Transform
        tracing::info!("Comparing samples...");
        let report = self.pipeline.transform(samples)?;
        tracing::info!("Compared {} column(s)", report.comparisons.len());

        // Load
        tracing::info!("Rendering report...");
        let output = self.pipeline.load(report)?;
        for path in &output.written_files {
            tracing::info!("Output saved to: {}", path);
        }

        Ok(output)
    }
}
