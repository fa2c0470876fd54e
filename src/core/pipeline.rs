use crate::core::comparator::compare_tables;
use crate::core::loader::load_table_file;
use crate::core::{AnalysisReport, ConfigProvider, Pipeline, RunOutput, SamplePair, Storage};
use crate::render::{reference_sections, render_json, render_svg, render_text};
use crate::utils::error::{AbError, Result};
use std::path::Path;

pub const TEXT_REPORT_FILE: &str = "report.txt";
pub const JSON_REPORT_FILE: &str = "report.json";

pub struct AbTestPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> AbTestPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn write_output(&self, name: &str, data: &[u8], written: &mut Vec<String>) -> Result<()> {
        let path = self.output_file(name);
        tracing::debug!("Writing {} bytes to {}", data.len(), path);
        self.storage.write_file(&path, data)?;
        written.push(path);
        Ok(())
    }
}

/// Chart file for the `index`-th compared column.
///
/// The 1-based position keeps names unique when two headers sanitize to the
/// same slug (`a b` and `a_b`).
pub fn chart_file_name(index: usize, column: &str) -> String {
    let slug: String = column
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("chart_{}_{}.svg", index + 1, slug)
}

impl<S: Storage, C: ConfigProvider> Pipeline for AbTestPipeline<S, C> {
    fn extract(&self) -> Result<SamplePair> {
        // 兩份資料都上傳之前不做任何計算
        let (control_path, treatment_path) =
            match (self.config.control_path(), self.config.treatment_path()) {
                (Some(control), Some(treatment)) => (control, treatment),
                (None, Some(_)) => {
                    return Err(AbError::MissingInputError {
                        which: "control".to_string(),
                    })
                }
                (Some(_), None) => {
                    return Err(AbError::MissingInputError {
                        which: "treatment".to_string(),
                    })
                }
                (None, None) => {
                    return Err(AbError::MissingInputError {
                        which: "control and treatment".to_string(),
                    })
                }
            };

        let control = load_table_file(&self.storage, control_path)?;
        let treatment = load_table_file(&self.storage, treatment_path)?;

        Ok(SamplePair { control, treatment })
    }

    fn transform(&self, data: SamplePair) -> Result<AnalysisReport> {
        let SamplePair { control, treatment } = data;
        let alpha = self.config.alpha();
        let confidence_level = self.config.confidence_level();

        let comparisons = compare_tables(
            &control,
            &treatment,
            alpha,
            confidence_level,
            self.config.column(),
        )?;

        for comparison in &comparisons {
            tracing::info!(
                "{}: t = {:.4}, p = {:.4}, reject_null = {}",
                comparison.column,
                comparison.result.statistic,
                comparison.result.p_value,
                comparison.result.reject_null
            );
        }

        Ok(AnalysisReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            control,
            treatment,
            alpha,
            confidence_level,
            comparisons,
            reference: reference_sections()?,
        })
    }

    fn load(&self, report: AnalysisReport) -> Result<RunOutput> {
        let report_text = render_text(&report);
        let mut written_files = Vec::new();

        for format in self.config.output_formats() {
            match format.as_str() {
                "text" => {
                    self.write_output(TEXT_REPORT_FILE, report_text.as_bytes(), &mut written_files)?
                }
                "json" => {
                    let json = render_json(&report)?;
                    self.write_output(JSON_REPORT_FILE, json.as_bytes(), &mut written_files)?;
                }
                "svg" => {
                    for (idx, comparison) in report.comparisons.iter().enumerate() {
                        let svg = render_svg(comparison);
                        self.write_output(
                            &chart_file_name(idx, &comparison.column),
                            svg.as_bytes(),
                            &mut written_files,
                        )?;
                    }
                }
                other => {
                    return Err(AbError::InvalidConfigValueError {
                        field: "output.formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format. Valid formats: text, json, svg".to_string(),
                    })
                }
            }
        }

        Ok(RunOutput {
            report_text,
            written_files,
        })
    }
}
