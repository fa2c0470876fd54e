use serde::{Deserialize, Serialize};

pub const DEFAULT_ALPHA: f64 = 0.05;
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// One arm's observations for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub label: String,
    pub values: Vec<f64>,
}

impl Sample {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A parsed CSV input: one `Sample` per header column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub label: String,
    pub headers: Vec<String>,
    /// 前幾列資料，用於報告預覽
    pub preview: Vec<Vec<f64>>,
    pub row_count: usize,
    #[serde(skip)]
    pub columns: Vec<Sample>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Sample> {
        self.headers
            .iter()
            .position(|h| h == name)
            .and_then(|idx| self.columns.get(idx))
    }
}

#[derive(Debug, Clone)]
pub struct SamplePair {
    pub control: Table,
    pub treatment: Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
    /// treatment mean - control mean
    pub mean_difference: f64,
    pub alpha: f64,
    pub reject_null: bool,
}

impl ComparisonResult {
    pub fn conclusion(&self) -> &'static str {
        if self.reject_null {
            "Reject the null hypothesis: There is a significant difference between the two groups."
        } else {
            "Fail to reject the null hypothesis: There is no significant difference between the two groups."
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub standard_error: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub confidence_level: f64,
    pub sample_size: usize,
    pub t_critical: f64,
}

impl ConfidenceInterval {
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnComparison {
    pub column: String,
    pub result: ComparisonResult,
    pub control: ConfidenceInterval,
    pub treatment: ConfidenceInterval,
}

/// Static explanatory content shown under the computed results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSection {
    pub title: String,
    pub intro: String,
    pub formula: String,
    pub definitions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: String,
    pub control: Table,
    pub treatment: Table,
    pub alpha: f64,
    pub confidence_level: f64,
    pub comparisons: Vec<ColumnComparison>,
    pub reference: Vec<ReferenceSection>,
}

#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub report_text: String,
    pub written_files: Vec<String>,
}
