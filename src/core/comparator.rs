//! Two-sample comparison and per-group confidence intervals.
//!
//! `compare` runs Student's independent two-sample t-test with pooled
//! variance; `confidence_interval` builds a t-based interval around a
//! single sample's mean.

use crate::domain::model::{ColumnComparison, ComparisonResult, ConfidenceInterval, Sample, Table};
use crate::utils::error::{AbError, Result};
use crate::utils::validation::validate_probability;
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;
use std::collections::BTreeSet;

fn check_sample(sample: &Sample) -> Result<()> {
    if sample.len() < 2 {
        return Err(AbError::invalid_sample(
            &sample.label,
            format!(
                "at least 2 observations are required, got {}",
                sample.len()
            ),
        ));
    }

    if let Some(pos) = sample.values.iter().position(|v| !v.is_finite()) {
        return Err(AbError::invalid_sample(
            &sample.label,
            format!("observation {} is not a finite number", pos + 1),
        ));
    }

    Ok(())
}

fn standard_t(degrees_of_freedom: f64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, degrees_of_freedom).map_err(|e| AbError::ValidationError {
        message: format!(
            "cannot build t distribution with {} degrees of freedom: {}",
            degrees_of_freedom, e
        ),
    })
}

/// Fails when an intermediate moment overflowed `f64`.
fn ensure_finite(label: &str, quantity: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AbError::invalid_sample(
            label,
            format!("values are too large to compute the {}", quantity),
        ))
    }
}

/// Mean and sample variance, rejecting samples whose moments overflow.
fn moments(sample: &Sample) -> Result<(f64, f64)> {
    let mean = sample.values.iter().mean();
    ensure_finite(&sample.label, "mean", mean)?;
    let variance = sample.values.iter().variance();
    ensure_finite(&sample.label, "variance", variance)?;
    Ok((mean, variance))
}

/// Pooled-variance t-test of `control` against `treatment`.
///
/// The statistic is signed as `(mean(control) - mean(treatment)) / se`, so
/// swapping the arms flips its sign and leaves the p-value untouched.
pub fn compare(control: &Sample, treatment: &Sample, alpha: f64) -> Result<ComparisonResult> {
    validate_probability("alpha", alpha)?;
    check_sample(control)?;
    check_sample(treatment)?;

    let n1 = control.len() as f64;
    let n2 = treatment.len() as f64;
    let (mean1, var1) = moments(control)?;
    let (mean2, var2) = moments(treatment)?;

    let pair_label = format!("{} / {}", control.label, treatment.label);
    let degrees_of_freedom = n1 + n2 - 2.0;
    let pooled_variance = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / degrees_of_freedom;
    ensure_finite(&pair_label, "pooled variance", pooled_variance)?;
    let difference = mean1 - mean2;
    ensure_finite(&pair_label, "mean difference", difference)?;

    let (statistic, p_value) = if pooled_variance <= 0.0 {
        // 兩組皆為常數：平均相同代表無差異，否則統計量無界
        if difference == 0.0 {
            (0.0, 1.0)
        } else {
            return Err(AbError::invalid_sample(
                pair_label,
                "both samples have zero variance but different means",
            ));
        }
    } else {
        let standard_error = (pooled_variance * (1.0 / n1 + 1.0 / n2)).sqrt();
        let statistic = difference / standard_error;
        ensure_finite(&pair_label, "t statistic", statistic)?;
        let p_value = (2.0 * standard_t(degrees_of_freedom)?.sf(statistic.abs())).clamp(0.0, 1.0);
        (statistic, p_value)
    };

    tracing::debug!(
        "t-test {} vs {}: t = {:.6}, p = {:.6}, df = {}",
        control.label,
        treatment.label,
        statistic,
        p_value,
        degrees_of_freedom
    );

    Ok(ComparisonResult {
        statistic,
        p_value,
        degrees_of_freedom,
        mean_difference: mean2 - mean1,
        alpha,
        reject_null: p_value < alpha,
    })
}

pub fn confidence_interval(sample: &Sample, level: f64) -> Result<ConfidenceInterval> {
    validate_probability("confidence_level", level)?;
    check_sample(sample)?;

    let n = sample.len() as f64;
    let (mean, variance) = moments(sample)?;
    let standard_error = variance.sqrt() / n.sqrt();
    let t_critical = standard_t(n - 1.0)?.inverse_cdf((1.0 + level) / 2.0);
    let margin = t_critical * standard_error;
    let (lower_bound, upper_bound) = (mean - margin, mean + margin);
    ensure_finite(&sample.label, "interval bounds", lower_bound)?;
    ensure_finite(&sample.label, "interval bounds", upper_bound)?;

    Ok(ConfidenceInterval {
        mean,
        standard_error,
        lower_bound,
        upper_bound,
        confidence_level: level,
        sample_size: sample.len(),
        t_critical,
    })
}

fn shape_mismatch(control: &Table, treatment: &Table) -> AbError {
    AbError::ShapeMismatchError {
        control: control.headers.join(", "),
        treatment: treatment.headers.join(", "),
    }
}

/// Compare two tables column by column, pairing columns by header name.
///
/// With `column` set only that column is compared; otherwise both tables
/// must carry the same set of columns.
pub fn compare_tables(
    control: &Table,
    treatment: &Table,
    alpha: f64,
    level: f64,
    column: Option<&str>,
) -> Result<Vec<ColumnComparison>> {
    let columns: Vec<&str> = match column {
        Some(name) => vec![name],
        None => {
            let control_set: BTreeSet<&str> = control.headers.iter().map(String::as_str).collect();
            let treatment_set: BTreeSet<&str> =
                treatment.headers.iter().map(String::as_str).collect();
            if control_set != treatment_set {
                return Err(shape_mismatch(control, treatment));
            }
            control.headers.iter().map(String::as_str).collect()
        }
    };

    columns
        .into_iter()
        .map(|name| {
            let (control_sample, treatment_sample) =
                match (control.column(name), treatment.column(name)) {
                    (Some(c), Some(t)) => (c, t),
                    _ => return Err(shape_mismatch(control, treatment)),
                };

            let result = compare(control_sample, treatment_sample, alpha)?;
            Ok(ColumnComparison {
                column: name.to_string(),
                result,
                control: confidence_interval(control_sample, level)?,
                treatment: confidence_interval(treatment_sample, level)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(label: &str, values: &[f64]) -> Sample {
        Sample::new(label, values.to_vec())
    }

    fn table(label: &str, columns: &[(&str, &[f64])]) -> Table {
        Table {
            label: label.to_string(),
            headers: columns.iter().map(|(name, _)| name.to_string()).collect(),
            preview: Vec::new(),
            row_count: columns.first().map(|(_, v)| v.len()).unwrap_or(0),
            columns: columns
                .iter()
                .map(|(name, values)| sample(&format!("{}:{}", label, name), values))
                .collect(),
        }
    }

    #[test]
    fn test_clear_difference_rejects_null() {
        let control = sample("control", &[10.0, 12.0, 11.0, 13.0, 9.0]);
        let treatment = sample("treatment", &[15.0, 16.0, 14.0, 17.0, 15.0]);

        let result = compare(&control, &treatment, 0.05).unwrap();

        // sp² = 1.9, se = sqrt(0.76), t = -4.4 / se
        let expected_t = -4.4 / 0.76_f64.sqrt();
        assert!((result.statistic - expected_t).abs() < 1e-9);
        assert_eq!(result.degrees_of_freedom, 8.0);
        assert!((result.mean_difference - 4.4).abs() < 1e-9);
        assert!(result.p_value < 0.01);
        assert!(result.reject_null);
    }

    #[test]
    fn test_identical_constant_samples() {
        let control = sample("control", &[10.0, 10.0, 10.0]);
        let treatment = sample("treatment", &[10.0, 10.0, 10.0]);

        let result = compare(&control, &treatment, 0.05).unwrap();

        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
        assert!(!result.reject_null);
    }

    #[test]
    fn test_identical_varying_samples() {
        let values = [3.0, 7.5, 1.25, 9.0];
        let result = compare(&sample("a", &values), &sample("b", &values), 0.05).unwrap();

        assert_eq!(result.statistic, 0.0);
        assert!((result.p_value - 1.0).abs() < 1e-12);
        assert!(!result.reject_null);
    }

    #[test]
    fn test_constant_samples_with_different_means_fail() {
        let control = sample("control", &[1.0, 1.0, 1.0]);
        let treatment = sample("treatment", &[2.0, 2.0]);

        let err = compare(&control, &treatment, 0.05).unwrap_err();
        assert!(matches!(err, AbError::InvalidSampleError { .. }));
    }

    #[test]
    fn test_swapping_arms_negates_statistic() {
        let a = sample("a", &[2.1, 3.4, 1.9, 5.0, 4.2, 3.3]);
        let b = sample("b", &[4.0, 4.4, 6.1, 5.2]);

        let forward = compare(&a, &b, 0.05).unwrap();
        let backward = compare(&b, &a, 0.05).unwrap();

        assert_eq!(forward.statistic, -backward.statistic);
        assert_eq!(forward.p_value, backward.p_value);
        assert_eq!(forward.mean_difference, -backward.mean_difference);
    }

    #[test]
    fn test_p_value_within_unit_interval() {
        let a = sample("a", &[0.1, 0.2, 0.15, 0.3]);
        let b = sample("b", &[100.0, 101.0, 99.5, 100.2]);

        let result = compare(&a, &b, 0.05).unwrap();
        assert!((0.0..=1.0).contains(&result.p_value));
        assert!(result.reject_null);
    }

    #[test]
    fn test_empty_treatment_fails() {
        let control = sample("control", &[1.0, 2.0, 3.0]);
        let treatment = sample("treatment", &[]);

        let err = compare(&control, &treatment, 0.05).unwrap_err();
        match err {
            AbError::InvalidSampleError { sample, .. } => assert_eq!(sample, "treatment"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_single_observation_fails_compare() {
        let err = compare(&sample("c", &[1.0]), &sample("t", &[1.0, 2.0]), 0.05).unwrap_err();
        assert!(matches!(err, AbError::InvalidSampleError { .. }));
    }

    #[test]
    fn test_non_finite_observation_fails() {
        let err = compare(
            &sample("c", &[1.0, f64::NAN, 2.0]),
            &sample("t", &[1.0, 2.0]),
            0.05,
        )
        .unwrap_err();
        assert!(matches!(err, AbError::InvalidSampleError { .. }));
    }

    #[test]
    fn test_overflowing_values_fail_compare() {
        let treatment = sample("t", &[1.0, 2.0, 3.0]);

        for values in [[1e308, -1e308, 0.0], [1e200, -1e200, 3.0]] {
            let control = sample("c", &values);
            match compare(&control, &treatment, 0.05) {
                Err(AbError::InvalidSampleError { sample, reason }) => {
                    assert_eq!(sample, "c");
                    assert!(reason.contains("too large"));
                }
                other => panic!("unexpected result for {:?}: {:?}", values, other),
            }

            let err = compare(&treatment, &control, 0.05).unwrap_err();
            assert!(matches!(err, AbError::InvalidSampleError { .. }));
        }
    }

    #[test]
    fn test_overflowing_values_fail_confidence_interval() {
        for values in [[1e308, -1e308, 0.0], [1e200, -1e200, 3.0]] {
            let err = confidence_interval(&sample("c", &values), 0.95).unwrap_err();
            assert!(matches!(err, AbError::InvalidSampleError { .. }));
        }
    }

    #[test]
    fn test_large_but_representable_values_still_compare() {
        let control = sample("c", &[1e150, 2e150, 3e150]);
        let treatment = sample("t", &[4e150, 5e150, 6e150]);

        let result = compare(&control, &treatment, 0.05).unwrap();
        assert!(result.statistic.is_finite());
        assert!(result.reject_null);

        let ci = confidence_interval(&control, 0.95).unwrap();
        assert!(ci.lower_bound <= ci.mean && ci.mean <= ci.upper_bound);
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        let a = sample("a", &[1.0, 2.0]);
        let b = sample("b", &[3.0, 4.0]);
        assert!(compare(&a, &b, 0.0).is_err());
        assert!(compare(&a, &b, 1.5).is_err());
    }

    #[test]
    fn test_confidence_interval_bounds() {
        let s = sample("control", &[10.0, 12.0, 11.0, 13.0, 9.0]);
        let ci = confidence_interval(&s, 0.95).unwrap();

        assert!((ci.mean - 11.0).abs() < 1e-12);
        assert!((ci.standard_error - (2.5_f64 / 5.0).sqrt()).abs() < 1e-12);
        // t(0.975, 4) ≈ 2.776
        assert!((ci.t_critical - 2.776_445).abs() < 1e-3);
        assert!(ci.lower_bound <= ci.mean && ci.mean <= ci.upper_bound);
        assert!((ci.mean - ci.lower_bound - (ci.upper_bound - ci.mean)).abs() < 1e-12);
        assert_eq!(ci.sample_size, 5);
        assert_eq!(ci.confidence_level, 0.95);
    }

    #[test]
    fn test_higher_level_widens_interval() {
        let s = sample("treatment", &[15.0, 16.0, 14.0, 17.0, 15.0]);
        let ci_90 = confidence_interval(&s, 0.90).unwrap();
        let ci_95 = confidence_interval(&s, 0.95).unwrap();
        let ci_99 = confidence_interval(&s, 0.99).unwrap();

        assert!(ci_95.width() > ci_90.width());
        assert!(ci_99.width() > ci_95.width());
    }

    #[test]
    fn test_confidence_interval_single_observation_fails() {
        let err = confidence_interval(&sample("control", &[42.0]), 0.95).unwrap_err();
        assert!(matches!(err, AbError::InvalidSampleError { .. }));
    }

    #[test]
    fn test_confidence_interval_constant_sample_is_degenerate() {
        let ci = confidence_interval(&sample("control", &[10.0, 10.0, 10.0]), 0.95).unwrap();
        assert_eq!(ci.standard_error, 0.0);
        assert_eq!(ci.lower_bound, 10.0);
        assert_eq!(ci.upper_bound, 10.0);
    }

    #[test]
    fn test_compare_tables_pairs_columns_by_name() {
        let control = table(
            "control",
            &[("clicks", &[1.0, 2.0, 3.0]), ("revenue", &[10.0, 11.0, 12.0])],
        );
        let treatment = table(
            "treatment",
            &[("revenue", &[20.0, 21.0, 22.0]), ("clicks", &[1.0, 2.0, 3.0])],
        );

        let comparisons = compare_tables(&control, &treatment, 0.05, 0.95, None).unwrap();

        assert_eq!(comparisons.len(), 2);
        assert_eq!(comparisons[0].column, "clicks");
        assert!(!comparisons[0].result.reject_null);
        assert_eq!(comparisons[1].column, "revenue");
        assert!(comparisons[1].result.reject_null);
        assert!((comparisons[1].treatment.mean - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_compare_tables_rejects_mismatched_columns() {
        let control = table("control", &[("clicks", &[1.0, 2.0, 3.0])]);
        let treatment = table("treatment", &[("views", &[1.0, 2.0, 3.0])]);

        let err = compare_tables(&control, &treatment, 0.05, 0.95, None).unwrap_err();
        assert!(matches!(err, AbError::ShapeMismatchError { .. }));
    }

    #[test]
    fn test_compare_tables_single_column_selection() {
        let control = table(
            "control",
            &[("clicks", &[1.0, 2.0, 3.0]), ("extra", &[5.0, 6.0, 7.0])],
        );
        let treatment = table("treatment", &[("clicks", &[4.0, 5.0, 6.0])]);

        let comparisons =
            compare_tables(&control, &treatment, 0.05, 0.95, Some("clicks")).unwrap();
        assert_eq!(comparisons.len(), 1);

        let err = compare_tables(&control, &treatment, 0.05, 0.95, Some("extra")).unwrap_err();
        assert!(matches!(err, AbError::ShapeMismatchError { .. }));
    }
}
