use serde::{Deserialize, Serialize};

use crate::rules::MutationKind;
use crate::runner::{MutantOutcome, MutationTestResult};

/// Per-kind aggregate. `detection_rate` uses the same denominator convention
/// as the overall rate: detected / (detected + survived).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationTypeStat {
    pub kind: MutationKind,
    pub total: usize,
    pub detected_count: usize,
    pub detection_rate: f64,
}

/// The full run report handed to rendering. Plain data, safe to serialize.
///
/// Denominator convention: errored mutants (spawn failures, timeouts) are
/// excluded from `detection_rate`; they appear in `errored_count` and
/// `total_mutations` only, so a broken environment can neither inflate nor
/// deflate the rate.
#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
    pub total_mutations: usize,
    pub detected_count: usize,
    pub survived_count: usize,
    pub errored_count: usize,
    pub detection_rate: f64,
    pub grade: String,
    pub quality_score: u32,
    pub per_kind_stats: Vec<MutationTypeStat>,
    pub recommendations: Vec<String>,
    pub failed_files: Vec<String>,
    pub duration_ms: u64,
    pub raw_results: Vec<MutationTestResult>,
}

fn rate(detected: usize, survived: usize) -> f64 {
    let testable = detected + survived;
    if testable == 0 {
        0.0
    } else {
        detected as f64 / testable as f64
    }
}

pub fn grade_for(detection_rate: f64) -> &'static str {
    if detection_rate >= 0.95 {
        "A+"
    } else if detection_rate >= 0.85 {
        "A"
    } else if detection_rate >= 0.75 {
        "B"
    } else if detection_rate >= 0.65 {
        "C"
    } else if detection_rate >= 0.50 {
        "D"
    } else {
        "F"
    }
}

pub fn quality_score(detection_rate: f64, distinct_kinds: usize) -> u32 {
    let base = (detection_rate * 80.0).round() as u32;
    let breadth = if distinct_kinds >= 5 {
        15
    } else if distinct_kinds >= 3 {
        10
    } else {
        0
    };
    (base + breadth).min(100)
}

fn per_kind_stats(results: &[MutationTestResult]) -> Vec<MutationTypeStat> {
    MutationKind::ALL
        .iter()
        .filter_map(|&kind| {
            let of_kind: Vec<&MutationTestResult> =
                results.iter().filter(|r| r.kind == Some(kind)).collect();
            if of_kind.is_empty() {
                return None;
            }
            let detected = of_kind
                .iter()
                .filter(|r| r.outcome == MutantOutcome::Detected)
                .count();
            let survived = of_kind
                .iter()
                .filter(|r| r.outcome == MutantOutcome::Survived)
                .count();
            Some(MutationTypeStat {
                kind,
                total: of_kind.len(),
                detected_count: detected,
                detection_rate: rate(detected, survived),
            })
        })
        .collect()
}

fn recommendations(
    detection_rate: f64,
    quality_score: u32,
    per_kind: &[MutationTypeStat],
    total: usize,
) -> Vec<String> {
    let mut out = Vec::new();
    if total == 0 {
        out.push("No mutants were evaluated. Check that the source contains mutable operators.".to_string());
        return out;
    }
    if detection_rate < 0.5 {
        out.push(
            "Critical: more than half of the injected defects went unnoticed. Add assertions covering the mutated expressions before trusting this suite.".to_string(),
        );
    } else if detection_rate < 0.8 {
        out.push(
            "Detection is moderate. Review the survived mutants and add targeted test cases for each.".to_string(),
        );
    }
    for stat in per_kind {
        if stat.detection_rate < 0.3 {
            out.push(format!(
                "Tests rarely catch {} mutations ({:.0}% detected). Add cases exercising those operators directly.",
                stat.kind.name(),
                stat.detection_rate * 100.0,
            ));
        }
    }
    if quality_score < 60 {
        out.push(
            "Consider running mutation testing in CI so regressions in test strength are caught early.".to_string(),
        );
        out.push(
            "Start with the arithmetic and relational survivors; they usually point at missing boundary tests.".to_string(),
        );
    }
    if out.is_empty() {
        out.push("Test suite shows strong mutation resistance. Keep new code covered at the same level.".to_string());
    }
    out
}

/// Fold classified results into the run report. Classification polarity:
/// a result whose tests passed is survived, a result whose tests failed is
/// detected, on every path.
pub fn aggregate(results: Vec<MutationTestResult>) -> Report {
    aggregate_with_failures(results, Vec::new())
}

pub fn aggregate_with_failures(
    results: Vec<MutationTestResult>,
    failed_files: Vec<String>,
) -> Report {
    let detected = results
        .iter()
        .filter(|r| r.outcome == MutantOutcome::Detected)
        .count();
    let survived = results
        .iter()
        .filter(|r| r.outcome == MutantOutcome::Survived)
        .count();
    let errored = results
        .iter()
        .filter(|r| r.outcome == MutantOutcome::Errored)
        .count();

    let detection_rate = rate(detected, survived);
    let per_kind = per_kind_stats(&results);
    let distinct_kinds = per_kind.len();
    let score = quality_score(detection_rate, distinct_kinds);

    Report {
        total_mutations: results.len(),
        detected_count: detected,
        survived_count: survived,
        errored_count: errored,
        detection_rate,
        grade: grade_for(detection_rate).to_string(),
        quality_score: score,
        recommendations: recommendations(detection_rate, score, &per_kind, results.len()),
        per_kind_stats: per_kind,
        failed_files,
        duration_ms: results.iter().map(|r| r.duration_ms).sum(),
        raw_results: results,
    }
}
