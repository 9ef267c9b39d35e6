use std::path::Path;

use patmut::composer;
use patmut::line_range::LineRange;
use patmut::rules::{MutationKind, MutationRule, RuleCatalog};

fn arithmetic_and_logical() -> Vec<MutationRule> {
    let catalog = RuleCatalog::standard();
    catalog.rules_for(&[MutationKind::Arithmetic, MutationKind::Logical])
}

// --- mutant_file_name ---

#[test]
fn cumulative_name_appends_mutated() {
    let name = composer::mutant_file_name(Path::new("src/app.js"), None);
    assert_eq!(name, "app_mutated.js");
}

#[test]
fn isolated_name_includes_kind() {
    let name =
        composer::mutant_file_name(Path::new("calc.py"), Some(MutationKind::DataType));
    assert_eq!(name, "calc_dataType_mutated.py");
}

#[test]
fn name_without_extension() {
    let name = composer::mutant_file_name(Path::new("Makefile"), None);
    assert_eq!(name, "Makefile_mutated");
}

// --- compose_cumulative ---

#[test]
fn cumulative_compounds_all_kinds_into_one_artifact() {
    let source = "total = a + b;\nok = x && y;\n";
    let artifact =
        composer::compose_cumulative(source, &arithmetic_and_logical(), None, false, None)
            .unwrap();
    assert_eq!(artifact.mutated_code, "total = a - b;\nok = x || y;\n");
    assert!(artifact.kind.is_none());
}

#[test]
fn cumulative_tracks_each_kind_on_its_own_line() {
    let source = "total = a + b;\nok = x && y;\n";
    let artifact =
        composer::compose_cumulative(source, &arithmetic_and_logical(), None, true, None)
            .unwrap();
    let lines: Vec<&str> = artifact.mutated_code.lines().collect();
    assert_eq!(lines[0], "total = a - b; // @ MUTATION: arithmetic");
    assert_eq!(lines[1], "ok = x || y; // @ MUTATION: logical");
}

#[test]
fn cumulative_no_match_returns_none() {
    let source = "plain text with nothing to mutate\n";
    let result =
        composer::compose_cumulative(source, &arithmetic_and_logical(), None, true, None);
    assert!(result.is_none());
}

#[test]
fn cumulative_is_deterministic() {
    let source = "a + b && c <= d\n";
    let rules = RuleCatalog::standard().rules().to_vec();
    let first = composer::compose_cumulative(source, &rules, None, true, None).unwrap();
    let second = composer::compose_cumulative(source, &rules, None, true, None).unwrap();
    assert_eq!(first.mutated_code, second.mutated_code);
}

#[test]
fn cumulative_respects_line_range() {
    let source = "a + b\nc + d\n";
    let rules = arithmetic_and_logical();
    let artifact =
        composer::compose_cumulative(source, &rules, Some(LineRange::new(2, 2)), false, None)
            .unwrap();
    assert_eq!(artifact.mutated_code, "a + b\nc - d\n");
}

#[test]
fn cumulative_invalid_range_mutates_whole_file() {
    let source = "a + b\n";
    let rules = arithmetic_and_logical();
    let artifact =
        composer::compose_cumulative(source, &rules, Some(LineRange::new(9, 4)), false, None)
            .unwrap();
    assert_eq!(artifact.mutated_code, "a - b\n");
}

#[test]
fn cumulative_tracked_lines_use_full_document_numbering() {
    let source = "plain\nplain\na + b\n";
    let rules = arithmetic_and_logical();
    let artifact =
        composer::compose_cumulative(source, &rules, Some(LineRange::new(3, 3)), true, None)
            .unwrap();
    let lines: Vec<&str> = artifact.mutated_code.lines().collect();
    assert_eq!(lines[0], "plain");
    assert_eq!(lines[1], "plain");
    assert_eq!(lines[2], "a - b // @ MUTATION: arithmetic");
}

#[test]
fn cumulative_persists_artifact() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("app_mutated.js");
    let artifact = composer::compose_cumulative(
        "a + b\n",
        &arithmetic_and_logical(),
        None,
        false,
        Some(out.as_path()),
    )
    .unwrap();
    assert_eq!(artifact.output_path.as_deref(), Some(out.as_path()));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "a - b\n");
}

#[test]
fn cumulative_write_failure_still_returns_artifact() {
    let artifact = composer::compose_cumulative(
        "a + b\n",
        &arithmetic_and_logical(),
        None,
        false,
        Some(Path::new("/nonexistent-dir/app_mutated.js")),
    )
    .unwrap();
    assert!(artifact.output_path.is_none());
    assert_eq!(artifact.mutated_code, "a - b\n");
}

// --- compose_isolated ---

#[test]
fn isolated_produces_one_artifact_per_matching_kind() {
    let source = "total = a + b;\nok = x && y;\n";
    let artifacts = composer::compose_isolated(
        source,
        Path::new("app.js"),
        &arithmetic_and_logical(),
        None,
        false,
        None,
    );
    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0].kind, Some(MutationKind::Arithmetic));
    assert_eq!(artifacts[0].mutated_code, "total = a - b;\nok = x && y;\n");
    assert_eq!(artifacts[1].kind, Some(MutationKind::Logical));
    assert_eq!(artifacts[1].mutated_code, "total = a + b;\nok = x || y;\n");
}

#[test]
fn isolated_omits_kinds_with_no_match() {
    let source = "ok = x && y;\n";
    let artifacts = composer::compose_isolated(
        source,
        Path::new("app.js"),
        &arithmetic_and_logical(),
        None,
        false,
        None,
    );
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].kind, Some(MutationKind::Logical));
}

#[test]
fn isolated_mutations_do_not_compound() {
    let source = "v = a + b && c;\n";
    let artifacts = composer::compose_isolated(
        source,
        Path::new("app.js"),
        &arithmetic_and_logical(),
        None,
        false,
        None,
    );
    for artifact in &artifacts {
        let diff_count = source
            .lines()
            .zip(artifact.mutated_code.lines())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(diff_count, 1);
    }
}

#[test]
fn isolated_dedups_rules_by_kind() {
    let rules = vec![
        MutationRule::new(MutationKind::Arithmetic, &[("+", &["-"])]),
        MutationRule::new(MutationKind::Arithmetic, &[("+", &["*"])]),
    ];
    let artifacts =
        composer::compose_isolated("a + b\n", Path::new("app.js"), &rules, None, false, None);
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].mutated_code, "a - b\n");
}

#[test]
fn isolated_persists_kind_suffixed_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = "total = a + b;\nok = x && y;\n";
    let artifacts = composer::compose_isolated(
        source,
        Path::new("app.js"),
        &arithmetic_and_logical(),
        None,
        false,
        Some(dir.path()),
    );
    assert_eq!(artifacts.len(), 2);
    assert!(dir.path().join("app_arithmetic_mutated.js").exists());
    assert!(dir.path().join("app_logical_mutated.js").exists());
}

#[test]
fn isolated_tracks_only_its_own_kind() {
    let source = "total = a + b;\nok = x && y;\n";
    let artifacts = composer::compose_isolated(
        source,
        Path::new("app.js"),
        &arithmetic_and_logical(),
        None,
        true,
        None,
    );
    let arith = &artifacts[0].mutated_code;
    assert!(arith.contains("// @ MUTATION: arithmetic"));
    assert!(!arith.contains("logical"));
}
